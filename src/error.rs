use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Empty range: {0}")]
    EmptyRange(String),

    #[error("Inactive template: {0}")]
    InactiveTemplate(String),

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// Translates a Postgres unique-index violation (23505) into a Conflict
    /// carrying `message`. Any other database error passes through unchanged.
    /// The unique index on (employee_id, year, week_number) is the final
    /// arbiter for concurrent assignment creates.
    pub fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> AppError {
        match &err {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict(message.into())
            }
            _ => AppError::Database(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::InvalidRange(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::EmptyRange(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InactiveTemplate(msg) => (StatusCode::CONFLICT, msg),
            AppError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
