use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::{models::Employee, AppError, AppResult, AppState};

/// GET /api/employees - directory listing for assignment pickers
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "List of employees", body = Vec<Employee>)
    ),
    tag = "employees"
)]
pub async fn get_employees(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<Employee>>> {
    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, full_name, email, is_active
        FROM employees
        ORDER BY full_name
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(employees))
}

/// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = i32, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "employees"
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    Path(employee_id): Path<i32>,
) -> AppResult<Json<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, full_name, email, is_active
        FROM employees
        WHERE id = $1
        "#,
    )
    .bind(employee_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", employee_id)))?;

    Ok(Json(employee))
}

/// Shared existence check used by assignment and resolution handlers.
pub async fn ensure_employee(db: &sqlx::PgPool, employee_id: i32) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar(r#"SELECT EXISTS(SELECT 1 FROM employees WHERE id = $1)"#)
        .bind(employee_id)
        .fetch_one(db)
        .await?;

    if !exists {
        return Err(AppError::NotFound(format!(
            "Employee {} not found",
            employee_id
        )));
    }

    Ok(())
}
