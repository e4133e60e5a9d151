use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Binding of one employee to one template for one ISO week. At most one
/// row exists per (employee_id, year, week_number); the unique index
/// enforces it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WeekAssignment {
    pub uuid: Uuid,
    pub employee_id: i32,
    pub template_id: i32,
    pub year: i32,
    pub week_number: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
