use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Employee directory entry. Managed by the wider HR system; this service
/// only reads it for lookups and assignment pickers.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub is_active: bool,
}
