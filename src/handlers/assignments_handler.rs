use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    calendar,
    models::{
        AssignRangeInput, AssignmentFailure, AssignmentMutationResponse, BulkAssignmentOutcome,
        CopyAssignmentInput, CreateAssignmentInput, WeekAssignment,
    },
    AppError, AppResult, AppState,
};

use super::employees_handler::ensure_employee;

const ASSIGNMENT_COLUMNS: &str =
    "uuid, employee_id, template_id, year, week_number, notes, created_at";

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetAssignmentsQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    pub year: i32,
}

/// GET /api/assignments?employeeId=&year=
#[utoipa::path(
    get,
    path = "/api/assignments",
    params(GetAssignmentsQuery),
    responses(
        (status = 200, description = "Assignments for the employee and year, ordered by week", body = Vec<WeekAssignment>)
    ),
    tag = "assignments"
)]
pub async fn get_assignments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetAssignmentsQuery>,
) -> AppResult<Json<Vec<WeekAssignment>>> {
    let assignments = sqlx::query_as::<_, WeekAssignment>(&format!(
        r#"
        SELECT {}
        FROM week_assignments
        WHERE employee_id = $1 AND year = $2
        ORDER BY week_number
        "#,
        ASSIGNMENT_COLUMNS
    ))
    .bind(query.employee_id)
    .bind(query.year)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(assignments))
}

/// POST /api/assignments - Assign a template to one employee for one week
#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentInput,
    responses(
        (status = 200, description = "Assignment created", body = WeekAssignment),
        (status = 404, description = "Employee or template not found"),
        (status = 409, description = "Week already assigned, or template inactive"),
        (status = 422, description = "Week does not exist in that ISO year")
    ),
    tag = "assignments"
)]
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateAssignmentInput>,
) -> AppResult<Json<WeekAssignment>> {
    validate_week_exists(input.year, input.week_number)?;
    ensure_employee(&state.db, input.employee_id).await?;
    ensure_active_template(&state.db, input.template_id).await?;

    let assignment = insert_assignment(
        &state.db,
        input.employee_id,
        input.template_id,
        input.year,
        input.week_number,
        input.notes.as_deref(),
    )
    .await?;

    Ok(Json(assignment))
}

/// DELETE /api/assignments/{uuid} - Remove a binding; the template stays
#[utoipa::path(
    delete,
    path = "/api/assignments/{uuid}",
    params(
        ("uuid" = Uuid, Path, description = "Assignment UUID")
    ),
    responses(
        (status = 200, description = "Assignment deleted", body = AssignmentMutationResponse),
        (status = 404, description = "Assignment not found")
    ),
    tag = "assignments"
)]
pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<Uuid>,
) -> AppResult<Json<AssignmentMutationResponse>> {
    let result = sqlx::query("DELETE FROM week_assignments WHERE uuid = $1")
        .bind(uuid)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Assignment {} not found", uuid)));
    }

    Ok(Json(AssignmentMutationResponse {
        success: true,
        assignment_uuid: Some(uuid),
        message: Some("Assignment deleted successfully".to_string()),
    }))
}

/// POST /api/assignments/range - One assignment per ISO week in a date range
///
/// Partial success by design: weeks that already carry an assignment are
/// reported in `failed` and the rest of the batch continues. Range
/// assignment exists to fill gaps around custom weeks.
#[utoipa::path(
    post,
    path = "/api/assignments/range",
    request_body = AssignRangeInput,
    responses(
        (status = 200, description = "Per-week outcome of the range assignment", body = BulkAssignmentOutcome),
        (status = 400, description = "Invalid or empty date range"),
        (status = 404, description = "Employee or template not found"),
        (status = 409, description = "Template inactive")
    ),
    tag = "assignments"
)]
pub async fn assign_range(
    State(state): State<Arc<AppState>>,
    Json(input): Json<AssignRangeInput>,
) -> AppResult<Json<BulkAssignmentOutcome>> {
    let start = parse_date("start_date", &input.start_date)?;
    let end = parse_date("end_date", &input.end_date)?;

    let weeks = calendar::weeks_in_range(start, end)?;
    if weeks.is_empty() {
        return Err(AppError::EmptyRange(format!(
            "no ISO weeks between {} and {}",
            start, end
        )));
    }

    ensure_employee(&state.db, input.employee_id).await?;
    ensure_active_template(&state.db, input.template_id).await?;

    let mut outcome = BulkAssignmentOutcome::new();
    for (year, week_number) in weeks {
        let attempt = insert_assignment(
            &state.db,
            input.employee_id,
            input.template_id,
            year,
            week_number as i32,
            input.notes.as_deref(),
        )
        .await;

        outcome.record(input.employee_id, year, week_number as i32, attempt)?;
    }

    tracing::info!(
        employee_id = input.employee_id,
        template_id = input.template_id,
        "range assignment: {}",
        outcome.summary()
    );

    Ok(Json(outcome))
}

/// POST /api/assignments/{uuid}/copy - Replicate one assignment to others
///
/// Same template, year, week and notes for every target employee; targets
/// that already have that week assigned, or do not exist, become per-unit
/// failures rather than aborting the batch.
#[utoipa::path(
    post,
    path = "/api/assignments/{uuid}/copy",
    params(
        ("uuid" = Uuid, Path, description = "Source assignment UUID")
    ),
    request_body = CopyAssignmentInput,
    responses(
        (status = 200, description = "Per-employee outcome of the copy", body = BulkAssignmentOutcome),
        (status = 400, description = "No target employees given"),
        (status = 404, description = "Source assignment not found")
    ),
    tag = "assignments"
)]
pub async fn copy_assignment(
    State(state): State<Arc<AppState>>,
    Path(uuid): Path<Uuid>,
    Json(input): Json<CopyAssignmentInput>,
) -> AppResult<Json<BulkAssignmentOutcome>> {
    if input.target_employee_ids.is_empty() {
        return Err(AppError::BadRequest(
            "target_employee_ids must not be empty".to_string(),
        ));
    }

    let source = sqlx::query_as::<_, WeekAssignment>(&format!(
        "SELECT {} FROM week_assignments WHERE uuid = $1",
        ASSIGNMENT_COLUMNS
    ))
    .bind(uuid)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Assignment {} not found", uuid)))?;

    // Copy is a series of fresh assigns, so it obeys the same rule as a
    // direct assign: the template must still be active.
    ensure_active_template(&state.db, source.template_id).await?;

    let mut outcome = BulkAssignmentOutcome::new();
    for employee_id in input.target_employee_ids {
        match ensure_employee(&state.db, employee_id).await {
            Ok(()) => {}
            Err(AppError::NotFound(message)) => {
                outcome.failed.push(AssignmentFailure {
                    employee_id,
                    year: source.year,
                    week_number: source.week_number,
                    error: "not_found".to_string(),
                    message,
                });
                continue;
            }
            Err(other) => return Err(other),
        }

        let attempt = insert_assignment(
            &state.db,
            employee_id,
            source.template_id,
            source.year,
            source.week_number,
            source.notes.as_deref(),
        )
        .await;

        outcome.record(employee_id, source.year, source.week_number, attempt)?;
    }

    tracing::info!(
        source_uuid = %uuid,
        "assignment copy: {}",
        outcome.summary()
    );

    Ok(Json(outcome))
}

/// Inserts one assignment row. The unique index on
/// (employee_id, year, week_number) decides conflicts, so concurrent bulk
/// operations cannot race a pre-check into duplicate rows.
async fn insert_assignment(
    db: &sqlx::PgPool,
    employee_id: i32,
    template_id: i32,
    year: i32,
    week_number: i32,
    notes: Option<&str>,
) -> AppResult<WeekAssignment> {
    sqlx::query_as::<_, WeekAssignment>(&format!(
        r#"
        INSERT INTO week_assignments (uuid, employee_id, template_id, year, week_number, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        ASSIGNMENT_COLUMNS
    ))
    .bind(Uuid::new_v4())
    .bind(employee_id)
    .bind(template_id)
    .bind(year)
    .bind(week_number)
    .bind(notes)
    .fetch_one(db)
    .await
    .map_err(|e| {
        AppError::conflict_on_unique(
            e,
            format!(
                "Employee {} already has an assignment for week {} of {}",
                employee_id, week_number, year
            ),
        )
    })
}

/// Template must exist and be active for new assignments; assignments made
/// before a deactivation stay valid.
async fn ensure_active_template(db: &sqlx::PgPool, template_id: i32) -> AppResult<()> {
    let is_active: Option<bool> =
        sqlx::query_scalar("SELECT is_active FROM schedule_templates WHERE id = $1")
            .bind(template_id)
            .fetch_optional(db)
            .await?;

    template_assignable(template_id, is_active)
}

/// The assignability rule itself: missing template is NotFound, a
/// deactivated one is InactiveTemplate. Applied by direct assigns, range
/// assignment, and copy alike.
fn template_assignable(template_id: i32, is_active: Option<bool>) -> AppResult<()> {
    match is_active {
        None => Err(AppError::NotFound(format!(
            "Template {} not found",
            template_id
        ))),
        Some(false) => Err(AppError::InactiveTemplate(format!(
            "Template {} is deactivated and cannot be assigned",
            template_id
        ))),
        Some(true) => Ok(()),
    }
}

fn parse_date(field: &str, value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("Invalid {}: {}", field, e)))
}

fn validate_week_exists(year: i32, week_number: i32) -> AppResult<()> {
    if !(1..=53).contains(&week_number) {
        return Err(AppError::Validation(format!(
            "week_number {} is out of range 1-53",
            week_number
        )));
    }
    calendar::week_date_range(year, week_number as u32)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_template_is_assignable() {
        assert!(template_assignable(1, Some(true)).is_ok());
    }

    #[test]
    fn test_deactivated_template_is_not_assignable() {
        let err = template_assignable(1, Some(false)).unwrap_err();
        assert!(matches!(err, AppError::InactiveTemplate(_)));
    }

    #[test]
    fn test_missing_template_is_not_found() {
        let err = template_assignable(42, None).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_week_53_rejected_in_52_week_year() {
        assert!(validate_week_exists(2026, 53).is_ok());
        assert!(validate_week_exists(2025, 53).is_err());
        assert!(validate_week_exists(2025, 0).is_err());
    }
}
