use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::IntoParams;

use crate::{
    models::{
        validate_template_name, validate_week, CreateTemplateInput, DayConfig, ScheduleBreak,
        ScheduleTemplate, TemplateDayBreakRow, TemplateDayRow, TemplateMutationResponse,
        TemplateWithDays, UpdateTemplateInput,
    },
    AppError, AppResult, AppState,
};

const TEMPLATE_COLUMNS: &str = "id, name, description, is_active, created_by, created_at";

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetTemplatesQuery {
    /// Admin screens list deactivated templates too; assignment pickers
    /// leave this unset and only see active ones.
    #[serde(rename = "includeInactive")]
    pub include_inactive: Option<bool>,
}

/// GET /api/templates?includeInactive=
#[utoipa::path(
    get,
    path = "/api/templates",
    params(GetTemplatesQuery),
    responses(
        (status = 200, description = "List of schedule templates", body = Vec<ScheduleTemplate>)
    ),
    tag = "templates"
)]
pub async fn get_templates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<GetTemplatesQuery>,
) -> AppResult<Json<Vec<ScheduleTemplate>>> {
    let mut sql = format!(
        "SELECT {} FROM schedule_templates WHERE 1=1",
        TEMPLATE_COLUMNS
    );

    if !query.include_inactive.unwrap_or(false) {
        sql.push_str(" AND is_active = TRUE");
    }

    sql.push_str(" ORDER BY name");

    let templates = sqlx::query_as::<_, ScheduleTemplate>(&sql)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(templates))
}

/// GET /api/templates/{id} - Template with its seven days and breaks
#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(
        ("id" = i32, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template with day configurations", body = TemplateWithDays),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<i32>,
) -> AppResult<Json<TemplateWithDays>> {
    let template = fetch_template(&state.db, template_id).await?;
    let days = load_template_days(&state.db, template_id).await?;

    Ok(Json(TemplateWithDays { template, days }))
}

/// POST /api/templates - Create a template with exactly one day per weekday
#[utoipa::path(
    post,
    path = "/api/templates",
    request_body = CreateTemplateInput,
    responses(
        (status = 200, description = "Template created successfully", body = TemplateWithDays),
        (status = 404, description = "created_by employee not found"),
        (status = 422, description = "Malformed day configuration")
    ),
    tag = "templates"
)]
pub async fn create_template(
    State(state): State<Arc<AppState>>,
    Json(input): Json<CreateTemplateInput>,
) -> AppResult<Json<TemplateWithDays>> {
    validate_template_name(&input.name)?;

    let days = validate_week(input.days)?;

    if let Some(created_by) = input.created_by {
        super::employees_handler::ensure_employee(&state.db, created_by).await?;
    }

    let mut tx = state.db.begin().await?;

    let template = sqlx::query_as::<_, ScheduleTemplate>(&format!(
        r#"
        INSERT INTO schedule_templates (name, description, created_by)
        VALUES ($1, $2, $3)
        RETURNING {}
        "#,
        TEMPLATE_COLUMNS
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.created_by)
    .fetch_one(&mut *tx)
    .await?;

    insert_days(&mut tx, template.id, &days).await?;

    tx.commit().await?;

    tracing::info!(template_id = template.id, "created schedule template");

    Ok(Json(TemplateWithDays { template, days }))
}

/// PUT /api/templates/{id} - Patch metadata; replace all seven days at once
#[utoipa::path(
    put,
    path = "/api/templates/{id}",
    params(
        ("id" = i32, Path, description = "Template ID")
    ),
    request_body = UpdateTemplateInput,
    responses(
        (status = 200, description = "Template updated successfully", body = TemplateWithDays),
        (status = 400, description = "No fields to update"),
        (status = 404, description = "Template not found"),
        (status = 422, description = "Malformed day configuration")
    ),
    tag = "templates"
)]
pub async fn update_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<i32>,
    Json(input): Json<UpdateTemplateInput>,
) -> AppResult<Json<TemplateWithDays>> {
    if input.name.is_none() && input.description.is_none() && input.days.is_none() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }

    if let Some(name) = &input.name {
        validate_template_name(name)?;
    }

    // Validate the replacement week before touching the database.
    let replacement_days = match input.days {
        Some(day_inputs) => Some(validate_week(day_inputs)?),
        None => None,
    };

    // Existence check up front so a metadata-only patch 404s cleanly.
    fetch_template(&state.db, template_id).await?;

    let mut tx = state.db.begin().await?;

    // Build dynamic UPDATE query
    let mut updates = vec![];
    let mut bind_count = 1;

    if input.name.is_some() {
        updates.push(format!("name = ${}", bind_count));
        bind_count += 1;
    }
    if input.description.is_some() {
        updates.push(format!("description = ${}", bind_count));
        bind_count += 1;
    }

    if !updates.is_empty() {
        let sql = format!(
            "UPDATE schedule_templates SET {} WHERE id = ${}",
            updates.join(", "),
            bind_count
        );

        let mut query = sqlx::query(&sql);
        if let Some(name) = &input.name {
            query = query.bind(name);
        }
        if let Some(description) = &input.description {
            query = query.bind(description);
        }
        query = query.bind(template_id);

        query.execute(&mut *tx).await?;
    }

    // The day list is only ever replaced as a whole, so a half-updated week
    // can never be observed.
    if let Some(days) = &replacement_days {
        sqlx::query("DELETE FROM template_days WHERE template_id = $1")
            .bind(template_id)
            .execute(&mut *tx)
            .await?;
        insert_days(&mut tx, template_id, days).await?;
    }

    tx.commit().await?;

    let template = fetch_template(&state.db, template_id).await?;
    let days = match replacement_days {
        Some(days) => days,
        None => load_template_days(&state.db, template_id).await?,
    };

    Ok(Json(TemplateWithDays { template, days }))
}

/// POST /api/templates/{id}/deactivate - Soft-deactivate a template
///
/// Existing weekly assignments keep referencing it, so historical weeks
/// still resolve; it just stops being offered for new assignments.
#[utoipa::path(
    post,
    path = "/api/templates/{id}/deactivate",
    params(
        ("id" = i32, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template deactivated", body = TemplateMutationResponse),
        (status = 404, description = "Template not found")
    ),
    tag = "templates"
)]
pub async fn deactivate_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<i32>,
) -> AppResult<Json<TemplateMutationResponse>> {
    let result = sqlx::query("UPDATE schedule_templates SET is_active = FALSE WHERE id = $1")
        .bind(template_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Template {} not found",
            template_id
        )));
    }

    Ok(Json(TemplateMutationResponse {
        success: true,
        message: Some("Template deactivated".to_string()),
    }))
}

/// DELETE /api/templates/{id} - Hard delete, only when unreferenced
#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    params(
        ("id" = i32, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template deleted successfully", body = TemplateMutationResponse),
        (status = 404, description = "Template not found"),
        (status = 409, description = "Template is referenced by weekly assignments")
    ),
    tag = "templates"
)]
pub async fn delete_template(
    State(state): State<Arc<AppState>>,
    Path(template_id): Path<i32>,
) -> AppResult<Json<TemplateMutationResponse>> {
    let references: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM week_assignments WHERE template_id = $1")
            .bind(template_id)
            .fetch_one(&state.db)
            .await?;

    if references > 0 {
        return Err(AppError::Conflict(format!(
            "Template {} is referenced by {} weekly assignments; deactivate it instead",
            template_id, references
        )));
    }

    let result = sqlx::query("DELETE FROM schedule_templates WHERE id = $1")
        .bind(template_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "Template {} not found",
            template_id
        )));
    }

    Ok(Json(TemplateMutationResponse {
        success: true,
        message: Some("Template deleted successfully".to_string()),
    }))
}

async fn fetch_template(db: &sqlx::PgPool, template_id: i32) -> AppResult<ScheduleTemplate> {
    sqlx::query_as::<_, ScheduleTemplate>(&format!(
        "SELECT {} FROM schedule_templates WHERE id = $1",
        TEMPLATE_COLUMNS
    ))
    .bind(template_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Template {} not found", template_id)))
}

/// Loads the seven day configurations of a template, breaks attached and
/// ordered by sort_order.
pub async fn load_template_days(
    db: &sqlx::PgPool,
    template_id: i32,
) -> AppResult<Vec<DayConfig>> {
    let day_rows = sqlx::query_as::<_, TemplateDayRow>(
        r#"
        SELECT id, day_of_week, is_working_day, is_split_schedule,
               start_time, end_time, morning_start, morning_end,
               afternoon_start, afternoon_end, notes
        FROM template_days
        WHERE template_id = $1
        ORDER BY day_of_week
        "#,
    )
    .bind(template_id)
    .fetch_all(db)
    .await?;

    let break_rows = sqlx::query_as::<_, TemplateDayBreakRow>(
        r#"
        SELECT b.day_id, b.name, b.start_time, b.end_time, b.break_type,
               b.is_paid, b.is_required, b.sort_order
        FROM template_day_breaks b
        JOIN template_days d ON d.id = b.day_id
        WHERE d.template_id = $1
        ORDER BY b.sort_order
        "#,
    )
    .bind(template_id)
    .fetch_all(db)
    .await?;

    let mut breaks_by_day: HashMap<i32, Vec<ScheduleBreak>> = HashMap::new();
    for row in break_rows {
        breaks_by_day
            .entry(row.day_id)
            .or_default()
            .push(row.into_break());
    }

    Ok(day_rows
        .into_iter()
        .map(|row| {
            let breaks = breaks_by_day.remove(&row.id).unwrap_or_default();
            row.into_day_config(breaks)
        })
        .collect())
}

async fn insert_days(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    template_id: i32,
    days: &[DayConfig],
) -> AppResult<()> {
    for day in days {
        let day_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO template_days (
                template_id, day_of_week, is_working_day, is_split_schedule,
                start_time, end_time, morning_start, morning_end,
                afternoon_start, afternoon_end, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            "#,
        )
        .bind(template_id)
        .bind(day.day_of_week)
        .bind(day.is_working_day)
        .bind(day.is_split_schedule)
        .bind(day.start_time)
        .bind(day.end_time)
        .bind(day.morning_start)
        .bind(day.morning_end)
        .bind(day.afternoon_start)
        .bind(day.afternoon_end)
        .bind(&day.notes)
        .fetch_one(&mut **tx)
        .await?;

        for brk in &day.breaks {
            sqlx::query(
                r#"
                INSERT INTO template_day_breaks (
                    day_id, name, start_time, end_time, break_type,
                    is_paid, is_required, sort_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(day_id)
            .bind(&brk.name)
            .bind(brk.start_time)
            .bind(brk.end_time)
            .bind(brk.break_type)
            .bind(brk.is_paid)
            .bind(brk.is_required)
            .bind(brk.sort_order)
            .execute(&mut **tx)
            .await?;
        }
    }

    Ok(())
}
