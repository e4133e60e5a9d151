use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    calendar,
    models::{BaseScheduleRow, DayConfig, TemplateDayBreakRow, TemplateDayRow},
    AppError, AppResult, AppState,
};

use super::employees_handler::ensure_employee;

/// Where a resolved day came from: a weekly assignment's template, the
/// legacy base schedule, or nowhere (unscheduled employee).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleSource {
    Assignment,
    Base,
    None,
}

/// The effective schedule for one employee on one date.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub source: ScheduleSource,
    pub scheduled_minutes: i64,
    pub day: Option<DayConfig>,
}

/// Seven resolved days, the shape the weekly table view renders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResolvedWeek {
    pub year: i32,
    pub week_number: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: Vec<ResolvedDay>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResolveDayQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    pub date: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ResolveWeekQuery {
    #[serde(rename = "employeeId")]
    pub employee_id: i32,
    pub year: i32,
    pub week: i32,
}

/// The fallback chain: the assigned template's day wins, the legacy base
/// schedule fills in when no assignment covers the week, and an employee
/// with neither is simply unscheduled.
fn effective_day(
    assigned: Option<DayConfig>,
    base: Option<DayConfig>,
) -> (ScheduleSource, Option<DayConfig>) {
    match (assigned, base) {
        (Some(day), _) => (ScheduleSource::Assignment, Some(day)),
        (None, Some(day)) => (ScheduleSource::Base, Some(day)),
        (None, None) => (ScheduleSource::None, None),
    }
}

/// GET /api/schedule/day?employeeId=&date=
#[utoipa::path(
    get,
    path = "/api/schedule/day",
    params(ResolveDayQuery),
    responses(
        (status = 200, description = "Effective day configuration for the date", body = ResolvedDay),
        (status = 400, description = "Invalid date format"),
        (status = 404, description = "Employee not found")
    ),
    tag = "schedule"
)]
pub async fn resolve_day(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveDayQuery>,
) -> AppResult<Json<ResolvedDay>> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|e| AppError::BadRequest(format!("Invalid date format: {}", e)))?;

    ensure_employee(&state.db, query.employee_id).await?;

    let resolved = resolve_for_date(&state.db, query.employee_id, date).await?;

    Ok(Json(resolved))
}

/// GET /api/schedule/week?employeeId=&year=&week=
#[utoipa::path(
    get,
    path = "/api/schedule/week",
    params(ResolveWeekQuery),
    responses(
        (status = 200, description = "Resolved schedule for each day of the week", body = ResolvedWeek),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Week does not exist in that ISO year")
    ),
    tag = "schedule"
)]
pub async fn resolve_week(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ResolveWeekQuery>,
) -> AppResult<Json<ResolvedWeek>> {
    if !(1..=53).contains(&query.week) {
        return Err(AppError::Validation(format!(
            "week {} is out of range 1-53",
            query.week
        )));
    }

    let (start_date, end_date) = calendar::week_date_range(query.year, query.week as u32)?;

    ensure_employee(&state.db, query.employee_id).await?;

    let mut days = Vec::with_capacity(7);
    let mut date = start_date;
    while date <= end_date {
        days.push(resolve_for_date(&state.db, query.employee_id, date).await?);
        date += Duration::days(1);
    }

    Ok(Json(ResolvedWeek {
        year: query.year,
        week_number: query.week,
        start_date,
        end_date,
        days,
    }))
}

/// Read-only resolution for a single date. Deterministic: two calls with
/// no intervening writes return the same shape.
async fn resolve_for_date(
    db: &sqlx::PgPool,
    employee_id: i32,
    date: NaiveDate,
) -> AppResult<ResolvedDay> {
    let (year, week_number) = calendar::iso_week_of(date);
    let day_of_week = calendar::weekday_ordinal(date);

    let assigned = fetch_assignment_day(db, employee_id, year, week_number, day_of_week).await?;

    let base = if assigned.is_none() {
        fetch_base_day(db, employee_id, day_of_week).await?
    } else {
        None
    };

    let (source, day) = effective_day(assigned, base);
    let scheduled_minutes = day.as_ref().map(|d| d.scheduled_minutes()).unwrap_or(0);

    Ok(ResolvedDay {
        date,
        source,
        scheduled_minutes,
        day,
    })
}

/// The template day the employee's weekly assignment prescribes for this
/// weekday, if an assignment exists for the week.
async fn fetch_assignment_day(
    db: &sqlx::PgPool,
    employee_id: i32,
    year: i32,
    week_number: u32,
    day_of_week: i16,
) -> AppResult<Option<DayConfig>> {
    let day_row = sqlx::query_as::<_, TemplateDayRow>(
        r#"
        SELECT d.id, d.day_of_week, d.is_working_day, d.is_split_schedule,
               d.start_time, d.end_time, d.morning_start, d.morning_end,
               d.afternoon_start, d.afternoon_end, d.notes
        FROM week_assignments a
        JOIN template_days d ON d.template_id = a.template_id
        WHERE a.employee_id = $1 AND a.year = $2 AND a.week_number = $3
          AND d.day_of_week = $4
        "#,
    )
    .bind(employee_id)
    .bind(year)
    .bind(week_number as i32)
    .bind(day_of_week)
    .fetch_optional(db)
    .await?;

    let Some(row) = day_row else {
        return Ok(None);
    };

    let breaks = sqlx::query_as::<_, TemplateDayBreakRow>(
        r#"
        SELECT day_id, name, start_time, end_time, break_type,
               is_paid, is_required, sort_order
        FROM template_day_breaks
        WHERE day_id = $1
        ORDER BY sort_order
        "#,
    )
    .bind(row.id)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(|b| b.into_break())
    .collect();

    Ok(Some(row.into_day_config(breaks)))
}

async fn fetch_base_day(
    db: &sqlx::PgPool,
    employee_id: i32,
    day_of_week: i16,
) -> AppResult<Option<DayConfig>> {
    let row = sqlx::query_as::<_, BaseScheduleRow>(
        r#"
        SELECT day_of_week, start_time, end_time, break_start, break_end
        FROM base_schedules
        WHERE employee_id = $1 AND day_of_week = $2
        "#,
    )
    .bind(employee_id)
    .bind(day_of_week)
    .fetch_optional(db)
    .await?;

    Ok(row.map(|r| r.into_day_config()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn day(day_of_week: i16, start: NaiveTime, end: NaiveTime) -> DayConfig {
        DayConfig {
            day_of_week,
            is_working_day: true,
            is_split_schedule: false,
            start_time: Some(start),
            end_time: Some(end),
            morning_start: None,
            morning_end: None,
            afternoon_start: None,
            afternoon_end: None,
            breaks: vec![],
            notes: None,
        }
    }

    #[test]
    fn test_assignment_wins_over_base() {
        let assigned = day(1, t(10, 0), t(18, 0));
        let base = day(1, t(9, 0), t(17, 0));
        let (source, effective) = effective_day(Some(assigned.clone()), Some(base));
        assert_eq!(source, ScheduleSource::Assignment);
        assert_eq!(effective, Some(assigned));
    }

    #[test]
    fn test_base_fills_in_when_no_assignment() {
        let base = day(2, t(9, 0), t(17, 0));
        let (source, effective) = effective_day(None, Some(base.clone()));
        assert_eq!(source, ScheduleSource::Base);
        assert_eq!(effective, Some(base));
    }

    #[test]
    fn test_unscheduled_employee_resolves_to_nothing() {
        let (source, effective) = effective_day(None, None);
        assert_eq!(source, ScheduleSource::None);
        assert_eq!(effective, None);
    }
}
