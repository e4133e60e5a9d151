use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::schedule::{BreakType, DayConfig, ScheduleBreak};

/// Template header row. The seven day shapes live in `template_days`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ScheduleTemplate {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Template together with its seven day configurations, breaks nested.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateWithDays {
    #[serde(flatten)]
    pub template: ScheduleTemplate,
    pub days: Vec<DayConfig>,
}

/// Raw `template_days` row; assembled into a `DayConfig` once its breaks
/// are attached.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateDayRow {
    pub id: i32,
    pub day_of_week: i16,
    pub is_working_day: bool,
    pub is_split_schedule: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub morning_start: Option<NaiveTime>,
    pub morning_end: Option<NaiveTime>,
    pub afternoon_start: Option<NaiveTime>,
    pub afternoon_end: Option<NaiveTime>,
    pub notes: Option<String>,
}

impl TemplateDayRow {
    pub fn into_day_config(self, breaks: Vec<ScheduleBreak>) -> DayConfig {
        DayConfig {
            day_of_week: self.day_of_week,
            is_working_day: self.is_working_day,
            is_split_schedule: self.is_split_schedule,
            start_time: self.start_time,
            end_time: self.end_time,
            morning_start: self.morning_start,
            morning_end: self.morning_end,
            afternoon_start: self.afternoon_start,
            afternoon_end: self.afternoon_end,
            breaks,
            notes: self.notes,
        }
    }
}

/// Raw `template_day_breaks` row, keyed back to its day by `day_id`.
#[derive(Debug, Clone, FromRow)]
pub struct TemplateDayBreakRow {
    pub day_id: i32,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_type: BreakType,
    pub is_paid: bool,
    pub is_required: bool,
    pub sort_order: i32,
}

impl TemplateDayBreakRow {
    pub fn into_break(self) -> ScheduleBreak {
        ScheduleBreak {
            name: self.name,
            start_time: self.start_time,
            end_time: self.end_time,
            break_type: self.break_type,
            is_paid: self.is_paid,
            is_required: self.is_required,
            sort_order: self.sort_order,
        }
    }
}
