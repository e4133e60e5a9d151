use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{AppError, AppResult};

use super::schedule::{BreakType, DayConfig, ScheduleBreak};

/// Input for one break. Times come in as wall-clock strings ("HH:MM" or
/// "HH:MM:SS"), matching what the schedule editor sends.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BreakInput {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default = "default_break_type")]
    pub break_type: BreakType,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub sort_order: i32,
}

fn default_break_type() -> BreakType {
    BreakType::Rest
}

/// Input for one weekday of a template.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayConfigInput {
    pub day_of_week: i16,
    pub is_working_day: bool,
    #[serde(default)]
    pub is_split_schedule: bool,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub morning_start: Option<String>,
    pub morning_end: Option<String>,
    pub afternoon_start: Option<String>,
    pub afternoon_end: Option<String>,
    #[serde(default)]
    pub breaks: Vec<BreakInput>,
    pub notes: Option<String>,
}

/// Input for creating a schedule template. `days` must hold exactly one
/// entry per weekday 0-6.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTemplateInput {
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<i32>,
    pub days: Vec<DayConfigInput>,
}

/// Input for updating a template. A present `days` list replaces all seven
/// day configurations atomically; per-day patching is not supported.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateTemplateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub days: Option<Vec<DayConfigInput>>,
}

/// Response for template mutations without a body to return.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}

fn parse_time(field: &str, value: &str, day: i16) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            AppError::Validation(format!(
                "day {}: {} '{}' is not a valid HH:MM time",
                day, field, value
            ))
        })
}

fn parse_optional(field: &str, value: &Option<String>, day: i16) -> AppResult<Option<NaiveTime>> {
    match value {
        Some(v) => Ok(Some(parse_time(field, v, day)?)),
        None => Ok(None),
    }
}

impl DayConfigInput {
    /// Parses and validates the input into a well-formed `DayConfig`.
    ///
    /// Time fields on a non-working day are ignored, and fields belonging
    /// to the other shift mode (single vs. split) are dropped, so a stored
    /// day never carries contradictory leftovers from the editor.
    pub fn into_day_config(self) -> AppResult<DayConfig> {
        let dow = self.day_of_week;

        let day = if !self.is_working_day {
            DayConfig {
                day_of_week: dow,
                is_working_day: false,
                is_split_schedule: false,
                start_time: None,
                end_time: None,
                morning_start: None,
                morning_end: None,
                afternoon_start: None,
                afternoon_end: None,
                breaks: Vec::new(),
                notes: self.notes,
            }
        } else if self.is_split_schedule {
            DayConfig {
                day_of_week: dow,
                is_working_day: true,
                is_split_schedule: true,
                start_time: None,
                end_time: None,
                morning_start: parse_optional("morning_start", &self.morning_start, dow)?,
                morning_end: parse_optional("morning_end", &self.morning_end, dow)?,
                afternoon_start: parse_optional("afternoon_start", &self.afternoon_start, dow)?,
                afternoon_end: parse_optional("afternoon_end", &self.afternoon_end, dow)?,
                breaks: parse_breaks(self.breaks, dow)?,
                notes: self.notes,
            }
        } else {
            DayConfig {
                day_of_week: dow,
                is_working_day: true,
                is_split_schedule: false,
                start_time: parse_optional("start_time", &self.start_time, dow)?,
                end_time: parse_optional("end_time", &self.end_time, dow)?,
                morning_start: None,
                morning_end: None,
                afternoon_start: None,
                afternoon_end: None,
                breaks: parse_breaks(self.breaks, dow)?,
                notes: self.notes,
            }
        };

        day.validate()?;
        Ok(day)
    }
}

fn parse_breaks(inputs: Vec<BreakInput>, day: i16) -> AppResult<Vec<ScheduleBreak>> {
    let mut breaks = Vec::with_capacity(inputs.len());
    for input in inputs {
        breaks.push(ScheduleBreak {
            start_time: parse_time("break start_time", &input.start_time, day)?,
            end_time: parse_time("break end_time", &input.end_time, day)?,
            name: input.name,
            break_type: input.break_type,
            is_paid: input.is_paid,
            is_required: input.is_required,
            sort_order: input.sort_order,
        });
    }
    breaks.sort_by_key(|b| b.sort_order);
    Ok(breaks)
}

/// Template names are display keys in the assignment picker; blank ones
/// are rejected on create and rename alike.
pub fn validate_template_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(
            "template name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates a full week of day inputs: exactly seven entries, one per
/// weekday 0-6, each individually well-formed. Returns the days sorted by
/// weekday.
pub fn validate_week(inputs: Vec<DayConfigInput>) -> AppResult<Vec<DayConfig>> {
    if inputs.len() != 7 {
        return Err(AppError::Validation(format!(
            "a template needs exactly 7 day configurations, got {}",
            inputs.len()
        )));
    }

    let mut seen = [false; 7];
    let mut days = Vec::with_capacity(7);
    for input in inputs {
        let dow = input.day_of_week;
        if !(0..=6).contains(&dow) {
            return Err(AppError::Validation(format!(
                "day_of_week {} is out of range 0-6",
                dow
            )));
        }
        if seen[dow as usize] {
            return Err(AppError::Validation(format!(
                "duplicate configuration for weekday {}",
                dow
            )));
        }
        seen[dow as usize] = true;
        days.push(input.into_day_config()?);
    }

    days.sort_by_key(|d| d.day_of_week);
    Ok(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_off(day_of_week: i16) -> DayConfigInput {
        DayConfigInput {
            day_of_week,
            is_working_day: false,
            is_split_schedule: false,
            start_time: None,
            end_time: None,
            morning_start: None,
            morning_end: None,
            afternoon_start: None,
            afternoon_end: None,
            breaks: vec![],
            notes: None,
        }
    }

    fn office_day(day_of_week: i16) -> DayConfigInput {
        DayConfigInput {
            is_working_day: true,
            start_time: Some("09:00".to_string()),
            end_time: Some("17:00".to_string()),
            ..day_off(day_of_week)
        }
    }

    fn full_week() -> Vec<DayConfigInput> {
        vec![
            day_off(0),
            office_day(1),
            office_day(2),
            office_day(3),
            office_day(4),
            office_day(5),
            day_off(6),
        ]
    }

    #[test]
    fn test_blank_template_names_rejected() {
        assert!(validate_template_name("").is_err());
        assert!(validate_template_name("   ").is_err());
        assert!(validate_template_name("Standard office week").is_ok());
    }

    #[test]
    fn test_full_week_validates_and_sorts() {
        let mut inputs = full_week();
        inputs.reverse();
        let days = validate_week(inputs).unwrap();
        let dows: Vec<i16> = days.iter().map(|d| d.day_of_week).collect();
        assert_eq!(dows, vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_missing_weekday_rejected() {
        let mut inputs = full_week();
        inputs.pop();
        assert!(validate_week(inputs).is_err());
    }

    #[test]
    fn test_duplicate_weekday_rejected() {
        let mut inputs = full_week();
        inputs[6] = office_day(1);
        assert!(validate_week(inputs).is_err());
    }

    #[test]
    fn test_hh_mm_and_hh_mm_ss_both_parse() {
        let mut input = office_day(1);
        input.end_time = Some("17:30:00".to_string());
        let day = input.into_day_config().unwrap();
        assert_eq!(day.scheduled_minutes(), 510);
    }

    #[test]
    fn test_garbage_time_rejected() {
        let mut input = office_day(1);
        input.start_time = Some("9am".to_string());
        assert!(input.into_day_config().is_err());
    }

    #[test]
    fn test_non_working_day_drops_stale_editor_fields() {
        let mut input = day_off(0);
        input.start_time = Some("09:00".to_string());
        input.breaks.push(BreakInput {
            name: "Lunch".to_string(),
            start_time: "12:00".to_string(),
            end_time: "12:30".to_string(),
            break_type: BreakType::Meal,
            is_paid: false,
            is_required: false,
            sort_order: 0,
        });
        let day = input.into_day_config().unwrap();
        assert!(day.start_time.is_none());
        assert!(day.breaks.is_empty());
    }

    #[test]
    fn test_breaks_ordered_by_sort_order() {
        let mut input = office_day(3);
        for (name, start, end, order) in
            [("Lunch", "13:00", "13:30", 2), ("Coffee", "10:30", "10:45", 1)]
        {
            input.breaks.push(BreakInput {
                name: name.to_string(),
                start_time: start.to_string(),
                end_time: end.to_string(),
                break_type: BreakType::Rest,
                is_paid: false,
                is_required: false,
                sort_order: order,
            });
        }
        let day = input.into_day_config().unwrap();
        assert_eq!(day.breaks[0].name, "Coffee");
        assert_eq!(day.breaks[1].name, "Lunch");
    }
}
