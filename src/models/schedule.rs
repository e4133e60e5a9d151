use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{AppError, AppResult};

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Category of a scheduled break. Stored as the `break_type` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "break_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BreakType {
    Rest,
    Meal,
    Coffee,
    Smoke,
    Prayer,
    Personal,
    Paid,
    Unpaid,
    Other,
}

/// A break inside one working day. Value object: owned by its day, copied
/// rather than shared when a day is duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScheduleBreak {
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_type: BreakType,
    pub is_paid: bool,
    pub is_required: bool,
    pub sort_order: i32,
}

/// One weekday's shape inside a template: working or not, single or split
/// shift, plus its ordered breaks. `day_of_week` is 0=Sunday..6=Saturday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DayConfig {
    pub day_of_week: i16,
    pub is_working_day: bool,
    pub is_split_schedule: bool,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub morning_start: Option<NaiveTime>,
    pub morning_end: Option<NaiveTime>,
    pub afternoon_start: Option<NaiveTime>,
    pub afternoon_end: Option<NaiveTime>,
    pub breaks: Vec<ScheduleBreak>,
    pub notes: Option<String>,
}

impl DayConfig {
    pub fn weekday_name(&self) -> &'static str {
        WEEKDAY_NAMES
            .get(self.day_of_week as usize)
            .copied()
            .unwrap_or("unknown")
    }

    /// The concrete work windows of the day: one for a plain working day,
    /// two for a split day, none for a day off.
    pub fn work_windows(&self) -> Vec<(NaiveTime, NaiveTime)> {
        if !self.is_working_day {
            return Vec::new();
        }
        if self.is_split_schedule {
            let mut windows = Vec::with_capacity(2);
            if let (Some(start), Some(end)) = (self.morning_start, self.morning_end) {
                windows.push((start, end));
            }
            if let (Some(start), Some(end)) = (self.afternoon_start, self.afternoon_end) {
                windows.push((start, end));
            }
            windows
        } else if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            vec![(start, end)]
        } else {
            Vec::new()
        }
    }

    /// Total scheduled minutes across all work windows, ignoring breaks.
    pub fn scheduled_minutes(&self) -> i64 {
        self.work_windows()
            .iter()
            .map(|(start, end)| (*end - *start).num_minutes())
            .sum()
    }

    /// Deep copy onto another weekday. Breaks are cloned by value, so the
    /// copy never aliases the source's break list. Backs the "copy this day
    /// to all other days" template-editor action.
    pub fn copy_for_weekday(&self, day_of_week: i16) -> DayConfig {
        DayConfig {
            day_of_week,
            breaks: self.breaks.clone(),
            ..self.clone()
        }
    }

    /// Structural validation for a single day. Checks window shape, break
    /// containment, and pairwise break overlap by time interval.
    pub fn validate(&self) -> AppResult<()> {
        let day = self.weekday_name();

        if self.day_of_week < 0 || self.day_of_week > 6 {
            return Err(AppError::Validation(format!(
                "day_of_week {} is out of range 0-6",
                self.day_of_week
            )));
        }

        if !self.is_working_day {
            // Non-working days carry no times and no breaks; inputs are
            // normalised before this point, so anything left is a bug in the
            // caller.
            if self.work_windows().is_empty() && self.breaks.is_empty() {
                return Ok(());
            }
            return Err(AppError::Validation(format!(
                "{} is a non-working day but carries times or breaks",
                day
            )));
        }

        if self.is_split_schedule {
            let (Some(m_start), Some(m_end), Some(a_start), Some(a_end)) = (
                self.morning_start,
                self.morning_end,
                self.afternoon_start,
                self.afternoon_end,
            ) else {
                return Err(AppError::Validation(format!(
                    "{} is split but is missing morning or afternoon times",
                    day
                )));
            };
            if m_start >= m_end {
                return Err(AppError::Validation(format!(
                    "{}: morning start must be before morning end",
                    day
                )));
            }
            if a_start >= a_end {
                return Err(AppError::Validation(format!(
                    "{}: afternoon start must be before afternoon end",
                    day
                )));
            }
            if m_end > a_start {
                return Err(AppError::Validation(format!(
                    "{}: morning shift overlaps the afternoon shift",
                    day
                )));
            }
        } else {
            let (Some(start), Some(end)) = (self.start_time, self.end_time) else {
                return Err(AppError::Validation(format!(
                    "{} is a working day but is missing start or end time",
                    day
                )));
            };
            if start >= end {
                return Err(AppError::Validation(format!(
                    "{}: start time must be before end time",
                    day
                )));
            }
        }

        let windows = self.work_windows();
        for brk in &self.breaks {
            if brk.name.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "{}: break name must not be empty",
                    day
                )));
            }
            if brk.start_time >= brk.end_time {
                return Err(AppError::Validation(format!(
                    "{}: break '{}' start must be before its end",
                    day, brk.name
                )));
            }
            let contained = windows
                .iter()
                .any(|(start, end)| *start <= brk.start_time && brk.end_time <= *end);
            if !contained {
                return Err(AppError::Validation(format!(
                    "{}: break '{}' falls outside the working hours",
                    day, brk.name
                )));
            }
        }

        // Overlap is an interval comparison, independent of sort_order.
        for (i, a) in self.breaks.iter().enumerate() {
            for b in self.breaks.iter().skip(i + 1) {
                if a.start_time < b.end_time && b.start_time < a.end_time {
                    return Err(AppError::Validation(format!(
                        "{}: breaks '{}' and '{}' overlap",
                        day, a.name, b.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Legacy per-employee, per-weekday schedule row. Read-only here; consulted
/// by the resolver when an employee has no assignment for the queried week.
#[derive(Debug, Clone, FromRow)]
pub struct BaseScheduleRow {
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

impl BaseScheduleRow {
    /// Lifts the legacy row into the modern day shape: a plain working day
    /// with at most one unpaid rest break.
    pub fn into_day_config(self) -> DayConfig {
        let breaks = match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => vec![ScheduleBreak {
                name: "Break".to_string(),
                start_time: start,
                end_time: end,
                break_type: BreakType::Rest,
                is_paid: false,
                is_required: false,
                sort_order: 0,
            }],
            _ => Vec::new(),
        };

        DayConfig {
            day_of_week: self.day_of_week,
            is_working_day: true,
            is_split_schedule: false,
            start_time: Some(self.start_time),
            end_time: Some(self.end_time),
            morning_start: None,
            morning_end: None,
            afternoon_start: None,
            afternoon_end: None,
            breaks,
            notes: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn brk(name: &str, start: NaiveTime, end: NaiveTime, sort_order: i32) -> ScheduleBreak {
        ScheduleBreak {
            name: name.to_string(),
            start_time: start,
            end_time: end,
            break_type: BreakType::Rest,
            is_paid: false,
            is_required: false,
            sort_order,
        }
    }

    fn working_day(day_of_week: i16) -> DayConfig {
        DayConfig {
            day_of_week,
            is_working_day: true,
            is_split_schedule: false,
            start_time: Some(t(9, 0)),
            end_time: Some(t(17, 0)),
            morning_start: None,
            morning_end: None,
            afternoon_start: None,
            afternoon_end: None,
            breaks: vec![],
            notes: None,
        }
    }

    fn split_day(day_of_week: i16) -> DayConfig {
        DayConfig {
            is_split_schedule: true,
            start_time: None,
            end_time: None,
            morning_start: Some(t(9, 0)),
            morning_end: Some(t(13, 0)),
            afternoon_start: Some(t(15, 0)),
            afternoon_end: Some(t(19, 0)),
            ..working_day(day_of_week)
        }
    }

    #[test]
    fn test_plain_working_day_validates() {
        assert!(working_day(1).validate().is_ok());
    }

    #[test]
    fn test_inverted_times_rejected() {
        let mut day = working_day(1);
        day.start_time = Some(t(18, 0));
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_missing_times_on_working_day_rejected() {
        let mut day = working_day(2);
        day.end_time = None;
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_split_day_validates_and_counts_minutes() {
        let day = split_day(3);
        assert!(day.validate().is_ok());
        assert_eq!(day.work_windows().len(), 2);
        assert_eq!(day.scheduled_minutes(), 480);
    }

    #[test]
    fn test_split_day_with_overlapping_shifts_rejected() {
        let mut day = split_day(3);
        day.afternoon_start = Some(t(12, 0));
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_split_day_missing_afternoon_rejected() {
        let mut day = split_day(4);
        day.afternoon_end = None;
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_break_inside_window_accepted() {
        let mut day = working_day(1);
        day.breaks.push(brk("Lunch", t(12, 0), t(12, 30), 0));
        assert!(day.validate().is_ok());
    }

    #[test]
    fn test_break_outside_window_rejected() {
        let mut day = working_day(1);
        day.breaks.push(brk("Early", t(7, 0), t(7, 30), 0));
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_break_spanning_split_gap_rejected() {
        let mut day = split_day(2);
        day.breaks.push(brk("Gap", t(12, 30), t(15, 30), 0));
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_overlapping_breaks_rejected_regardless_of_sort_order() {
        let mut day = working_day(5);
        // Insertion order reversed relative to the clock on purpose.
        day.breaks.push(brk("Second", t(12, 15), t(12, 45), 5));
        day.breaks.push(brk("First", t(12, 0), t(12, 30), 1));
        assert!(day.validate().is_err());
    }

    #[test]
    fn test_adjacent_breaks_do_not_overlap() {
        let mut day = working_day(5);
        day.breaks.push(brk("Coffee", t(11, 0), t(11, 15), 0));
        day.breaks.push(brk("Lunch", t(11, 15), t(11, 45), 1));
        assert!(day.validate().is_ok());
    }

    #[test]
    fn test_non_working_day_has_no_minutes() {
        let day = DayConfig {
            is_working_day: false,
            start_time: None,
            end_time: None,
            ..working_day(0)
        };
        assert!(day.validate().is_ok());
        assert_eq!(day.scheduled_minutes(), 0);
    }

    #[test]
    fn test_copy_for_weekday_is_a_deep_copy() {
        let mut source = working_day(1);
        source.breaks.push(brk("Lunch", t(12, 0), t(12, 30), 0));

        let mut copy = source.copy_for_weekday(4);
        assert_eq!(copy.day_of_week, 4);
        assert_eq!(copy.breaks, source.breaks);

        copy.breaks[0].name = "Changed".to_string();
        assert_eq!(source.breaks[0].name, "Lunch");
    }

    #[test]
    fn test_base_schedule_row_lifts_to_day_config() {
        let row = BaseScheduleRow {
            day_of_week: 2,
            start_time: t(8, 0),
            end_time: t(16, 0),
            break_start: Some(t(12, 0)),
            break_end: Some(t(12, 30)),
        };
        let day = row.into_day_config();
        assert!(day.is_working_day);
        assert!(!day.is_split_schedule);
        assert_eq!(day.breaks.len(), 1);
        assert_eq!(day.scheduled_minutes(), 480);
        assert!(day.validate().is_ok());
    }
}
