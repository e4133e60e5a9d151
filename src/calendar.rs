//! ISO-8601 week arithmetic shared by assignment and resolution code.
//!
//! Weeks run Monday to Sunday; week 1 is the week containing the year's
//! first Thursday. All functions are pure and operate on `NaiveDate`.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::{AppError, AppResult};

/// Returns the ISO week a date belongs to as `(iso_year, week_number)`.
///
/// The ISO year can differ from the calendar year near January 1st:
/// 2024-12-30 belongs to week 1 of 2025.
pub fn iso_week_of(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Returns the Monday and Sunday bounding the given ISO week.
///
/// Fails with a validation error when the week does not exist in that ISO
/// year (week 53 in a 52-week year, or a week number outside 1..=53).
pub fn week_date_range(year: i32, week_number: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let monday = NaiveDate::from_isoywd_opt(year, week_number, Weekday::Mon).ok_or_else(|| {
        AppError::Validation(format!(
            "ISO week {} does not exist in year {}",
            week_number, year
        ))
    })?;

    Ok((monday, monday + Duration::days(6)))
}

/// Collects every distinct ISO week touched by the inclusive date range, in
/// chronological order. Correct across year boundaries because weeks are
/// identified by their ISO year, not the calendar year of the dates.
pub fn weeks_in_range(start: NaiveDate, end: NaiveDate) -> AppResult<Vec<(i32, u32)>> {
    if end < start {
        return Err(AppError::InvalidRange(format!(
            "end date {} is before start date {}",
            end, start
        )));
    }

    // Step Monday to Monday; each Monday identifies one distinct week.
    let mut cursor = start - Duration::days(start.weekday().num_days_from_monday() as i64);
    let mut weeks = Vec::new();
    while cursor <= end {
        weeks.push(iso_week_of(cursor));
        cursor += Duration::days(7);
    }

    Ok(weeks)
}

/// Weekday ordinal used throughout the schedule model: 0=Sunday..6=Saturday.
pub fn weekday_ordinal(date: NaiveDate) -> i16 {
    date.weekday().num_days_from_sunday() as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_iso_week_at_year_boundary() {
        // Both dates fall in week 1 of ISO year 2025.
        assert_eq!(iso_week_of(d(2024, 12, 30)), (2025, 1));
        assert_eq!(iso_week_of(d(2025, 1, 1)), (2025, 1));
    }

    #[test]
    fn test_week_date_range_contains_its_dates() {
        for date in [d(2025, 3, 14), d(2024, 12, 30), d(2025, 1, 1), d(2026, 8, 27)] {
            let (year, week) = iso_week_of(date);
            let (monday, sunday) = week_date_range(year, week).unwrap();
            assert!(monday <= date && date <= sunday, "{} outside its own week", date);
            assert_eq!(monday.weekday(), Weekday::Mon);
            assert_eq!(sunday.weekday(), Weekday::Sun);
        }
    }

    #[test]
    fn test_week_date_range_round_trips() {
        let (monday, sunday) = week_date_range(2025, 20).unwrap();
        let mut date = monday;
        while date <= sunday {
            assert_eq!(iso_week_of(date), (2025, 20));
            date += Duration::days(1);
        }
    }

    #[test]
    fn test_week_date_range_rejects_missing_week() {
        // 2025 has 52 ISO weeks.
        assert!(week_date_range(2025, 53).is_err());
        assert!(week_date_range(2025, 0).is_err());
        // 2026 has 53.
        assert!(week_date_range(2026, 53).is_ok());
    }

    #[test]
    fn test_weeks_in_range_single_day() {
        let date = d(2025, 7, 9);
        let weeks = weeks_in_range(date, date).unwrap();
        assert_eq!(weeks, vec![iso_week_of(date)]);
    }

    #[test]
    fn test_weeks_in_range_two_consecutive_weeks() {
        // 2025-01-06 is the Monday of week 2, 2025-01-19 the Sunday of week 3.
        let weeks = weeks_in_range(d(2025, 1, 6), d(2025, 1, 19)).unwrap();
        assert_eq!(weeks, vec![(2025, 2), (2025, 3)]);
    }

    #[test]
    fn test_weeks_in_range_spans_year_boundary() {
        let weeks = weeks_in_range(d(2024, 12, 23), d(2025, 1, 8)).unwrap();
        assert_eq!(weeks, vec![(2024, 52), (2025, 1), (2025, 2)]);
    }

    #[test]
    fn test_weeks_in_range_no_duplicates_mid_week_bounds() {
        // Wednesday to the following Tuesday touches exactly two weeks.
        let weeks = weeks_in_range(d(2025, 2, 5), d(2025, 2, 11)).unwrap();
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0], (2025, 6));
        assert_eq!(weeks[1], (2025, 7));
    }

    #[test]
    fn test_weeks_in_range_rejects_inverted_range() {
        let err = weeks_in_range(d(2025, 5, 10), d(2025, 5, 9)).unwrap_err();
        assert!(matches!(err, AppError::InvalidRange(_)));
    }

    #[test]
    fn test_weekday_ordinal_sunday_based() {
        assert_eq!(weekday_ordinal(d(2025, 1, 5)), 0); // Sunday
        assert_eq!(weekday_ordinal(d(2025, 1, 6)), 1); // Monday
        assert_eq!(weekday_ordinal(d(2025, 1, 11)), 6); // Saturday
    }
}
