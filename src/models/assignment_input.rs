use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{AppError, AppResult};

use super::assignment::WeekAssignment;

/// Input for assigning a template to an employee for a single ISO week.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentInput {
    pub employee_id: i32,
    pub template_id: i32,
    pub year: i32,
    pub week_number: i32,
    pub notes: Option<String>,
}

/// Input for assigning a template to every ISO week touched by a date
/// range. Dates are inclusive, "YYYY-MM-DD".
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignRangeInput {
    pub employee_id: i32,
    pub template_id: i32,
    pub start_date: String,
    pub end_date: String,
    pub notes: Option<String>,
}

/// Input for replicating an existing assignment to other employees.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CopyAssignmentInput {
    pub target_employee_ids: Vec<i32>,
}

/// One unit a bulk operator could not complete. `error` is the machine
/// kind ("conflict" or "not_found"); `message` is human-readable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentFailure {
    pub employee_id: i32,
    pub year: i32,
    pub week_number: i32,
    pub error: String,
    pub message: String,
}

/// Combined result of a bulk operator. Per-unit conflicts are reported
/// here, never escalated: range assignment exists to fill gaps around
/// weeks that already have a custom assignment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkAssignmentOutcome {
    pub succeeded: Vec<WeekAssignment>,
    pub failed: Vec<AssignmentFailure>,
}

impl BulkAssignmentOutcome {
    pub fn new() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    /// Folds one per-unit attempt into the outcome. Successes accumulate,
    /// a Conflict becomes a recorded per-unit failure so the rest of the
    /// batch continues, and any other error escalates to the caller.
    pub fn record(
        &mut self,
        employee_id: i32,
        year: i32,
        week_number: i32,
        attempt: AppResult<WeekAssignment>,
    ) -> AppResult<()> {
        match attempt {
            Ok(assignment) => self.succeeded.push(assignment),
            Err(AppError::Conflict(message)) => self.failed.push(AssignmentFailure {
                employee_id,
                year,
                week_number,
                error: "conflict".to_string(),
                message,
            }),
            Err(other) => return Err(other),
        }
        Ok(())
    }

    /// "created 4 of 6 weeks; 2 skipped" for log lines and UI toasts.
    pub fn summary(&self) -> String {
        let total = self.succeeded.len() + self.failed.len();
        format!(
            "created {} of {} assignments; {} skipped",
            self.succeeded.len(),
            total,
            self.failed.len()
        )
    }
}

impl Default for BulkAssignmentOutcome {
    fn default() -> Self {
        Self::new()
    }
}

/// Response for assignment deletions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentMutationResponse {
    pub success: bool,
    pub assignment_uuid: Option<Uuid>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn assignment(week_number: i32) -> WeekAssignment {
        WeekAssignment {
            uuid: Uuid::new_v4(),
            employee_id: 1,
            template_id: 1,
            year: 2025,
            week_number,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_record_accumulates_successes() {
        let mut outcome = BulkAssignmentOutcome::new();
        outcome.record(1, 2025, 2, Ok(assignment(2))).unwrap();
        outcome.record(1, 2025, 3, Ok(assignment(3))).unwrap();
        assert_eq!(outcome.succeeded.len(), 2);
        assert!(outcome.failed.is_empty());
    }

    #[test]
    fn test_record_skips_conflicts_without_aborting() {
        let mut outcome = BulkAssignmentOutcome::new();
        outcome.record(1, 2025, 2, Ok(assignment(2))).unwrap();
        outcome
            .record(
                1,
                2025,
                3,
                Err(AppError::Conflict("week 3 of 2025 already assigned".to_string())),
            )
            .unwrap();
        outcome.record(1, 2025, 4, Ok(assignment(4))).unwrap();

        assert_eq!(outcome.succeeded.len(), 2);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].week_number, 3);
        assert_eq!(outcome.failed[0].error, "conflict");
    }

    #[test]
    fn test_record_escalates_non_conflict_errors() {
        let mut outcome = BulkAssignmentOutcome::new();
        outcome.record(1, 2025, 2, Ok(assignment(2))).unwrap();

        let result = outcome.record(
            1,
            2025,
            3,
            Err(AppError::Internal("connection reset".to_string())),
        );

        assert!(matches!(result, Err(AppError::Internal(_))));
        // Nothing is recorded for the failed unit; the caller aborts.
        assert_eq!(outcome.succeeded.len(), 1);
        assert!(outcome.failed.is_empty());
    }

    #[test]
    fn test_summary_counts_both_sides() {
        let mut outcome = BulkAssignmentOutcome::new();
        outcome.succeeded.push(assignment(2));
        outcome.succeeded.push(assignment(4));
        outcome.failed.push(AssignmentFailure {
            employee_id: 1,
            year: 2025,
            week_number: 3,
            error: "conflict".to_string(),
            message: "week 3 of 2025 already assigned".to_string(),
        });
        assert_eq!(outcome.summary(), "created 2 of 3 assignments; 1 skipped");
    }
}
