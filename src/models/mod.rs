pub mod assignment;
pub mod assignment_input;
pub mod employee;
pub mod schedule;
pub mod template;
pub mod template_input;

pub use assignment::WeekAssignment;
pub use assignment_input::{
    AssignRangeInput, AssignmentFailure, AssignmentMutationResponse, BulkAssignmentOutcome,
    CopyAssignmentInput, CreateAssignmentInput,
};
pub use employee::Employee;
pub use schedule::{BaseScheduleRow, BreakType, DayConfig, ScheduleBreak};
pub use template::{ScheduleTemplate, TemplateDayBreakRow, TemplateDayRow, TemplateWithDays};
pub use template_input::{
    validate_template_name, validate_week, BreakInput, CreateTemplateInput, DayConfigInput,
    TemplateMutationResponse, UpdateTemplateInput,
};
