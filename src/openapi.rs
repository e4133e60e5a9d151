use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Workweek API",
        version = "1.0.0",
        description = "Weekly schedule templates, assignments and resolution for the Workweek HR system",
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Employees
        crate::handlers::employees_handler::get_employees,
        crate::handlers::employees_handler::get_employee,

        // Templates
        crate::handlers::templates_handler::get_templates,
        crate::handlers::templates_handler::get_template,
        crate::handlers::templates_handler::create_template,
        crate::handlers::templates_handler::update_template,
        crate::handlers::templates_handler::deactivate_template,
        crate::handlers::templates_handler::delete_template,

        // Assignments
        crate::handlers::assignments_handler::get_assignments,
        crate::handlers::assignments_handler::create_assignment,
        crate::handlers::assignments_handler::delete_assignment,
        crate::handlers::assignments_handler::assign_range,
        crate::handlers::assignments_handler::copy_assignment,

        // Schedule resolution
        crate::handlers::schedule_handler::resolve_day,
        crate::handlers::schedule_handler::resolve_week,
    ),
    components(
        schemas(
            crate::models::Employee,
            crate::models::ScheduleTemplate,
            crate::models::TemplateWithDays,
            crate::models::DayConfig,
            crate::models::ScheduleBreak,
            crate::models::BreakType,
            crate::models::CreateTemplateInput,
            crate::models::UpdateTemplateInput,
            crate::models::DayConfigInput,
            crate::models::BreakInput,
            crate::models::TemplateMutationResponse,
            crate::models::WeekAssignment,
            crate::models::CreateAssignmentInput,
            crate::models::AssignRangeInput,
            crate::models::CopyAssignmentInput,
            crate::models::BulkAssignmentOutcome,
            crate::models::AssignmentFailure,
            crate::models::AssignmentMutationResponse,
            crate::handlers::schedule_handler::ResolvedDay,
            crate::handlers::schedule_handler::ResolvedWeek,
            crate::handlers::schedule_handler::ScheduleSource,
        )
    ),
    tags(
        (name = "health", description = "Service health"),
        (name = "employees", description = "Employee directory (read-only)"),
        (name = "templates", description = "Schedule template management"),
        (name = "assignments", description = "Weekly template assignments"),
        (name = "schedule", description = "Effective schedule resolution"),
    )
)]
pub struct ApiDoc;
