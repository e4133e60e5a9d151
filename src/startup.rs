use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::{handlers, middleware, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .cors_origin
                .parse::<HeaderValue>()
                .expect("CORS_ORIGIN must be a valid header value"),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    // Employee routes (read-only directory)
    let employee_routes = Router::new()
        .route("/", get(handlers::employees_handler::get_employees))
        .route("/{id}", get(handlers::employees_handler::get_employee));

    // Template routes
    let template_routes = Router::new()
        .route("/", get(handlers::templates_handler::get_templates))
        .route("/", post(handlers::templates_handler::create_template))
        .route("/{id}", get(handlers::templates_handler::get_template))
        .route("/{id}", put(handlers::templates_handler::update_template))
        .route("/{id}", delete(handlers::templates_handler::delete_template))
        .route(
            "/{id}/deactivate",
            post(handlers::templates_handler::deactivate_template),
        );

    // Assignment routes
    let assignment_routes = Router::new()
        .route("/", get(handlers::assignments_handler::get_assignments))
        .route("/", post(handlers::assignments_handler::create_assignment))
        .route("/range", post(handlers::assignments_handler::assign_range))
        .route(
            "/{uuid}",
            delete(handlers::assignments_handler::delete_assignment),
        )
        .route(
            "/{uuid}/copy",
            post(handlers::assignments_handler::copy_assignment),
        );

    // Schedule resolution routes
    let schedule_routes = Router::new()
        .route("/day", get(handlers::schedule_handler::resolve_day))
        .route("/week", get(handlers::schedule_handler::resolve_week));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/employees", employee_routes)
        .nest("/api/templates", template_routes)
        .nest("/api/assignments", assignment_routes)
        .nest("/api/schedule", schedule_routes)
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(from_fn(middleware::metrics_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
