// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    // All appointment operations require authentication
    let protected_routes = Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/available-slots", get(handlers::get_available_slots))
        .route("/statuses", get(handlers::get_status_labels))
        .route("/stats", get(handlers::get_appointment_stats)) // Admin only
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}/reschedule-eligibility", get(handlers::get_reschedule_eligibility))
        .route("/{appointment_id}/reschedule", patch(handlers::reschedule_appointment))
        .route("/{appointment_id}/status", patch(handlers::update_appointment_status))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}

/// Mounted under `/doctor/appointments`.
pub fn doctor_result_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/results/{appointment_id}/files", get(handlers::get_result_files))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
