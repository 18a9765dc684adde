use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use appointment_cell::router::{appointment_routes, doctor_result_routes};
use auth_cell::router::auth_routes;
use chat_cell::router::chat_routes;
use clinic_cell::router::{clinic_routes, question_routes, tag_routes};
use patient_cell::router::patient_routes;
use promotion_cell::router::promotion_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "CareBook API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/appointments", appointment_routes(state.clone()))
        .nest("/doctor/appointments", doctor_result_routes(state.clone()))
        .nest("/promotions", promotion_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/clinics", clinic_routes(state.clone()))
        .nest("/tags", tag_routes(state.clone()))
        .nest("/questions", question_routes(state.clone()))
        .nest("/chat", chat_routes(state))
}
