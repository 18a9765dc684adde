// libs/clinic-cell/src/router.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::models::{Clinic, Question, Resource, Tag};

fn record_routes<R: Resource>(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_records::<R>).post(handlers::create_record::<R>),
        )
        .route("/statuses", get(handlers::get_status_labels))
        .route(
            "/{id}",
            get(handlers::get_record::<R>)
                .put(handlers::update_record::<R>)
                .delete(handlers::delete_record::<R>),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

pub fn clinic_routes(state: Arc<AppConfig>) -> Router {
    record_routes::<Clinic>(state)
}

pub fn tag_routes(state: Arc<AppConfig>) -> Router {
    record_routes::<Tag>(state)
}

pub fn question_routes(state: Arc<AppConfig>) -> Router {
    record_routes::<Question>(state)
}
