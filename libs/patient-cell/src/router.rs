use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers::*;

pub fn patient_routes(config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(list_my_profiles).post(create_profile))
        .route("/search", get(search_profiles))
        .route("/labels", get(get_profile_labels))
        .route("/{profile_id}", get(get_profile).put(update_profile).delete(delete_profile))
        .layer(middleware::from_fn_with_state(config.clone(), auth_middleware))
        .with_state(config)
}
