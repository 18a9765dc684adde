// libs/promotion-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn promotion_routes(state: Arc<AppConfig>) -> Router {
    let protected_routes = Router::new()
        .route("/", get(handlers::list_promotions).post(handlers::create_promotion))
        .route("/vouchers", get(handlers::list_my_vouchers))
        .route("/quote", post(handlers::quote_price))
        .route("/{promotion_id}", put(handlers::update_promotion).delete(handlers::delete_promotion))
        .route("/{promotion_id}/assign", post(handlers::assign_promotion))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(protected_routes)
        .with_state(state)
}
