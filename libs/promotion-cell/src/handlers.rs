// libs/promotion-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::record::ListFilter;
use shared_utils::extractor::require_role;

use crate::models::{
    AssignPromotionRequest, CreatePromotionRequest, QuoteRequest, UpdatePromotionRequest, VoucherView,
};
use crate::services::PromotionService;

// ==============================================================================
// ADMIN HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_promotions(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = PromotionService::new(&state);
    let page = service.list_promotions(&filter, auth.token()).await?;

    Ok(Json(json!(page)))
}

#[axum::debug_handler]
pub async fn create_promotion(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePromotionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = PromotionService::new(&state);
    let promotion = service.create_promotion(&request, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "promotion": promotion,
    })))
}

#[axum::debug_handler]
pub async fn update_promotion(
    State(state): State<Arc<AppConfig>>,
    Path(promotion_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePromotionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = PromotionService::new(&state);
    let promotion = service
        .update_promotion(&promotion_id, &request, auth.token())
        .await?;

    Ok(Json(json!({
        "success": true,
        "promotion": promotion,
    })))
}

#[axum::debug_handler]
pub async fn delete_promotion(
    State(state): State<Arc<AppConfig>>,
    Path(promotion_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = PromotionService::new(&state);
    service.delete_promotion(&promotion_id, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Promotion deleted"
    })))
}

#[axum::debug_handler]
pub async fn assign_promotion(
    State(state): State<Arc<AppConfig>>,
    Path(promotion_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<AssignPromotionRequest>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = PromotionService::new(&state);
    let voucher = service
        .assign_to_user(&promotion_id, &request.user_id, auth.token())
        .await?;

    Ok(Json(json!({
        "success": true,
        "voucher": voucher,
    })))
}

// ==============================================================================
// VOUCHER HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_my_vouchers(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = PromotionService::new(&state);
    let now = Utc::now();

    let vouchers: Vec<VoucherView> = service
        .list_my_vouchers(auth.token())
        .await?
        .into_iter()
        .map(|voucher| {
            let check = voucher.applicability(now);
            VoucherView {
                applicable: check.is_ok(),
                reason: check.err().map(|r| r.to_string()),
                voucher,
            }
        })
        .collect();

    Ok(Json(json!({ "vouchers": vouchers })))
}

#[axum::debug_handler]
pub async fn quote_price(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PromotionService::new(&state);
    let quote = service.quote_price(&request, auth.token(), Utc::now()).await?;

    Ok(Json(json!(quote)))
}
