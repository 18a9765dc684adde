use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Json, State},
    http::{header::AUTHORIZATION, HeaderMap, Request},
};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::TokenResponse;
use shared_models::error::AppError;
use shared_utils::extractor::{bearer_token, extract_user};
use shared_utils::jwt::validate_token as decode_token;

use crate::models::{RegisterRequest, ResendOtpRequest, VerifyOtpRequest};
use crate::services::RegistrationService;

pub async fn validate_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = bearer_token(headers.get(AUTHORIZATION))?;
    let user = decode_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    Ok(Json(TokenResponse {
        valid: true,
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    debug!("Verifying token");

    let token = bearer_token(headers.get(AUTHORIZATION))?;
    let valid = decode_token(token, &config.jwt_secret).is_ok();

    Ok(Json(json!({ "valid": valid })))
}

pub async fn register(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistrationService::new(&config);
    let result = service.register(&request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Verification code sent",
        "data": result,
    })))
}

pub async fn verify_otp(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistrationService::new(&config);
    let result = service.verify_otp(&request).await?;

    Ok(Json(json!({
        "success": true,
        "data": result,
    })))
}

pub async fn resend_otp(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<ResendOtpRequest>,
) -> Result<Json<Value>, AppError> {
    let service = RegistrationService::new(&config);
    service.resend_otp(&request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Verification code sent"
    })))
}

pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    req: Request<Body>,
) -> Result<Json<Value>, AppError> {
    // Set by auth_middleware
    let user = extract_user(&req)?;
    debug!("Getting profile for user: {}", user.id);

    let token = bearer_token(req.headers().get(AUTHORIZATION))?.to_string();
    let service = RegistrationService::new(&config);
    let account = service.get_account(&token).await?;

    Ok(Json(json!({
        "userId": user.id,
        "email": user.email,
        "role": user.role().to_string(),
        "account": account,
    })))
}
