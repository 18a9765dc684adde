use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;

use crate::jwt::validate_token;

/// Returns the raw bearer token from an `Authorization` header value.
pub fn bearer_token(header_value: Option<&http::HeaderValue>) -> Result<&str, AppError> {
    let auth_value = header_value
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    auth_value
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))
}

pub async fn auth_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers().get(AUTHORIZATION))?;

    let user = validate_token(token, &config.jwt_secret).map_err(AppError::Auth)?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

pub fn extract_user<B>(request: &Request<B>) -> Result<User, AppError> {
    request
        .extensions()
        .get::<User>()
        .cloned()
        .ok_or_else(|| AppError::Auth("User not found in request extensions".to_string()))
}

/// Fails with 403 unless the user holds one of `roles`.
pub fn require_role(user: &User, roles: &[Role]) -> Result<(), AppError> {
    if user.has_any_role(roles) {
        return Ok(());
    }

    tracing::warn!("User {} with role {} denied; requires one of {:?}", user.id, user.role(), roles);
    Err(AppError::Forbidden(
        "You do not have permission to perform this action".to_string(),
    ))
}
