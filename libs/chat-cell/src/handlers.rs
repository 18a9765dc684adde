// libs/chat-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::info;

use appointment_cell::services::AppointmentService;
use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::ChatError;
use crate::services::channel::appointment_channel;
use crate::services::ChatTokenService;

#[axum::debug_handler]
pub async fn create_chat_token(
    State(state): State<Arc<AppConfig>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = ChatTokenService::new(&state)?;
    let response = service.issue_token(&user.id)?;

    info!("Chat token issued for user {}", user.id);
    Ok(Json(json!(response)))
}

#[axum::debug_handler]
pub async fn get_appointment_channel(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentService::new(&state);

    let appointment = appointments
        .get_appointment(&appointment_id, auth.token())
        .await
        .map_err(ChatError::from)?;

    if !appointment.is_participant(&user.id) {
        return Err(ChatError::NotParticipant.into());
    }

    Ok(Json(json!(appointment_channel(&appointment))))
}

pub async fn chat_health_check(State(state): State<Arc<AppConfig>>) -> Json<Value> {
    Json(json!({
        "service": "chat",
        "configured": state.is_chat_configured(),
    }))
}
