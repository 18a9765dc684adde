// libs/chat-cell/src/models.rs
use serde::{Deserialize, Serialize};

use appointment_cell::AppointmentError;
use shared_models::error::AppError;

/// Claims the chat service expects in a user token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatTokenClaims {
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTokenResponse {
    pub token: String,
    pub api_key: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatChannel {
    pub channel_type: String,
    pub channel_id: String,
    pub appointment_id: String,
    pub members: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat service not configured")]
    NotConfigured,

    #[error("Only the patient and doctor of this appointment can join its chat")]
    NotParticipant,

    #[error("Failed to sign chat token: {0}")]
    Signing(String),

    #[error(transparent)]
    Appointment(#[from] AppointmentError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::NotConfigured => AppError::ExternalService(e.to_string()),
            ChatError::NotParticipant => AppError::Forbidden(e.to_string()),
            ChatError::Signing(msg) => AppError::Internal(msg),
            ChatError::Appointment(inner) => inner.into(),
        }
    }
}
