use serde::{Deserialize, Serialize};

use shared_database::BackendError;
use shared_models::error::AppError;
use shared_utils::validation::MIN_PASSWORD_LENGTH;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendOtpRequest {
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Email address is invalid")]
    InvalidEmail,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    WeakPassword,

    #[error("Phone number is invalid")]
    InvalidPhone,

    #[error("Full name is required")]
    MissingName,

    #[error("Verification code must be 6 digits")]
    InvalidOtp,

    #[error("{fallback}")]
    Backend {
        #[source]
        source: BackendError,
        fallback: &'static str,
    },
}

impl AuthError {
    pub fn backend(source: BackendError, fallback: &'static str) -> Self {
        AuthError::Backend { source, fallback }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Backend { source, fallback } => source.into_app_error(fallback),
            other => AppError::ValidationError(other.to_string()),
        }
    }
}
