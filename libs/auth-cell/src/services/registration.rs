use serde_json::{json, Value};
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::BackendClient;
use shared_utils::validation::{is_valid_email, is_valid_otp, is_valid_phone, MIN_PASSWORD_LENGTH};

use crate::models::{AuthError, RegisterRequest, ResendOtpRequest, VerifyOtpRequest};

/// Sign-up and one-time-code verification, forwarded to the backend once the
/// form passes local checks.
pub struct RegistrationService {
    backend: BackendClient,
}

impl RegistrationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<Value, AuthError> {
        validate_registration(request)?;
        debug!("Registering account for {}", request.email);

        let response = self
            .backend
            .post(
                "/auth/register",
                None,
                json!({
                    "email": request.email.trim().to_lowercase(),
                    "password": request.password,
                    "fullName": request.full_name.trim(),
                    "phone": request.phone.trim(),
                }),
            )
            .await
            .map_err(|e| AuthError::backend(e, "Registration failed"))?;

        info!("Account registered, verification code sent to {}", request.email);
        Ok(response)
    }

    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<Value, AuthError> {
        if !is_valid_email(&request.email) {
            return Err(AuthError::InvalidEmail);
        }
        if !is_valid_otp(request.code.trim()) {
            return Err(AuthError::InvalidOtp);
        }

        self.backend
            .post(
                "/auth/verify-otp",
                None,
                json!({
                    "email": request.email.trim().to_lowercase(),
                    "code": request.code.trim(),
                }),
            )
            .await
            .map_err(|e| AuthError::backend(e, "Verification failed"))
    }

    pub async fn resend_otp(&self, request: &ResendOtpRequest) -> Result<Value, AuthError> {
        if !is_valid_email(&request.email) {
            return Err(AuthError::InvalidEmail);
        }

        self.backend
            .post(
                "/auth/resend-otp",
                None,
                json!({ "email": request.email.trim().to_lowercase() }),
            )
            .await
            .map_err(|e| AuthError::backend(e, "Could not resend verification code"))
    }

    /// Account details the backend keeps for the token's user.
    pub async fn get_account(&self, auth_token: &str) -> Result<Value, AuthError> {
        self.backend
            .get("/users/me", auth_token)
            .await
            .map_err(|e| AuthError::backend(e, "Could not load profile"))
    }
}

pub fn validate_registration(request: &RegisterRequest) -> Result<(), AuthError> {
    if !is_valid_email(&request.email) {
        return Err(AuthError::InvalidEmail);
    }
    if request.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    if request.full_name.trim().is_empty() {
        return Err(AuthError::MissingName);
    }
    if !is_valid_phone(&request.phone) {
        return Err(AuthError::InvalidPhone);
    }
    Ok(())
}
