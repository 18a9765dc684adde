use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use shared_config::AppConfig;
use shared_models::error::AppError;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend API error ({status}): {body}")]
    Http {
        status: u16,
        message: Option<String>,
        body: String,
    },

    #[error("Backend request failed: {0}")]
    Transport(String),

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

impl BackendError {
    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// The backend's own `message` when it sent one, otherwise `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            BackendError::Http { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }

    pub fn into_app_error(self, fallback: &str) -> AppError {
        let message = self.message_or(fallback);
        match self.status() {
            Some(401) => AppError::Auth(message),
            Some(403) => AppError::Forbidden(message),
            Some(404) => AppError::NotFound(message),
            Some(400) | Some(422) => AppError::BadRequest(message),
            Some(409) => AppError::Conflict(message),
            _ => AppError::ExternalService(message),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        BackendError::Transport(e.to_string())
    }
}

/// Pulls the human message out of a backend error body. Validation failures
/// come back as a list of messages.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(messages) => {
            let joined = messages
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if joined.is_empty() { None } else { Some(joined) }
        }
        _ => None,
    }
}

/// REST client for the upstream booking backend.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.backend_api_url.trim_end_matches('/').to_string(),
            api_key: config.backend_api_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap, BackendError> {
        let mut headers = HeaderMap::new();

        if !self.api_key.is_empty() {
            headers.insert(
                "apikey",
                HeaderValue::from_str(&self.api_key)
                    .map_err(|e| BackendError::InvalidHeader(e.to_string()))?,
            );
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| BackendError::InvalidHeader(e.to_string()))?,
            );
        }

        Ok(headers)
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let headers = self.get_headers(auth_token)?;
        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Backend API error ({}): {}", status, text);
            return Err(BackendError::Http {
                status: status.as_u16(),
                message: extract_message(&text),
                body: text,
            });
        }

        // 204 and friends: decode as JSON null so `()` and `Option<_>` work.
        let payload = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(payload).map_err(|e| BackendError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth_token: &str) -> Result<T, BackendError> {
        self.request(Method::GET, path, Some(auth_token), None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        auth_token: Option<&str>,
        body: Value,
    ) -> Result<T, BackendError> {
        self.request(Method::POST, path, auth_token, Some(body)).await
    }

    pub async fn put<T: DeserializeOwned>(&self, path: &str, auth_token: &str, body: Value) -> Result<T, BackendError> {
        self.request(Method::PUT, path, Some(auth_token), Some(body)).await
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str, auth_token: &str, body: Value) -> Result<T, BackendError> {
        self.request(Method::PATCH, path, Some(auth_token), Some(body)).await
    }

    pub async fn delete(&self, path: &str, auth_token: &str) -> Result<(), BackendError> {
        let _: Value = self.request(Method::DELETE, path, Some(auth_token), None).await?;
        Ok(())
    }
}
