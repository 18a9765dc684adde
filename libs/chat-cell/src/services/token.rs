// libs/chat-cell/src/services/token.rs
use tracing::{debug, warn};

use shared_config::AppConfig;
use shared_utils::jwt::sign_hs256;

use crate::models::{ChatError, ChatTokenClaims, ChatTokenResponse};

/// Issues user tokens for the external chat service.
pub struct ChatTokenService {
    api_key: String,
    api_secret: String,
}

impl ChatTokenService {
    pub fn new(config: &AppConfig) -> Result<Self, ChatError> {
        if !config.is_chat_configured() {
            warn!("Chat token requested but CHAT_API_KEY/CHAT_API_SECRET are not set");
            return Err(ChatError::NotConfigured);
        }

        Ok(Self {
            api_key: config.chat_api_key.clone(),
            api_secret: config.chat_api_secret.clone(),
        })
    }

    pub fn issue_token(&self, user_id: &str) -> Result<ChatTokenResponse, ChatError> {
        debug!("Issuing chat token for user {}", user_id);

        let claims = ChatTokenClaims {
            user_id: user_id.to_string(),
        };
        let token = sign_hs256(&claims, &self.api_secret).map_err(ChatError::Signing)?;

        Ok(ChatTokenResponse {
            token,
            api_key: self.api_key.clone(),
            user_id: user_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::jwt::verify_hs256;
    use shared_utils::test_utils::TestConfig;

    #[test]
    fn test_token_verifies_with_secret() {
        let config = TestConfig::default().to_app_config();
        let service = ChatTokenService::new(&config).unwrap();

        let response = service.issue_token("user-1").unwrap();
        assert_eq!(response.api_key, config.chat_api_key);

        let payload = verify_hs256(&response.token, &config.chat_api_secret).unwrap();
        let claims: ChatTokenClaims = serde_json::from_slice(&payload).unwrap();
        assert_eq!(claims.user_id, "user-1");

        assert!(verify_hs256(&response.token, "another-secret").is_err());
    }

    #[test]
    fn test_requires_configuration() {
        let mut config = TestConfig::default().to_app_config();
        config.chat_api_secret = String::new();
        assert!(matches!(ChatTokenService::new(&config), Err(ChatError::NotConfigured)));
    }
}
