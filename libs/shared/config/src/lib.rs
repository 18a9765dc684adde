use std::env;
use tracing::warn;

pub const DEFAULT_RESCHEDULE_CUTOFF_HOURS: i64 = 4;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend_api_url: String,
    pub backend_api_key: String,
    pub jwt_secret: String,
    pub chat_api_key: String,
    pub chat_api_secret: String,
    pub reschedule_cutoff_hours: i64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            backend_api_url: env::var("BACKEND_API_URL")
                .unwrap_or_else(|_| {
                    warn!("BACKEND_API_URL not set, using empty value");
                    String::new()
                }),
            backend_api_key: env::var("BACKEND_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("BACKEND_API_KEY not set, using empty value");
                    String::new()
                }),
            jwt_secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| {
                    warn!("JWT_SECRET not set, using empty value");
                    String::new()
                }),
            chat_api_key: env::var("CHAT_API_KEY")
                .unwrap_or_else(|_| {
                    warn!("CHAT_API_KEY not set, using empty value");
                    String::new()
                }),
            chat_api_secret: env::var("CHAT_API_SECRET")
                .unwrap_or_else(|_| {
                    warn!("CHAT_API_SECRET not set, using empty value");
                    String::new()
                }),
            reschedule_cutoff_hours: parse_or_default(
                "RESCHEDULE_CUTOFF_HOURS",
                env::var("RESCHEDULE_CUTOFF_HOURS").ok(),
                DEFAULT_RESCHEDULE_CUTOFF_HOURS,
            ),
            port: parse_or_default("PORT", env::var("PORT").ok(), DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_api_url.is_empty()
            && !self.backend_api_key.is_empty()
            && !self.jwt_secret.is_empty()
    }

    pub fn is_chat_configured(&self) -> bool {
        !self.chat_api_key.is_empty() && !self.chat_api_secret.is_empty()
    }
}

fn parse_or_default<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, value, default);
            default
        }),
        None => default,
    }
}
