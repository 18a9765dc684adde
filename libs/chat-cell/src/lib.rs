pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{ChatChannel, ChatError, ChatTokenResponse};
pub use router::chat_routes;
