pub mod auth;
pub mod error;
pub mod labels;
pub mod page;
pub mod record;
