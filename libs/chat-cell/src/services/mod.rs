pub mod channel;
pub mod token;

pub use token::ChatTokenService;
