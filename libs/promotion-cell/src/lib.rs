pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{PriceQuote, Promotion, PromotionError, Voucher};
pub use router::promotion_routes;
