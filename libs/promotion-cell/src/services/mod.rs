pub mod discount;
pub mod promotion;

pub use promotion::PromotionService;
