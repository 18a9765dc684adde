pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{CatalogError, Clinic, Question, Tag};
pub use router::{clinic_routes, question_routes, tag_routes};
