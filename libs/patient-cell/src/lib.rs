pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{PatientError, PatientProfile, Relationship};
pub use router::patient_routes;
