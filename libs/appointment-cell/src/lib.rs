pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{Appointment, AppointmentError, AppointmentStatus, Slot};
pub use router::{appointment_routes, doctor_result_routes};
