pub mod appointment;
pub mod lifecycle;
pub mod reschedule;
pub mod stats;
pub mod status;

pub use appointment::AppointmentService;
