// libs/appointment-cell/src/services/lifecycle.rs
use tracing::{debug, info, warn};

use shared_models::auth::Role;

use crate::models::{AppointmentError, AppointmentStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed
    pub fn validate_status_transition(
        &self,
        current_status: &AppointmentStatus,
        new_status: &AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !self.get_valid_transitions(current_status).contains(new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status.clone(),
                to: new_status.clone(),
            });
        }

        info!("Status transition validated: {} -> {}", current_status, new_status);
        Ok(())
    }

    pub fn get_valid_transitions(&self, current_status: &AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Upcoming => vec![
                AppointmentStatus::OnGoing,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::OnGoing => vec![AppointmentStatus::Completed],
            // Terminal states, and codes this service cannot reason about
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::Other(_) => vec![],
        }
    }

    /// Which roles may move an appointment into `new_status`. Patients only
    /// ever cancel, and that goes through the cancel endpoint.
    pub fn roles_allowed_to_set(&self, new_status: &AppointmentStatus) -> &'static [Role] {
        match new_status {
            AppointmentStatus::OnGoing | AppointmentStatus::Completed => {
                &[Role::Doctor, Role::Receptionist, Role::Admin]
            }
            AppointmentStatus::Cancelled => &[Role::Receptionist, Role::Admin],
            AppointmentStatus::Upcoming | AppointmentStatus::Other(_) => &[],
        }
    }

    pub fn can_cancel(&self, current_status: &AppointmentStatus) -> bool {
        *current_status == AppointmentStatus::Upcoming
    }
}
