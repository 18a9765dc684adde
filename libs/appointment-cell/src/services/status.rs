// libs/appointment-cell/src/services/status.rs
use chrono::{DateTime, Utc};

use shared_models::labels::{LabelEntry, APPOINTMENT_STATUS, PAYMENT_STATUS};

use crate::models::{Appointment, AppointmentStatus, AppointmentView};
use crate::services::reschedule::ReschedulePolicy;

pub fn status_label(status: &AppointmentStatus) -> &str {
    APPOINTMENT_STATUS.label(status.code())
}

pub fn status_color(status: &AppointmentStatus) -> &'static str {
    APPOINTMENT_STATUS.color(status.code())
}

pub fn status_entries() -> Vec<LabelEntry> {
    APPOINTMENT_STATUS.entries()
}

pub fn payment_status_entries() -> Vec<LabelEntry> {
    PAYMENT_STATUS.entries()
}

pub fn to_view(appointment: Appointment, policy: &ReschedulePolicy, now: DateTime<Utc>) -> AppointmentView {
    let can_reschedule = policy.validate(&appointment, now).is_ok();
    AppointmentView {
        status_label: status_label(&appointment.status).to_string(),
        status_color: status_color(&appointment.status).to_string(),
        can_reschedule,
        appointment,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared_models::labels::NEUTRAL_COLOR;

    #[test]
    fn test_every_status_has_a_label() {
        for status in AppointmentStatus::ALL {
            assert_ne!(status_label(&status), status.code());
        }
        assert_eq!(status_label(&AppointmentStatus::OnGoing), "Ongoing");
        assert_eq!(status_color(&AppointmentStatus::Completed), "green");

        let unknown = AppointmentStatus::Other("NO_SHOW".to_string());
        assert_eq!(status_label(&unknown), "NO_SHOW");
        assert_eq!(status_color(&unknown), NEUTRAL_COLOR);
    }

    #[test]
    fn test_view_flags() {
        let now = Utc::now();
        let appointment = Appointment {
            id: "a".to_string(),
            patient_id: "p".to_string(),
            doctor_id: "d".to_string(),
            clinic_id: None,
            service_id: None,
            start_time: now + Duration::hours(1),
            end_time: now + Duration::hours(2),
            status: AppointmentStatus::Upcoming,
            notes: None,
            billing_id: None,
            price: Some(100.0),
        };

        let view = to_view(appointment.clone(), &ReschedulePolicy::new(4), now);
        assert!(!view.can_reschedule);
        assert_eq!(view.status_label, "Upcoming");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["statusLabel"], "Upcoming");
        assert_eq!(json["patientId"], "p");
        assert_eq!(json["canReschedule"], false);

        let view = to_view(appointment, &ReschedulePolicy::new(0), now);
        assert!(view.can_reschedule);
    }
}
