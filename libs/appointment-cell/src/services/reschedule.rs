// libs/appointment-cell/src/services/reschedule.rs
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use shared_config::DEFAULT_RESCHEDULE_CUTOFF_HOURS;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, RescheduleEligibility, Slot};

/// True when `start_time` is less than `cutoff` away from `now`.
/// Appointments that already started are always within the cutoff.
pub fn is_within_cutoff(start_time: DateTime<Utc>, now: DateTime<Utc>, cutoff: Duration) -> bool {
    start_time - now < cutoff
}

#[derive(Debug, Clone, Copy)]
pub struct ReschedulePolicy {
    cutoff_hours: i64,
    cutoff: Duration,
}

impl ReschedulePolicy {
    /// Negative values mean no cutoff. Values chrono cannot represent fall
    /// back to the default.
    pub fn new(cutoff_hours: i64) -> Self {
        let hours = cutoff_hours.max(0);
        match Duration::try_hours(hours) {
            Some(cutoff) => Self { cutoff_hours: hours, cutoff },
            None => {
                warn!(
                    "Reschedule cutoff of {}h is out of range, using {}h",
                    hours, DEFAULT_RESCHEDULE_CUTOFF_HOURS
                );
                Self {
                    cutoff_hours: DEFAULT_RESCHEDULE_CUTOFF_HOURS,
                    cutoff: Duration::hours(DEFAULT_RESCHEDULE_CUTOFF_HOURS),
                }
            }
        }
    }

    pub fn cutoff(&self) -> Duration {
        self.cutoff
    }

    pub fn validate(&self, appointment: &Appointment, now: DateTime<Utc>) -> Result<(), AppointmentError> {
        if appointment.status != AppointmentStatus::Upcoming {
            return Err(AppointmentError::NotReschedulable(appointment.status.clone()));
        }

        if is_within_cutoff(appointment.start_time, now, self.cutoff()) {
            warn!(
                "Reschedule blocked for appointment {}: starts at {}, cutoff {}h",
                appointment.id, appointment.start_time, self.cutoff_hours
            );
            return Err(AppointmentError::WithinCutoff {
                hours: self.cutoff_hours,
            });
        }

        Ok(())
    }

    pub fn eligibility(&self, appointment: &Appointment, now: DateTime<Utc>) -> RescheduleEligibility {
        let result = self.validate(appointment, now);
        debug!("Reschedule eligibility for {}: {:?}", appointment.id, result.is_ok());

        RescheduleEligibility {
            appointment_id: appointment.id.clone(),
            eligible: result.is_ok(),
            reason: result.err().map(|e| e.to_string()),
            cutoff_hours: self.cutoff_hours,
            start_time: appointment.start_time,
            minutes_until_start: (appointment.start_time - now).num_minutes(),
        }
    }
}

/// The requested slot must be one the availability endpoint offered, and must
/// lie in the future.
pub fn ensure_slot_offered(requested: &Slot, offered: &[Slot], now: DateTime<Utc>) -> Result<(), AppointmentError> {
    if !requested.is_well_formed() {
        return Err(AppointmentError::InvalidTime(
            "End time must be after start time".to_string(),
        ));
    }
    if requested.start_time <= now {
        return Err(AppointmentError::InvalidTime(
            "The new time must be in the future".to_string(),
        ));
    }
    if !offered.contains(requested) {
        return Err(AppointmentError::SlotNotAvailable);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
    }

    fn appointment(start: DateTime<Utc>, status: AppointmentStatus) -> Appointment {
        Appointment {
            id: "apt-1".to_string(),
            patient_id: "patient-1".to_string(),
            doctor_id: "doctor-1".to_string(),
            clinic_id: None,
            service_id: None,
            start_time: start,
            end_time: start + Duration::minutes(30),
            status,
            notes: None,
            billing_id: None,
            price: None,
        }
    }

    #[test]
    fn test_cutoff_boundary() {
        let cutoff = Duration::hours(4);
        assert!(is_within_cutoff(now() + Duration::hours(4) - Duration::seconds(1), now(), cutoff));
        assert!(!is_within_cutoff(now() + Duration::hours(4), now(), cutoff));
        assert!(!is_within_cutoff(now() + Duration::hours(30), now(), cutoff));
    }

    #[test]
    fn test_out_of_range_cutoff_uses_default() {
        let policy = ReschedulePolicy::new(3_000_000_000_000);
        assert_eq!(policy.cutoff(), Duration::hours(DEFAULT_RESCHEDULE_CUTOFF_HOURS));

        let soon = appointment(now() + Duration::hours(2), AppointmentStatus::Upcoming);
        assert_matches!(policy.validate(&soon, now()), Err(AppointmentError::WithinCutoff { hours: 4 }));
        assert!(policy.eligibility(&soon, now()).cutoff_hours == DEFAULT_RESCHEDULE_CUTOFF_HOURS);

        assert_eq!(ReschedulePolicy::new(-3).cutoff(), Duration::zero());
    }

    #[test]
    fn test_past_start_is_within_cutoff() {
        assert!(is_within_cutoff(now() - Duration::hours(1), now(), Duration::hours(4)));
    }

    #[test]
    fn test_policy_rejections() {
        let policy = ReschedulePolicy::new(4);

        let soon = appointment(now() + Duration::hours(2), AppointmentStatus::Upcoming);
        assert_matches!(policy.validate(&soon, now()), Err(AppointmentError::WithinCutoff { hours: 4 }));

        let done = appointment(now() + Duration::days(2), AppointmentStatus::Completed);
        assert_matches!(
            policy.validate(&done, now()),
            Err(AppointmentError::NotReschedulable(AppointmentStatus::Completed))
        );

        let later = appointment(now() + Duration::days(2), AppointmentStatus::Upcoming);
        assert!(policy.validate(&later, now()).is_ok());
    }

    #[test]
    fn test_eligibility_report() {
        let policy = ReschedulePolicy::new(4);
        let soon = appointment(now() + Duration::minutes(90), AppointmentStatus::Upcoming);

        let report = policy.eligibility(&soon, now());
        assert!(!report.eligible);
        assert_eq!(report.minutes_until_start, 90);
        assert_eq!(
            report.reason.as_deref(),
            Some("Appointments cannot be rescheduled within 4 hours of the start time")
        );
    }

    #[test]
    fn test_ensure_slot_offered() {
        let slot = Slot {
            start_time: now() + Duration::days(1),
            end_time: now() + Duration::days(1) + Duration::minutes(30),
        };
        let other = Slot {
            start_time: slot.end_time,
            end_time: slot.end_time + Duration::minutes(30),
        };

        assert!(ensure_slot_offered(&slot, &[other, slot], now()).is_ok());
        assert_matches!(ensure_slot_offered(&slot, &[other], now()), Err(AppointmentError::SlotNotAvailable));

        let inverted = Slot { start_time: slot.end_time, end_time: slot.start_time };
        assert_matches!(ensure_slot_offered(&inverted, &[inverted], now()), Err(AppointmentError::InvalidTime(_)));

        let past = Slot { start_time: now() - Duration::hours(1), end_time: now() };
        assert_matches!(ensure_slot_offered(&past, &[past], now()), Err(AppointmentError::InvalidTime(_)));
    }
}
