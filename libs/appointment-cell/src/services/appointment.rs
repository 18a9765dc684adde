// libs/appointment-cell/src/services/appointment.rs
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use shared_config::AppConfig;
use shared_database::BackendClient;
use shared_models::page::{ListResponse, Page, MAX_PAGE_SIZE};

use crate::models::{
    Appointment, AppointmentError, AppointmentListQuery, AppointmentStats, AppointmentStatus,
    RescheduleEligibility, RescheduleRequest, ResultFile, Slot, StatsQuery, UpdateStatusRequest,
};
use crate::services::lifecycle::AppointmentLifecycle;
use crate::services::reschedule::{ensure_slot_offered, ReschedulePolicy};
use crate::services::stats::compute_stats;

/// Upper bound on pages pulled for one statistics request.
const MAX_STATS_PAGES: u32 = 50;

pub struct AppointmentService {
    backend: BackendClient,
    policy: ReschedulePolicy,
    lifecycle: AppointmentLifecycle,
}

impl AppointmentService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
            policy: ReschedulePolicy::new(config.reschedule_cutoff_hours),
            lifecycle: AppointmentLifecycle::new(),
        }
    }

    pub fn policy(&self) -> &ReschedulePolicy {
        &self.policy
    }

    pub fn lifecycle(&self) -> &AppointmentLifecycle {
        &self.lifecycle
    }

    pub async fn list_appointments(
        &self,
        query: &AppointmentListQuery,
        auth_token: &str,
    ) -> Result<Page<Appointment>, AppointmentError> {
        debug!("Listing appointments with filters: {:?}", query);

        let path = format!("/appointments?{}", query.to_query_string());
        let list: ListResponse<Appointment> = self
            .backend
            .get(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::backend(e, "Could not load appointments"))?;

        Ok(list.into_page(&query.page_query()))
    }

    pub async fn get_appointment(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);

        let path = format!("/appointments/{}", urlencoding::encode(appointment_id));
        self.backend.get(&path, auth_token).await.map_err(|e| {
            if e.is_not_found() {
                AppointmentError::NotFound
            } else {
                AppointmentError::backend(e, "Could not load appointment")
            }
        })
    }

    /// Free slots for a doctor on a day, as computed by the backend.
    pub async fn list_available_slots(
        &self,
        doctor_id: &str,
        date: chrono::NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Slot>, AppointmentError> {
        debug!("Fetching available slots for doctor {} on {}", doctor_id, date);

        let path = format!(
            "/appointments/available-slots?doctorId={}&date={}",
            urlencoding::encode(doctor_id),
            date.format("%Y-%m-%d")
        );

        let mut slots: Vec<Slot> = self
            .backend
            .get(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::backend(e, "Could not load available time slots"))?;

        slots.retain(Slot::is_well_formed);
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }

    pub async fn check_reschedule_eligibility(
        &self,
        appointment_id: &str,
        auth_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(Appointment, RescheduleEligibility), AppointmentError> {
        let appointment = self.get_appointment(appointment_id, auth_token).await?;
        let eligibility = self.policy.eligibility(&appointment, now);
        Ok((appointment, eligibility))
    }

    /// Moves an upcoming appointment into another free slot of the same doctor.
    pub async fn reschedule_appointment(
        &self,
        appointment: &Appointment,
        request: &RescheduleRequest,
        auth_token: &str,
        now: DateTime<Utc>,
    ) -> Result<Appointment, AppointmentError> {
        info!("Rescheduling appointment {} to {}", appointment.id, request.start_time);

        self.policy.validate(appointment, now)?;

        let requested = request.slot();
        let offered = self
            .list_available_slots(&appointment.doctor_id, request.lookup_date(), auth_token)
            .await?;
        ensure_slot_offered(&requested, &offered, now).inspect_err(|_| {
            warn!(
                "Requested slot {} - {} not offered for doctor {}",
                requested.start_time, requested.end_time, appointment.doctor_id
            );
        })?;

        let path = format!("/appointments/{}/reschedule", urlencoding::encode(&appointment.id));
        let updated: Appointment = self
            .backend
            .patch(
                &path,
                auth_token,
                json!({
                    "startTime": requested.start_time.to_rfc3339(),
                    "endTime": requested.end_time.to_rfc3339(),
                    "reason": request.reason,
                }),
            )
            .await
            .map_err(|e| AppointmentError::backend(e, "Could not reschedule appointment"))?;

        info!("Appointment {} rescheduled successfully", appointment.id);
        Ok(updated)
    }

    pub async fn update_status(
        &self,
        appointment: &Appointment,
        request: &UpdateStatusRequest,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        self.lifecycle
            .validate_status_transition(&appointment.status, &request.status)?;

        self.write_status(&appointment.id, request.status.clone(), request.notes.as_deref(), auth_token)
            .await
    }

    pub async fn cancel_appointment(
        &self,
        appointment: &Appointment,
        reason: Option<&str>,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        if !self.lifecycle.can_cancel(&appointment.status) {
            return Err(AppointmentError::InvalidStatusTransition {
                from: appointment.status.clone(),
                to: AppointmentStatus::Cancelled,
            });
        }

        let cancelled = self
            .write_status(&appointment.id, AppointmentStatus::Cancelled, reason, auth_token)
            .await?;

        info!("Appointment {} cancelled", appointment.id);
        Ok(cancelled)
    }

    pub async fn list_result_files(
        &self,
        appointment_id: &str,
        auth_token: &str,
    ) -> Result<Vec<ResultFile>, AppointmentError> {
        let path = format!(
            "/doctor/appointments/results/{}/files",
            urlencoding::encode(appointment_id)
        );
        self.backend
            .get(&path, auth_token)
            .await
            .map_err(|e| AppointmentError::backend(e, "Could not load result files"))
    }

    pub async fn get_stats(
        &self,
        query: &StatsQuery,
        auth_token: &str,
    ) -> Result<AppointmentStats, AppointmentError> {
        if query.to < query.from {
            return Err(AppointmentError::ValidationError(
                "'to' must not be before 'from'".to_string(),
            ));
        }

        let mut filter = AppointmentListQuery {
            clinic_id: query.clinic_id.clone(),
            from: Some(query.from),
            to: Some(query.to),
            limit: Some(MAX_PAGE_SIZE),
            ..Default::default()
        };

        let mut appointments = Vec::new();
        for page in 1..=MAX_STATS_PAGES {
            filter.page = Some(page);
            let batch = self.list_appointments(&filter, auth_token).await?;
            let fetched = batch.items.len() as u32;
            let total = batch.total;
            appointments.extend(batch.items);

            if fetched < MAX_PAGE_SIZE || appointments.len() as u64 >= total {
                break;
            }
            if page == MAX_STATS_PAGES {
                warn!("Statistics truncated at {} appointments", appointments.len());
            }
        }

        debug!("Computing statistics over {} appointments", appointments.len());
        Ok(compute_stats(&appointments))
    }

    async fn write_status(
        &self,
        appointment_id: &str,
        status: AppointmentStatus,
        notes: Option<&str>,
        auth_token: &str,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/appointments/{}/status", urlencoding::encode(appointment_id));
        self.backend
            .patch(&path, auth_token, json!({ "status": status, "notes": notes }))
            .await
            .map_err(|e| AppointmentError::backend(e, "Could not update appointment status"))
    }
}
