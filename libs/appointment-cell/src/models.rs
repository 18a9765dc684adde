// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared_database::BackendError;
use shared_models::error::AppError;
use shared_models::page::PageQuery;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    pub doctor_id: String,
    pub clinic_id: Option<String>,
    pub service_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub billing_id: Option<String>,
    pub price: Option<f64>,
}

impl Appointment {
    pub fn is_patient(&self, user_id: &str) -> bool {
        self.patient_id == user_id
    }

    pub fn is_doctor(&self, user_id: &str) -> bool {
        self.doctor_id == user_id
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.is_patient(user_id) || self.is_doctor(user_id)
    }
}

/// Appointment status as sent by the backend. Codes this service does not
/// know are kept verbatim in `Other`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Upcoming,
    OnGoing,
    Completed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Upcoming,
        AppointmentStatus::OnGoing,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    /// Backend wire code.
    pub fn code(&self) -> &str {
        match self {
            AppointmentStatus::Upcoming => "UPCOMING",
            AppointmentStatus::OnGoing => "ON_GOING",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
            AppointmentStatus::Other(code) => code,
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(code: String) -> Self {
        match code.as_str() {
            "UPCOMING" => AppointmentStatus::Upcoming,
            "ON_GOING" => AppointmentStatus::OnGoing,
            "COMPLETED" => AppointmentStatus::Completed,
            "CANCELLED" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Other(code),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Other(code) => code,
            known => known.code().to_string(),
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A bookable interval as returned by the availability endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl Slot {
    pub fn is_well_formed(&self) -> bool {
        self.end_time > self.start_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultFile {
    pub id: String,
    pub appointment_id: String,
    pub file_name: String,
    pub url: String,
    pub uploaded_at: Option<DateTime<Utc>>,
}

// ==============================================================================
// VIEW MODELS
// ==============================================================================

/// Appointment as the apps render it: the record plus its badge and whether
/// the reschedule button is enabled.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub status_label: String,
    pub status_color: String,
    pub can_reschedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleEligibility {
    pub appointment_id: String,
    pub eligible: bool,
    pub reason: Option<String>,
    pub cutoff_hours: i64,
    pub start_time: DateTime<Utc>,
    pub minutes_until_start: i64,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsQuery {
    pub doctor_id: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Day the slot was listed under; defaults to the UTC date of `start_time`.
    pub date: Option<NaiveDate>,
    pub reason: Option<String>,
}

impl RescheduleRequest {
    pub fn slot(&self) -> Slot {
        Slot {
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn lookup_date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| self.start_time.date_naive())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    pub status: Option<AppointmentStatus>,
    pub patient_id: Option<String>,
    pub doctor_id: Option<String>,
    pub clinic_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl AppointmentListQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    /// Backend query string for this filter set.
    pub fn to_query_string(&self) -> String {
        let page = self.page_query();
        let mut parts = Vec::new();

        if let Some(status) = &self.status {
            parts.push(format!("status={}", urlencoding::encode(status.code())));
        }
        if let Some(patient_id) = &self.patient_id {
            parts.push(format!("patientId={}", urlencoding::encode(patient_id)));
        }
        if let Some(doctor_id) = &self.doctor_id {
            parts.push(format!("doctorId={}", urlencoding::encode(doctor_id)));
        }
        if let Some(clinic_id) = &self.clinic_id {
            parts.push(format!("clinicId={}", urlencoding::encode(clinic_id)));
        }
        if let Some(from) = self.from {
            parts.push(format!("from={}", from.format("%Y-%m-%d")));
        }
        if let Some(to) = self.to {
            parts.push(format!("to={}", to.format("%Y-%m-%d")));
        }
        parts.push(format!("page={}", page.page()));
        parts.push(format!("limit={}", page.limit()));

        parts.join("&")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub clinic_id: Option<String>,
}

// ==============================================================================
// STATISTICS MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentStats {
    pub total: u64,
    pub upcoming: u64,
    pub on_going: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub completion_rate: f64,
    pub cancellation_rate: f64,
    pub revenue: f64,
    pub daily: Vec<DailyCount>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Only upcoming appointments can be rescheduled (current status: {0})")]
    NotReschedulable(AppointmentStatus),

    #[error("Appointments cannot be rescheduled within {hours} hours of the start time")]
    WithinCutoff { hours: i64 },

    #[error("The selected time slot is no longer available")]
    SlotNotAvailable,

    #[error("Cannot change appointment status from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Invalid appointment time: {0}")]
    InvalidTime(String),

    #[error("Not authorized to access this appointment")]
    Unauthorized,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{fallback}")]
    Backend {
        #[source]
        source: BackendError,
        fallback: &'static str,
    },
}

impl AppointmentError {
    pub fn backend(source: BackendError, fallback: &'static str) -> Self {
        AppointmentError::Backend { source, fallback }
    }
}

impl From<AppointmentError> for AppError {
    fn from(e: AppointmentError) -> Self {
        match e {
            AppointmentError::NotFound => AppError::NotFound(e.to_string()),
            AppointmentError::Unauthorized => AppError::Forbidden(e.to_string()),
            AppointmentError::SlotNotAvailable => AppError::Conflict(e.to_string()),
            AppointmentError::NotReschedulable(_)
            | AppointmentError::WithinCutoff { .. }
            | AppointmentError::InvalidStatusTransition { .. }
            | AppointmentError::InvalidTime(_) => AppError::BadRequest(e.to_string()),
            AppointmentError::ValidationError(msg) => AppError::ValidationError(msg),
            AppointmentError::Backend { source, fallback } => source.into_app_error(fallback),
        }
    }
}
