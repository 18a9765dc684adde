// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_utils::extractor::require_role;

use crate::models::{
    Appointment, AppointmentError, AppointmentListQuery, AvailableSlotsQuery,
    CancelAppointmentRequest, RescheduleRequest, StatsQuery, UpdateStatusRequest,
};
use crate::services::status::{payment_status_entries, status_entries, to_view};
use crate::services::AppointmentService;

// ==============================================================================
// ACCESS HELPERS
// ==============================================================================

const FRONT_DESK: [Role; 2] = [Role::Receptionist, Role::Admin];

fn ensure_can_view(user: &User, appointment: &Appointment) -> Result<(), AppError> {
    if appointment.is_participant(&user.id) || user.has_any_role(&FRONT_DESK) {
        return Ok(());
    }
    Err(AppointmentError::Unauthorized.into())
}

/// Rescheduling and cancelling: the patient who booked, or the front desk.
fn ensure_can_change_booking(user: &User, appointment: &Appointment) -> Result<(), AppError> {
    if appointment.is_patient(&user.id) || user.has_any_role(&FRONT_DESK) {
        return Ok(());
    }
    Err(AppointmentError::Unauthorized.into())
}

/// Patients only ever see their own bookings and doctors their own schedule.
fn scope_query(user: &User, mut query: AppointmentListQuery) -> AppointmentListQuery {
    match user.role() {
        Role::Patient => query.patient_id = Some(user.id.clone()),
        Role::Doctor => query.doctor_id = Some(user.id.clone()),
        Role::Receptionist | Role::Admin => {}
    }
    query
}

// ==============================================================================
// APPOINTMENT HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<AppointmentListQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);
    let query = scope_query(&user, query);

    let page = service.list_appointments(&query, auth.token()).await?;

    let now = Utc::now();
    let items: Vec<_> = page
        .items
        .into_iter()
        .map(|appointment| to_view(appointment, service.policy(), now))
        .collect();

    Ok(Json(json!({
        "items": items,
        "total": page.total,
        "page": page.page,
        "limit": page.limit,
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);

    let appointment = service.get_appointment(&appointment_id, auth.token()).await?;
    ensure_can_view(&user, &appointment)?;

    Ok(Json(json!(to_view(appointment, service.policy(), Utc::now()))))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);

    let slots = service
        .list_available_slots(&query.doctor_id, query.date, auth.token())
        .await?;

    Ok(Json(json!({
        "doctorId": query.doctor_id,
        "date": query.date,
        "slots": slots,
    })))
}

#[axum::debug_handler]
pub async fn get_reschedule_eligibility(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = AppointmentService::new(&state);

    let (appointment, eligibility) = service
        .check_reschedule_eligibility(&appointment_id, auth.token(), Utc::now())
        .await?;
    ensure_can_view(&user, &appointment)?;

    Ok(Json(json!(eligibility)))
}

#[axum::debug_handler]
pub async fn reschedule_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<RescheduleRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let service = AppointmentService::new(&state);

    let appointment = service.get_appointment(&appointment_id, token).await?;
    ensure_can_change_booking(&user, &appointment)?;

    let now = Utc::now();
    let updated = service
        .reschedule_appointment(&appointment, &request, token, now)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointment": to_view(updated, service.policy(), now),
        "message": "Appointment rescheduled successfully"
    })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let service = AppointmentService::new(&state);

    require_role(&user, service.lifecycle().roles_allowed_to_set(&request.status))?;

    let appointment = service.get_appointment(&appointment_id, token).await?;
    if user.has_role(Role::Doctor) && !appointment.is_doctor(&user.id) {
        return Err(AppointmentError::Unauthorized.into());
    }

    let updated = service.update_status(&appointment, &request, token).await?;

    Ok(Json(json!({
        "success": true,
        "appointment": to_view(updated, service.policy(), Utc::now()),
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<CancelAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let service = AppointmentService::new(&state);

    let appointment = service.get_appointment(&appointment_id, token).await?;
    ensure_can_change_booking(&user, &appointment)?;

    let cancelled = service
        .cancel_appointment(&appointment, request.reason.as_deref(), token)
        .await?;

    Ok(Json(json!({
        "success": true,
        "appointment": to_view(cancelled, service.policy(), Utc::now()),
        "message": "Appointment cancelled"
    })))
}

pub async fn get_status_labels() -> Json<Value> {
    Json(json!({
        "statuses": status_entries(),
        "paymentStatuses": payment_status_entries()
    }))
}

#[axum::debug_handler]
pub async fn get_appointment_stats(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;
    debug!("Computing appointment stats from {} to {}", query.from, query.to);

    let service = AppointmentService::new(&state);
    let stats = service.get_stats(&query, auth.token()).await?;

    Ok(Json(json!(stats)))
}

// ==============================================================================
// RESULT FILES
// ==============================================================================

#[axum::debug_handler]
pub async fn get_result_files(
    State(state): State<Arc<AppConfig>>,
    Path(appointment_id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let service = AppointmentService::new(&state);

    let (appointment, files) = futures::try_join!(
        service.get_appointment(&appointment_id, token),
        service.list_result_files(&appointment_id, token),
    )?;

    if !appointment.is_participant(&user.id) && !user.is_admin() {
        return Err(AppointmentError::Unauthorized.into());
    }

    Ok(Json(json!({
        "appointmentId": appointment.id,
        "files": files,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_utils::test_utils::TestUser;

    #[test]
    fn test_scope_query_by_role() {
        let patient = TestUser::patient("p@example.com").to_user();
        let query = AppointmentListQuery {
            patient_id: Some("someone-else".to_string()),
            ..Default::default()
        };
        assert_eq!(scope_query(&patient, query).patient_id.as_deref(), Some(patient.id.as_str()));

        let doctor = TestUser::doctor("d@example.com").to_user();
        let scoped = scope_query(&doctor, AppointmentListQuery::default());
        assert_eq!(scoped.doctor_id.as_deref(), Some(doctor.id.as_str()));
        assert!(scoped.patient_id.is_none());

        let desk = TestUser::receptionist("r@example.com").to_user();
        let query = AppointmentListQuery {
            doctor_id: Some("doc-9".to_string()),
            ..Default::default()
        };
        assert_eq!(scope_query(&desk, query).doctor_id.as_deref(), Some("doc-9"));
    }
}
