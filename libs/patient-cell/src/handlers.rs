use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::labels::{GENDER, RELATIONSHIP};
use shared_utils::extractor::require_role;

use crate::models::{
    CreateProfileRequest, PatientError, PatientProfile, PatientProfileView, PatientSearchQuery,
    UpdateProfileRequest,
};
use crate::services::PatientService;

const FRONT_DESK: [Role; 2] = [Role::Receptionist, Role::Admin];

fn ensure_can_read(user: &User, profile: &PatientProfile) -> Result<(), AppError> {
    if profile.belongs_to(&user.id) || user.role().is_staff() {
        return Ok(());
    }
    Err(PatientError::Unauthorized.into())
}

fn ensure_can_modify(user: &User, profile: &PatientProfile) -> Result<(), AppError> {
    if profile.belongs_to(&user.id) || user.has_any_role(&FRONT_DESK) {
        return Ok(());
    }
    Err(PatientError::Unauthorized.into())
}

#[axum::debug_handler]
pub async fn list_my_profiles(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let today = Utc::now().date_naive();

    let profiles: Vec<_> = service
        .list_my_profiles(auth.token())
        .await?
        .into_iter()
        .map(|p| PatientProfileView::new(p, today))
        .collect();

    Ok(Json(json!({ "profiles": profiles })))
}

#[axum::debug_handler]
pub async fn create_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Json(request): Json<CreateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let today = Utc::now().date_naive();

    let profile = service.create_profile(&request, auth.token(), today).await?;

    Ok(Json(json!({
        "success": true,
        "profile": PatientProfileView::new(profile, today),
    })))
}

#[axum::debug_handler]
pub async fn get_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let profile = service.get_profile(&profile_id, auth.token()).await?;
    ensure_can_read(&user, &profile)?;

    Ok(Json(json!(PatientProfileView::new(profile, Utc::now().date_naive()))))
}

#[axum::debug_handler]
pub async fn update_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(profile_id): Path<String>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);
    let today = Utc::now().date_naive();

    let profile = service.get_profile(&profile_id, auth.token()).await?;
    ensure_can_modify(&user, &profile)?;

    let updated = service
        .update_profile(&profile, &request, auth.token(), today)
        .await?;

    Ok(Json(json!({
        "success": true,
        "profile": PatientProfileView::new(updated, today),
    })))
}

#[axum::debug_handler]
pub async fn delete_profile(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Path(profile_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = PatientService::new(&config);

    let profile = service.get_profile(&profile_id, auth.token()).await?;
    ensure_can_modify(&user, &profile)?;

    service.delete_profile(&profile.id, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Patient profile deleted"
    })))
}

#[axum::debug_handler]
pub async fn search_profiles(
    State(config): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &FRONT_DESK)?;

    let service = PatientService::new(&config);
    let today = Utc::now().date_naive();
    let page = service.search_profiles(&query, auth.token()).await?;

    let items: Vec<_> = page
        .items
        .into_iter()
        .map(|p| PatientProfileView::new(p, today))
        .collect();

    Ok(Json(json!({
        "items": items,
        "total": page.total,
        "page": page.page,
        "limit": page.limit,
    })))
}

pub async fn get_profile_labels() -> Json<Value> {
    Json(json!({
        "relationships": RELATIONSHIP.entries(),
        "genders": GENDER.entries(),
    }))
}
