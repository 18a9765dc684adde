// libs/clinic-cell/src/handlers.rs
//
// One set of handlers serves clinics, tags and questions; the router picks the
// record type.
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_models::labels::RECORD_STATUS;
use shared_models::record::ListFilter;
use shared_utils::extractor::require_role;

use crate::models::{Resource, Validate};
use crate::services::CatalogService;

pub async fn list_records<R: Resource>(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Query(filter): Query<ListFilter>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::<R>::new(&state);
    let page = service.list(&filter, auth.token()).await?;

    Ok(Json(json!(page)))
}

pub async fn get_record<R: Resource>(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::<R>::new(&state);
    let record = service.get(&id, auth.token()).await?;

    Ok(Json(json!(record)))
}

pub async fn create_record<R: Resource>(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<R::Create>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;
    request.validate()?;

    let service = CatalogService::<R>::new(&state);
    let record = service.create(&request, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "data": record,
    })))
}

pub async fn update_record<R: Resource>(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<R::Update>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;
    request.validate()?;

    let service = CatalogService::<R>::new(&state);
    let record = service.update(&id, &request, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "data": record,
    })))
}

pub async fn delete_record<R: Resource>(
    State(state): State<Arc<AppConfig>>,
    Path(id): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_role(&user, &[Role::Admin])?;

    let service = CatalogService::<R>::new(&state);
    service.delete(&id, auth.token()).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("{} deleted", R::NOUN)
    })))
}

pub async fn get_status_labels() -> Json<Value> {
    Json(json!({ "statuses": RECORD_STATUS.entries() }))
}
