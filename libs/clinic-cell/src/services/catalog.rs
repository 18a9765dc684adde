// libs/clinic-cell/src/services/catalog.rs
use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::{BackendClient, BackendError};
use shared_models::page::{ListResponse, Page};
use shared_models::record::ListFilter;

use crate::models::{CatalogError, Resource};

/// Backend CRUD for one kind of catalog record.
pub struct CatalogService<R> {
    backend: BackendClient,
    _resource: PhantomData<R>,
}

impl<R: Resource> CatalogService<R> {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
            _resource: PhantomData,
        }
    }

    fn item_path(id: &str) -> String {
        format!("{}/{}", R::PATH, urlencoding::encode(id))
    }

    fn map_err(e: BackendError, action: &str) -> CatalogError {
        if e.is_not_found() {
            return CatalogError::NotFound(R::NOUN);
        }
        CatalogError::Backend {
            source: e,
            fallback: format!("Could not {} {}", action, R::NOUN.to_lowercase()),
        }
    }

    pub async fn list(&self, filter: &ListFilter, auth_token: &str) -> Result<Page<R>, CatalogError> {
        debug!("Listing {} with filters: {:?}", R::PATH, filter);

        let path = format!("{}?{}", R::PATH, filter.to_query_string());
        let list: ListResponse<R> = self
            .backend
            .get(&path, auth_token)
            .await
            .map_err(|e| CatalogError::Backend {
                source: e,
                fallback: format!("Could not load {}", R::PATH.trim_start_matches('/')),
            })?;

        Ok(list.into_page(&filter.page_query()))
    }

    pub async fn get(&self, id: &str, auth_token: &str) -> Result<R, CatalogError> {
        self.backend
            .get(&Self::item_path(id), auth_token)
            .await
            .map_err(|e| Self::map_err(e, "load"))
    }

    pub async fn create(&self, request: &R::Create, auth_token: &str) -> Result<R, CatalogError> {
        let body = to_body(request)?;
        let created = self
            .backend
            .post(R::PATH, Some(auth_token), body)
            .await
            .map_err(|e| Self::map_err(e, "create"))?;

        info!("{} created", R::NOUN);
        Ok(created)
    }

    pub async fn update(&self, id: &str, request: &R::Update, auth_token: &str) -> Result<R, CatalogError> {
        let body = to_body(request)?;
        self.backend
            .put(&Self::item_path(id), auth_token, body)
            .await
            .map_err(|e| Self::map_err(e, "update"))
    }

    pub async fn delete(&self, id: &str, auth_token: &str) -> Result<(), CatalogError> {
        self.backend
            .delete(&Self::item_path(id), auth_token)
            .await
            .map_err(|e| Self::map_err(e, "delete"))?;

        info!("{} {} deleted", R::NOUN, id);
        Ok(())
    }
}

fn to_body<T: serde::Serialize>(request: &T) -> Result<Value, CatalogError> {
    serde_json::to_value(request).map_err(|e| CatalogError::InvalidBody(e.to_string()))
}
