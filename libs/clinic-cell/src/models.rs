// libs/clinic-cell/src/models.rs
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use shared_database::BackendError;
use shared_models::error::AppError;
use shared_models::record::RecordStatus;
use shared_utils::validation::{require_non_empty, require_phone};

// ==============================================================================
// RESOURCE TRAITS
// ==============================================================================

/// Input check run before a write is forwarded to the backend.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// An admin-managed record served under its own backend collection.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync + 'static {
    type Create: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;
    type Update: Serialize + DeserializeOwned + Validate + Send + Sync + 'static;

    /// Backend collection path, e.g. `/clinics`.
    const PATH: &'static str;
    const NOUN: &'static str;
}

// ==============================================================================
// CLINICS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clinic {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateClinicRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClinicRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

fn check_optional_phone(phone: Option<&str>) -> Result<(), AppError> {
    match phone.map(str::trim).filter(|p| !p.is_empty()) {
        Some(phone) => require_phone(phone),
        None => Ok(()),
    }
}

impl Validate for CreateClinicRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Clinic name", &self.name)?;
        check_optional_phone(self.phone.as_deref())
    }
}

impl Validate for UpdateClinicRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            require_non_empty("Clinic name", name)?;
        }
        check_optional_phone(self.phone.as_deref())
    }
}

impl Resource for Clinic {
    type Create = CreateClinicRequest;
    type Update = UpdateClinicRequest;

    const PATH: &'static str = "/clinics";
    const NOUN: &'static str = "Clinic";
}

// ==============================================================================
// TAGS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTagRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

impl Validate for CreateTagRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Tag name", &self.name)
    }
}

impl Validate for UpdateTagRequest {
    fn validate(&self) -> Result<(), AppError> {
        match &self.name {
            Some(name) => require_non_empty("Tag name", name),
            None => Ok(()),
        }
    }
}

impl Resource for Tag {
    type Create = CreateTagRequest;
    type Update = UpdateTagRequest;

    const PATH: &'static str = "/tags";
    const NOUN: &'static str = "Tag";
}

// ==============================================================================
// QUESTIONS
// ==============================================================================

/// A screening question shown during booking, grouped by tags.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionRequest {
    pub content: String,
    pub tag_ids: Vec<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuestionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

fn check_tags(tag_ids: &[String]) -> Result<(), AppError> {
    if tag_ids.iter().all(|id| id.trim().is_empty()) {
        return Err(AppError::ValidationError(
            "A question must have at least one tag".to_string(),
        ));
    }
    Ok(())
}

impl Validate for CreateQuestionRequest {
    fn validate(&self) -> Result<(), AppError> {
        require_non_empty("Question content", &self.content)?;
        check_tags(&self.tag_ids)
    }
}

impl Validate for UpdateQuestionRequest {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(content) = &self.content {
            require_non_empty("Question content", content)?;
        }
        match &self.tag_ids {
            Some(tag_ids) => check_tags(tag_ids),
            None => Ok(()),
        }
    }
}

impl Resource for Question {
    type Create = CreateQuestionRequest;
    type Update = UpdateQuestionRequest;

    const PATH: &'static str = "/questions";
    const NOUN: &'static str = "Question";
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{fallback}")]
    Backend {
        #[source]
        source: BackendError,
        fallback: String,
    },
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::NotFound(_) => AppError::NotFound(e.to_string()),
            CatalogError::InvalidBody(_) => AppError::BadRequest(e.to_string()),
            CatalogError::Backend { source, fallback } => source.into_app_error(&fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_clinic_validation() {
        let mut request: CreateClinicRequest = serde_json::from_value(json!({ "name": "City Clinic" })).unwrap();
        assert_eq!(request.status, RecordStatus::Active);
        assert!(request.validate().is_ok());

        request.phone = Some("not a phone".to_string());
        assert_matches!(request.validate(), Err(AppError::ValidationError(_)));

        request.phone = Some("  ".to_string());
        request.name = " ".to_string();
        assert_matches!(request.validate(), Err(AppError::ValidationError(msg)) if msg == "Clinic name is required");

        assert!(UpdateClinicRequest::default().validate().is_ok());
    }

    #[test]
    fn test_question_needs_a_tag() {
        let request = CreateQuestionRequest {
            content: "Do you have any allergies?".to_string(),
            tag_ids: vec![],
            status: RecordStatus::Active,
        };
        assert_matches!(request.validate(), Err(AppError::ValidationError(_)));

        let request = CreateQuestionRequest {
            tag_ids: vec!["tag-1".to_string()],
            ..request
        };
        assert!(request.validate().is_ok());

        let update = UpdateQuestionRequest {
            tag_ids: Some(vec![" ".to_string()]),
            ..Default::default()
        };
        assert_matches!(update.validate(), Err(AppError::ValidationError(_)));
    }

    #[test]
    fn test_update_skips_absent_fields() {
        let update = UpdateTagRequest {
            status: Some(RecordStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({ "status": "INACTIVE" }));
    }
}
