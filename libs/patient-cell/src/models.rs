// libs/patient-cell/src/models.rs
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use shared_database::BackendError;
use shared_models::error::AppError;
use shared_models::labels::{GENDER, RELATIONSHIP};
use shared_models::page::PageQuery;

// ==============================================================================
// PROFILE MODELS
// ==============================================================================

/// Codes outside the known set are kept verbatim in `Unknown`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown(String),
}

impl Gender {
    pub fn code(&self) -> &str {
        match self {
            Gender::Male => "MALE",
            Gender::Female => "FEMALE",
            Gender::Other => "OTHER",
            Gender::Unknown(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Gender::Unknown(_))
    }
}

impl From<String> for Gender {
    fn from(code: String) -> Self {
        match code.as_str() {
            "MALE" => Gender::Male,
            "FEMALE" => Gender::Female,
            "OTHER" => Gender::Other,
            _ => Gender::Unknown(code),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        match gender {
            Gender::Unknown(code) => code,
            known => known.code().to_string(),
        }
    }
}

/// How the profile relates to the account holder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Relationship {
    Myself,
    Spouse,
    Child,
    Parent,
    Sibling,
    Other,
    Unknown(String),
}

impl Relationship {
    pub fn code(&self) -> &str {
        match self {
            Relationship::Myself => "SELF",
            Relationship::Spouse => "SPOUSE",
            Relationship::Child => "CHILD",
            Relationship::Parent => "PARENT",
            Relationship::Sibling => "SIBLING",
            Relationship::Other => "OTHER",
            Relationship::Unknown(code) => code,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Relationship::Unknown(_))
    }
}

impl From<String> for Relationship {
    fn from(code: String) -> Self {
        match code.as_str() {
            "SELF" => Relationship::Myself,
            "SPOUSE" => Relationship::Spouse,
            "CHILD" => Relationship::Child,
            "PARENT" => Relationship::Parent,
            "SIBLING" => Relationship::Sibling,
            "OTHER" => Relationship::Other,
            _ => Relationship::Unknown(code),
        }
    }
}

impl From<Relationship> for String {
    fn from(relationship: Relationship) -> Self {
        match relationship {
            Relationship::Unknown(code) => code,
            known => known.code().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    pub id: String,
    pub user_id: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: Option<String>,
    pub relationship: Relationship,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
}

impl PatientProfile {
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        let mut years = today.year() - self.date_of_birth.year();
        if (today.month(), today.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }

    pub fn bmi(&self) -> Option<f64> {
        match (self.height_cm, self.weight_kg) {
            (Some(h), Some(w)) if h > 0.0 => {
                let meters = h / 100.0;
                Some((w / (meters * meters) * 10.0).round() / 10.0)
            }
            _ => None,
        }
    }

    pub fn belongs_to(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileView {
    #[serde(flatten)]
    pub profile: PatientProfile,
    pub relationship_label: String,
    pub gender_label: String,
    pub age: u32,
    pub bmi: Option<f64>,
}

impl PatientProfileView {
    pub fn new(profile: PatientProfile, today: NaiveDate) -> Self {
        Self {
            relationship_label: RELATIONSHIP.label(profile.relationship.code()).to_string(),
            gender_label: GENDER.label(profile.gender.code()).to_string(),
            age: profile.age_on(today),
            bmi: profile.bmi(),
            profile,
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: Option<String>,
    pub relationship: Relationship,
    pub height_cm: Option<f64>,
    pub weight_kg: Option<f64>,
    pub blood_type: Option<String>,
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<Relationship>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientSearchQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PatientSearchQuery {
    pub fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }

    pub fn to_query_string(&self) -> String {
        let page = self.page_query();
        let mut parts = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            parts.push(format!("search={}", urlencoding::encode(search)));
        }
        parts.push(format!("page={}", page.page()));
        parts.push(format!("limit={}", page.limit()));
        parts.join("&")
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("Patient profile not found")]
    NotFound,

    #[error("A profile for yourself already exists")]
    SelfProfileExists,

    #[error("Date of birth cannot be in the future")]
    InvalidDateOfBirth,

    #[error("Unauthorized access to patient data")]
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

impl PatientError {
    pub fn backend(source: BackendError, fallback: &'static str) -> Self {
        PatientError::Backend { source, fallback }
    }
}

impl From<PatientError> for AppError {
    fn from(e: PatientError) -> Self {
        match e {
            PatientError::NotFound => AppError::NotFound(e.to_string()),
            PatientError::SelfProfileExists => AppError::Conflict(e.to_string()),
            PatientError::InvalidDateOfBirth => AppError::ValidationError(e.to_string()),
            PatientError::Unauthorized => AppError::Forbidden(e.to_string()),
            PatientError::ValidationError(msg) => AppError::ValidationError(msg),
            PatientError::Backend { source, fallback } => source.into_app_error(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> PatientProfile {
        serde_json::from_value(json!({
            "id": "pp-1",
            "userId": "u-1",
            "fullName": "Jane Doe",
            "dateOfBirth": "1990-06-15",
            "gender": "FEMALE",
            "phone": "0901234567",
            "relationship": "SELF",
            "heightCm": 165.0,
            "weightKg": 60.0,
            "bloodType": "O+",
            "allergies": null
        }))
        .unwrap()
    }

    #[test]
    fn test_wire_codes() {
        let p = profile();
        assert_eq!(p.relationship, Relationship::Myself);
        assert_eq!(serde_json::to_value(Relationship::Myself).unwrap(), json!("SELF"));
        assert_eq!(serde_json::to_value(Relationship::Sibling).unwrap(), json!("SIBLING"));
        assert_eq!(p.gender, Gender::Female);
    }

    #[test]
    fn test_unknown_codes_label_as_is() {
        let mut raw = serde_json::to_value(profile()).unwrap();
        raw["relationship"] = json!("GUARDIAN");
        raw["gender"] = json!("NON_BINARY");
        let p: PatientProfile = serde_json::from_value(raw).unwrap();
        assert_eq!(p.relationship, Relationship::Unknown("GUARDIAN".to_string()));
        assert!(!p.gender.is_known());

        let json = serde_json::to_value(PatientProfileView::new(p, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())).unwrap();
        assert_eq!(json["relationship"], "GUARDIAN");
        assert_eq!(json["relationshipLabel"], "GUARDIAN");
        assert_eq!(json["genderLabel"], "NON_BINARY");
    }

    #[test]
    fn test_age_and_bmi() {
        let p = profile();
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), 33);
        assert_eq!(p.age_on(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), 34);
        assert_eq!(p.bmi(), Some(22.0));

        let mut no_height = p.clone();
        no_height.height_cm = None;
        assert_eq!(no_height.bmi(), None);
    }

    #[test]
    fn test_view_labels() {
        let view = PatientProfileView::new(profile(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["relationshipLabel"], "Myself");
        assert_eq!(json["genderLabel"], "Female");
        assert_eq!(json["fullName"], "Jane Doe");
        assert_eq!(json["age"], 33);
    }

    #[test]
    fn test_search_query_string() {
        let query = PatientSearchQuery {
            search: Some("Nguyen Van".to_string()),
            page: Some(2),
            limit: None,
        };
        assert_eq!(query.to_query_string(), "search=Nguyen%20Van&page=2&limit=20");
    }
}
