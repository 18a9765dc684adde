// libs/patient-cell/src/services/patient.rs
use chrono::NaiveDate;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::BackendClient;
use shared_models::page::{ListResponse, Page};
use shared_utils::validation::is_valid_phone;

use crate::models::{
    CreateProfileRequest, Gender, PatientError, PatientProfile, PatientSearchQuery, Relationship,
    UpdateProfileRequest,
};

const BLOOD_TYPES: [&str; 8] = ["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

pub struct PatientService {
    backend: BackendClient,
}

impl PatientService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    /// Profiles owned by the account the token belongs to.
    pub async fn list_my_profiles(&self, auth_token: &str) -> Result<Vec<PatientProfile>, PatientError> {
        self.backend
            .get("/patient-profiles/me", auth_token)
            .await
            .map_err(|e| PatientError::backend(e, "Could not load patient profiles"))
    }

    pub async fn get_profile(&self, profile_id: &str, auth_token: &str) -> Result<PatientProfile, PatientError> {
        debug!("Fetching patient profile: {}", profile_id);

        let path = format!("/patient-profiles/{}", urlencoding::encode(profile_id));
        self.backend.get(&path, auth_token).await.map_err(|e| {
            if e.is_not_found() {
                PatientError::NotFound
            } else {
                PatientError::backend(e, "Could not load patient profile")
            }
        })
    }

    pub async fn create_profile(
        &self,
        request: &CreateProfileRequest,
        auth_token: &str,
        today: NaiveDate,
    ) -> Result<PatientProfile, PatientError> {
        ensure_known_codes(Some(&request.gender), Some(&request.relationship))?;
        validate_details(
            Some(&request.full_name),
            Some(request.date_of_birth),
            request.phone.as_deref(),
            request.height_cm,
            request.weight_kg,
            request.blood_type.as_deref(),
            today,
        )?;

        if request.relationship == Relationship::Myself {
            let existing = self.list_my_profiles(auth_token).await?;
            ensure_single_self(&existing, None)?;
        }

        let body = serde_json::to_value(request).map_err(|e| PatientError::ValidationError(e.to_string()))?;
        let created: PatientProfile = self
            .backend
            .post("/patient-profiles", Some(auth_token), body)
            .await
            .map_err(|e| PatientError::backend(e, "Could not create patient profile"))?;

        info!("Patient profile {} created for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn update_profile(
        &self,
        profile: &PatientProfile,
        request: &UpdateProfileRequest,
        auth_token: &str,
        today: NaiveDate,
    ) -> Result<PatientProfile, PatientError> {
        ensure_known_codes(request.gender.as_ref(), request.relationship.as_ref())?;
        validate_details(
            request.full_name.as_deref(),
            request.date_of_birth,
            request.phone.as_deref(),
            request.height_cm,
            request.weight_kg,
            request.blood_type.as_deref(),
            today,
        )?;

        if request.relationship == Some(Relationship::Myself) && profile.relationship != Relationship::Myself {
            let existing = self.list_my_profiles(auth_token).await?;
            ensure_single_self(&existing, Some(&profile.id))?;
        }

        let body = serde_json::to_value(request).map_err(|e| PatientError::ValidationError(e.to_string()))?;
        let path = format!("/patient-profiles/{}", urlencoding::encode(&profile.id));

        self.backend
            .put(&path, auth_token, body)
            .await
            .map_err(|e| PatientError::backend(e, "Could not update patient profile"))
    }

    pub async fn delete_profile(&self, profile_id: &str, auth_token: &str) -> Result<(), PatientError> {
        let path = format!("/patient-profiles/{}", urlencoding::encode(profile_id));
        self.backend
            .delete(&path, auth_token)
            .await
            .map_err(|e| PatientError::backend(e, "Could not delete patient profile"))?;

        info!("Patient profile {} deleted", profile_id);
        Ok(())
    }

    pub async fn search_profiles(
        &self,
        query: &PatientSearchQuery,
        auth_token: &str,
    ) -> Result<Page<PatientProfile>, PatientError> {
        debug!("Searching patient profiles: {:?}", query);

        let path = format!("/patient-profiles?{}", query.to_query_string());
        let list: ListResponse<PatientProfile> = self
            .backend
            .get(&path, auth_token)
            .await
            .map_err(|e| PatientError::backend(e, "Could not search patients"))?;

        Ok(list.into_page(&query.page_query()))
    }
}

/// One `SELF` profile per account. `except` skips the profile being edited.
pub fn ensure_single_self(existing: &[PatientProfile], except: Option<&str>) -> Result<(), PatientError> {
    let taken = existing
        .iter()
        .filter(|p| Some(p.id.as_str()) != except)
        .any(|p| p.relationship == Relationship::Myself);

    if taken {
        return Err(PatientError::SelfProfileExists);
    }
    Ok(())
}

/// Unknown codes are accepted from the backend for display, never from clients.
pub fn ensure_known_codes(
    gender: Option<&Gender>,
    relationship: Option<&Relationship>,
) -> Result<(), PatientError> {
    if let Some(gender) = gender.filter(|g| !g.is_known()) {
        return Err(PatientError::ValidationError(format!("Unknown gender: {}", gender.code())));
    }
    if let Some(relationship) = relationship.filter(|r| !r.is_known()) {
        return Err(PatientError::ValidationError(format!(
            "Unknown relationship: {}",
            relationship.code()
        )));
    }
    Ok(())
}

/// Checks whichever fields are present.
pub fn validate_details(
    full_name: Option<&str>,
    date_of_birth: Option<NaiveDate>,
    phone: Option<&str>,
    height_cm: Option<f64>,
    weight_kg: Option<f64>,
    blood_type: Option<&str>,
    today: NaiveDate,
) -> Result<(), PatientError> {
    if full_name.is_some_and(|name| name.trim().is_empty()) {
        return Err(PatientError::ValidationError("Full name is required".to_string()));
    }
    if date_of_birth.is_some_and(|dob| dob > today) {
        return Err(PatientError::InvalidDateOfBirth);
    }
    if let Some(phone) = phone.filter(|p| !p.trim().is_empty()) {
        if !is_valid_phone(phone) {
            return Err(PatientError::ValidationError("Phone number is invalid".to_string()));
        }
    }
    for (field, value) in [("Height", height_cm), ("Weight", weight_kg)] {
        if value.is_some_and(|v| !v.is_finite() || v <= 0.0) {
            return Err(PatientError::ValidationError(format!("{} must be a positive number", field)));
        }
    }
    if let Some(blood_type) = blood_type {
        if !BLOOD_TYPES.contains(&blood_type.trim().to_uppercase().as_str()) {
            return Err(PatientError::ValidationError(format!("Unknown blood type: {}", blood_type)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn profile(id: &str, relationship: Relationship) -> PatientProfile {
        PatientProfile {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            full_name: "Someone".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            gender: Gender::Other,
            phone: None,
            relationship,
            height_cm: None,
            weight_kg: None,
            blood_type: None,
            allergies: None,
        }
    }

    #[test]
    fn test_validate_details() {
        let dob = NaiveDate::from_ymd_opt(1990, 1, 1);
        assert!(validate_details(Some("Jane"), dob, Some("090 123 4567"), Some(160.0), Some(55.0), Some("ab+"), today()).is_ok());
        assert!(validate_details(None, None, None, None, None, None, today()).is_ok());

        assert_matches!(
            validate_details(Some("  "), dob, None, None, None, None, today()),
            Err(PatientError::ValidationError(_))
        );
        assert_matches!(
            validate_details(Some("Jane"), NaiveDate::from_ymd_opt(2024, 5, 2), None, None, None, None, today()),
            Err(PatientError::InvalidDateOfBirth)
        );
        assert_matches!(
            validate_details(None, None, Some("12ab"), None, None, None, today()),
            Err(PatientError::ValidationError(_))
        );
        assert_matches!(
            validate_details(None, None, None, Some(0.0), None, None, today()),
            Err(PatientError::ValidationError(_))
        );
        assert_matches!(
            validate_details(None, None, None, None, None, Some("C+"), today()),
            Err(PatientError::ValidationError(_))
        );
    }

    #[test]
    fn test_client_codes_must_be_known() {
        assert!(ensure_known_codes(Some(&Gender::Female), Some(&Relationship::Child)).is_ok());
        assert!(ensure_known_codes(None, None).is_ok());
        assert_matches!(
            ensure_known_codes(None, Some(&Relationship::Unknown("GUARDIAN".to_string()))),
            Err(PatientError::ValidationError(msg)) if msg == "Unknown relationship: GUARDIAN"
        );
    }

    #[test]
    fn test_single_self_profile() {
        let existing = vec![profile("a", Relationship::Myself), profile("b", Relationship::Child)];

        assert_matches!(ensure_single_self(&existing, None), Err(PatientError::SelfProfileExists));
        assert!(ensure_single_self(&existing, Some("a")).is_ok());
        assert!(ensure_single_self(&existing[1..], None).is_ok());
    }
}
