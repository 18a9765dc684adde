use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;

use crate::jwt::sign_hs256;

pub struct TestConfig {
    pub jwt_secret: String,
    pub backend_api_url: String,
    pub backend_api_key: String,
    pub chat_api_key: String,
    pub chat_api_secret: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            backend_api_url: "http://localhost:8080".to_string(),
            backend_api_key: "test-api-key".to_string(),
            chat_api_key: "test-chat-key".to_string(),
            chat_api_secret: "test-chat-secret".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_backend(url: impl Into<String>) -> Self {
        Self {
            backend_api_url: url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            backend_api_url: self.backend_api_url.clone(),
            backend_api_key: self.backend_api_key.clone(),
            jwt_secret: self.jwt_secret.clone(),
            chat_api_key: self.chat_api_key.clone(),
            chat_api_secret: self.chat_api_secret.clone(),
            reschedule_cutoff_hours: shared_config::DEFAULT_RESCHEDULE_CUTOFF_HOURS,
            port: shared_config::DEFAULT_PORT,
        }
    }
}

pub struct TestUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl Default for TestUser {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: "patient".to_string(),
        }
    }
}

impl TestUser {
    pub fn new(email: &str, role: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            role: role.to_string(),
        }
    }

    pub fn doctor(email: &str) -> Self {
        Self::new(email, "doctor")
    }

    pub fn patient(email: &str) -> Self {
        Self::new(email, "patient")
    }

    pub fn receptionist(email: &str) -> Self {
        Self::new(email, "receptionist")
    }

    pub fn admin(email: &str) -> Self {
        Self::new(email, "admin")
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            email: Some(self.email.clone()),
            role: Some(self.role.clone()),
            metadata: None,
            created_at: Some(Utc::now()),
        }
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(user: &TestUser, secret: &str, exp_hours: Option<i64>) -> String {
        let now = Utc::now();
        let exp = now + Duration::hours(exp_hours.unwrap_or(24));

        let payload = json!({
            "sub": user.id,
            "email": user.email,
            "role": user.role,
            "iat": now.timestamp(),
            "exp": exp.timestamp()
        });

        sign_hs256(&payload, secret).expect("test secret is not empty")
    }

    pub fn create_expired_token(user: &TestUser, secret: &str) -> String {
        Self::create_test_token(user, secret, Some(-1))
    }

    pub fn create_invalid_signature_token(user: &TestUser) -> String {
        Self::create_test_token(user, "wrong-secret", Some(24))
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(user: &TestUser, config: &AppConfig) -> String {
        format!("Bearer {}", Self::create_test_token(user, &config.jwt_secret, Some(24)))
    }
}

/// Canned upstream payloads, in the backend's camelCase wire format.
pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn appointment_response(
        id: &str,
        patient_id: &str,
        doctor_id: &str,
        start_time: DateTime<Utc>,
        status: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "patientId": patient_id,
            "doctorId": doctor_id,
            "clinicId": "clinic-1",
            "serviceId": "service-1",
            "startTime": start_time.to_rfc3339(),
            "endTime": (start_time + Duration::minutes(30)).to_rfc3339(),
            "status": status,
            "notes": null,
            "billingId": "bill-1",
            "price": 300000.0
        })
    }

    pub fn slot_response(start_time: DateTime<Utc>, minutes: i64) -> serde_json::Value {
        json!({
            "startTime": start_time.to_rfc3339(),
            "endTime": (start_time + Duration::minutes(minutes)).to_rfc3339()
        })
    }

    pub fn patient_profile_response(id: &str, user_id: &str, relationship: &str) -> serde_json::Value {
        json!({
            "id": id,
            "userId": user_id,
            "fullName": "Test Patient",
            "dateOfBirth": "1990-01-01",
            "gender": "FEMALE",
            "phone": "0901234567",
            "relationship": relationship,
            "heightCm": null,
            "weightKg": null,
            "bloodType": null,
            "allergies": null
        })
    }

    pub fn promotion_response(id: &str, percent: f64, max_discount: Option<f64>) -> serde_json::Value {
        json!({
            "id": id,
            "code": "WELCOME10",
            "name": "Welcome offer",
            "discountPercent": percent,
            "maxDiscountAmount": max_discount,
            "startDate": (Utc::now() - Duration::days(1)).to_rfc3339(),
            "endDate": (Utc::now() + Duration::days(30)).to_rfc3339(),
            "status": "ACTIVE"
        })
    }

    pub fn voucher_response(id: &str, user_id: &str, promotion: serde_json::Value) -> serde_json::Value {
        json!({
            "id": id,
            "userId": user_id,
            "promotion": promotion,
            "isUsed": false,
            "usedAt": null
        })
    }

    pub fn clinic_response(id: &str, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "address": "1 Main Street",
            "phone": "0281234567",
            "status": "ACTIVE"
        })
    }

    pub fn question_response(id: &str, content: &str, tag_ids: &[&str]) -> serde_json::Value {
        json!({ "id": id, "content": content, "tagIds": tag_ids, "status": "ACTIVE" })
    }

    pub fn list_response(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
        json!({ "items": items, "total": total })
    }

    pub fn error_response(message: &str, status_code: u16) -> serde_json::Value {
        json!({
            "statusCode": status_code,
            "message": message
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_creation() {
        let config = TestConfig::default();
        let app_config = config.to_app_config();

        assert_eq!(app_config.backend_api_url, "http://localhost:8080");
        assert_eq!(app_config.backend_api_key, "test-api-key");
        assert!(!app_config.jwt_secret.is_empty());
        assert!(app_config.is_chat_configured());
    }

    #[test]
    fn test_user_creation() {
        let user = TestUser::doctor("doc@example.com");
        assert_eq!(user.email, "doc@example.com");
        assert_eq!(user.role, "doctor");

        let user_model = user.to_user();
        assert_eq!(user_model.email, Some(user.email.clone()));
        assert_eq!(user_model.role, Some(user.role.clone()));
        assert_eq!(user_model.id, user.id);
    }

    #[test]
    fn test_jwt_token_creation() {
        let user = TestUser::default();
        let token = JwtTestUtils::create_test_token(&user, "test-secret", Some(1));

        assert_eq!(token.split('.').count(), 3);
    }
}
