// libs/promotion-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use shared_database::BackendError;
use shared_models::error::AppError;
use shared_models::record::RecordStatus;

// ==============================================================================
// PROMOTION MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub code: String,
    pub name: String,
    pub discount_percent: f64,
    /// Absent means the discount is not capped.
    pub max_discount_amount: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default)]
    pub status: RecordStatus,
}

impl Promotion {
    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.end_date
    }
}

/// A promotion assigned to one user (`UserPromotion` on the backend).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Voucher {
    pub id: String,
    pub user_id: String,
    pub promotion: Promotion,
    #[serde(default)]
    pub is_used: bool,
    pub used_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inapplicable {
    AlreadyUsed,
    PromotionInactive,
    NotStarted,
    Expired,
}

impl fmt::Display for Inapplicable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Inapplicable::AlreadyUsed => "voucher has already been used",
            Inapplicable::PromotionInactive => "promotion is no longer active",
            Inapplicable::NotStarted => "promotion has not started yet",
            Inapplicable::Expired => "promotion has expired",
        };
        f.write_str(text)
    }
}

impl Voucher {
    pub fn applicability(&self, now: DateTime<Utc>) -> Result<(), Inapplicable> {
        if self.is_used {
            return Err(Inapplicable::AlreadyUsed);
        }
        if self.promotion.status != RecordStatus::Active {
            return Err(Inapplicable::PromotionInactive);
        }
        if now < self.promotion.start_date {
            return Err(Inapplicable::NotStarted);
        }
        if self.promotion.has_ended(now) {
            return Err(Inapplicable::Expired);
        }
        Ok(())
    }

    pub fn is_applicable(&self, now: DateTime<Utc>) -> bool {
        self.applicability(now).is_ok()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuote {
    pub original_price: f64,
    pub discount: f64,
    pub final_price: f64,
    pub voucher_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherView {
    #[serde(flatten)]
    pub voucher: Voucher,
    pub applicable: bool,
    pub reason: Option<String>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePromotionRequest {
    pub code: String,
    pub name: String,
    pub discount_percent: f64,
    pub max_discount_amount: Option<f64>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePromotionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<f64>,
    /// Absent keeps the current cap, `null` removes it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_or_null"
    )]
    pub max_discount_amount: Option<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RecordStatus>,
}

fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignPromotionRequest {
    pub user_id: String,
}

/// Without `voucherId` the caller's best applicable voucher is used.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub price: f64,
    pub voucher_id: Option<String>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PromotionError {
    #[error("Promotion not found")]
    NotFound,

    #[error("Voucher not found")]
    VoucherNotFound,

    #[error("Price must be a non-negative amount")]
    InvalidPrice,

    #[error("Discount percent must be between 0 and 100")]
    InvalidPercent,

    #[error("Maximum discount amount must be a non-negative amount")]
    InvalidCap,

    #[error("Promotion end date must not be before its start date")]
    InvalidDateRange,

    #[error("Voucher cannot be applied: {0}")]
    NotApplicable(Inapplicable),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{fallback}")]
    Backend {
        #[source]
        source: BackendError,
        fallback: &'static str,
    },
}

impl PromotionError {
    pub fn backend(source: BackendError, fallback: &'static str) -> Self {
        PromotionError::Backend { source, fallback }
    }
}

impl From<PromotionError> for AppError {
    fn from(e: PromotionError) -> Self {
        match e {
            PromotionError::NotFound | PromotionError::VoucherNotFound => AppError::NotFound(e.to_string()),
            PromotionError::InvalidPrice
            | PromotionError::InvalidPercent
            | PromotionError::InvalidCap
            | PromotionError::InvalidDateRange => AppError::ValidationError(e.to_string()),
            PromotionError::NotApplicable(_) => AppError::BadRequest(e.to_string()),
            PromotionError::ValidationError(msg) => AppError::ValidationError(msg),
            PromotionError::Backend { source, fallback } => source.into_app_error(fallback),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn voucher(now: DateTime<Utc>) -> Voucher {
        Voucher {
            id: "v-1".to_string(),
            user_id: "u-1".to_string(),
            promotion: Promotion {
                id: "p-1".to_string(),
                code: "SPRING".to_string(),
                name: "Spring".to_string(),
                discount_percent: 10.0,
                max_discount_amount: None,
                start_date: now - Duration::days(1),
                end_date: now + Duration::days(1),
                status: RecordStatus::Active,
            },
            is_used: false,
            used_at: None,
        }
    }

    #[test]
    fn test_applicability_rules() {
        let now = Utc::now();
        assert!(voucher(now).is_applicable(now));

        let mut used = voucher(now);
        used.is_used = true;
        assert_eq!(used.applicability(now), Err(Inapplicable::AlreadyUsed));

        let mut inactive = voucher(now);
        inactive.promotion.status = RecordStatus::Inactive;
        assert_eq!(inactive.applicability(now), Err(Inapplicable::PromotionInactive));

        let v = voucher(now);
        assert_eq!(v.applicability(now - Duration::days(2)), Err(Inapplicable::NotStarted));
        assert_eq!(v.applicability(now + Duration::days(2)), Err(Inapplicable::Expired));
        assert!(v.is_applicable(v.promotion.end_date));
    }

    #[test]
    fn test_voucher_wire_format() {
        let voucher: Voucher = serde_json::from_value(json!({
            "id": "v-9",
            "userId": "u-9",
            "promotion": {
                "id": "p-9",
                "code": "NOCAP",
                "name": "No cap",
                "discountPercent": 15,
                "startDate": "2024-01-01T00:00:00Z",
                "endDate": "2024-12-31T23:59:59Z",
                "status": "ACTIVE"
            }
        }))
        .unwrap();

        assert!(!voucher.is_used);
        assert_eq!(voucher.promotion.max_discount_amount, None);
        assert_eq!(voucher.promotion.discount_percent, 15.0);
    }

    #[test]
    fn test_update_request_cap_states() {
        let keep: UpdatePromotionRequest = serde_json::from_value(json!({ "name": "Renamed" })).unwrap();
        assert_eq!(keep.max_discount_amount, None);
        assert_eq!(serde_json::to_value(&keep).unwrap(), json!({ "name": "Renamed" }));

        let cleared: UpdatePromotionRequest =
            serde_json::from_value(json!({ "maxDiscountAmount": null })).unwrap();
        assert_eq!(cleared.max_discount_amount, Some(None));
        assert_eq!(serde_json::to_value(&cleared).unwrap(), json!({ "maxDiscountAmount": null }));

        let capped: UpdatePromotionRequest =
            serde_json::from_value(json!({ "maxDiscountAmount": 50 })).unwrap();
        assert_eq!(capped.max_discount_amount, Some(Some(50.0)));
    }

    #[test]
    fn test_error_mapping() {
        let err: AppError = PromotionError::NotApplicable(Inapplicable::Expired).into();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let err: AppError = PromotionError::VoucherNotFound.into();
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }
}
