// libs/promotion-cell/src/services/promotion.rs
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::BackendClient;
use shared_models::page::{ListResponse, Page};
use shared_models::record::{ListFilter, RecordStatus};

use crate::models::{
    CreatePromotionRequest, Inapplicable, PriceQuote, Promotion, PromotionError, QuoteRequest,
    UpdatePromotionRequest, Voucher,
};
use crate::services::discount::{best_voucher, quote, validate_terms};

pub struct PromotionService {
    backend: BackendClient,
}

impl PromotionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            backend: BackendClient::new(config),
        }
    }

    pub async fn list_promotions(
        &self,
        filter: &ListFilter,
        auth_token: &str,
    ) -> Result<Page<Promotion>, PromotionError> {
        debug!("Listing promotions with filters: {:?}", filter);

        let path = format!("/promotions?{}", filter.to_query_string());
        let list: ListResponse<Promotion> = self
            .backend
            .get(&path, auth_token)
            .await
            .map_err(|e| PromotionError::backend(e, "Could not load promotions"))?;

        Ok(list.into_page(&filter.page_query()))
    }

    pub async fn get_promotion(&self, promotion_id: &str, auth_token: &str) -> Result<Promotion, PromotionError> {
        let path = format!("/promotions/{}", urlencoding::encode(promotion_id));
        self.backend.get(&path, auth_token).await.map_err(|e| {
            if e.is_not_found() {
                PromotionError::NotFound
            } else {
                PromotionError::backend(e, "Could not load promotion")
            }
        })
    }

    pub async fn create_promotion(
        &self,
        request: &CreatePromotionRequest,
        auth_token: &str,
    ) -> Result<Promotion, PromotionError> {
        validate_promotion(
            &request.code,
            &request.name,
            request.discount_percent,
            request.max_discount_amount,
            request.start_date,
            request.end_date,
        )?;

        let created: Promotion = self
            .backend
            .post(
                "/promotions",
                Some(auth_token),
                json!({
                    "code": request.code.trim().to_uppercase(),
                    "name": request.name.trim(),
                    "discountPercent": request.discount_percent,
                    "maxDiscountAmount": request.max_discount_amount,
                    "startDate": request.start_date.to_rfc3339(),
                    "endDate": request.end_date.to_rfc3339(),
                    "status": request.status.unwrap_or_default(),
                }),
            )
            .await
            .map_err(|e| PromotionError::backend(e, "Could not create promotion"))?;

        info!("Promotion {} created with code {}", created.id, created.code);
        Ok(created)
    }

    /// Partial update; the merged result must still be a valid promotion.
    pub async fn update_promotion(
        &self,
        promotion_id: &str,
        request: &UpdatePromotionRequest,
        auth_token: &str,
    ) -> Result<Promotion, PromotionError> {
        let current = self.get_promotion(promotion_id, auth_token).await?;

        validate_promotion(
            request.code.as_deref().unwrap_or(&current.code),
            request.name.as_deref().unwrap_or(&current.name),
            request.discount_percent.unwrap_or(current.discount_percent),
            match request.max_discount_amount {
                Some(cap) => cap,
                None => current.max_discount_amount,
            },
            request.start_date.unwrap_or(current.start_date),
            request.end_date.unwrap_or(current.end_date),
        )?;

        let body = serde_json::to_value(request)
            .map_err(|e| PromotionError::ValidationError(e.to_string()))?;
        let path = format!("/promotions/{}", urlencoding::encode(promotion_id));

        self.backend
            .put(&path, auth_token, body)
            .await
            .map_err(|e| PromotionError::backend(e, "Could not update promotion"))
    }

    pub async fn delete_promotion(&self, promotion_id: &str, auth_token: &str) -> Result<(), PromotionError> {
        let path = format!("/promotions/{}", urlencoding::encode(promotion_id));
        self.backend.delete(&path, auth_token).await.map_err(|e| {
            if e.is_not_found() {
                PromotionError::NotFound
            } else {
                PromotionError::backend(e, "Could not delete promotion")
            }
        })?;

        info!("Promotion {} deleted", promotion_id);
        Ok(())
    }

    pub async fn assign_to_user(
        &self,
        promotion_id: &str,
        user_id: &str,
        auth_token: &str,
    ) -> Result<Voucher, PromotionError> {
        if user_id.trim().is_empty() {
            return Err(PromotionError::ValidationError("userId is required".to_string()));
        }

        let promotion = self.get_promotion(promotion_id, auth_token).await?;
        if promotion.status != RecordStatus::Active {
            return Err(PromotionError::NotApplicable(Inapplicable::PromotionInactive));
        }
        if promotion.has_ended(Utc::now()) {
            return Err(PromotionError::NotApplicable(Inapplicable::Expired));
        }

        let path = format!("/promotions/{}/assign", urlencoding::encode(promotion_id));
        let voucher: Voucher = self
            .backend
            .post(&path, Some(auth_token), json!({ "userId": user_id }))
            .await
            .map_err(|e| PromotionError::backend(e, "Could not assign promotion"))?;

        info!("Promotion {} assigned to user {}", promotion_id, user_id);
        Ok(voucher)
    }

    /// Vouchers of the user the token belongs to.
    pub async fn list_my_vouchers(&self, auth_token: &str) -> Result<Vec<Voucher>, PromotionError> {
        self.backend
            .get("/user-promotions/me", auth_token)
            .await
            .map_err(|e| PromotionError::backend(e, "Could not load vouchers"))
    }

    pub async fn quote_price(
        &self,
        request: &QuoteRequest,
        auth_token: &str,
        now: DateTime<Utc>,
    ) -> Result<PriceQuote, PromotionError> {
        let vouchers = self.list_my_vouchers(auth_token).await?;

        let voucher = match &request.voucher_id {
            Some(id) => Some(
                vouchers
                    .iter()
                    .find(|v| &v.id == id)
                    .ok_or(PromotionError::VoucherNotFound)?,
            ),
            None => best_voucher(request.price, &vouchers, now),
        };

        quote(request.price, voucher, now)
    }
}

fn validate_promotion(
    code: &str,
    name: &str,
    percent: f64,
    max_discount: Option<f64>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), PromotionError> {
    if code.trim().is_empty() {
        return Err(PromotionError::ValidationError("code is required".to_string()));
    }
    if name.trim().is_empty() {
        return Err(PromotionError::ValidationError("name is required".to_string()));
    }
    validate_terms(percent, max_discount)?;
    if end < start {
        return Err(PromotionError::InvalidDateRange);
    }
    Ok(())
}
