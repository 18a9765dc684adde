// libs/promotion-cell/src/services/discount.rs
use chrono::{DateTime, Utc};

use crate::models::{PriceQuote, PromotionError, Voucher};

fn ensure_amount(value: f64, err: PromotionError) -> Result<f64, PromotionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(err)
    }
}

/// `min(price * percent / 100, cap)`; no cap means uncapped.
pub fn compute_discount(price: f64, percent: f64, max_discount: Option<f64>) -> Result<f64, PromotionError> {
    let price = ensure_amount(price, PromotionError::InvalidPrice)?;
    if !(0.0..=100.0).contains(&percent) {
        return Err(PromotionError::InvalidPercent);
    }

    let raw = price * percent / 100.0;
    match max_discount {
        Some(cap) => Ok(raw.min(ensure_amount(cap, PromotionError::InvalidCap)?)),
        None => Ok(raw),
    }
}

pub fn compute_final_price(price: f64, discount: f64) -> f64 {
    (price - discount).max(0.0)
}

/// Checks the promotion values an admin submits.
pub fn validate_terms(percent: f64, max_discount: Option<f64>) -> Result<(), PromotionError> {
    compute_discount(0.0, percent, max_discount).map(|_| ())
}

pub fn voucher_discount(price: f64, voucher: &Voucher) -> Result<f64, PromotionError> {
    compute_discount(
        price,
        voucher.promotion.discount_percent,
        voucher.promotion.max_discount_amount,
    )
}

pub fn quote(price: f64, voucher: Option<&Voucher>, now: DateTime<Utc>) -> Result<PriceQuote, PromotionError> {
    let price = ensure_amount(price, PromotionError::InvalidPrice)?;

    let Some(voucher) = voucher else {
        return Ok(PriceQuote {
            original_price: price,
            discount: 0.0,
            final_price: price,
            voucher_id: None,
        });
    };

    voucher.applicability(now).map_err(PromotionError::NotApplicable)?;
    let discount = voucher_discount(price, voucher)?;

    Ok(PriceQuote {
        original_price: price,
        discount,
        final_price: compute_final_price(price, discount),
        voucher_id: Some(voucher.id.clone()),
    })
}

/// The applicable voucher giving the largest discount. Ties go to the one
/// that expires first.
pub fn best_voucher<'a>(price: f64, vouchers: &'a [Voucher], now: DateTime<Utc>) -> Option<&'a Voucher> {
    vouchers
        .iter()
        .filter(|v| v.is_applicable(now))
        .filter_map(|v| voucher_discount(price, v).ok().map(|d| (d, v)))
        .fold(None, |best: Option<(f64, &Voucher)>, (discount, voucher)| match best {
            Some((best_discount, current))
                if best_discount > discount
                    || (best_discount == discount
                        && current.promotion.end_date <= voucher.promotion.end_date) =>
            {
                Some((best_discount, current))
            }
            _ => Some((discount, voucher)),
        })
        .map(|(_, voucher)| voucher)
}
