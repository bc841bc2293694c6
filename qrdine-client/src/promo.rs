//! Promotion pre-check
//!
//! Optimistic client-side validation of a promo code before the order is
//! submitted. The backend re-validates at order creation and remains the
//! authority; this gate exists so the customer hears "minimum order is
//! 100,000" before the round trip, not after.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use shared::Promotion;
use thiserror::Error;

const STATUS_ACTIVE: &str = "ACTIVE";

/// Client-side promotion rejection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoError {
    #[error("promotion code {code} does not exist")]
    NotFound { code: String },

    #[error("this promotion code is not active")]
    NotActive,

    #[error("this promotion code is not valid yet")]
    NotStarted,

    #[error("this promotion code has expired")]
    Expired,

    #[error("this promotion code has been fully redeemed")]
    Exhausted,

    #[error("order total {actual} is below the minimum {required} for this code")]
    MinOrderNotMet { required: i64, actual: i64 },
}

/// Validate one promotion against the current cart total.
pub fn validate_promotion(promo: &Promotion, cart_total: i64) -> Result<(), PromoError> {
    if promo.status != STATUS_ACTIVE {
        return Err(PromoError::NotActive);
    }

    let now = Utc::now().naive_utc();
    // backend-owned date strings; an unparseable bound is skipped rather
    // than failing the whole check, the server still enforces it
    if let Some(start) = parse_bound(&promo.start_date, false) {
        if now < start {
            return Err(PromoError::NotStarted);
        }
    }
    if let Some(end) = parse_bound(&promo.end_date, true) {
        if now > end {
            return Err(PromoError::Expired);
        }
    }

    if promo.remaining_count <= 0 {
        return Err(PromoError::Exhausted);
    }

    if cart_total < promo.min_order_amount {
        return Err(PromoError::MinOrderNotMet {
            required: promo.min_order_amount,
            actual: cart_total,
        });
    }

    Ok(())
}

/// Look a code up in the active list and validate it.
pub fn find_and_validate<'a>(
    promotions: &'a [Promotion],
    code: &str,
    cart_total: i64,
) -> Result<&'a Promotion, PromoError> {
    let promo = promotions
        .iter()
        .find(|p| p.code.eq_ignore_ascii_case(code))
        .ok_or_else(|| PromoError::NotFound {
            code: code.to_string(),
        })?;
    validate_promotion(promo, cart_total)?;
    Ok(promo)
}

/// Parse a date bound, accepting RFC 3339, a bare datetime, or a bare
/// date. Date-only end bounds are inclusive through end of day.
fn parse_bound(raw: &str, end_of_day: bool) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promo() -> Promotion {
        Promotion {
            promotion_id: 1,
            code: "GIAM10".into(),
            promotion_type: "PERCENTAGE".into(),
            discount_percentage: 10,
            start_date: "2000-01-01".into(),
            end_date: "2099-12-31".into(),
            product_id: None,
            product_name: None,
            category_id: None,
            category_name: None,
            total_quantity: 100,
            used_count: 10,
            remaining_count: 90,
            min_order_amount: 100_000,
            status: STATUS_ACTIVE.into(),
            created_at: None,
        }
    }

    #[test]
    fn test_valid_promo_accepted() {
        assert_eq!(validate_promotion(&promo(), 120_000), Ok(()));
    }

    #[test]
    fn test_min_order_rejected_with_specific_error() {
        let err = validate_promotion(&promo(), 80_000).unwrap_err();
        assert_eq!(
            err,
            PromoError::MinOrderNotMet {
                required: 100_000,
                actual: 80_000
            }
        );
        // the message names the required amount, not a generic failure
        assert!(err.to_string().contains("100000"));
    }

    #[test]
    fn test_inactive_status_rejected() {
        let mut p = promo();
        p.status = "DISABLED".into();
        assert_eq!(validate_promotion(&p, 120_000), Err(PromoError::NotActive));
    }

    #[test]
    fn test_exhausted_rejected() {
        let mut p = promo();
        p.remaining_count = 0;
        assert_eq!(validate_promotion(&p, 120_000), Err(PromoError::Exhausted));
    }

    #[test]
    fn test_expired_window_rejected() {
        let mut p = promo();
        p.end_date = "2001-01-01".into();
        assert_eq!(validate_promotion(&p, 120_000), Err(PromoError::Expired));
    }

    #[test]
    fn test_future_window_rejected() {
        let mut p = promo();
        p.start_date = "2098-01-01".into();
        assert_eq!(validate_promotion(&p, 120_000), Err(PromoError::NotStarted));
    }

    #[test]
    fn test_unparseable_dates_skipped() {
        let mut p = promo();
        p.start_date = "whenever".into();
        p.end_date = "later".into();
        assert_eq!(validate_promotion(&p, 120_000), Ok(()));
    }

    #[test]
    fn test_find_and_validate() {
        let promos = vec![promo()];
        assert!(find_and_validate(&promos, "giam10", 120_000).is_ok());
        assert_eq!(
            find_and_validate(&promos, "NOPE", 120_000).unwrap_err(),
            PromoError::NotFound {
                code: "NOPE".into()
            }
        );
    }
}
