//! # Coupon Command
//!
//! Looks a code up in the configured coupon book after a simulated round
//! trip to the coupon service.
//!
//! The result is informational: the discount is computed against the
//! current subtotal for display, but cart totals are never modified.

use serde::Serialize;
use tracing::{debug, info};

use crate::state::{CartStore, ConfigState};
use lounge_core::validation::validate_coupon_code;
use lounge_core::Money;

const REJECTED_MESSAGE: &str = "Invalid or expired coupon code";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u8>,
    /// What the coupon would take off the current subtotal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,
}

impl CouponResult {
    fn rejected() -> Self {
        CouponResult {
            success: false,
            message: REJECTED_MESSAGE.to_string(),
            discount_percent: None,
            discount: None,
        }
    }
}

/// Applies a coupon code.
///
/// Never fails: blank, malformed and unknown codes all produce the same
/// `success = false` result so the response does not reveal which codes
/// exist.
pub async fn apply_coupon(config: &ConfigState, cart: &CartStore, code: &str) -> CouponResult {
    debug!("apply_coupon command");

    tokio::time::sleep(config.coupon_delay).await;

    let Ok(code) = validate_coupon_code(code) else {
        return CouponResult::rejected();
    };

    let Some(percent) = config.coupon_percent(&code) else {
        info!(code = %code, "Coupon rejected");
        return CouponResult::rejected();
    };

    let subtotal = cart.with_cart(|c| c.subtotal()).await;
    let discount = subtotal.percentage(u32::from(percent) * 100);

    info!(code = %code, percent, "Coupon accepted");

    CouponResult {
        success: true,
        message: format!("Coupon {} applied: {}% off", code, percent),
        discount_percent: Some(percent),
        discount: Some(discount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lounge_core::Product;
    use lounge_db::{Database, DbConfig};
    use std::time::Duration;

    async fn setup() -> (ConfigState, CartStore) {
        let config = ConfigState {
            coupon_delay: Duration::ZERO,
            ..ConfigState::default()
        };
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let cart = CartStore::load(&db).await.unwrap();
        cart.with_cart_mut(|c| {
            c.add_item(&Product::new("wine", "House Wine", Money::from_cents(2500)), 2, "")
                .map(|_| ())
        })
        .await
        .unwrap();
        (config, cart)
    }

    #[tokio::test]
    async fn test_known_code_reports_discount_only() {
        let (config, cart) = setup().await;

        let result = apply_coupon(&config, &cart, " welcome10 ").await;
        assert!(result.success);
        assert_eq!(result.discount_percent, Some(10));
        assert_eq!(result.discount, Some(Money::from_cents(500)));

        assert_eq!(cart.with_cart(|c| c.subtotal()).await.cents(), 5000);
        assert_eq!(cart.with_cart(|c| c.total()).await.cents(), 5500);
    }

    #[tokio::test]
    async fn test_failures_look_the_same() {
        let (config, cart) = setup().await;

        for code in ["", "   ", "NOPE", "bad code!"] {
            let result = apply_coupon(&config, &cart, code).await;
            assert_eq!(result, CouponResult::rejected(), "code {:?}", code);
        }
    }

    #[tokio::test]
    async fn test_round_trip_is_simulated() {
        let (_, cart) = setup().await;
        let config = ConfigState {
            coupon_delay: Duration::from_millis(30),
            ..ConfigState::default()
        };

        let started = tokio::time::Instant::now();
        let result = apply_coupon(&config, &cart, "HAPPYHOUR").await;
        assert!(result.success);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
