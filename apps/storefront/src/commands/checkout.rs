//! # Checkout Command
//!
//! Turns the cart into an order.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Checkout                                        │
//! │                                                                         │
//! │  1. VALIDATE                                                           │
//! │     cart.validate() ──► issues? ──► CHECKOUT_ERROR listing every one   │
//! │                                                                         │
//! │  2. BUILD REQUEST                                                      │
//! │     OrderRequest::from_summary(summary, payment_method)                │
//! │                                                                         │
//! │  3. SUBMIT                                                             │
//! │     gateway.submit(&request) ──► failed? ──► error, cart untouched     │
//! │                                                                         │
//! │  4. CLEAR                                                              │
//! │     cart.clear() (persisted) ──► OrderReceipt { orderId, ... }         │
//! │     skipped if the cart changed while the order was in flight          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ErrorCode};
use crate::state::{CartStore, DbState};
use lounge_core::{OrderReceipt, OrderRequest, PaymentMethod};

/// Where orders are sent.
///
/// The storefront ships [`DbOrderGateway`]; a remote order service plugs in
/// by implementing this trait.
pub trait OrderGateway {
    /// Submits an order. `estimated_time` on the returned receipt is
    /// overwritten with the cart's own estimate.
    fn submit(
        &self,
        request: &OrderRequest,
    ) -> impl std::future::Future<Output = Result<OrderReceipt, ApiError>> + Send;
}

/// Records orders in the local `orders` outbox table.
#[derive(Debug, Clone)]
pub struct DbOrderGateway {
    db: DbState,
}

impl DbOrderGateway {
    pub fn new(db: DbState) -> Self {
        DbOrderGateway { db }
    }
}

impl OrderGateway for DbOrderGateway {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderReceipt, ApiError> {
        let record = self.db.inner().orders().insert(request, Utc::now()).await?;

        Ok(OrderReceipt {
            order_id: record.id,
            created_at: record.created_at,
            total: request.total,
            estimated_time: 0,
        })
    }
}

/// Validates the cart, submits it and clears it on success.
///
/// The cart is cleared only if it still matches what was submitted; edits
/// made while the gateway was busy are left in place.
///
/// ## Errors
/// - `CHECKOUT_ERROR` with one detail per problem when the cart is not
///   ready (empty, no table, inactive product, insufficient stock)
/// - whatever the gateway returns; the cart is kept so the user can retry
pub async fn checkout<G: OrderGateway>(
    cart: &CartStore,
    gateway: &G,
    payment_method: PaymentMethod,
) -> Result<OrderReceipt, ApiError> {
    debug!(payment = %payment_method, "checkout command");

    let submitted = cart.snapshot().await;
    let validation = submitted.validate();
    let summary = submitted.summary();

    if !validation.is_valid {
        info!(issues = validation.errors.len(), "Checkout blocked");
        return Err(ApiError::invalid_cart(&validation));
    }

    let request = OrderRequest::from_summary(&summary, payment_method);

    let mut receipt = match gateway.submit(&request).await {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!(error = %e, "Order submission failed; cart kept");
            return Err(ApiError::new(ErrorCode::CheckoutError, e.message).with_details(e.details));
        }
    };
    receipt.estimated_time = summary.estimated_time;

    let cleared = cart
        .with_cart_mut(|c| {
            if *c == submitted {
                c.clear();
                true
            } else {
                false
            }
        })
        .await;
    if !cleared {
        warn!(order_id = %receipt.order_id, "Cart changed during submission; not cleared");
    }

    info!(
        order_id = %receipt.order_id,
        table = ?summary.table_number,
        total_cents = receipt.total.cents(),
        "Order placed"
    );

    Ok(receipt)
}
