//! # Cart Commands
//!
//! Cart manipulation, table selection and "save for later".
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│  Table   │────►│  Order   │       │
//! │  │  Cart    │     │          │     │ selected │     │  placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │       ▲                │                                  │             │
//! │       │           add_to_cart                        checkout          │
//! │       │           increment / decrement             (checkout.rs)      │
//! │       │           update_item_notes                       │             │
//! │       │                │                                  │             │
//! │       └──── clear_cart ┴──────────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line arguments accept either the line id or the product id; a cart holds
//! at most one line per product, so both are unambiguous.

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{CartStore, MenuState, RestoreOutcome};
use lounge_core::{Cart, CartSummary, CartValidation, CoreError, QuantityChange, SavedCart};

/// Result of a quantity command: what happened plus the updated cart.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityResponse {
    pub change: QuantityChange,
    pub cart: CartSummary,
}

/// Line id for `key`, which may be a line id or a product id.
fn resolve_line(cart: &Cart, key: &str) -> Result<String, CoreError> {
    cart.item(key)
        .or_else(|| cart.item_for_product(key))
        .map(|item| item.id.clone())
        .ok_or_else(|| CoreError::CartItemNotFound(key.to_string()))
}

/// Current cart with totals.
pub async fn get_cart(cart: &CartStore) -> CartSummary {
    debug!("get_cart command");
    cart.with_cart(Cart::summary).await
}

/// Adds a menu product to the cart.
///
/// ## Behavior
/// - Product already in cart: quantity increases, notes replaced if given
/// - Product not in cart: added as new line with a frozen product copy
/// - Inactive products are refused here; stock is checked at checkout
pub async fn add_to_cart(
    menu: &MenuState,
    cart: &CartStore,
    product_id: &str,
    quantity: Option<i64>,
    notes: Option<&str>,
) -> Result<CartSummary, ApiError> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product_id, quantity, "add_to_cart command");

    let product = menu
        .find(product_id)
        .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

    if !product.is_active {
        return Err(ApiError::validation(format!(
            "{} is not available for ordering",
            product.name
        )));
    }

    let summary = cart
        .with_cart_mut(|c| {
            c.add_item(product, quantity, notes.unwrap_or(""))?;
            Ok::<CartSummary, CoreError>(c.summary())
        })
        .await?;

    Ok(summary)
}

/// Sets a line's quantity. Zero or less removes the line.
pub async fn update_cart_item(
    cart: &CartStore,
    item: &str,
    quantity: i64,
) -> Result<QuantityResponse, ApiError> {
    debug!(item = %item, quantity, "update_cart_item command");

    let response = cart
        .with_cart_mut(|c| {
            let line_id = resolve_line(c, item)?;
            let change = c.update_item_quantity(&line_id, quantity)?;
            Ok::<QuantityResponse, CoreError>(QuantityResponse {
                change,
                cart: c.summary(),
            })
        })
        .await?;

    Ok(response)
}

/// The "+" button. Returns `StockLimitReached` instead of failing when
/// tracked stock would be exceeded.
pub async fn increment_cart_item(cart: &CartStore, item: &str) -> Result<QuantityResponse, ApiError> {
    debug!(item = %item, "increment_cart_item command");

    let response = cart
        .with_cart_mut(|c| {
            let line_id = resolve_line(c, item)?;
            let change = c.increment_item(&line_id)?;
            Ok::<QuantityResponse, CoreError>(QuantityResponse {
                change,
                cart: c.summary(),
            })
        })
        .await?;

    if let QuantityChange::StockLimitReached { available } = response.change {
        info!(item = %item, available, "Increment refused: stock limit reached");
    }

    Ok(response)
}

/// The "-" button. Reaching zero removes the line.
pub async fn decrement_cart_item(cart: &CartStore, item: &str) -> Result<QuantityResponse, ApiError> {
    debug!(item = %item, "decrement_cart_item command");

    let response = cart
        .with_cart_mut(|c| {
            let line_id = resolve_line(c, item)?;
            let change = c.decrement_item(&line_id)?;
            Ok::<QuantityResponse, CoreError>(QuantityResponse {
                change,
                cart: c.summary(),
            })
        })
        .await?;

    Ok(response)
}

/// Removes a line. Unknown lines are ignored.
pub async fn remove_from_cart(cart: &CartStore, item: &str) -> CartSummary {
    debug!(item = %item, "remove_from_cart command");

    cart.with_cart_mut(|c| {
        let removed = resolve_line(c, item)
            .ok()
            .and_then(|line_id| c.remove_item(&line_id));
        if removed.is_none() {
            debug!(item = %item, "Nothing to remove");
        }
        c.summary()
    })
    .await
}

pub async fn update_item_notes(
    cart: &CartStore,
    item: &str,
    notes: &str,
) -> Result<CartSummary, ApiError> {
    debug!(item = %item, "update_item_notes command");

    let summary = cart
        .with_cart_mut(|c| {
            let line_id = resolve_line(c, item)?;
            c.update_item_notes(&line_id, notes)?;
            Ok::<CartSummary, CoreError>(c.summary())
        })
        .await?;

    Ok(summary)
}

/// Order-level notes for the kitchen.
pub async fn set_order_notes(cart: &CartStore, notes: &str) -> Result<CartSummary, ApiError> {
    debug!("set_order_notes command");

    let summary = cart
        .with_cart_mut(|c| {
            c.set_notes(notes)?;
            Ok::<CartSummary, CoreError>(c.summary())
        })
        .await?;

    Ok(summary)
}

pub async fn set_service_fee(cart: &CartStore, include: bool) -> CartSummary {
    debug!(include, "set_service_fee command");

    cart.with_cart_mut(|c| {
        c.set_include_service_fee(include);
        c.summary()
    })
    .await
}

/// Empties the cart, drops the table and turns the service fee back on.
pub async fn clear_cart(cart: &CartStore) -> CartSummary {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        c.summary()
    })
    .await
}

/// Selects the table the order goes to.
pub async fn select_table(
    cart: &CartStore,
    table_id: &str,
    table_number: u32,
) -> Result<CartSummary, ApiError> {
    debug!(table_id = %table_id, table_number, "select_table command");

    let summary = cart
        .with_cart_mut(|c| {
            c.set_table(table_id, table_number)?;
            Ok::<CartSummary, CoreError>(c.summary())
        })
        .await?;

    Ok(summary)
}

/// Runs the pre-checkout gate without submitting anything.
pub async fn validate_cart(cart: &CartStore) -> CartValidation {
    debug!("validate_cart command");
    cart.with_cart(Cart::validate).await
}

pub async fn save_cart_for_later(cart: &CartStore) -> Result<SavedCart, ApiError> {
    debug!("save_cart_for_later command");
    Ok(cart.save_for_later(Utc::now()).await?)
}

/// Brings back the saved cart. Expired or missing snapshots are reported
/// in the outcome, not as errors.
pub async fn restore_saved_cart(cart: &CartStore) -> Result<RestoreOutcome, ApiError> {
    debug!("restore_saved_cart command");
    Ok(cart.restore_saved(Utc::now()).await?)
}
