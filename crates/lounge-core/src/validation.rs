//! # Validation Module
//!
//! Input validators and the pre-checkout cart gate.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (menu file, CLI arguments)                           │
//! │  ├── ProductInput normalization                                        │
//! │  └── validate_* functions below → ValidationError                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Cart operations                                              │
//! │  └── CoreError for impossible requests (unknown line, qty 0 on add)    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Checkout gate                                                │
//! │  └── validate_cart() → CartValidation { is_valid, errors }             │
//! │      Collects EVERY issue; never stops at the first one.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lounge_core::validation::{validate_quantity, validate_table_number};
//!
//! validate_quantity(5).unwrap();
//! assert!(validate_table_number(0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::ValidationError;
use crate::{MAX_ITEM_QUANTITY, MAX_NOTES_LENGTH, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted coupon code.
const MAX_COUPON_CODE_LENGTH: usize = 32;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be blank
/// - At most 200 characters
///
/// ## Example
/// ```rust
/// use lounge_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Pisco Sour").is_ok());
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates line or order notes. Empty is fine.
pub fn validate_notes(notes: &str) -> ValidationResult<()> {
    if notes.trim().chars().count() > MAX_NOTES_LENGTH {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LENGTH,
        });
    }

    Ok(())
}

pub fn validate_table_id(table_id: &str) -> ValidationResult<()> {
    if table_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "table_id".to_string(),
        });
    }

    Ok(())
}

/// Validates and normalizes a coupon code.
///
/// ## Returns
/// The trimmed, upper-cased code.
///
/// ## Example
/// ```rust
/// use lounge_core::validation::validate_coupon_code;
///
/// assert_eq!(validate_coupon_code(" welcome10 ").unwrap(), "WELCOME10");
/// assert!(validate_coupon_code("").is_err());
/// assert!(validate_coupon_code("NO SPACES").is_err());
/// ```
pub fn validate_coupon_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "coupon code".to_string(),
        });
    }

    if code.len() > MAX_COUPON_CODE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "coupon code".to_string(),
            max: MAX_COUPON_CODE_LENGTH,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "coupon code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents. Zero is allowed (complimentary items).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_PRICE_CENTS
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a discount in whole percent (0-100).
pub fn validate_discount_percent(percent: i64) -> ValidationResult<()> {
    if !(0..=100).contains(&percent) {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Table numbers start at 1.
pub fn validate_table_number(number: u32) -> ValidationResult<()> {
    if number == 0 {
        return Err(ValidationError::MustBePositive {
            field: "table_number".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Checkout Gate
// =============================================================================

/// One reason a cart cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum CartIssue {
    EmptyCart,
    NoTableSelected,
    ProductInactive {
        name: String,
    },
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },
}

impl fmt::Display for CartIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartIssue::EmptyCart => f.write_str("The cart is empty"),
            CartIssue::NoTableSelected => f.write_str("Please select a table"),
            CartIssue::ProductInactive { name } => write!(f, "{} is no longer available", name),
            CartIssue::InsufficientStock {
                name, available, ..
            } => write!(f, "Insufficient stock for {}. Available: {}", name, available),
        }
    }
}

/// Outcome of [`validate_cart`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartValidation {
    pub is_valid: bool,
    pub errors: Vec<CartIssue>,
}

impl CartValidation {
    /// Human readable messages, one per issue.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Checks whether a cart may go to checkout.
///
/// ## Checks (all of them, in this order)
/// ```text
/// cart empty?             → EmptyCart
/// no table selected?      → NoTableSelected
/// for each line:
///   product inactive?     → ProductInactive { name }
///   qty > tracked stock?  → InsufficientStock { name, available, requested }
/// ```
///
/// Stock is checked against the product copy held by the line.
pub fn validate_cart(cart: &Cart) -> CartValidation {
    let mut errors = Vec::new();

    if cart.is_empty() {
        errors.push(CartIssue::EmptyCart);
    }

    if !cart.has_table() {
        errors.push(CartIssue::NoTableSelected);
    }

    for item in cart.items() {
        if !item.product.is_active {
            errors.push(CartIssue::ProductInactive {
                name: item.product.name.clone(),
            });
        }

        if item.product.exceeds_stock(item.quantity) {
            errors.push(CartIssue::InsufficientStock {
                name: item.product.name.clone(),
                available: item.product.stock,
                requested: item.quantity,
            });
        }
    }

    CartValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
