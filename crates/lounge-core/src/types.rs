//! # Domain Types
//!
//! Menu products and payment methods.
//!
//! ## Product Boundary
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where Products Come From                             │
//! │                                                                         │
//! │  menu.json / remote catalog                                             │
//! │       │  loosely typed: blanks, negative stock, discount 130%           │
//! │       ▼                                                                 │
//! │  ProductInput ──► Product::try_from ──► Product (typed, normalized)     │
//! │                         │                                               │
//! │                         └──► CoreError::InvalidProduct (entry skipped)  │
//! │                                                                         │
//! │  Product ──► Cart::add_item copies it into the line (snapshot)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::validation::{validate_price_cents, validate_product_name};
use crate::DEFAULT_PREPARATION_MINUTES;

fn default_true() -> bool {
    true
}

// =============================================================================
// Product
// =============================================================================

/// A menu product.
///
/// Lines in the cart hold a copy of this struct, so a price change on the
/// menu never alters a line that is already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,

    /// Display name on the menu and the kitchen ticket.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Menu section ("Cocktails", "Tapas", ...).
    #[serde(default)]
    pub category: Option<String>,

    /// List price before discount.
    pub price: Money,

    /// Discount in whole percent, 0-100.
    #[serde(default)]
    pub discount: u8,

    /// Units on hand. Only meaningful when `has_stock` is set.
    #[serde(default)]
    pub stock: i64,

    /// Whether stock is tracked for this product.
    #[serde(default)]
    pub has_stock: bool,

    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Minutes the kitchen or bar needs for one order of this product.
    #[serde(default)]
    pub preparation_time: Option<u32>,
}

impl Product {
    /// Creates an active product without discount or stock tracking.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            description: None,
            category: None,
            price,
            discount: 0,
            stock: 0,
            has_stock: false,
            is_active: true,
            preparation_time: None,
        }
    }

    /// Sets the discount percent (clamped to 100).
    pub fn with_discount(mut self, percent: u8) -> Self {
        self.discount = percent.min(100);
        self
    }

    /// Enables stock tracking with the given units on hand.
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.has_stock = true;
        self.stock = stock.max(0);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_preparation_time(mut self, minutes: u32) -> Self {
        self.preparation_time = Some(minutes);
        self
    }

    /// Marks the product as inactive (hidden from the menu).
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    /// Unit price after discount.
    ///
    /// ## Example
    /// ```rust
    /// use lounge_core::{Money, Product};
    ///
    /// let p = Product::new("gin-tonic", "Gin Tonic", Money::from_cents(10000)).with_discount(20);
    /// assert_eq!(p.effective_price().cents(), 8000);
    /// ```
    pub fn effective_price(&self) -> Money {
        if self.discount > 0 {
            self.price
                .apply_percentage_discount(u32::from(self.discount) * 100)
        } else {
            self.price
        }
    }

    #[inline]
    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    /// Preparation time, falling back to the kitchen default.
    pub fn preparation_minutes(&self) -> u32 {
        self.preparation_time.unwrap_or(DEFAULT_PREPARATION_MINUTES)
    }

    /// True when `quantity` is more than the tracked stock allows.
    pub fn exceeds_stock(&self, quantity: i64) -> bool {
        self.has_stock && quantity > self.stock
    }

    /// Active and, if stock is tracked, at least one unit on hand.
    pub fn is_available(&self) -> bool {
        self.is_active && (!self.has_stock || self.stock > 0)
    }
}

// =============================================================================
// Product Input (raw boundary shape)
// =============================================================================

/// A product as it arrives from a menu file or remote catalog.
///
/// Every field is optional here; [`Product::try_from`] decides what is
/// required and normalizes the rest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price_cents: Option<i64>,
    pub discount: Option<i64>,
    pub stock: Option<i64>,
    pub has_stock: Option<bool>,
    pub is_active: Option<bool>,
    pub preparation_time: Option<i64>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<ProductInput> for Product {
    type Error = CoreError;

    /// Normalizes a raw product.
    ///
    /// ## Rules
    /// - `id`, `name`, `priceCents` are required; price must be >= 0
    /// - `discount` is clamped to 0-100
    /// - negative `stock` becomes 0
    /// - `isActive` defaults to true
    /// - a zero or negative `preparationTime` is dropped
    fn try_from(input: ProductInput) -> Result<Self, Self::Error> {
        let id = non_blank(input.id).ok_or(ValidationError::Required {
            field: "id".to_string(),
        })?;

        let invalid = |source: ValidationError| CoreError::InvalidProduct {
            id: id.clone(),
            source,
        };

        let name = input.name.unwrap_or_default();
        validate_product_name(&name).map_err(invalid)?;

        let price_cents = input.price_cents.ok_or_else(|| {
            invalid(ValidationError::Required {
                field: "priceCents".to_string(),
            })
        })?;
        validate_price_cents(price_cents).map_err(invalid)?;

        let preparation_time = input
            .preparation_time
            .filter(|minutes| *minutes > 0)
            .map(|minutes| u32::try_from(minutes).unwrap_or(u32::MAX));

        Ok(Product {
            name: name.trim().to_string(),
            description: non_blank(input.description),
            category: non_blank(input.category),
            price: Money::from_cents(price_cents),
            discount: input.discount.unwrap_or(0).clamp(0, 100) as u8,
            stock: input.stock.unwrap_or(0).max(0),
            has_stock: input.has_stock.unwrap_or(false),
            is_active: input.is_active.unwrap_or(true),
            preparation_time,
            id,
        })
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Paid at the table in cash.
    Cash,
    /// Card on the waiter's terminal.
    Card,
    /// Bank transfer / QR payment.
    Transfer,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] =
        [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Transfer];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
            PaymentMethod::Transfer => "transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "transfer" | "qr" => Ok(PaymentMethod::Transfer),
            _ => Err(ValidationError::NotAllowed {
                field: "payment method".to_string(),
                allowed: PaymentMethod::ALL
                    .iter()
                    .map(|m| m.as_str().to_string())
                    .collect(),
            }),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: &str, name: &str, price_cents: i64) -> ProductInput {
        ProductInput {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            price_cents: Some(price_cents),
            ..ProductInput::default()
        }
    }

    #[test]
    fn test_effective_price() {
        let plain = Product::new("a", "Agua", Money::from_cents(10000));
        assert_eq!(plain.effective_price().cents(), 10000);

        let discounted = plain.clone().with_discount(20);
        assert_eq!(discounted.effective_price().cents(), 8000);
        assert!(discounted.has_discount());

        let free = plain.with_discount(150);
        assert_eq!(free.discount, 100);
        assert!(free.effective_price().is_zero());
    }

    #[test]
    fn test_availability() {
        let untracked = Product::new("a", "Agua", Money::from_cents(300));
        assert!(untracked.is_available());
        assert!(!untracked.exceeds_stock(10_000));

        let sold_out = untracked.clone().with_stock(0);
        assert!(!sold_out.is_available());

        let limited = untracked.clone().with_stock(2);
        assert!(!limited.exceeds_stock(2));
        assert!(limited.exceeds_stock(3));

        assert!(!untracked.inactive().is_available());
    }

    #[test]
    fn test_preparation_default() {
        let p = Product::new("a", "Nachos", Money::from_cents(900));
        assert_eq!(p.preparation_minutes(), DEFAULT_PREPARATION_MINUTES);
        assert_eq!(p.with_preparation_time(8).preparation_minutes(), 8);
    }

    #[test]
    fn test_product_input_normalization() {
        let input = ProductInput {
            description: Some("   ".to_string()),
            category: Some(" Cocktails ".to_string()),
            discount: Some(130),
            stock: Some(-4),
            has_stock: Some(true),
            preparation_time: Some(0),
            ..raw(" mojito ", " Mojito ", 1200)
        };

        let product = Product::try_from(input).unwrap();
        assert_eq!(product.id, "mojito");
        assert_eq!(product.name, "Mojito");
        assert_eq!(product.description, None);
        assert_eq!(product.category.as_deref(), Some("Cocktails"));
        assert_eq!(product.discount, 100);
        assert_eq!(product.stock, 0);
        assert!(product.has_stock);
        assert!(product.is_active);
        assert_eq!(product.preparation_time, None);
    }

    #[test]
    fn test_product_input_rejections() {
        let missing_id = ProductInput {
            id: Some("  ".to_string()),
            ..raw("x", "Mojito", 100)
        };
        assert!(matches!(
            Product::try_from(missing_id),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let blank_name = raw("p-1", "", 100);
        assert!(matches!(
            Product::try_from(blank_name),
            Err(CoreError::InvalidProduct { .. })
        ));

        let negative_price = raw("p-2", "Mojito", -1);
        assert!(matches!(
            Product::try_from(negative_price),
            Err(CoreError::InvalidProduct { .. })
        ));

        let no_price = ProductInput {
            price_cents: None,
            ..raw("p-3", "Mojito", 0)
        };
        assert!(Product::try_from(no_price).is_err());
    }

    #[test]
    fn test_absurd_price_is_rejected() {
        let overflowing = raw("p-4", "Champagne tower", i64::MAX / 2 + 1);
        assert!(matches!(
            Product::try_from(overflowing),
            Err(CoreError::InvalidProduct {
                source: ValidationError::OutOfRange { .. },
                ..
            })
        ));

        let most_expensive = Product::try_from(raw("p-5", "Magnum", crate::MAX_PRICE_CENTS)).unwrap();
        let mut cart = crate::Cart::new();
        cart.add_item(&most_expensive, crate::MAX_ITEM_QUANTITY, "").unwrap();
        assert_eq!(
            cart.total().cents(),
            crate::MAX_PRICE_CENTS * crate::MAX_ITEM_QUANTITY * 11 / 10
        );
    }

    #[test]
    fn test_product_deserialize_defaults() {
        let json = r#"{"id":"p","name":"Papas","price":450}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert!(product.is_active);
        assert!(!product.has_stock);
        assert_eq!(product.discount, 0);
    }

    #[test]
    fn test_payment_method_parsing() {
        assert_eq!("cash".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(" Debit ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert_eq!("qr".parse::<PaymentMethod>().unwrap(), PaymentMethod::Transfer);
        assert!("bitcoin".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Transfer).unwrap(),
            "\"transfer\""
        );
    }
}
