//! # lounge-core: Pure Ordering Logic for the Lounge Storefront
//!
//! This crate is the **heart** of the ordering flow. It contains the cart
//! computation model, menu filtering and checkout validation as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Lounge Ordering Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (apps/storefront)                    │   │
//! │  │    Menu ──► Cart ──► Table ──► Checkout ──► Order receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ lounge-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌──────────┐ ┌────────────┐  │   │
//! │  │  │ types  │ │ money  │ │  cart  │ │ catalog  │ │ validation │  │   │
//! │  │  │Product │ │ Money  │ │ Cart   │ │MenuQuery │ │ cart gate  │  │   │
//! │  │  └────────┘ └────────┘ └────────┘ └──────────┘ └────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              lounge-db (durable cart storage, orders)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product, ProductInput, PaymentMethod
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - Cart, CartItem, derived totals, saved snapshots
//! - [`catalog`] - Menu filtering and sorting
//! - [`order`] - Order submission payload built from a cart summary
//! - [`validation`] - Checkout gate and input validators
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use lounge_core::{Cart, Money, Product};
//!
//! let mojito = Product::new("mojito", "Mojito", Money::from_cents(10000)).with_discount(20);
//!
//! let mut cart = Cart::new();
//! cart.add_item(&mojito, 2, "").unwrap();
//!
//! assert_eq!(cart.subtotal().cents(), 16000);
//! assert_eq!(cart.service_fee().cents(), 1600);
//! assert_eq!(cart.total().cents(), 17600);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartSummary, QuantityChange, SavedCart};
pub use catalog::{MenuQuery, MenuSort};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::{OrderItemRequest, OrderReceipt, OrderRequest};
pub use types::*;
pub use validation::{CartIssue, CartValidation};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Service fee applied on top of the subtotal, in basis points (1000 = 10%).
pub const SERVICE_FEE_BPS: u32 = 1000;

/// Preparation time assumed for products that do not declare one (minutes).
pub const DEFAULT_PREPARATION_MINUTES: u32 = 15;

/// Kitchen overhead: every started batch of this many items...
pub const ITEMS_PER_PREP_BATCH: i64 = 3;

/// ...adds this many minutes to the estimate.
pub const MINUTES_PER_PREP_BATCH: u32 = 2;

/// A "save for later" snapshot older than this is discarded on restore.
pub const SAVED_CART_TTL_HOURS: i64 = 24;

/// Storage key holding the live cart state.
pub const CART_STORAGE_KEY: &str = "lounge-cart";

/// Storage key holding the "save for later" snapshot.
pub const SAVED_CART_STORAGE_KEY: &str = "lounge-saved-cart";

/// Maximum quantity of a single line in the cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 100 instead of 10)
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest accepted unit price, in cents (10,000,000.00). Keeps
/// price × quantity × lines well inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Maximum length of a line or order note.
pub const MAX_NOTES_LENGTH: usize = 500;
