//! # Error Types
//!
//! Domain-specific error types for lounge-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lounge-core errors (this file)                                        │
//! │  ├── CoreError        - Cart operation failures                        │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  lounge-db errors (separate crate)                                     │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  Storefront errors (in app)                                            │
//! │  └── ApiError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → User                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Conditions the user is expected to run into during normal ordering
//! (stock limit on increment, an incomplete cart at checkout, a stale
//! saved cart) are NOT errors. They are returned as values, see
//! [`crate::cart::QuantityChange`] and [`crate::validation::CartValidation`].

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and product errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product cannot be found in the menu.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// No cart line with this id.
    ///
    /// ## When This Occurs
    /// - Stale UI sends an id of a line that was already removed
    /// - Line ids are regenerated after clearing the cart
    #[error("Cart item not found: {0}")]
    CartItemNotFound(String),

    /// Quantities added or set must be at least one.
    #[error("Quantity must be at least 1, got {0}")]
    QuantityMustBePositive(i64),

    /// Item quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// A raw product entry could not be normalized.
    #[error("Invalid product '{id}': {source}")]
    InvalidProduct {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
