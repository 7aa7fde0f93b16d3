//! # API Error Type
//!
//! Unified error type for storefront commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Storefront                         │
//! │                                                                         │
//! │  Command Function → Result<T, ApiError>                                │
//! │         │                                                               │
//! │         ├── DbError   ──► DATABASE_ERROR (details logged, not shown)   │
//! │         ├── CoreError ──► NOT_FOUND / VALIDATION_ERROR                 │
//! │         ├── invalid cart at checkout ──► CHECKOUT_ERROR + every issue  │
//! │         └── MenuError / ConfigError ──► CONFIG_ERROR                   │
//! │                                                                         │
//! │  Stock-limited increments, stale saved carts and rejected coupons are  │
//! │  NOT errors; commands return them as values.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::state::{ConfigError, MenuError};
use lounge_core::{CartValidation, CoreError};
use lounge_db::DbError;

/// Error returned from storefront commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "CHECKOUT_ERROR",
///   "message": "Cart cannot be submitted",
///   "details": ["Please select a table"]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// One line per underlying problem (checkout issues). Empty otherwise.
    pub details: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Database operation failed (500)
    DatabaseError,

    /// Cart failed the pre-checkout gate or the order endpoint refused it
    CheckoutError,

    /// Bad configuration or unreadable menu file
    ConfigError,

    /// Internal server error (500)
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Checkout refused by the pre-checkout gate; lists every issue.
    pub fn invalid_cart(validation: &CartValidation) -> Self {
        ApiError::new(ErrorCode::CheckoutError, "Cart cannot be submitted")
            .with_details(validation.messages())
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored value could not be decoded: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Stored data is unreadable")
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => ApiError::not_found("Product", &id),
            CoreError::CartItemNotFound(id) => ApiError::not_found("Cart item", &id),
            CoreError::QuantityMustBePositive(qty) => {
                ApiError::validation(format!("Quantity must be at least 1, got {}", qty))
            }
            CoreError::QuantityTooLarge { requested, max } => ApiError::new(
                ErrorCode::ValidationError,
                format!("Quantity {} exceeds maximum allowed ({})", requested, max),
            ),
            err @ CoreError::InvalidProduct { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<MenuError> for ApiError {
    fn from(err: MenuError) -> Self {
        tracing::error!("Menu unavailable: {}", err);
        ApiError::new(ErrorCode::ConfigError, "Menu is unavailable")
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        for detail in &self.details {
            write!(f, "\n  - {}", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
