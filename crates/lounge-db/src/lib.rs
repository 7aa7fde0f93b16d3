//! # lounge-db: Durable Storage for the Lounge Storefront
//!
//! SQLite storage via sqlx: the key/value store behind cart persistence and
//! the local order outbox.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Data Flow                             │
//! │                                                                         │
//! │  CartStore (every mutation)          checkout                          │
//! │       │                                  │                              │
//! │       ▼                                  ▼                              │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   lounge-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄───│ Storage, Cart, │   │  (embedded)  │   │   │
//! │  │   │  SqlitePool   │    │ Order          │   │ 001, 002     │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lounge.db (platform data directory)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lounge_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("lounge.db")).await?;
//! let cart = db.carts().load().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::cart::{CartRepository, SavedCartLookup};
pub use repository::order::{OrderRecord, OrderRepository};
pub use repository::storage::StorageRepository;
