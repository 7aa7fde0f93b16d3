//! # State Module
//!
//! Explicit state objects built by the composition root ([`crate::run`])
//! and passed to commands. Nothing here is a global.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐  ┌────────────┐  │
//! │  │   DbState    │  │  CartStore   │  │  MenuState   │  │ConfigState │  │
//! │  │              │  │              │  │              │  │            │  │
//! │  │  Database    │  │  Arc<Mutex<  │  │  Vec<Product>│  │ store name │  │
//! │  │  (SQLite     │  │    Cart>>    │  │  (read-only) │  │ coupons    │  │
//! │  │   pool)      │  │  + persist   │  │              │  │ currency   │  │
//! │  └──────────────┘  └──────────────┘  └──────────────┘  └────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DbState: Database has internal connection pool (thread-safe)        │
//! │  • CartStore: tokio Mutex held across transition + write               │
//! │  • MenuState, ConfigState: read-only after initialization              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod config;
mod db;
mod menu;

pub use cart::{CartStore, RestoreOutcome};
pub use config::{ConfigError, ConfigState};
pub use db::DbState;
pub use menu::{MenuError, MenuState};
