//! # Repository Module
//!
//! Database access behind small, typed APIs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront command                                                    │
//! │       │                                                                 │
//! │       │  db.carts().load()          db.orders().insert(&request, now)  │
//! │       ▼                                                                 │
//! │  CartRepository ──► StorageRepository ──► storage table                │
//! │  OrderRepository ───────────────────────► orders table                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`StorageRepository`](storage::StorageRepository) - Key/value JSON documents
//! - [`CartRepository`](cart::CartRepository) - Live cart and saved snapshot
//! - [`OrderRepository`](order::OrderRepository) - Order outbox

pub mod cart;
pub mod order;
pub mod storage;
