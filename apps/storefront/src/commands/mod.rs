//! # Storefront Commands
//!
//! Everything the front end can ask the storefront to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (exports)
//! ├── menu.rs      ◄─── Menu listing, categories
//! ├── cart.rs      ◄─── Cart manipulation, table, save for later
//! ├── checkout.rs  ◄─── Validation gate + order submission
//! ├── coupon.rs    ◄─── Simulated coupon lookup
//! └── orders.rs    ◄─── Local order history
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  lounge cart add mojito --quantity 2                                   │
//! │         │                                                               │
//! │         │ (clap parses, crate::cli dispatches)                          │
//! │         ▼                                                               │
//! │  async fn add_to_cart(                                                  │
//! │      menu: &MenuState,    ◄── built once by the composition root       │
//! │      cart: &CartStore,    ◄── shared cart + persistence subscriber     │
//! │      product_id: &str,                                                  │
//! │      quantity: Option<i64>,                                             │
//! │      notes: Option<&str>,                                               │
//! │  ) -> Result<CartSummary, ApiError>                                     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  printed by crate::cli (or serialized as JSON with --json)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! Each command takes only the state it needs:
//! ```rust,ignore
//! // Only needs the menu
//! fn list_menu(menu: &MenuState, query: &MenuQuery)
//!
//! // Only needs the cart
//! async fn get_cart(cart: &CartStore)
//!
//! // Needs both
//! async fn add_to_cart(menu: &MenuState, cart: &CartStore, ...)
//!
//! // Cart plus wherever orders go
//! async fn checkout<G: OrderGateway>(cart: &CartStore, gateway: &G, ...)
//! ```

pub mod cart;
pub mod checkout;
pub mod coupon;
pub mod menu;
pub mod orders;
