//! # Cart Store
//!
//! The single owner of the live cart. Built by the composition root and
//! handed to every command that touches the cart.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore::with_cart_mut                             │
//! │                                                                         │
//! │  lock (tokio Mutex)                                                    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  pure transition on lounge_core::Cart  (add, increment, set_table...)  │
//! │     │                                                                   │
//! │     ├── cart unchanged ──► done                                        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  persistence subscriber: CartRepository::save(&cart)                   │
//! │     │                                                                   │
//! │     └── write failed ──► warn! and carry on (caller still gets result) │
//! │                                                                         │
//! │  unlock                                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The write happens under the same lock as the transition, so the stored
//! state always matches some state the cart actually had.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use lounge_core::{Cart, SavedCart};
use lounge_db::{CartRepository, Database, DbResult, SavedCartLookup};

/// What [`CartStore::restore_saved`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum RestoreOutcome {
    /// The snapshot replaced the live cart.
    Restored { total_items: i64 },
    /// The snapshot was older than 24 hours and has been discarded.
    Expired { saved_at: DateTime<Utc> },
    /// Nothing was saved.
    NotFound,
}

impl RestoreOutcome {
    pub fn is_restored(&self) -> bool {
        matches!(self, RestoreOutcome::Restored { .. })
    }
}

/// Thread-safe cart state with write-behind persistence.
///
/// ## Usage
/// ```rust,ignore
/// let store = CartStore::load(&db).await?;
/// store.with_cart_mut(|cart| cart.add_item(&product, 1, "")).await?;
/// let total = store.with_cart(|cart| cart.total()).await;
/// ```
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    persistence: CartRepository,
}

impl CartStore {
    /// Rehydrates the cart from storage (empty when nothing is stored or
    /// the stored state is corrupt).
    pub async fn load(db: &Database) -> DbResult<Self> {
        let persistence = db.carts();
        let cart = persistence.load().await?;

        info!(
            lines = cart.line_count(),
            total_items = cart.total_items(),
            "Cart store ready"
        );

        Ok(CartStore {
            cart: Arc::new(Mutex::new(cart)),
            persistence,
        })
    }

    /// Read access to the cart.
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().await;
        f(&*cart)
    }

    /// Runs a transition and persists the result if the cart changed.
    ///
    /// The closure's return value is passed through untouched, so typed
    /// outcomes (`CoreResult<QuantityChange>`, ...) reach the caller as-is.
    pub async fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().await;
        let before = cart.clone();

        let result = f(&mut *cart);

        if *cart != before {
            self.persist(&*cart).await;
        }

        result
    }

    /// Current cart, cloned.
    pub async fn snapshot(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Persistence subscriber. Fire-and-forget: failures are logged only.
    async fn persist(&self, cart: &Cart) {
        match self.persistence.save(cart).await {
            Ok(()) => debug!(
                lines = cart.line_count(),
                total_items = cart.total_items(),
                "Cart persisted"
            ),
            Err(e) => warn!(error = %e, "Failed to persist cart; in-memory state kept"),
        }
    }

    /// Stores the current cart as the "save for later" snapshot.
    /// The live cart is left as it is.
    pub async fn save_for_later(&self, now: DateTime<Utc>) -> DbResult<SavedCart> {
        let cart = self.cart.lock().await;
        self.persistence.save_for_later(&*cart, now).await
    }

    /// Replaces the live cart with the saved snapshot, when one exists and
    /// is less than 24 hours old.
    pub async fn restore_saved(&self, now: DateTime<Utc>) -> DbResult<RestoreOutcome> {
        let saved = match self.persistence.fetch_saved(now).await? {
            SavedCartLookup::Fresh(saved) => saved,
            SavedCartLookup::Stale { saved_at } => {
                return Ok(RestoreOutcome::Expired { saved_at });
            }
            SavedCartLookup::Missing => return Ok(RestoreOutcome::NotFound),
        };

        let total_items = self
            .with_cart_mut(|cart| {
                cart.restore(saved);
                cart.total_items()
            })
            .await;

        info!(total_items, "Saved cart restored");
        Ok(RestoreOutcome::Restored { total_items })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lounge_core::{CoreError, Money, Product, QuantityChange};
    use lounge_db::DbConfig;

    fn mojito() -> Product {
        Product::new("mojito", "Mojito", Money::from_cents(1200)).with_stock(3)
    }

    async fn setup() -> (Database, CartStore) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = CartStore::load(&db).await.unwrap();
        (db, store)
    }

    #[tokio::test]
    async fn test_mutations_survive_reload() {
        let (db, store) = setup().await;

        store
            .with_cart_mut(|cart| cart.add_item(&mojito(), 2, "").map(|_| ()))
            .await
            .unwrap();
        store
            .with_cart_mut(|cart| cart.set_table("t-8", 8))
            .await
            .unwrap();

        let reloaded = CartStore::load(&db).await.unwrap();
        let cart = reloaded.snapshot().await;
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.table_number(), Some(8));
        assert_eq!(cart, store.snapshot().await);
    }

    #[tokio::test]
    async fn test_outcomes_pass_through() {
        let (_db, store) = setup().await;

        let line_id = store
            .with_cart_mut(|cart| cart.add_item(&mojito(), 3, "").map(|i| i.id.clone()))
            .await
            .unwrap();

        let change = store
            .with_cart_mut(|cart| cart.increment_item(&line_id))
            .await
            .unwrap();
        assert_eq!(change, QuantityChange::StockLimitReached { available: 3 });

        let missing = store
            .with_cart_mut(|cart| cart.increment_item("nope"))
            .await;
        assert!(matches!(missing, Err(CoreError::CartItemNotFound(_))));
    }

    #[tokio::test]
    async fn test_write_failure_is_not_surfaced() {
        let (db, store) = setup().await;
        db.close().await;

        let result = store
            .with_cart_mut(|cart| cart.add_item(&mojito(), 1, "").map(|_| ()))
            .await;

        assert!(result.is_ok());
        assert_eq!(store.with_cart(|cart| cart.total_items()).await, 1);
    }

    #[tokio::test]
    async fn test_save_and_restore() {
        let (_db, store) = setup().await;
        let now = Utc::now();

        store
            .with_cart_mut(|cart| cart.add_item(&mojito(), 2, "").map(|_| ()))
            .await
            .unwrap();
        store.save_for_later(now).await.unwrap();

        store.with_cart_mut(|cart| cart.clear()).await;
        assert!(store.with_cart(|cart| cart.is_empty()).await);

        let outcome = store.restore_saved(now).await.unwrap();
        assert_eq!(outcome, RestoreOutcome::Restored { total_items: 2 });
        assert_eq!(store.with_cart(|cart| cart.total_items()).await, 2);
    }

    #[tokio::test]
    async fn test_restore_expired_and_missing() {
        let (_db, store) = setup().await;
        let now = Utc::now();

        assert_eq!(
            store.restore_saved(now).await.unwrap(),
            RestoreOutcome::NotFound
        );

        store
            .with_cart_mut(|cart| cart.add_item(&mojito(), 1, "").map(|_| ()))
            .await
            .unwrap();
        let saved_at = now - Duration::hours(30);
        store.save_for_later(saved_at).await.unwrap();
        store.with_cart_mut(|cart| cart.clear()).await;

        assert_eq!(
            store.restore_saved(now).await.unwrap(),
            RestoreOutcome::Expired { saved_at }
        );
        assert!(store.with_cart(|cart| cart.is_empty()).await);
        assert_eq!(
            store.restore_saved(now).await.unwrap(),
            RestoreOutcome::NotFound
        );
    }
}
