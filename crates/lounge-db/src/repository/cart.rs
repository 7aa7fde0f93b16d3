//! # Cart Repository
//!
//! Durable cart state on top of [`StorageRepository`].
//!
//! ## Keys
//! ```text
//! lounge-cart        → Cart       {items, tableId, tableNumber, notes, includeServiceFee}
//! lounge-saved-cart  → SavedCart  {items, tableId, tableNumber, notes, savedAt}
//! ```
//!
//! ## Restore Flow
//! ```text
//! fetch_saved(now)
//!      │
//!      ├── no row / unreadable row ─────────► SavedCartLookup::Missing
//!      │
//!      ├── saved_at older than 24 h ────────► row deleted, SavedCartLookup::Stale
//!      │
//!      └── otherwise ───────────────────────► SavedCartLookup::Fresh(saved)
//!                                              (row stays until overwritten)
//! ```

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::storage::StorageRepository;
use lounge_core::{Cart, SavedCart, CART_STORAGE_KEY, SAVED_CART_STORAGE_KEY};

/// What [`CartRepository::fetch_saved`] found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedCartLookup {
    Fresh(SavedCart),
    /// Expired and removed.
    Stale { saved_at: DateTime<Utc> },
    Missing,
}

#[derive(Debug, Clone)]
pub struct CartRepository {
    storage: StorageRepository,
}

impl CartRepository {
    pub fn new(storage: StorageRepository) -> Self {
        CartRepository { storage }
    }

    /// Loads the live cart.
    ///
    /// A missing row gives an empty cart. A row that does not decode is
    /// logged and also gives an empty cart; only database failures are
    /// returned as errors.
    pub async fn load(&self) -> DbResult<Cart> {
        match self.storage.get_json::<Cart>(CART_STORAGE_KEY).await {
            Ok(Some(cart)) => {
                let cart = cart.normalized();
                debug!(lines = cart.line_count(), "Cart rehydrated");
                Ok(cart)
            }
            Ok(None) => Ok(Cart::new()),
            Err(DbError::Serialization(reason)) => {
                warn!(key = CART_STORAGE_KEY, %reason, "Stored cart is corrupt; starting empty");
                Ok(Cart::new())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn save(&self, cart: &Cart) -> DbResult<()> {
        self.storage.set_json(CART_STORAGE_KEY, cart).await
    }

    /// Stores a "save for later" snapshot, replacing any previous one.
    pub async fn save_for_later(&self, cart: &Cart, now: DateTime<Utc>) -> DbResult<SavedCart> {
        let snapshot = cart.snapshot(now);
        self.storage
            .set_json(SAVED_CART_STORAGE_KEY, &snapshot)
            .await?;

        info!(
            items = snapshot.item_count(),
            saved_at = %snapshot.saved_at,
            "Cart saved for later"
        );
        Ok(snapshot)
    }

    /// Looks up the saved snapshot, discarding it when stale.
    pub async fn fetch_saved(&self, now: DateTime<Utc>) -> DbResult<SavedCartLookup> {
        let saved = match self.storage.get_json::<SavedCart>(SAVED_CART_STORAGE_KEY).await {
            Ok(Some(saved)) => saved,
            Ok(None) => return Ok(SavedCartLookup::Missing),
            Err(DbError::Serialization(reason)) => {
                warn!(key = SAVED_CART_STORAGE_KEY, %reason, "Saved cart is corrupt; discarding");
                self.storage.remove(SAVED_CART_STORAGE_KEY).await?;
                return Ok(SavedCartLookup::Missing);
            }
            Err(e) => return Err(e),
        };

        if saved.is_stale(now) {
            warn!(saved_at = %saved.saved_at, "Saved cart expired; discarding");
            self.storage.remove(SAVED_CART_STORAGE_KEY).await?;
            return Ok(SavedCartLookup::Stale {
                saved_at: saved.saved_at,
            });
        }

        Ok(SavedCartLookup::Fresh(saved))
    }

    /// Removes the saved snapshot. Returns whether one existed.
    pub async fn discard_saved(&self) -> DbResult<bool> {
        self.storage.remove(SAVED_CART_STORAGE_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use lounge_core::{Money, Product};

    async fn setup() -> (Database, CartRepository) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.carts();
        (db, repo)
    }

    fn filled_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            &Product::new("mojito", "Mojito", Money::from_cents(1200)),
            2,
            "less sugar",
        )
        .unwrap();
        cart.set_table("t-3", 3).unwrap();
        cart.set_include_service_fee(false);
        cart
    }

    #[tokio::test]
    async fn test_empty_storage_loads_empty_cart() {
        let (_db, repo) = setup().await;
        let cart = repo.load().await.unwrap();
        assert!(cart.is_empty());
        assert!(cart.include_service_fee());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_db, repo) = setup().await;
        let cart = filled_cart();

        repo.save(&cart).await.unwrap();
        let loaded = repo.load().await.unwrap();

        assert_eq!(loaded, cart);
        assert_eq!(loaded.items()[0].notes, "less sugar");
        assert!(!loaded.include_service_fee());
    }

    #[tokio::test]
    async fn test_corrupt_cart_loads_empty() {
        let (db, repo) = setup().await;
        db.storage().set(CART_STORAGE_KEY, "not json").await.unwrap();

        let cart = repo.load().await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_fresh_snapshot_is_kept_after_fetch() {
        let (_db, repo) = setup().await;
        let now = Utc::now();

        repo.save_for_later(&filled_cart(), now - Duration::hours(2))
            .await
            .unwrap();

        let first = repo.fetch_saved(now).await.unwrap();
        match first {
            SavedCartLookup::Fresh(saved) => {
                assert_eq!(saved.items.len(), 1);
                assert_eq!(saved.table_number, Some(3));
            }
            other => panic!("expected fresh snapshot, got {:?}", other),
        }

        assert!(matches!(
            repo.fetch_saved(now).await.unwrap(),
            SavedCartLookup::Fresh(_)
        ));
    }

    #[tokio::test]
    async fn test_stale_snapshot_is_removed() {
        let (db, repo) = setup().await;
        let now = Utc::now();
        let saved_at = now - Duration::hours(25);

        repo.save_for_later(&filled_cart(), saved_at).await.unwrap();

        assert_eq!(
            repo.fetch_saved(now).await.unwrap(),
            SavedCartLookup::Stale { saved_at }
        );
        assert_eq!(db.storage().get(SAVED_CART_STORAGE_KEY).await.unwrap(), None);
        assert_eq!(
            repo.fetch_saved(now).await.unwrap(),
            SavedCartLookup::Missing
        );
    }

    #[tokio::test]
    async fn test_missing_and_discarded_snapshot() {
        let (_db, repo) = setup().await;

        assert_eq!(
            repo.fetch_saved(Utc::now()).await.unwrap(),
            SavedCartLookup::Missing
        );

        repo.save_for_later(&filled_cart(), Utc::now()).await.unwrap();
        assert!(repo.discard_saved().await.unwrap());
        assert!(!repo.discard_saved().await.unwrap());
    }
}
