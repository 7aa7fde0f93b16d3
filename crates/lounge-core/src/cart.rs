//! # Cart Module
//!
//! The cart computation model: line management, derived totals, table
//! selection and the "save for later" snapshot.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Transitions                               │
//! │                                                                         │
//! │  User Action              Cart Method               State Change        │
//! │  ───────────              ───────────               ────────────        │
//! │                                                                         │
//! │  Tap product ────────────► add_item() ─────────────► push or merge      │
//! │  + / - buttons ──────────► increment/decrement ────► qty ± 1 (0 drops)  │
//! │  Type quantity ──────────► update_item_quantity() ─► qty = n (≤0 drops) │
//! │  Pick table ─────────────► set_table() ────────────► id + number        │
//! │  Order placed ───────────► clear() ────────────────► empty, fee on      │
//! │                                                                         │
//! │  Totals are never stored: subtotal(), service_fee(), total() and        │
//! │  estimated_time() are computed from the current lines on every call.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every method here is a pure in-memory transition. Persisting the result
//! is the job of whoever owns the cart (the storefront's cart store).

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{
    validate_cart, validate_notes, validate_price_cents, validate_quantity, validate_table_id,
    validate_table_number, CartValidation,
};
use crate::{
    DEFAULT_PREPARATION_MINUTES, ITEMS_PER_PREP_BATCH, MAX_ITEM_QUANTITY, MINUTES_PER_PREP_BATCH,
    SAVED_CART_TTL_HOURS, SERVICE_FEE_BPS,
};

fn default_true() -> bool {
    true
}

/// Line ids are the product id plus the millisecond the line was created.
fn line_id(product_id: &str) -> String {
    format!("{}-{}", product_id, Utc::now().timestamp_millis())
}

// =============================================================================
// Cart Item
// =============================================================================

/// One line in the cart.
///
/// ## Design Notes
/// `product` is a frozen copy taken when the line was created. The menu can
/// change price or discount afterwards without touching this line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    pub id: String,
    pub product: Product,
    /// Always >= 1 while the line exists.
    pub quantity: i64,
    #[serde(default)]
    pub notes: String,
}

impl CartItem {
    fn new(product: &Product, quantity: i64, notes: String) -> Self {
        CartItem {
            id: line_id(&product.id),
            product: product.clone(),
            quantity,
            notes,
        }
    }

    /// Unit price after the product discount.
    pub fn unit_price(&self) -> Money {
        self.product.effective_price()
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price() * self.quantity
    }
}

// =============================================================================
// Quantity Change
// =============================================================================

/// What a quantity operation did to a line.
///
/// `StockLimitReached` is not an error: the cart is unchanged and the caller
/// shows a notice ("only 3 left").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "camelCase")]
#[ts(export)]
pub enum QuantityChange {
    /// The line now has this quantity.
    Updated { quantity: i64 },
    /// The quantity reached zero and the line was dropped.
    Removed,
    /// Increment refused; tracked stock only has `available` units.
    StockLimitReached { available: i64 },
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - At most one line per product id (re-adding merges)
/// - Every line has quantity >= 1
/// - `table_id` and `table_number` are either both set or both empty
///
/// ## Serialized Layout
/// The serde shape of this struct is exactly the persisted cart state:
/// `{ items, tableId, tableNumber, notes, includeServiceFee }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Cart {
    #[serde(default)]
    items: Vec<CartItem>,
    #[serde(default)]
    table_id: Option<String>,
    #[serde(default)]
    table_number: Option<u32>,
    #[serde(default)]
    notes: String,
    #[serde(default = "default_true")]
    include_service_fee: bool,
}

impl Default for Cart {
    fn default() -> Self {
        Cart {
            items: Vec::new(),
            table_id: None,
            table_number: None,
            notes: String::new(),
            include_service_fee: true,
        }
    }
}

impl Cart {
    /// Creates an empty cart with the service fee enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repairs state that did not come from this type's own transitions
    /// (hand-edited or older persisted JSON).
    ///
    /// Drops lines with quantity < 1 or an out-of-range price, caps
    /// quantities and discounts at their maximum, and clears a half-set
    /// table selection.
    pub fn normalized(mut self) -> Self {
        self.items.retain(|item| {
            item.quantity >= 1 && validate_price_cents(item.product.price.cents()).is_ok()
        });
        for item in &mut self.items {
            item.quantity = item.quantity.min(MAX_ITEM_QUANTITY);
            item.product.discount = item.product.discount.min(100);
        }
        if self.table_id.is_none() || self.table_number.is_none() {
            self.table_id = None;
            self.table_number = None;
        }
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn item_for_product(&self, product_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn table_id(&self) -> Option<&str> {
        self.table_id.as_deref()
    }

    pub fn table_number(&self) -> Option<u32> {
        self.table_number
    }

    pub fn has_table(&self) -> bool {
        self.table_id.is_some()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn include_service_fee(&self) -> bool {
        self.include_service_fee
    }

    fn item_mut(&mut self, item_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CoreError::CartItemNotFound(item_id.to_string()))
    }

    // -------------------------------------------------------------------------
    // Item Collection
    // -------------------------------------------------------------------------

    /// Adds a product, or merges into the existing line for that product.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity increases by `quantity`; notes
    ///   are replaced only when the new notes are non-empty
    /// - Product not in cart: a new line is appended
    ///
    /// Stock is not checked here; [`Cart::validate`] reports it at checkout.
    ///
    /// ## Errors
    /// - `quantity` < 1, notes too long
    /// - resulting quantity above [`MAX_ITEM_QUANTITY`]
    pub fn add_item(&mut self, product: &Product, quantity: i64, notes: &str) -> CoreResult<&CartItem> {
        if quantity < 1 {
            return Err(CoreError::QuantityMustBePositive(quantity));
        }
        validate_quantity(quantity).map_err(|_| CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        })?;
        validate_notes(notes)?;
        let notes = notes.trim();

        if let Some(index) = self.items.iter().position(|i| i.product.id == product.id) {
            let item = &mut self.items[index];
            let new_qty = item
                .quantity
                .checked_add(quantity)
                .filter(|qty| *qty <= MAX_ITEM_QUANTITY)
                .ok_or(CoreError::QuantityTooLarge {
                    requested: item.quantity.saturating_add(quantity),
                    max: MAX_ITEM_QUANTITY,
                })?;
            item.quantity = new_qty;
            if !notes.is_empty() {
                item.notes = notes.to_string();
            }
            return Ok(&self.items[index]);
        }

        self.items
            .push(CartItem::new(product, quantity, notes.to_string()));
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Sets the quantity of a line. Zero or less removes it.
    pub fn update_item_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<QuantityChange> {
        if quantity <= 0 {
            return match self.remove_item(item_id) {
                Some(_) => Ok(QuantityChange::Removed),
                None => Err(CoreError::CartItemNotFound(item_id.to_string())),
            };
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let item = self.item_mut(item_id)?;
        item.quantity = quantity;
        Ok(QuantityChange::Updated { quantity })
    }

    /// Adds one unit, unless tracked stock would be exceeded.
    ///
    /// ## User Workflow
    /// ```text
    /// Tap "+" on "Mojito x3" (stock: 3)
    ///      │
    ///      ▼
    /// increment_item() ← THIS FUNCTION
    ///      │
    ///      ├── 4 > stock 3 → StockLimitReached { available: 3 }, cart unchanged
    ///      │
    ///      └── otherwise   → Updated { quantity: 4 }
    /// ```
    pub fn increment_item(&mut self, item_id: &str) -> CoreResult<QuantityChange> {
        let item = self.item_mut(item_id)?;
        let new_qty = item.quantity + 1;

        if item.product.exceeds_stock(new_qty) {
            return Ok(QuantityChange::StockLimitReached {
                available: item.product.stock,
            });
        }
        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        item.quantity = new_qty;
        Ok(QuantityChange::Updated { quantity: new_qty })
    }

    /// Removes one unit; the line goes away when it reaches zero.
    pub fn decrement_item(&mut self, item_id: &str) -> CoreResult<QuantityChange> {
        let current = self.item_mut(item_id)?.quantity;
        self.update_item_quantity(item_id, (current - 1).max(0))
    }

    /// Deletes a line. Returns it if it existed.
    pub fn remove_item(&mut self, item_id: &str) -> Option<CartItem> {
        let index = self.items.iter().position(|i| i.id == item_id)?;
        Some(self.items.remove(index))
    }

    /// Replaces the notes of one line.
    pub fn update_item_notes(&mut self, item_id: &str, notes: &str) -> CoreResult<()> {
        validate_notes(notes)?;
        let item = self.item_mut(item_id)?;
        item.notes = notes.trim().to_string();
        Ok(())
    }

    /// Resets lines, table, order notes, and turns the service fee back on.
    pub fn clear(&mut self) {
        *self = Cart::default();
    }

    // -------------------------------------------------------------------------
    // Table, Notes, Service Fee
    // -------------------------------------------------------------------------

    /// Selects the table. Both identifiers are set together.
    pub fn set_table(&mut self, table_id: &str, table_number: u32) -> CoreResult<()> {
        validate_table_id(table_id)?;
        validate_table_number(table_number)?;
        self.table_id = Some(table_id.trim().to_string());
        self.table_number = Some(table_number);
        Ok(())
    }

    /// Replaces the order-level notes.
    pub fn set_notes(&mut self, notes: &str) -> CoreResult<()> {
        validate_notes(notes)?;
        self.notes = notes.trim().to_string();
        Ok(())
    }

    pub fn set_include_service_fee(&mut self, include: bool) {
        self.include_service_fee = include;
    }

    // -------------------------------------------------------------------------
    // Derived Totals
    // -------------------------------------------------------------------------

    /// Sum of all line quantities.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of discounted line totals.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// 10% of the subtotal, or zero when the fee is switched off.
    pub fn service_fee(&self) -> Money {
        if self.include_service_fee {
            self.subtotal().percentage(SERVICE_FEE_BPS)
        } else {
            Money::zero()
        }
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.service_fee()
    }

    /// Estimated minutes until the order is ready.
    ///
    /// The kitchen prepares products in parallel, so the slowest product sets
    /// the base time; every started batch of three items adds two minutes.
    ///
    /// ```text
    /// Nachos (20 min) x2, Mojito (5 min) x2
    ///   base     = max(20, 5)        = 20
    ///   overhead = ceil(4 / 3) * 2   = 4
    ///   estimate                     = 24 minutes
    /// ```
    pub fn estimated_time(&self) -> u32 {
        if self.items.is_empty() {
            return 0;
        }

        let longest = self
            .items
            .iter()
            .map(|i| i.product.preparation_minutes())
            .max()
            .unwrap_or(DEFAULT_PREPARATION_MINUTES);

        let total_items = self.total_items();
        let batches = (total_items + ITEMS_PER_PREP_BATCH - 1) / ITEMS_PER_PREP_BATCH;
        let overhead = u32::try_from(batches).unwrap_or(u32::MAX / MINUTES_PER_PREP_BATCH);

        longest.saturating_add(overhead.saturating_mul(MINUTES_PER_PREP_BATCH))
    }

    /// Runs the pre-checkout gate.
    pub fn validate(&self) -> CartValidation {
        validate_cart(self)
    }

    /// Items, totals and table in the shape the checkout screen needs.
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            items: self.items.clone(),
            total_items: self.total_items(),
            subtotal: self.subtotal(),
            service_fee: self.service_fee(),
            total: self.total(),
            include_service_fee: self.include_service_fee,
            table_id: self.table_id.clone(),
            table_number: self.table_number,
            notes: self.notes.clone(),
            estimated_time: self.estimated_time(),
        }
    }

    // -------------------------------------------------------------------------
    // Save For Later
    // -------------------------------------------------------------------------

    /// Takes a "save for later" snapshot stamped with `saved_at`.
    pub fn snapshot(&self, saved_at: DateTime<Utc>) -> SavedCart {
        SavedCart {
            items: self.items.clone(),
            table_id: self.table_id.clone(),
            table_number: self.table_number,
            notes: self.notes.clone(),
            saved_at,
        }
    }

    /// Replaces lines, table and notes with the snapshot's.
    /// The service fee setting is kept.
    pub fn restore(&mut self, saved: SavedCart) {
        let restored = Cart {
            items: saved.items,
            table_id: saved.table_id,
            table_number: saved.table_number,
            notes: saved.notes,
            include_service_fee: self.include_service_fee,
        }
        .normalized();
        *self = restored;
    }
}

// =============================================================================
// Cart Summary
// =============================================================================

/// Everything the checkout screen and the order submission need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub total_items: i64,
    pub subtotal: Money,
    pub service_fee: Money,
    pub total: Money,
    pub include_service_fee: bool,
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
    pub notes: String,
    /// Minutes.
    pub estimated_time: u32,
}

// =============================================================================
// Saved Cart
// =============================================================================

/// A cart explicitly stashed by the user, restorable for 24 hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SavedCart {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub table_id: Option<String>,
    #[serde(default)]
    pub table_number: Option<u32>,
    #[serde(default)]
    pub notes: String,
    #[ts(as = "String")]
    pub saved_at: DateTime<Utc>,
}

impl SavedCart {
    /// Older than [`SAVED_CART_TTL_HOURS`] at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.saved_at) > Duration::hours(SAVED_CART_TTL_HOURS)
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::CartIssue;

    fn product(id: &str, price_cents: i64) -> Product {
        Product::new(id, format!("Product {}", id), Money::from_cents(price_cents))
    }

    fn line_id_for(cart: &Cart, product_id: &str) -> String {
        cart.item_for_product(product_id).unwrap().id.clone()
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let item = cart.add_item(&product("1", 999), 2, "no ice").unwrap();

        assert!(item.id.starts_with("1-"));
        assert_eq!(item.notes, "no ice");
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_items(), 2);
        assert_eq!(cart.subtotal().cents(), 1998);
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::new();
        let p = product("1", 999);

        cart.add_item(&p, 2, "no ice").unwrap();
        cart.add_item(&p, 3, "").unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        // Empty notes keep the previous ones
        assert_eq!(cart.items()[0].notes, "no ice");

        cart.add_item(&p, 1, "extra lime").unwrap();
        assert_eq!(cart.items()[0].notes, "extra lime");
        assert_eq!(cart.items()[0].quantity, 6);
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product("b", 100), 1, "").unwrap();
        cart.add_item(&product("a", 100), 1, "").unwrap();
        cart.add_item(&product("b", 100), 1, "").unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut cart = Cart::new();
        let p = product("1", 100);

        assert!(matches!(
            cart.add_item(&p, 0, ""),
            Err(CoreError::QuantityMustBePositive(0))
        ));
        assert!(matches!(
            cart.add_item(&p, 1000, ""),
            Err(CoreError::QuantityTooLarge { .. })
        ));

        cart.add_item(&p, 990, "").unwrap();
        assert!(cart.add_item(&p, 10, "").is_err());
        assert_eq!(cart.items()[0].quantity, 990);
    }

    #[test]
    fn test_merge_with_huge_quantity_leaves_line_alone() {
        let mut cart = Cart::new();
        let p = product("1", 100);
        cart.add_item(&p, 1, "").unwrap();

        assert!(matches!(
            cart.add_item(&p, i64::MAX, ""),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.subtotal().cents(), 100);
    }

    #[test]
    fn test_line_keeps_price_snapshot() {
        let mut cart = Cart::new();
        let mut p = product("1", 1000);
        cart.add_item(&p, 1, "").unwrap();

        p.price = Money::from_cents(5000);
        assert_eq!(cart.subtotal().cents(), 1000);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 1, "").unwrap();
        let id = line_id_for(&cart, "1");

        assert_eq!(
            cart.update_item_quantity(&id, 4).unwrap(),
            QuantityChange::Updated { quantity: 4 }
        );
        assert_eq!(cart.total_items(), 4);

        assert_eq!(
            cart.update_item_quantity(&id, 0).unwrap(),
            QuantityChange::Removed
        );
        assert!(cart.item(&id).is_none());

        assert!(matches!(
            cart.update_item_quantity(&id, 2),
            Err(CoreError::CartItemNotFound(_))
        ));
    }

    #[test]
    fn test_decrement_floor_removes_line() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 2, "").unwrap();
        let id = line_id_for(&cart, "1");

        assert_eq!(
            cart.decrement_item(&id).unwrap(),
            QuantityChange::Updated { quantity: 1 }
        );
        assert_eq!(cart.decrement_item(&id).unwrap(), QuantityChange::Removed);
        assert!(cart.item(&id).is_none());
        assert!(cart.is_empty());
        assert!(cart.decrement_item(&id).is_err());
    }

    #[test]
    fn test_increment_respects_tracked_stock() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500).with_stock(3), 2, "").unwrap();
        let id = line_id_for(&cart, "1");

        assert_eq!(
            cart.increment_item(&id).unwrap(),
            QuantityChange::Updated { quantity: 3 }
        );
        assert_eq!(
            cart.increment_item(&id).unwrap(),
            QuantityChange::StockLimitReached { available: 3 }
        );
        assert_eq!(cart.item(&id).unwrap().quantity, 3);
    }

    #[test]
    fn test_increment_untracked_stock() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 1, "").unwrap();
        let id = line_id_for(&cart, "1");

        for _ in 0..5 {
            cart.increment_item(&id).unwrap();
        }
        assert_eq!(cart.item(&id).unwrap().quantity, 6);
    }

    #[test]
    fn test_remove_and_notes() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 1, "").unwrap();
        let id = line_id_for(&cart, "1");

        cart.update_item_notes(&id, "  well done ").unwrap();
        assert_eq!(cart.item(&id).unwrap().notes, "well done");

        let removed = cart.remove_item(&id).unwrap();
        assert_eq!(removed.product.id, "1");
        assert!(cart.remove_item(&id).is_none());
    }

    #[test]
    fn test_discount_subtotal() {
        let mut cart = Cart::new();
        let p = product("1", 10000).with_discount(20);
        cart.add_item(&p, 2, "").unwrap();

        assert_eq!(cart.items()[0].unit_price().cents(), 8000);
        assert_eq!(cart.subtotal().cents(), 16000);
    }

    #[test]
    fn test_service_fee_toggle() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10000), 2, "").unwrap();

        assert_eq!(cart.subtotal().cents(), 20000);
        assert_eq!(cart.service_fee().cents(), 2000);
        assert_eq!(cart.total().cents(), 22000);

        cart.set_include_service_fee(false);
        assert!(cart.service_fee().is_zero());
        assert_eq!(cart.total().cents(), 20000);
    }

    #[test]
    fn test_totals_are_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 1234).with_discount(15), 3, "").unwrap();
        cart.add_item(&product("2", 777), 1, "").unwrap();

        assert_eq!(cart.subtotal(), cart.subtotal());
        assert_eq!(cart.total(), cart.total());
        assert_eq!(cart.summary(), cart.summary());
    }

    #[test]
    fn test_estimated_time() {
        let mut cart = Cart::new();
        assert_eq!(cart.estimated_time(), 0);

        cart.add_item(&product("nachos", 900).with_preparation_time(20), 2, "")
            .unwrap();
        cart.add_item(&product("mojito", 700).with_preparation_time(10), 2, "")
            .unwrap();
        // 20 + ceil(4 / 3) * 2
        assert_eq!(cart.estimated_time(), 24);

        let mut single = Cart::new();
        single.add_item(&product("x", 100), 1, "").unwrap();
        // default 15 + ceil(1 / 3) * 2
        assert_eq!(single.estimated_time(), 17);
    }

    #[test]
    fn test_set_table_and_validation_gate() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500).with_stock(5), 2, "").unwrap();

        let result = cart.validate();
        assert!(!result.is_valid);
        assert!(result.errors.contains(&CartIssue::NoTableSelected));

        cart.set_table("t-7", 7).unwrap();
        assert_eq!(cart.table_id(), Some("t-7"));
        assert_eq!(cart.table_number(), Some(7));

        let result = cart.validate();
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_set_table_rejects_blank_id() {
        let mut cart = Cart::new();
        assert!(cart.set_table("  ", 3).is_err());
        assert!(cart.set_table("t-3", 0).is_err());
        assert!(!cart.has_table());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 2, "").unwrap();
        cart.set_table("t-1", 1).unwrap();
        cart.set_notes("birthday").unwrap();
        cart.set_include_service_fee(false);

        cart.clear();

        assert!(cart.items().is_empty());
        assert_eq!(cart.table_id(), None);
        assert_eq!(cart.table_number(), None);
        assert_eq!(cart.notes(), "");
        assert!(cart.include_service_fee());
    }

    #[test]
    fn test_summary() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 10000).with_discount(20), 2, "").unwrap();
        cart.set_table("t-4", 4).unwrap();
        cart.set_notes("window seat").unwrap();

        let summary = cart.summary();
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.subtotal.cents(), 16000);
        assert_eq!(summary.service_fee.cents(), 1600);
        assert_eq!(summary.total.cents(), 17600);
        assert_eq!(summary.table_id.as_deref(), Some("t-4"));
        assert_eq!(summary.table_number, Some(4));
        assert_eq!(summary.notes, "window seat");
    }

    #[test]
    fn test_persisted_layout() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 1, "").unwrap();
        cart.set_table("t-2", 2).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["tableId"], "t-2");
        assert_eq!(json["tableNumber"], 2);
        assert_eq!(json["notes"], "");
        assert_eq!(json["includeServiceFee"], true);
        assert_eq!(json["items"][0]["quantity"], 1);

        let back: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_missing_service_fee_flag_defaults_to_true() {
        let cart: Cart = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert!(cart.include_service_fee());
        assert!(!cart.has_table());
    }

    #[test]
    fn test_normalized_repairs_foreign_state() {
        let json = r#"{
            "items": [
                {"id":"a-1","product":{"id":"a","name":"A","price":100},"quantity":0},
                {"id":"b-1","product":{"id":"b","name":"B","price":100},"quantity":2}
            ],
            "tableId": "t-1"
        }"#;
        let cart: Cart = serde_json::from_str::<Cart>(json).unwrap().normalized();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].id, "b-1");
        assert!(!cart.has_table());
    }

    #[test]
    fn test_normalized_clamps_discount_and_drops_absurd_prices() {
        let json = r#"{
            "items": [
                {"id":"a-1","product":{"id":"a","name":"A","price":1000,"discount":150},"quantity":2},
                {"id":"b-1","product":{"id":"b","name":"B","price":9223372036854775807},"quantity":2}
            ]
        }"#;
        let cart: Cart = serde_json::from_str::<Cart>(json).unwrap().normalized();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.items()[0].product.discount, 100);
        assert_eq!(cart.items()[0].unit_price().cents(), 0);
        assert_eq!(cart.subtotal().cents(), 0);
    }

    #[test]
    fn test_snapshot_and_restore() {
        let mut cart = Cart::new();
        cart.add_item(&product("1", 500), 3, "").unwrap();
        cart.set_table("t-9", 9).unwrap();
        cart.set_notes("later").unwrap();

        let now = Utc::now();
        let saved = cart.snapshot(now);
        assert_eq!(saved.item_count(), 3);

        let mut other = Cart::new();
        other.set_include_service_fee(false);
        other.restore(saved);

        assert_eq!(other.items(), cart.items());
        assert_eq!(other.table_number(), Some(9));
        assert_eq!(other.notes(), "later");
        assert!(!other.include_service_fee());
    }

    #[test]
    fn test_saved_cart_staleness() {
        let now = Utc::now();
        let cart = Cart::new();

        assert!(!cart.snapshot(now - Duration::hours(23)).is_stale(now));
        assert!(!cart.snapshot(now - Duration::hours(24)).is_stale(now));
        assert!(cart.snapshot(now - Duration::hours(25)).is_stale(now));
    }
}
