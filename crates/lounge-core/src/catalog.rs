//! # Catalog Module
//!
//! Menu filtering and sorting over normalized products.
//!
//! ```text
//! products ──► category? ──► available_only? ──► price range? ──► search? ──► sort
//! ```
//!
//! Loading the menu (file, remote) is the storefront's job. Everything here
//! works on a slice that is already in memory.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::Product;

// =============================================================================
// Menu Sort
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MenuSort {
    #[default]
    Name,
    /// Cheapest first, by discounted price.
    PriceAsc,
    PriceDesc,
    /// Fastest to prepare first.
    PreparationTime,
    /// Biggest discount first.
    Discount,
}

impl MenuSort {
    pub const ALL: [MenuSort; 5] = [
        MenuSort::Name,
        MenuSort::PriceAsc,
        MenuSort::PriceDesc,
        MenuSort::PreparationTime,
        MenuSort::Discount,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuSort::Name => "name",
            MenuSort::PriceAsc => "price_asc",
            MenuSort::PriceDesc => "price_desc",
            MenuSort::PreparationTime => "preparation_time",
            MenuSort::Discount => "discount",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self {
            MenuSort::Name => Ordering::Equal,
            MenuSort::PriceAsc => a.effective_price().cmp(&b.effective_price()),
            MenuSort::PriceDesc => b.effective_price().cmp(&a.effective_price()),
            MenuSort::PreparationTime => a.preparation_minutes().cmp(&b.preparation_minutes()),
            MenuSort::Discount => b.discount.cmp(&a.discount),
        };
        primary.then_with(|| by_name(a, b))
    }
}

fn by_name(a: &Product, b: &Product) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}

impl fmt::Display for MenuSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MenuSort {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        MenuSort::ALL
            .into_iter()
            .find(|sort| sort.as_str() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "sort".to_string(),
                allowed: MenuSort::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            })
    }
}

// =============================================================================
// Menu Query
// =============================================================================

/// Filters applied to the menu. The default query returns everything,
/// sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct MenuQuery {
    /// Exact category match, case-insensitive.
    pub category: Option<String>,
    /// Substring over name, description and category, case-insensitive.
    pub search: Option<String>,
    /// Hide inactive and sold-out products.
    pub available_only: bool,
    /// Inclusive, on the discounted price.
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
    pub sort: MenuSort,
}

impl MenuQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn available_only(mut self) -> Self {
        self.available_only = true;
        self
    }

    pub fn price_range(mut self, min: Option<Money>, max: Option<Money>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn sort(mut self, sort: MenuSort) -> Self {
        self.sort = sort;
        self
    }

    /// True when `product` passes every filter of this query.
    pub fn matches(&self, product: &Product) -> bool {
        if self.available_only && !product.is_available() {
            return false;
        }

        if let Some(category) = non_empty(&self.category) {
            let same = product
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category));
            if !same {
                return false;
            }
        }

        let price = product.effective_price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if let Some(search) = non_empty(&self.search) {
            let needle = search.to_lowercase();
            let hit = [
                Some(product.name.as_str()),
                product.description.as_deref(),
                product.category.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// =============================================================================
// Operations
// =============================================================================

/// Applies `query` to `products` and returns the matching products, sorted.
///
/// ## Example
/// ```rust
/// use lounge_core::catalog::filter_products;
/// use lounge_core::{MenuQuery, MenuSort, Money, Product};
///
/// let menu = vec![
///     Product::new("a", "Negroni", Money::from_cents(1200)).with_category("Cocktails"),
///     Product::new("b", "Nachos", Money::from_cents(900)).with_category("Tapas"),
/// ];
///
/// let cocktails = filter_products(&menu, &MenuQuery::new().category("cocktails"));
/// assert_eq!(cocktails.len(), 1);
///
/// let cheap_first = filter_products(&menu, &MenuQuery::new().sort(MenuSort::PriceAsc));
/// assert_eq!(cheap_first[0].name, "Nachos");
/// ```
pub fn filter_products(products: &[Product], query: &MenuQuery) -> Vec<Product> {
    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| query.matches(p))
        .cloned()
        .collect();

    matched.sort_by(|a, b| query.sort.compare(a, b));
    matched
}

/// Distinct categories, sorted alphabetically.
pub fn categories(products: &[Product]) -> Vec<String> {
    products
        .iter()
        .filter_map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Looks up a product by id.
pub fn find_product<'a>(products: &'a [Product], id: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.id == id)
}

// =============================================================================
// Unit Tests
// =============================================================================
