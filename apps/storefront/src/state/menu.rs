//! # Menu State
//!
//! The product catalog, loaded once from a JSON menu file.
//!
//! ## Loading
//! ```text
//! menu.json  [ {...}, {...}, ... ]
//!      │
//!      ▼
//! each entry ──► ProductInput ──► Product::try_from
//!      │                               │
//!      │ not an object / bad types     ├── rejected ──► warn!, skipped
//!      └──► warn!, skipped             ├── duplicate id ──► warn!, skipped
//!                                      └── ok ──► catalog
//! ```
//!
//! One bad entry never takes the whole menu down. A file that is missing or
//! is not a JSON array does.

use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use lounge_core::catalog::{categories, filter_products, find_product};
use lounge_core::{MenuQuery, Product, ProductInput};

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Could not read menu file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Menu file {path} is not a JSON array of products: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only product catalog.
#[derive(Debug, Clone, Default)]
pub struct MenuState {
    products: Vec<Product>,
}

impl MenuState {
    pub fn new(products: Vec<Product>) -> Self {
        MenuState { products }
    }

    /// Reads and normalizes the menu file.
    pub async fn load(path: &Path) -> Result<Self, MenuError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| MenuError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let menu = Self::from_json(&raw).map_err(|source| MenuError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(
            path = %path.display(),
            products = menu.products.len(),
            "Menu loaded"
        );
        Ok(menu)
    }

    /// Parses a JSON array of raw products, skipping entries that cannot be
    /// normalized.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let entries: Vec<Value> = serde_json::from_str(raw)?;
        let mut products: Vec<Product> = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            let input: ProductInput = match serde_json::from_value(entry) {
                Ok(input) => input,
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed menu entry");
                    continue;
                }
            };

            let product = match Product::try_from(input) {
                Ok(product) => product,
                Err(e) => {
                    warn!(index, error = %e, "Skipping invalid menu entry");
                    continue;
                }
            };

            if products.iter().any(|p| p.id == product.id) {
                warn!(index, id = %product.id, "Skipping duplicate menu entry");
                continue;
            }

            products.push(product);
        }

        Ok(MenuState { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: &str) -> Option<&Product> {
        find_product(&self.products, id)
    }

    pub fn query(&self, query: &MenuQuery) -> Vec<Product> {
        filter_products(&self.products, query)
    }

    pub fn categories(&self) -> Vec<String> {
        categories(&self.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MENU: &str = r#"[
        {"id": "mojito", "name": "Mojito", "category": "Cocktails", "priceCents": 1200, "preparationTime": 5},
        {"id": "nachos", "name": "Nachos", "category": "Tapas", "priceCents": 900, "discount": 10, "hasStock": true, "stock": 4},
        {"id": "mojito", "name": "Mojito again", "priceCents": 1},
        {"id": "ghost", "name": "", "priceCents": 100},
        {"id": "free", "name": "Water", "priceCents": -5},
        {"id": 42, "name": "Wrong types", "priceCents": "cheap"},
        "not an object"
    ]"#;

    #[test]
    fn test_bad_entries_are_skipped() {
        let menu = MenuState::from_json(MENU).unwrap();

        let ids: Vec<&str> = menu.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["mojito", "nachos"]);
        assert_eq!(menu.find("mojito").unwrap().name, "Mojito");
        assert_eq!(menu.find("nachos").unwrap().effective_price().cents(), 810);
        assert_eq!(menu.categories(), vec!["Cocktails", "Tapas"]);
    }

    #[test]
    fn test_not_an_array() {
        assert!(MenuState::from_json(r#"{"id": "x"}"#).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MENU.as_bytes()).unwrap();

        let menu = MenuState::load(file.path()).await.unwrap();
        assert_eq!(menu.products().len(), 2);

        let available = menu.query(&MenuQuery::new().available_only().category("tapas"));
        assert_eq!(available.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = MenuState::load(&dir.path().join("nope.json")).await;
        assert!(matches!(result, Err(MenuError::Io { .. })));
    }
}
