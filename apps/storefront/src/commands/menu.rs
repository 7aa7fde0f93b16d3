//! # Menu Commands
//!
//! Read-only views over the loaded catalog.

use tracing::debug;

use crate::state::MenuState;
use lounge_core::{MenuQuery, Product};

/// Products matching `query`, already sorted.
pub fn list_menu(menu: &MenuState, query: &MenuQuery) -> Vec<Product> {
    debug!(?query, "list_menu command");
    menu.query(query)
}

pub fn list_categories(menu: &MenuState) -> Vec<String> {
    debug!("list_categories command");
    menu.categories()
}
