//! # Order Module
//!
//! The checkout submission payload and the receipt that comes back.
//!
//! ```text
//! Cart ──summary()──► CartSummary ──from_summary()──► OrderRequest ──► gateway
//!                                                                        │
//!                                          OrderReceipt { orderId } ◄────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartSummary;
use crate::money::Money;
use crate::types::PaymentMethod;

/// One line of an order, priced at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderItemRequest {
    pub product_id: String,
    pub quantity: i64,
    pub notes: String,
    /// Discounted unit price.
    pub unit_price: Money,
}

/// Payload sent to the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderRequest {
    pub table_id: Option<String>,
    pub table_number: Option<u32>,
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    pub service_fee: Money,
    pub total: Money,
    pub notes: String,
}

impl OrderRequest {
    /// Builds the payload from a cart summary.
    ///
    /// Totals are copied from the summary, not recomputed, so the request
    /// always matches what the user confirmed on screen.
    pub fn from_summary(summary: &CartSummary, payment_method: PaymentMethod) -> Self {
        let items = summary
            .items
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product.id.clone(),
                quantity: item.quantity,
                notes: item.notes.clone(),
                unit_price: item.unit_price(),
            })
            .collect();

        OrderRequest {
            table_id: summary.table_id.clone(),
            table_number: summary.table_number,
            items,
            payment_method,
            subtotal: summary.subtotal,
            service_fee: summary.service_fee,
            total: summary.total,
            notes: summary.notes.clone(),
        }
    }

    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Returned by the order endpoint when an order is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderReceipt {
    pub order_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total: Money,
    /// Minutes until ready, as estimated when the order was placed.
    pub estimated_time: u32,
}
