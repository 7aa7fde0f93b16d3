//! # Order History Commands
//!
//! Lists what the local order outbox has recorded.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use crate::state::DbState;
use lounge_core::{Money, PaymentMethod};
use lounge_db::OrderRecord;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 200;

/// One row of the order history, without the raw payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryDto {
    pub id: String,
    pub table_number: Option<i64>,
    pub payment_method: PaymentMethod,
    pub total_items: i64,
    pub total: Money,
    pub created_at: String,
}

impl From<OrderRecord> for OrderSummaryDto {
    fn from(record: OrderRecord) -> Self {
        OrderSummaryDto {
            total: record.total(),
            id: record.id,
            table_number: record.table_number,
            payment_method: record.payment_method,
            total_items: record.total_items,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// Most recent orders first. `limit` defaults to 20 and is capped at 200.
pub async fn list_orders(db: &DbState, limit: Option<u32>) -> Result<Vec<OrderSummaryDto>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    debug!(limit, "list_orders command");

    let records = db.inner().orders().list_recent(limit).await?;
    Ok(records.into_iter().map(OrderSummaryDto::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use lounge_core::{Cart, OrderRequest, Product};

    fn request(table: u32) -> OrderRequest {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("beer", "Beer", Money::from_cents(600)), 3, "")
            .unwrap();
        cart.set_table(&format!("t-{}", table), table).unwrap();
        OrderRequest::from_summary(&cart.summary(), PaymentMethod::Cash)
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let db = DbState::in_memory().await.unwrap();
        let now = Utc::now();
        let orders = db.inner().orders();
        orders.insert(&request(1), now - Duration::minutes(5)).await.unwrap();
        orders.insert(&request(2), now).await.unwrap();

        let listed = list_orders(&db, None).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].table_number, Some(2));
        assert_eq!(listed[0].total.cents(), 1980);
        assert_eq!(listed[0].total_items, 3);

        assert_eq!(list_orders(&db, Some(0)).await.unwrap().len(), 1);
    }
}
