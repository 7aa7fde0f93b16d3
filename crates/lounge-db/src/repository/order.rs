//! # Order Repository
//!
//! Local outbox of submitted orders.
//!
//! ```text
//! checkout ──► OrderRepository::insert(OrderRequest)
//!                   │
//!                   ▼
//!   orders ┌──────────┬───────┬─────────┬─────────────┬──────────────┐
//!          │ id(uuid) │ table │ payment │ total_cents │ payload JSON │
//!          └──────────┴───────┴─────────┴─────────────┴──────────────┘
//! ```
//!
//! The full request is stored as JSON so it can be forwarded to a remote
//! endpoint later without reconstructing it from columns.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use lounge_core::{Money, OrderRequest, PaymentMethod};

/// One row of the `orders` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct OrderRecord {
    pub id: String,
    pub table_id: Option<String>,
    pub table_number: Option<i64>,
    pub payment_method: PaymentMethod,
    pub total_items: i64,
    pub subtotal_cents: i64,
    pub service_fee_cents: i64,
    pub total_cents: i64,
    pub notes: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Decodes the stored request.
    pub fn request(&self) -> DbResult<OrderRequest> {
        Ok(serde_json::from_str(&self.payload)?)
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT
        id, table_id, table_number, payment_method, total_items,
        subtotal_cents, service_fee_cents, total_cents, notes, payload, created_at
    FROM orders
"#;

#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Records an order and assigns it a new UUID.
    pub async fn insert(
        &self,
        request: &OrderRequest,
        created_at: DateTime<Utc>,
    ) -> DbResult<OrderRecord> {
        let record = OrderRecord {
            id: Uuid::new_v4().to_string(),
            table_id: request.table_id.clone(),
            table_number: request.table_number.map(i64::from),
            payment_method: request.payment_method,
            total_items: request.total_items(),
            subtotal_cents: request.subtotal.cents(),
            service_fee_cents: request.service_fee.cents(),
            total_cents: request.total.cents(),
            notes: request.notes.clone(),
            payload: serde_json::to_string(request)?,
            created_at,
        };

        debug!(
            id = %record.id,
            table = ?record.table_number,
            total_cents = record.total_cents,
            "Inserting order"
        );

        sqlx::query(
            r#"
            INSERT INTO orders (
                id, table_id, table_number, payment_method, total_items,
                subtotal_cents, service_fee_cents, total_cents, notes, payload, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&record.id)
        .bind(&record.table_id)
        .bind(record.table_number)
        .bind(record.payment_method)
        .bind(record.total_items)
        .bind(record.subtotal_cents)
        .bind(record.service_fee_cents)
        .bind(record.total_cents)
        .bind(&record.notes)
        .bind(&record.payload)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<OrderRecord>> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let record = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Like [`get_by_id`](Self::get_by_id) but missing is an error.
    pub async fn get(&self, id: &str) -> DbResult<OrderRecord> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", id))
    }

    /// Most recent orders first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<OrderRecord>> {
        let sql = format!("{} ORDER BY created_at DESC, id LIMIT ?1", SELECT_COLUMNS);
        let records = sqlx::query_as::<_, OrderRecord>(&sql)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
