//! # Storage Repository
//!
//! Namespaced key/value storage holding JSON documents.
//!
//! ```text
//! ┌──────────────────────┬──────────────────────────────┬──────────────────────┐
//! │ key                  │ value (JSON text)            │ updated_at           │
//! ├──────────────────────┼──────────────────────────────┼──────────────────────┤
//! │ lounge-cart          │ {"items":[...],"tableId":..} │ 2026-10-18T20:15:... │
//! │ lounge-saved-cart    │ {"items":[...],"savedAt":..} │ 2026-10-18T19:02:... │
//! └──────────────────────┴──────────────────────────────┴──────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct StorageRepository {
    pool: SqlitePool,
}

impl StorageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StorageRepository { pool }
    }

    /// Raw value for `key`, if present.
    pub async fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM storage WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Inserts or replaces the value for `key`.
    pub async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = value.len(), "Storage value written");
        Ok(())
    }

    /// Deletes `key`. Returns whether a row was removed.
    pub async fn remove(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Decodes the JSON value under `key`.
    ///
    /// ## Returns
    /// * `Ok(None)` - key not present
    /// * `Err(DbError::Serialization)` - value present but not valid for `T`
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw).await
    }

    /// All keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        count: i64,
    }

    async fn storage() -> StorageRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().storage()
    }

    #[tokio::test]
    async fn test_set_get_overwrite_remove() {
        let storage = storage().await;

        assert_eq!(storage.get("k").await.unwrap(), None);

        storage.set("k", "one").await.unwrap();
        storage.set("k", "two").await.unwrap();
        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(storage.keys().await.unwrap(), vec!["k".to_string()]);

        assert!(storage.remove("k").await.unwrap());
        assert!(!storage.remove("k").await.unwrap());
        assert_eq!(storage.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_values() {
        let storage = storage().await;

        storage.set_json("doc", &Doc { count: 3 }).await.unwrap();
        let doc: Option<Doc> = storage.get_json("doc").await.unwrap();
        assert_eq!(doc, Some(Doc { count: 3 }));

        storage.set("doc", "{broken").await.unwrap();
        let result = storage.get_json::<Doc>("doc").await;
        assert!(matches!(result, Err(DbError::Serialization(_))));
    }
}
