//! # Database State
//!
//! Wraps the `Database` handle for the commands layer.
//!
//! The inner `SqlitePool` is thread-safe, so commands share it without
//! extra locking.

use lounge_db::{Database, DbConfig, DbResult};

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Fresh in-memory database with migrations applied.
    pub async fn in_memory() -> DbResult<Self> {
        Ok(DbState::new(Database::new(DbConfig::in_memory()).await?))
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }
}
