//! The share record store abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use ziply_core::config::DatabaseConfig;
use ziply_core::{AppError, AppResult};
use ziply_entity::share::{NewShare, Share};

use crate::connection::DatabasePool;
use crate::memory::MemoryShareStore;
use crate::migration::run_migrations;
use crate::repositories::PgShareRepository;

/// Persistence for share records.
///
/// Every mutating operation is a single atomic step so concurrent requests
/// never observe a half-applied change. Deletes are "delete if still
/// present" and report whether this call removed the record.
#[async_trait]
pub trait ShareStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a new share. Fails with `Conflict` when a live share already
    /// holds the short id. An expired record holding the id is replaced.
    async fn create(&self, share: &NewShare) -> AppResult<Share>;

    /// Look up a share by short id, expired or not.
    async fn find_by_short_id(&self, short_id: &str) -> AppResult<Option<Share>>;

    /// Add one to the view counter and return the new value, or `None` if
    /// the share no longer exists.
    async fn increment_views(&self, short_id: &str) -> AppResult<Option<i64>>;

    /// Delete exactly the record with this short id and row id. A newer
    /// share that reused the short id is left alone.
    async fn delete_record(&self, short_id: &str, id: Uuid) -> AppResult<bool>;

    /// Atomically fetch and delete exactly the record with this short id and
    /// row id. At most one caller receives it.
    async fn take_record(&self, short_id: &str, id: Uuid) -> AppResult<Option<Share>>;

    /// Remove up to `limit` shares whose expiry passed before `now` and
    /// return them.
    async fn delete_expired(&self, now: DateTime<Utc>, limit: u32) -> AppResult<Vec<Share>>;

    /// Whether any stored share points at the given blob, or a hold on it
    /// lasts past `now`.
    async fn is_storage_key_referenced(
        &self,
        storage_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Keep a blob off the janitor's list until `until`. An existing hold is
    /// only ever extended.
    async fn hold_blob(&self, storage_key: &str, until: DateTime<Utc>) -> AppResult<()>;

    /// Drop the hold on a blob, if any.
    async fn release_blob_hold(&self, storage_key: &str) -> AppResult<()>;

    /// Drop every hold that ended before `now` and return how many went.
    async fn purge_blob_holds(&self, now: DateTime<Utc>) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Build the store selected by `database.provider`, running migrations for
/// PostgreSQL when enabled.
pub async fn build_share_store(config: &DatabaseConfig) -> AppResult<Arc<dyn ShareStore>> {
    match config.provider.as_str() {
        "postgres" => {
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                run_migrations(db.pool()).await?;
            }
            Ok(Arc::new(PgShareRepository::new(db.into_pool())))
        }
        "memory" => {
            info!("Using in-memory share store; records are lost on restart");
            Ok(Arc::new(MemoryShareStore::new()))
        }
        other => Err(AppError::configuration(format!(
            "Unknown database provider '{other}'"
        ))),
    }
}
