//! Expired share sweep and orphaned blob cleanup.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde_json::Value;

use ziply_core::traits::storage::ObjectStorage;
use ziply_database::ShareStore;
use ziply_service::share::release_blob;

use crate::executor::{JobExecutionError, JobHandler};

/// Deletes shares whose expiry has passed, releasing file blobs.
#[derive(Debug)]
pub struct ExpiredShareSweep {
    store: Arc<dyn ShareStore>,
    storage: Arc<dyn ObjectStorage>,
    /// Records removed per store call
    batch_size: u32,
}

impl ExpiredShareSweep {
    /// Job type name used for scheduling
    pub const JOB_TYPE: &'static str = "expired_share_sweep";

    /// Create a new sweep handler
    pub fn new(store: Arc<dyn ShareStore>, storage: Arc<dyn ObjectStorage>, batch_size: u32) -> Self {
        Self {
            store,
            storage,
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl JobHandler for ExpiredShareSweep {
    fn job_type(&self) -> &str {
        Self::JOB_TYPE
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let now = Utc::now();
        let mut removed = 0usize;
        let mut blobs = 0usize;

        loop {
            let batch = self
                .store
                .delete_expired(now, self.batch_size)
                .await
                .map_err(|e| JobExecutionError::Transient(format!("Expiry sweep failed: {e}")))?;

            removed += batch.len();
            for share in &batch {
                if let Some(storage_key) = share.storage_key() {
                    release_blob(self.storage.as_ref(), storage_key).await;
                    blobs += 1;
                }
            }

            if batch.len() < self.batch_size as usize {
                break;
            }
        }

        if removed > 0 {
            tracing::info!(removed, blobs, "Swept expired shares");
        }

        Ok(serde_json::json!({
            "task": Self::JOB_TYPE,
            "expired_shares_removed": removed,
            "blobs_released": blobs,
        }))
    }
}

/// Removes blobs no share refers to, such as uploads whose grant was never
/// turned into a share.
#[derive(Debug)]
pub struct OrphanBlobJanitor {
    store: Arc<dyn ShareStore>,
    storage: Arc<dyn ObjectStorage>,
    /// Minimum blob age before it may be removed
    grace: Duration,
}

impl OrphanBlobJanitor {
    /// Job type name used for scheduling
    pub const JOB_TYPE: &'static str = "orphan_blob_janitor";

    /// Create a new janitor handler
    pub fn new(
        store: Arc<dyn ShareStore>,
        storage: Arc<dyn ObjectStorage>,
        grace_minutes: i64,
    ) -> Self {
        Self {
            store,
            storage,
            grace: Duration::minutes(grace_minutes.max(0)),
        }
    }
}

#[async_trait]
impl JobHandler for OrphanBlobJanitor {
    fn job_type(&self) -> &str {
        Self::JOB_TYPE
    }

    async fn execute(&self) -> Result<Value, JobExecutionError> {
        let now = Utc::now();
        let cutoff = now - self.grace;
        let holds_purged = self.store.purge_blob_holds(now).await?;
        let objects = self
            .storage
            .list("")
            .await
            .map_err(|e| JobExecutionError::Transient(format!("Blob listing failed: {e}")))?;

        let mut removed = 0usize;
        for object in &objects {
            // Blobs without a timestamp could be in-flight uploads.
            let Some(modified) = object.last_modified else {
                continue;
            };
            if modified > cutoff {
                continue;
            }
            if self.store.is_storage_key_referenced(&object.key, now).await? {
                continue;
            }
            release_blob(self.storage.as_ref(), &object.key).await;
            removed += 1;
        }

        if removed > 0 {
            tracing::info!(scanned = objects.len(), removed, "Removed orphaned blobs");
        }

        Ok(serde_json::json!({
            "task": Self::JOB_TYPE,
            "blobs_scanned": objects.len(),
            "orphans_removed": removed,
            "holds_purged": holds_purged,
        }))
    }
}
