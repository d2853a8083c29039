//! Best-effort blob cleanup.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use ziply_core::AppError;
use ziply_core::result::AppResult;
use ziply_core::traits::storage::ObjectStorage;
use ziply_database::ShareStore;

/// Remove a blob, logging instead of failing. Metadata deletion is the
/// authoritative signal; a leftover blob is picked up by the janitor.
pub async fn release_blob(storage: &dyn ObjectStorage, storage_key: &str) {
    match storage.remove(storage_key).await {
        Ok(()) => debug!(storage_key, "Blob released"),
        Err(e) => warn!(storage_key, error = %e, "Failed to release blob"),
    }
}

/// Release a blob after `delay` in a detached task, then drop its hold.
///
/// The caller places the hold first, so the janitor leaves the blob alone
/// until then. If this task never runs, the janitor takes over once the
/// hold lapses.
pub fn release_blob_later(
    store: Arc<dyn ShareStore>,
    storage: Arc<dyn ObjectStorage>,
    storage_key: String,
    delay: Duration,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        release_blob(storage.as_ref(), &storage_key).await;
        if let Err(e) = store.release_blob_hold(&storage_key).await {
            warn!(storage_key, error = %e, "Failed to drop blob hold");
        }
    });
}

/// The instant `ttl` after `now`.
pub(crate) fn deadline(now: DateTime<Utc>, ttl: Duration) -> AppResult<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(ttl)
        .map_err(|e| AppError::internal(format!("Invalid duration: {e}")))?;
    Ok(now + ttl)
}
