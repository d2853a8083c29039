//! Test doubles for share service tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use ziply_core::AppError;
use ziply_core::result::AppResult;
use ziply_core::traits::storage::{ObjectStorage, SignedUpload, StoredObject};

/// Object storage that records calls and can be told to fail.
#[derive(Debug, Default)]
pub struct MockObjectStorage {
    pub uploads: Mutex<Vec<String>>,
    pub removes: Mutex<Vec<String>>,
    pub fail_uploads: AtomicBool,
    pub fail_signing: AtomicBool,
    pub fail_previews: AtomicBool,
    pub fail_removes: AtomicBool,
    pub missing_blobs: AtomicBool,
}

impl MockObjectStorage {
    pub fn removed(&self) -> Vec<String> {
        self.removes.lock().unwrap().clone()
    }

    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }

    fn check(flag: &AtomicBool, what: &str) -> AppResult<()> {
        if flag.load(Ordering::SeqCst) {
            Err(AppError::storage(format!("{what} failed")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    fn provider_type(&self) -> &str {
        "mock"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn upload(&self, key: &str, _data: Bytes, _content_type: &str) -> AppResult<String> {
        Self::check(&self.fail_uploads, "upload")?;
        self.uploads.lock().unwrap().push(key.to_string());
        Ok(key.to_string())
    }

    async fn create_signed_download_url(
        &self,
        key: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String> {
        Self::check(&self.fail_signing, "signing")?;
        Ok(format!(
            "https://blobs.test/{key}?ttl={}&download={}",
            ttl.as_secs(),
            download_name.unwrap_or_default()
        ))
    }

    async fn create_signed_preview_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        Self::check(&self.fail_previews, "preview")?;
        Ok(format!("https://blobs.test/{key}?ttl={}", ttl.as_secs()))
    }

    async fn create_signed_upload_url(
        &self,
        key: &str,
        _content_type: &str,
        ttl: Duration,
    ) -> AppResult<SignedUpload> {
        Self::check(&self.fail_signing, "signing")?;
        Ok(SignedUpload {
            url: format!("https://blobs.test/{key}?ttl={}", ttl.as_secs()),
            token: "token".to_string(),
        })
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.removes.lock().unwrap().push(key.to_string());
        Self::check(&self.fail_removes, "remove")
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(!self.missing_blobs.load(Ordering::SeqCst) && !self.removed().iter().any(|k| k == key))
    }

    async fn list(&self, _prefix: &str) -> AppResult<Vec<StoredObject>> {
        Ok(Vec::new())
    }
}

/// Store that reports a collision for the first `collisions` creates, then
/// delegates to an in-memory store.
#[derive(Debug)]
pub struct CollidingStore {
    pub inner: ziply_database::MemoryShareStore,
    pub collisions: std::sync::atomic::AtomicU32,
    pub attempted_ids: Mutex<Vec<String>>,
}

impl CollidingStore {
    pub fn new(collisions: u32) -> Self {
        Self {
            inner: ziply_database::MemoryShareStore::new(),
            collisions: std::sync::atomic::AtomicU32::new(collisions),
            attempted_ids: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ziply_database::ShareStore for CollidingStore {
    async fn create(
        &self,
        share: &ziply_entity::share::NewShare,
    ) -> AppResult<ziply_entity::share::Share> {
        self.attempted_ids
            .lock()
            .unwrap()
            .push(share.short_id.clone());
        let remaining = self.collisions.load(Ordering::SeqCst);
        if remaining > 0 {
            self.collisions.store(remaining - 1, Ordering::SeqCst);
            return Err(AppError::conflict("collision"));
        }
        self.inner.create(share).await
    }

    async fn find_by_short_id(
        &self,
        short_id: &str,
    ) -> AppResult<Option<ziply_entity::share::Share>> {
        self.inner.find_by_short_id(short_id).await
    }

    async fn increment_views(&self, short_id: &str) -> AppResult<Option<i64>> {
        self.inner.increment_views(short_id).await
    }

    async fn delete_record(&self, short_id: &str, id: uuid::Uuid) -> AppResult<bool> {
        self.inner.delete_record(short_id, id).await
    }

    async fn take_record(
        &self,
        short_id: &str,
        id: uuid::Uuid,
    ) -> AppResult<Option<ziply_entity::share::Share>> {
        self.inner.take_record(short_id, id).await
    }

    async fn delete_expired(
        &self,
        now: chrono::DateTime<chrono::Utc>,
        limit: u32,
    ) -> AppResult<Vec<ziply_entity::share::Share>> {
        self.inner.delete_expired(now, limit).await
    }

    async fn is_storage_key_referenced(
        &self,
        storage_key: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<bool> {
        self.inner.is_storage_key_referenced(storage_key, now).await
    }

    async fn hold_blob(
        &self,
        storage_key: &str,
        until: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<()> {
        self.inner.hold_blob(storage_key, until).await
    }

    async fn release_blob_hold(&self, storage_key: &str) -> AppResult<()> {
        self.inner.release_blob_hold(storage_key).await
    }

    async fn purge_blob_holds(&self, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64> {
        self.inner.purge_blob_holds(now).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Store whose lookups return a fixed snapshot, as if another request
/// replaced the record between a read and the write that follows it.
#[derive(Debug)]
pub struct StaleReadStore {
    pub inner: ziply_database::MemoryShareStore,
    pub snapshot: ziply_entity::share::Share,
}

#[async_trait]
impl ziply_database::ShareStore for StaleReadStore {
    async fn create(
        &self,
        share: &ziply_entity::share::NewShare,
    ) -> AppResult<ziply_entity::share::Share> {
        self.inner.create(share).await
    }

    async fn find_by_short_id(
        &self,
        short_id: &str,
    ) -> AppResult<Option<ziply_entity::share::Share>> {
        Ok((self.snapshot.short_id == short_id).then(|| self.snapshot.clone()))
    }

    async fn increment_views(&self, short_id: &str) -> AppResult<Option<i64>> {
        self.inner.increment_views(short_id).await
    }

    async fn delete_record(&self, short_id: &str, id: uuid::Uuid) -> AppResult<bool> {
        self.inner.delete_record(short_id, id).await
    }

    async fn take_record(
        &self,
        short_id: &str,
        id: uuid::Uuid,
    ) -> AppResult<Option<ziply_entity::share::Share>> {
        self.inner.take_record(short_id, id).await
    }

    async fn delete_expired(
        &self,
        now: chrono::DateTime<chrono::Utc>,
        limit: u32,
    ) -> AppResult<Vec<ziply_entity::share::Share>> {
        self.inner.delete_expired(now, limit).await
    }

    async fn is_storage_key_referenced(
        &self,
        storage_key: &str,
        now: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<bool> {
        self.inner.is_storage_key_referenced(storage_key, now).await
    }

    async fn hold_blob(
        &self,
        storage_key: &str,
        until: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<()> {
        self.inner.hold_blob(storage_key, until).await
    }

    async fn release_blob_hold(&self, storage_key: &str) -> AppResult<()> {
        self.inner.release_blob_hold(storage_key).await
    }

    async fn purge_blob_holds(&self, now: chrono::DateTime<chrono::Utc>) -> AppResult<u64> {
        self.inner.purge_blob_holds(now).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
