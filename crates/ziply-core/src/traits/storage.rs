//! Object storage trait for pluggable blob backends.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Metadata about a stored blob.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Storage key within the provider.
    pub key: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Last modified timestamp (if the backend reports one).
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// A pre-signed upload target handed to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUpload {
    /// URL the client sends the bytes to.
    pub url: String,
    /// Opaque token accompanying the upload.
    pub token: String,
}

/// Trait for blob storage backends.
///
/// Implementations exist for the local filesystem and S3-compatible
/// services. Keys are opaque to callers and never leave the server except
/// embedded in signed URLs.
#[async_trait]
pub trait ObjectStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store bytes under `key` and return the key that was written.
    async fn upload(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<String>;

    /// Produce a time-limited download URL. When `download_name` is set the
    /// response carries an attachment disposition with that filename.
    async fn create_signed_download_url(
        &self,
        key: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String>;

    /// Produce a time-limited inline URL for image previews.
    async fn create_signed_preview_url(&self, key: &str, ttl: Duration) -> AppResult<String>;

    /// Produce a time-limited URL a client can upload bytes to directly.
    async fn create_signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> AppResult<SignedUpload>;

    /// Delete the blob at `key`. Deleting a missing blob is not an error.
    async fn remove(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob is stored at `key`.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// List blobs whose key starts with `prefix`.
    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>>;
}
