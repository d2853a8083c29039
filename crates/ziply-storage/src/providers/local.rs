//! Local filesystem object storage.
//!
//! Blobs live as flat files under the configured root. Signed URLs point at
//! the API's `/api/blobs/{key}` routes, which call back into
//! [`LocalObjectStorage::verify`] before touching the file.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use ziply_core::config::LocalStorageConfig;
use ziply_core::error::{AppError, ErrorKind};
use ziply_core::result::AppResult;
use ziply_core::traits::storage::{ObjectStorage, SignedUpload, StoredObject};

use crate::signer::UrlSigner;

/// Local filesystem storage provider.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    /// Root directory for all stored blobs.
    root: PathBuf,
    /// Base URL that signed links are built on.
    public_base_url: String,
    signer: UrlSigner,
}

impl LocalObjectStorage {
    /// Create a provider rooted at `config.root_path`, creating it if needed.
    pub async fn new(config: &LocalStorageConfig, public_base_url: &str) -> AppResult<Self> {
        let root = PathBuf::from(&config.root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            signer: UrlSigner::new(&config.signing_secret),
        })
    }

    /// Resolve a key to a path within the root. Keys are flat, so anything
    /// that could escape the root is rejected.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        if key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\'])
            || key.contains("..")
        {
            return Err(AppError::validation(format!("Invalid storage key: {key}")));
        }
        Ok(self.root.join(key))
    }

    fn signed_url(
        &self,
        method: &str,
        key: &str,
        ttl: Duration,
        extra_param: Option<(&str, &str)>,
    ) -> AppResult<(String, String)> {
        let expires = expires_at(ttl);
        let extra = extra_param.map(|(_, v)| v).unwrap_or("");
        let signature = self.signer.sign(method, key, expires, extra)?;

        let mut url = format!(
            "{}/api/blobs/{}?expires={expires}&signature={signature}",
            self.public_base_url,
            urlencoding::encode(key)
        );
        if let Some((name, value)) = extra_param {
            url.push_str(&format!("&{name}={}", urlencoding::encode(value)));
        }
        Ok((url, signature))
    }

    /// Check a signed request against this provider's secret.
    pub fn verify(
        &self,
        method: &str,
        key: &str,
        expires: i64,
        extra: &str,
        signature: &str,
    ) -> AppResult<()> {
        self.signer
            .verify(method, key, expires, extra, signature, Utc::now().timestamp())
    }

    /// Open a blob for streaming. Returns the file and its length.
    pub async fn open(&self, key: &str) -> AppResult<(fs::File, u64)> {
        let path = self.resolve(key)?;
        let file = fs::File::open(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {key}"))
            } else {
                AppError::with_source(ErrorKind::Storage, format!("Failed to open blob: {key}"), e)
            }
        })?;
        let len = file
            .metadata()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to stat blob", e))?
            .len();
        Ok((file, len))
    }
}

fn expires_at(ttl: Duration) -> i64 {
    Utc::now().timestamp() + i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX / 2)
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn upload(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<String> {
        let path = self.resolve(key)?;
        let tmp = self.root.join(format!(".{key}.part"));

        fs::write(&tmp, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {key}"), e)
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to commit blob: {key}"), e)
        })?;

        debug!(key, bytes = data.len(), "Stored blob");
        Ok(key.to_string())
    }

    async fn create_signed_download_url(
        &self,
        key: &str,
        ttl: Duration,
        download_name: Option<&str>,
    ) -> AppResult<String> {
        self.resolve(key)?;
        let (url, _) = self.signed_url("GET", key, ttl, download_name.map(|n| ("download", n)))?;
        Ok(url)
    }

    async fn create_signed_preview_url(&self, key: &str, ttl: Duration) -> AppResult<String> {
        self.resolve(key)?;
        let (url, _) = self.signed_url("GET", key, ttl, None)?;
        Ok(url)
    }

    async fn create_signed_upload_url(
        &self,
        key: &str,
        content_type: &str,
        ttl: Duration,
    ) -> AppResult<SignedUpload> {
        self.resolve(key)?;
        let (url, token) = self.signed_url("PUT", key, ttl, Some(("contentType", content_type)))?;
        Ok(SignedUpload { url, token })
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Removed blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to remove blob: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        let path = self.resolve(key)?;
        fs::try_exists(&path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to stat blob: {key}"), e)
        })
    }

    async fn list(&self, prefix: &str) -> AppResult<Vec<StoredObject>> {
        let mut entries = fs::read_dir(&self.root).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read storage root", e)
        })?;

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let key = entry.file_name().to_string_lossy().into_owned();
            // In-flight uploads are hidden.
            if key.starts_with('.') || !key.starts_with(prefix) {
                continue;
            }
            let meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("Failed to stat blob: {key}"), e)
            })?;
            if !meta.is_file() {
                continue;
            }
            objects.push(StoredObject {
                key,
                size_bytes: meta.len(),
                last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }
}

/// Guess a MIME type from a key's extension.
pub fn mime_from_key(key: &str) -> &'static str {
    let ext = key.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match ext.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "csv" => "text/csv",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" | "gzip" => "application/gzip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
