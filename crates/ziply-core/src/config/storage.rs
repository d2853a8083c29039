//! Object storage configuration.

use serde::{Deserialize, Serialize};

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage provider to use: `"local"` or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Maximum server-mediated upload size in bytes (default 75 MB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Lifetime of signed download URLs.
    #[serde(default = "default_download_ttl")]
    pub download_url_ttl_seconds: u64,
    /// Lifetime of signed image preview URLs.
    #[serde(default = "default_preview_ttl")]
    pub preview_url_ttl_seconds: u64,
    /// Lifetime of signed direct-upload URLs.
    #[serde(default = "default_upload_ttl")]
    pub upload_url_ttl_seconds: u64,
    /// Local filesystem storage configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible storage configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            max_upload_size_bytes: default_max_upload(),
            download_url_ttl_seconds: default_download_ttl(),
            preview_url_ttl_seconds: default_preview_ttl(),
            upload_url_ttl_seconds: default_upload_ttl(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root path for local blob storage.
    #[serde(default = "default_local_root")]
    pub root_path: String,
    /// Secret mixed into signed blob URLs.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
            signing_secret: default_signing_secret(),
        }
    }
}

/// S3-compatible object storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// S3 endpoint URL (for non-AWS services like MinIO).
    #[serde(default)]
    pub endpoint: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// Access key ID.
    #[serde(default)]
    pub access_key: String,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            region: default_region(),
            bucket: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    78_643_200 // 75 MB
}

fn default_download_ttl() -> u64 {
    60
}

fn default_preview_ttl() -> u64 {
    300
}

fn default_upload_ttl() -> u64 {
    600
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_signing_secret() -> String {
    "change-me-in-production".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
