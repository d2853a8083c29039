//! Tunables for the share services.

use std::time::Duration;

use ziply_core::config::AppConfig;

/// Settings the share services read on every call.
#[derive(Debug, Clone)]
pub struct ShareSettings {
    /// Characters in a generated short id.
    pub short_id_length: usize,
    /// Fresh ids tried before giving up on collisions.
    pub max_id_attempts: u32,
    /// Largest inline file accepted.
    pub max_upload_size_bytes: u64,
    /// Lifetime of download URLs.
    pub download_url_ttl: Duration,
    /// Lifetime of image preview URLs.
    pub preview_url_ttl: Duration,
    /// Lifetime of direct-upload URLs.
    pub upload_url_ttl: Duration,
}

impl ShareSettings {
    /// Extract the share settings from the application config.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            short_id_length: config.share.short_id_length,
            max_id_attempts: config.share.max_id_attempts.max(1),
            max_upload_size_bytes: config.storage.max_upload_size_bytes,
            download_url_ttl: Duration::from_secs(config.storage.download_url_ttl_seconds),
            preview_url_ttl: Duration::from_secs(config.storage.preview_url_ttl_seconds),
            upload_url_ttl: Duration::from_secs(config.storage.upload_url_ttl_seconds),
        }
    }
}

impl Default for ShareSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
