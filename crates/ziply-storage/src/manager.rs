//! Storage manager that selects and holds the configured provider.

use std::sync::Arc;

use tracing::info;

use ziply_core::config::StorageConfig;
use ziply_core::error::AppError;
use ziply_core::result::AppResult;
use ziply_core::traits::storage::ObjectStorage;

use crate::providers::LocalObjectStorage;

/// Holds the active object storage provider.
///
/// When the local provider is active it is also kept under its concrete
/// type so the HTTP layer can serve and accept signed blob requests.
#[derive(Debug, Clone)]
pub struct StorageManager {
    provider: Arc<dyn ObjectStorage>,
    local: Option<Arc<LocalObjectStorage>>,
}

impl StorageManager {
    /// Build the provider named by `storage.provider`.
    pub async fn from_config(config: &StorageConfig, public_base_url: &str) -> AppResult<Self> {
        match config.provider.as_str() {
            "local" => {
                let local = Arc::new(LocalObjectStorage::new(&config.local, public_base_url).await?);
                info!(root = %config.local.root_path, "Using local object storage");
                Ok(Self::with_local(local))
            }
            #[cfg(feature = "s3")]
            "s3" => {
                let s3 = crate::providers::S3ObjectStorage::new(&config.s3).await?;
                Ok(Self::new(Arc::new(s3)))
            }
            other => Err(AppError::configuration(format!(
                "Unknown or disabled storage provider '{other}'"
            ))),
        }
    }

    /// Wrap an arbitrary provider.
    pub fn new(provider: Arc<dyn ObjectStorage>) -> Self {
        Self {
            provider,
            local: None,
        }
    }

    /// Wrap the local provider, keeping its concrete handle.
    pub fn with_local(local: Arc<LocalObjectStorage>) -> Self {
        Self {
            provider: local.clone(),
            local: Some(local),
        }
    }

    /// The active provider.
    pub fn provider(&self) -> Arc<dyn ObjectStorage> {
        Arc::clone(&self.provider)
    }

    /// The local provider, if it is the active one.
    pub fn local(&self) -> Option<&Arc<LocalObjectStorage>> {
        self.local.as_ref()
    }

    /// Check provider health; errors count as unhealthy.
    pub async fn health_check(&self) -> bool {
        self.provider.health_check().await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_provider_from_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = StorageConfig::default();
        config.local.root_path = dir.path().to_string_lossy().into_owned();

        let manager = StorageManager::from_config(&config, "http://localhost:3000")
            .await
            .unwrap();
        assert_eq!(manager.provider().provider_type(), "local");
        assert!(manager.local().is_some());
        assert!(manager.health_check().await);
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let mut config = StorageConfig::default();
        config.provider = "ftp".into();
        assert!(StorageManager::from_config(&config, "http://x").await.is_err());
    }
}
