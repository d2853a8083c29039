//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every section has defaults so partial files are accepted.

pub mod app;
pub mod database;
pub mod logging;
pub mod share;
pub mod storage;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::share::ShareConfig;
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Share record store settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Object storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Share lifecycle settings.
    #[serde(default)]
    pub share: ShareConfig,
    /// Background sweep settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// `config/{env}.toml` and environment variables prefixed with `ZIPLY__`
    /// (e.g. `ZIPLY__SERVER__PORT=3000`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ZIPLY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Check cross-section constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.database.provider == "postgres" && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.storage.provider == "s3" && self.storage.s3.bucket.is_empty() {
            return Err(AppError::configuration(
                "storage.s3.bucket is required when storage.provider = \"s3\"",
            ));
        }
        if self.share.short_id_length == 0 {
            return Err(AppError::configuration(
                "share.short_id_length must be positive",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.share.short_id_length, 6);
        assert_eq!(config.storage.max_upload_size_bytes, 75 * 1024 * 1024);
        assert_eq!(config.storage.download_url_ttl_seconds, 60);
    }

    #[test]
    fn test_validate_requires_database_url_for_postgres() {
        let mut config = AppConfig::default();
        config.database.provider = "postgres".to_string();
        config.database.url.clear();
        assert!(config.validate().is_err());

        config.database.provider = "memory".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[server]\nport = 9000\n[storage]\nprovider = \"local\"\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.worker.sweep_batch_size, 100);
    }
}
