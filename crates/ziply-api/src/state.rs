//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use ziply_core::config::AppConfig;
use ziply_database::ShareStore;
use ziply_service::{AccessService, ShareService, ShareSettings};
use ziply_storage::StorageManager;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Share record store, used directly for health checks
    pub store: Arc<dyn ShareStore>,
    /// Active object storage provider
    pub storage: Arc<StorageManager>,
    /// Share creation and owner deletion
    pub share_service: Arc<ShareService>,
    /// Share views and download links
    pub access_service: Arc<AccessService>,
}

impl AppState {
    /// Wire the services from their collaborators.
    pub fn new(
        config: Arc<AppConfig>,
        store: Arc<dyn ShareStore>,
        storage: Arc<StorageManager>,
    ) -> Self {
        let settings = ShareSettings::from_config(&config);
        let share_service = Arc::new(ShareService::new(
            Arc::clone(&store),
            storage.provider(),
            settings.clone(),
        ));
        let access_service = Arc::new(AccessService::new(
            Arc::clone(&store),
            storage.provider(),
            settings,
        ));

        Self {
            config,
            store,
            storage,
            share_service,
            access_service,
        }
    }
}
