//! Share read paths: viewing and downloading.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use ziply_core::AppError;
use ziply_core::result::AppResult;
use ziply_core::traits::storage::ObjectStorage;
use ziply_database::ShareStore;
use ziply_entity::share::{DownloadLink, Share, ShareKind, ShareView};

use super::blob::{deadline, release_blob, release_blob_later};
use super::settings::ShareSettings;

/// Handles public share access: metadata views and file downloads.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share record store.
    store: Arc<dyn ShareStore>,
    /// Object storage for file payloads.
    storage: Arc<dyn ObjectStorage>,
    settings: ShareSettings,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        store: Arc<dyn ShareStore>,
        storage: Arc<dyn ObjectStorage>,
        settings: ShareSettings,
    ) -> Self {
        Self {
            store,
            storage,
            settings,
        }
    }

    /// View a share. Counts the view, and consumes burn-on-read text and
    /// link shares. File shares are only consumed by downloading.
    pub async fn get(&self, short_id: &str) -> AppResult<ShareView> {
        let share = match self.lookup(short_id).await? {
            Lookup::Live(share) => share,
            Lookup::Expired => return Err(AppError::gone("Share has expired")),
        };

        if share.burn_on_read && share.kind() != ShareKind::File {
            let taken = self
                .store
                .take_record(short_id, share.id)
                .await?
                .ok_or_else(|| AppError::not_found("Share not found"))?;
            info!(short_id, "Share burned after read");
            return Ok(ShareView::from_share(&taken, taken.views + 1, None));
        }

        let views = self
            .store
            .increment_views(short_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        let preview_url = match share.file() {
            Some(file) if file.mime_type.starts_with("image/") => match self
                .storage
                .create_signed_preview_url(&file.storage_key, self.settings.preview_url_ttl)
                .await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(short_id, error = %e, "Failed to sign preview URL");
                    None
                }
            },
            _ => None,
        };

        Ok(ShareView::from_share(&share, views, preview_url))
    }

    /// Produce a short-lived download URL for a file share. A burn-on-read
    /// share is deleted here; its blob is released once the URL has lapsed.
    pub async fn get_download_url(&self, short_id: &str) -> AppResult<DownloadLink> {
        let Lookup::Live(share) = self.lookup(short_id).await? else {
            return Err(AppError::not_found("File not found"));
        };
        let file = share
            .file()
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let download_url = self
            .storage
            .create_signed_download_url(
                &file.storage_key,
                self.settings.download_url_ttl,
                Some(&file.original_name),
            )
            .await?;

        if share.burn_on_read {
            let ttl = self.settings.download_url_ttl;
            self.store
                .hold_blob(&file.storage_key, deadline(Utc::now(), ttl)?)
                .await?;
            if !self.store.delete_record(short_id, share.id).await? {
                return Err(AppError::not_found("File not found"));
            }
            release_blob_later(
                Arc::clone(&self.store),
                Arc::clone(&self.storage),
                file.storage_key.clone(),
                ttl,
            );
            info!(short_id, "File share burned after download");
        }

        Ok(DownloadLink { download_url })
    }

    /// Look up a share, lazily reaping it (and its blob) if it has expired.
    async fn lookup(&self, short_id: &str) -> AppResult<Lookup> {
        let share = self
            .store
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if !share.is_expired(Utc::now()) {
            return Ok(Lookup::Live(share));
        }

        if self.store.delete_record(short_id, share.id).await? {
            if let Some(storage_key) = share.storage_key() {
                release_blob(self.storage.as_ref(), storage_key).await;
            }
            info!(short_id, "Expired share reaped on read");
        }
        Ok(Lookup::Expired)
    }
}

enum Lookup {
    Live(Share),
    Expired,
}
