//! Value objects returned from share creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Issued for direct client uploads. Never persisted; the pre-assigned
/// short id correlates the later create call with the uploaded blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadGrant {
    /// Short id reserved for the eventual share.
    pub short_id: String,
    /// Pre-signed upload URL.
    pub upload_url: String,
    /// Token to present with the upload.
    pub token: String,
    /// Key the blob will be stored under.
    pub storage_key: String,
    /// When the upload URL stops working.
    pub expires_at: DateTime<Utc>,
}

/// The only time the owner key is ever returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedShare {
    /// Public lookup code.
    pub short_id: String,
    /// Owner secret.
    pub owner_key: String,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

/// A short-lived link to a file share's bytes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    /// Signed download URL.
    pub download_url: String,
}
