//! Viewer-facing projections of a share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::model::{Share, ShareKind};

/// File details visible to viewers. The storage key is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileView {
    /// Original filename.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    pub mime_type: String,
    /// Short-lived inline URL for image files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

/// What a recipient sees when opening a share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    /// Kind of content.
    #[serde(rename = "type")]
    pub kind: ShareKind,
    /// Text or link content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// File details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileView>,
    /// View count including this read.
    pub views: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Whether the share burns on read.
    pub burn_on_read: bool,
}

impl ShareView {
    /// Project a share with the given view count. `preview_url` is only
    /// attached to file shares.
    pub fn from_share(share: &Share, views: i64, preview_url: Option<String>) -> Self {
        Self {
            kind: share.kind(),
            content: share.payload.content().map(str::to_string),
            file: share.file().map(|f| FileView {
                name: f.original_name.clone(),
                size: f.size,
                mime_type: f.mime_type.clone(),
                preview_url,
            }),
            views,
            created_at: share.created_at,
            expires_at: share.expires_at,
            burn_on_read: share.burn_on_read,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::model::{FileDescriptor, NewShare, SharePayload};

    #[test]
    fn test_view_hides_storage_key() {
        let now = Utc::now();
        let share = NewShare {
            short_id: "Abc123".into(),
            owner_key: "k".into(),
            payload: SharePayload::File(FileDescriptor {
                original_name: "cat.png".into(),
                mime_type: "image/png".into(),
                size: 42,
                storage_key: "1700000000000-Abc123-cat.png".into(),
            }),
            burn_on_read: false,
            expires_at: now + chrono::Duration::hours(1),
            created_at: now,
        }
        .into_share();

        let view = ShareView::from_share(&share, 1, Some("https://p".into()));
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["file"]["name"], "cat.png");
        assert_eq!(json["file"]["mimeType"], "image/png");
        assert_eq!(json["file"]["previewUrl"], "https://p");
        assert!(!json.to_string().contains("1700000000000"));
        assert!(json.get("content").is_none());
    }
}
