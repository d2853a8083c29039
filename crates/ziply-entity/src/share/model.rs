//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ziply_core::AppError;

/// Kind of shared content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "share_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShareKind {
    /// Plain text, stored verbatim.
    Text,
    /// A URL, normalized on create.
    Link,
    /// An uploaded file held in object storage.
    File,
}

impl ShareKind {
    /// The wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Link => "link",
            Self::File => "file",
        }
    }
}

impl std::fmt::Display for ShareKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShareKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "link" => Ok(Self::Link),
            "file" => Ok(Self::File),
            other => Err(AppError::validation(format!("Unknown share type '{other}'"))),
        }
    }
}

/// Metadata of a file held in object storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    /// Name the file was uploaded with.
    pub original_name: String,
    /// MIME type reported by the uploader.
    pub mime_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Opaque object storage key. Never returned to viewers.
    pub storage_key: String,
}

/// Content of a share. Exactly one payload exists and it always matches the
/// share kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum SharePayload {
    /// Text content.
    Text(String),
    /// Normalized URL.
    Link(String),
    /// File metadata.
    File(FileDescriptor),
}

impl SharePayload {
    /// The kind tag matching this payload.
    pub fn kind(&self) -> ShareKind {
        match self {
            Self::Text(_) => ShareKind::Text,
            Self::Link(_) => ShareKind::Link,
            Self::File(_) => ShareKind::File,
        }
    }

    /// Text or link content.
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Text(c) | Self::Link(c) => Some(c),
            Self::File(_) => None,
        }
    }

    /// File metadata for file shares.
    pub fn file(&self) -> Option<&FileDescriptor> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }
}

/// A stored share record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Share {
    /// Internal row identifier.
    pub id: Uuid,
    /// Public lookup code.
    pub short_id: String,
    /// Secret required to delete the share.
    #[serde(skip_serializing)]
    pub owner_key: String,
    /// Shared content.
    pub payload: SharePayload,
    /// Successful metadata reads so far.
    pub views: i64,
    /// Whether the first successful read consumes the share.
    pub burn_on_read: bool,
    /// After this instant the share is treated as absent.
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// The kind of this share.
    pub fn kind(&self) -> ShareKind {
        self.payload.kind()
    }

    /// Whether the expiry has passed at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// File metadata for file shares.
    pub fn file(&self) -> Option<&FileDescriptor> {
        self.payload.file()
    }

    /// Storage key of the blob backing this share, if any.
    pub fn storage_key(&self) -> Option<&str> {
        self.file().map(|f| f.storage_key.as_str())
    }
}

/// Data required to insert a new share.
#[derive(Debug, Clone)]
pub struct NewShare {
    /// Public lookup code.
    pub short_id: String,
    /// Owner secret.
    pub owner_key: String,
    /// Shared content.
    pub payload: SharePayload,
    /// Burn on first read.
    pub burn_on_read: bool,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewShare {
    /// Materialize the stored record with a fresh id and zero views.
    pub fn into_share(self) -> Share {
        Share {
            id: Uuid::new_v4(),
            short_id: self.short_id,
            owner_key: self.owner_key,
            payload: self.payload,
            views: 0,
            burn_on_read: self.burn_on_read,
            expires_at: self.expires_at,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parse_rejects_unknown_tags() {
        assert_eq!("text".parse::<ShareKind>().unwrap(), ShareKind::Text);
        assert_eq!("file".parse::<ShareKind>().unwrap(), ShareKind::File);
        assert!("TEXT".parse::<ShareKind>().is_err());
        assert!("image".parse::<ShareKind>().is_err());
    }

    #[test]
    fn test_payload_matches_kind() {
        let payload = SharePayload::File(FileDescriptor {
            original_name: "a.png".into(),
            mime_type: "image/png".into(),
            size: 10,
            storage_key: "1-abc123-a.png".into(),
        });
        assert_eq!(payload.kind(), ShareKind::File);
        assert!(payload.content().is_none());
        assert_eq!(
            SharePayload::Link("https://x.io".into()).content(),
            Some("https://x.io")
        );
    }

    #[test]
    fn test_owner_key_not_serialized() {
        let now = Utc::now();
        let share = NewShare {
            short_id: "abc123".into(),
            owner_key: "secret".into(),
            payload: SharePayload::Text("hi".into()),
            burn_on_read: false,
            expires_at: now + chrono::Duration::hours(1),
            created_at: now,
        }
        .into_share();
        let json = serde_json::to_string(&share).unwrap();
        assert!(!json.contains("secret"));
        assert_eq!(share.views, 0);
    }
}
