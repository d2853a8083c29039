//! Share creation, upload grants, and owner deletion.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};

use ziply_core::AppError;
use ziply_core::error::ErrorKind;
use ziply_core::result::AppResult;
use ziply_core::traits::storage::ObjectStorage;
use ziply_database::ShareStore;
use ziply_entity::share::{
    CreatedShare, ExpiryDuration, FileDescriptor, NewShare, SharePayload, ShareKind, UploadGrant,
};
use ziply_storage::keys::{build_storage_key, key_belongs_to};

use super::blob::{deadline, release_blob};
use super::expiry::calculate_expiry;
use super::ids::{generate_owner_key, generate_short_id, is_valid_short_id, keys_match};
use super::link::normalize_link;
use super::settings::ShareSettings;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Bytes received by the server for a file share.
#[derive(Debug, Clone)]
pub struct InlineFile {
    /// Name the client sent.
    pub file_name: String,
    /// MIME type the client sent.
    pub content_type: String,
    /// File contents.
    pub data: Bytes,
}

/// Where a file share's bytes come from.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Already uploaded by the client through an upload grant.
    Uploaded(FileDescriptor),
    /// Sent to the server, which uploads it.
    Inline(InlineFile),
}

/// Request to create a share.
#[derive(Debug, Clone, Default)]
pub struct CreateShareInput {
    /// `text`, `link`, or `file`.
    pub kind: Option<String>,
    /// Text or link content.
    pub content: Option<String>,
    /// File payload for file shares.
    pub file: Option<FileSource>,
    /// Duration keyword (`10m`, `1h`, `1d`, `7d`).
    pub duration: Option<String>,
    /// Burn on first read.
    pub burn_on_read: bool,
    /// Short id issued with an upload grant.
    pub short_id: Option<String>,
}

/// Manages share creation, upload grants, and owner deletion.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share record store.
    store: Arc<dyn ShareStore>,
    /// Object storage for file payloads.
    storage: Arc<dyn ObjectStorage>,
    settings: ShareSettings,
}

impl ShareService {
    /// Creates a new share service.
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

    /// Issue a short id and a pre-signed URL so the client can upload a file
    /// directly to object storage.
    pub async fn request_upload_grant(
        &self,
        file_name: &str,
        file_type: &str,
    ) -> AppResult<UploadGrant> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        let content_type = content_type_or_default(file_type);

        let now = Utc::now();
        let short_id = generate_short_id(self.settings.short_id_length);
        let storage_key = build_storage_key(&short_id, file_name, now);

        let signed = self
            .storage
            .create_signed_upload_url(&storage_key, content_type, self.settings.upload_url_ttl)
            .await?;
        let expires_at = deadline(now, self.settings.upload_url_ttl)?;
        self.store.hold_blob(&storage_key, expires_at).await?;

        info!(short_id = %short_id, storage_key = %storage_key, "Upload grant issued");

        Ok(UploadGrant {
            short_id,
            upload_url: signed.url,
            token: signed.token,
            storage_key,
            expires_at,
        })
    }

    /// Create a share and return its short id and owner key. The owner key
    /// is never retrievable again.
    pub async fn create(&self, input: CreateShareInput) -> AppResult<CreatedShare> {
        let kind: ShareKind = input
            .kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::validation("Share type is required"))?
            .parse()?;

        if let Some(short_id) = &input.short_id {
            if !is_valid_short_id(short_id, self.settings.short_id_length) {
                return Err(AppError::validation(format!(
                    "Short id must be {} alphanumeric characters",
                    self.settings.short_id_length
                )));
            }
        }

        let duration = input.duration.as_deref();
        let burn_on_read = input.burn_on_read;

        let created = match kind {
            ShareKind::Text => {
                let content = input
                    .content
                    .filter(|c| !c.trim().is_empty())
                    .ok_or_else(|| AppError::validation("Text content is required"))?;
                self.insert(input.short_id, SharePayload::Text(content), burn_on_read, duration)
                    .await?
            }
            ShareKind::Link => {
                let link = normalize_link(input.content.as_deref().unwrap_or_default())?;
                self.insert(input.short_id, SharePayload::Link(link), burn_on_read, duration)
                    .await?
            }
            ShareKind::File => match input.file {
                None => return Err(AppError::validation("No file uploaded")),
                Some(FileSource::Uploaded(descriptor)) => {
                    let short_id = input.short_id.ok_or_else(|| {
                        AppError::validation("Short id from the upload grant is required")
                    })?;
                    validate_descriptor(&descriptor, &short_id)?;
                    if !self.storage.exists(&descriptor.storage_key).await? {
                        return Err(AppError::validation(
                            "Uploaded file not found; request a new upload URL",
                        ));
                    }
                    self.insert(
                        Some(short_id),
                        SharePayload::File(descriptor),
                        burn_on_read,
                        duration,
                    )
                    .await?
                }
                Some(FileSource::Inline(file)) => {
                    self.insert_inline_file(input.short_id, file, burn_on_read, duration)
                        .await?
                }
            },
        };

        info!(
            short_id = %created.short_id,
            kind = %kind,
            burn_on_read,
            duration = ExpiryDuration::parse(duration).as_str(),
            "Share created"
        );
        Ok(created)
    }

    /// Delete a share on behalf of its owner. An expired share is reaped
    /// and reported as not found, whatever key was given.
    pub async fn delete(&self, short_id: &str, owner_key: &str) -> AppResult<()> {
        let share = self
            .store
            .find_by_short_id(short_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if share.is_expired(Utc::now()) {
            if self.store.delete_record(short_id, share.id).await? {
                if let Some(storage_key) = share.storage_key() {
                    release_blob(self.storage.as_ref(), storage_key).await;
                }
                info!(short_id, "Expired share reaped on delete");
            }
            return Err(AppError::not_found("Share not found"));
        }

        if !keys_match(&share.owner_key, owner_key) {
            warn!(short_id, "Delete rejected: owner key mismatch");
            return Err(AppError::unauthorized("Invalid owner key"));
        }

        if let Some(storage_key) = share.storage_key() {
            release_blob(self.storage.as_ref(), storage_key).await;
        }
        self.store.delete_record(short_id, share.id).await?;

        info!(short_id, kind = %share.kind(), "Share deleted by owner");
        Ok(())
    }

    /// Insert a share whose payload is already settled. A pre-assigned id is
    /// tried once; generated ids are retried on collision.
    async fn insert(
        &self,
        preassigned: Option<String>,
        payload: SharePayload,
        burn_on_read: bool,
        duration: Option<&str>,
    ) -> AppResult<CreatedShare> {
        if let Some(short_id) = preassigned {
            return self.try_insert(short_id, payload, burn_on_read, duration).await;
        }

        for attempt in 1..=self.settings.max_id_attempts {
            let short_id = generate_short_id(self.settings.short_id_length);
            match self
                .try_insert(short_id, payload.clone(), burn_on_read, duration)
                .await
            {
                Err(e) if e.is(ErrorKind::Conflict) => {
                    warn!(attempt, "Short id collision, retrying");
                }
                other => return other,
            }
        }
        Err(self.exhausted())
    }

    /// Upload server-received bytes and insert the share. The blob key embeds
    /// the short id, so every new id gets a fresh upload and a failed insert
    /// releases its blob.
    async fn insert_inline_file(
        &self,
        preassigned: Option<String>,
        file: InlineFile,
        burn_on_read: bool,
        duration: Option<&str>,
    ) -> AppResult<CreatedShare> {
        let file_name = file.file_name.trim();
        if file_name.is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        if file.data.len() as u64 > self.settings.max_upload_size_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the {} byte limit",
                self.settings.max_upload_size_bytes
            )));
        }
        let content_type = content_type_or_default(&file.content_type);
        let attempts = if preassigned.is_some() {
            1
        } else {
            self.settings.max_id_attempts
        };

        for attempt in 1..=attempts {
            let short_id = preassigned
                .clone()
                .unwrap_or_else(|| generate_short_id(self.settings.short_id_length));
            let storage_key = build_storage_key(&short_id, file_name, Utc::now());

            self.storage
                .upload(&storage_key, file.data.clone(), content_type)
                .await?;

            let payload = SharePayload::File(FileDescriptor {
                original_name: file_name.to_string(),
                mime_type: content_type.to_string(),
                size: file.data.len() as i64,
                storage_key: storage_key.clone(),
            });

            match self
                .try_insert(short_id, payload, burn_on_read, duration)
                .await
            {
                Ok(created) => return Ok(created),
                Err(e) => {
                    release_blob(self.storage.as_ref(), &storage_key).await;
                    if e.is(ErrorKind::Conflict) && preassigned.is_none() {
                        warn!(attempt, "Short id collision, retrying upload");
                        continue;
                    }
                    return Err(e);
                }
            }
        }
        Err(self.exhausted())
    }

    async fn try_insert(
        &self,
        short_id: String,
        payload: SharePayload,
        burn_on_read: bool,
        duration: Option<&str>,
    ) -> AppResult<CreatedShare> {
        let now = Utc::now();
        let share = self
            .store
            .create(&NewShare {
                short_id,
                owner_key: generate_owner_key(),
                payload,
                burn_on_read,
                expires_at: calculate_expiry(duration, now),
                created_at: now,
            })
            .await?;

        Ok(CreatedShare {
            short_id: share.short_id,
            owner_key: share.owner_key,
            expires_at: share.expires_at,
        })
    }

    fn exhausted(&self) -> AppError {
        AppError::conflict(format!(
            "Could not allocate a unique short id after {} attempts",
            self.settings.max_id_attempts
        ))
    }
}

fn content_type_or_default(content_type: &str) -> &str {
    let trimmed = content_type.trim();
    if trimmed.is_empty() {
        DEFAULT_CONTENT_TYPE
    } else {
        trimmed
    }
}

fn validate_descriptor(descriptor: &FileDescriptor, short_id: &str) -> AppResult<()> {
    if descriptor.original_name.trim().is_empty() {
        return Err(AppError::validation("File name is required"));
    }
    if descriptor.size < 0 {
        return Err(AppError::validation("File size must not be negative"));
    }
    if !key_belongs_to(&descriptor.storage_key, short_id) {
        return Err(AppError::validation(
            "Storage key does not belong to this short id",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use ziply_database::MemoryShareStore;

    use super::*;
    use crate::share::testing::{CollidingStore, MockObjectStorage, StaleReadStore};

    fn service(store: Arc<dyn ShareStore>, storage: Arc<MockObjectStorage>) -> ShareService {
        ShareService::new(store, storage, ShareSettings::default())
    }

    fn text_input(content: &str) -> CreateShareInput {
        CreateShareInput {
            kind: Some("text".into()),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    fn inline(name: &str, data: &'static [u8]) -> FileSource {
        FileSource::Inline(InlineFile {
            file_name: name.into(),
            content_type: "text/plain".into(),
            data: Bytes::from_static(data),
        })
    }

    #[tokio::test]
    async fn test_create_text_share() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let before = Utc::now();
        let created = svc.create(text_input("  hello\nworld ")).await.unwrap();
        assert!(is_valid_short_id(&created.short_id, 6));
        assert_eq!(created.owner_key.len(), 32);
        assert!(created.expires_at >= before + chrono::Duration::days(1));

        let stored = store.find_by_short_id(&created.short_id).await.unwrap().unwrap();
        assert_eq!(stored.payload, SharePayload::Text("  hello\nworld ".into()));
        assert_eq!(stored.views, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_input() {
        let svc = service(
            Arc::new(MemoryShareStore::new()),
            Arc::new(MockObjectStorage::default()),
        );

        let cases = [
            CreateShareInput::default(),
            CreateShareInput {
                kind: Some("video".into()),
                content: Some("x".into()),
                ..Default::default()
            },
            text_input(""),
            CreateShareInput {
                kind: Some("link".into()),
                ..Default::default()
            },
            CreateShareInput {
                kind: Some("file".into()),
                ..Default::default()
            },
            CreateShareInput {
                short_id: Some("bad!id".into()),
                ..text_input("x")
            },
        ];
        for input in cases {
            let err = svc.create(input.clone()).await.unwrap_err();
            assert!(err.is(ErrorKind::Validation), "{input:?} -> {err}");
        }
    }

    #[tokio::test]
    async fn test_link_is_normalized() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let created = svc
            .create(CreateShareInput {
                kind: Some("link".into()),
                content: Some(" example.com/page ".into()),
                duration: Some("10m".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let stored = store.find_by_short_id(&created.short_id).await.unwrap().unwrap();
        assert_eq!(stored.payload, SharePayload::Link("https://example.com/page".into()));
        assert_eq!(stored.expires_at - stored.created_at, chrono::Duration::minutes(10));
    }

    #[tokio::test]
    async fn test_unknown_duration_defaults_to_one_day() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let created = svc
            .create(CreateShareInput {
                duration: Some("forever".into()),
                ..text_input("hi")
            })
            .await
            .unwrap();
        let stored = store.find_by_short_id(&created.short_id).await.unwrap().unwrap();
        assert_eq!(stored.expires_at - stored.created_at, chrono::Duration::days(1));
    }

    #[tokio::test]
    async fn test_collision_retries_with_fresh_id() {
        let store = Arc::new(CollidingStore::new(2));
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let created = svc.create(text_input("hi")).await.unwrap();
        let attempted = store.attempted_ids.lock().unwrap().clone();
        assert_eq!(attempted.len(), 3);
        assert_eq!(attempted.last(), Some(&created.short_id));
    }

    #[tokio::test]
    async fn test_collisions_exhaust_attempts() {
        let store = Arc::new(CollidingStore::new(100));
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let err = svc.create(text_input("hi")).await.unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(store.attempted_ids.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_preassigned_id_conflict_is_not_retried() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let first = svc
            .create(CreateShareInput {
                short_id: Some("Abc123".into()),
                ..text_input("first")
            })
            .await
            .unwrap();
        assert_eq!(first.short_id, "Abc123");

        let err = svc
            .create(CreateShareInput {
                short_id: Some("Abc123".into()),
                ..text_input("second")
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));

        let stored = store.find_by_short_id("Abc123").await.unwrap().unwrap();
        assert_eq!(stored.payload, SharePayload::Text("first".into()));
        assert_eq!(stored.owner_key, first.owner_key);
    }

    #[tokio::test]
    async fn test_inline_file_is_uploaded_then_persisted() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store.clone(), storage.clone());

        let created = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("notes v2.txt", b"data")),
                burn_on_read: true,
                ..Default::default()
            })
            .await
            .unwrap();

        let stored = store.find_by_short_id(&created.short_id).await.unwrap().unwrap();
        let file = stored.file().unwrap();
        assert_eq!(file.original_name, "notes v2.txt");
        assert_eq!(file.size, 4);
        assert!(key_belongs_to(&file.storage_key, &created.short_id));
        assert!(file.storage_key.ends_with("-notes_v2.txt"));
        assert_eq!(storage.uploaded(), vec![file.storage_key.clone()]);
    }

    #[tokio::test]
    async fn test_inline_upload_failure_creates_nothing() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        storage.fail_uploads.store(true, Ordering::SeqCst);
        let svc = service(store.clone(), storage);

        let err = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("a.txt", b"data")),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Storage));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_inline_insert_failure_releases_blob() {
        let store = Arc::new(CollidingStore::new(100));
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store, storage.clone());

        let err = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("a.txt", b"data")),
                short_id: Some("Abc123".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Conflict));
        assert_eq!(storage.uploaded(), storage.removed());
        assert_eq!(storage.removed().len(), 1);
    }

    #[tokio::test]
    async fn test_inline_file_over_limit_is_rejected() {
        let storage = Arc::new(MockObjectStorage::default());
        let settings = ShareSettings {
            max_upload_size_bytes: 3,
            ..ShareSettings::default()
        };
        let svc = ShareService::new(Arc::new(MemoryShareStore::new()), storage.clone(), settings);

        let err = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("a.txt", b"data")),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(storage.uploaded().is_empty());
    }

    #[tokio::test]
    async fn test_upload_grant_then_create() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let grant = svc.request_upload_grant("photo.jpg", "image/jpeg").await.unwrap();
        assert!(key_belongs_to(&grant.storage_key, &grant.short_id));
        assert!(grant.upload_url.contains("ttl=600"));

        let descriptor = FileDescriptor {
            original_name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
            size: 1024,
            storage_key: grant.storage_key.clone(),
        };
        let created = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(FileSource::Uploaded(descriptor.clone())),
                short_id: Some(grant.short_id.clone()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(created.short_id, grant.short_id);

        let err = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(FileSource::Uploaded(descriptor)),
                short_id: Some("Zzz999".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_upload_grant_holds_blob_until_it_expires() {
        let store = Arc::new(MemoryShareStore::new());
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        let grant = svc.request_upload_grant("photo.jpg", "image/jpeg").await.unwrap();
        let before_expiry = grant.expires_at - chrono::Duration::seconds(1);
        assert!(store
            .is_storage_key_referenced(&grant.storage_key, before_expiry)
            .await
            .unwrap());
        assert!(!store
            .is_storage_key_referenced(&grant.storage_key, grant.expires_at)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_upload_whose_blob_is_gone() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store.clone(), storage.clone());

        let grant = svc.request_upload_grant("notes.txt", "text/plain").await.unwrap();
        storage.missing_blobs.store(true, Ordering::SeqCst);

        let err = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(FileSource::Uploaded(FileDescriptor {
                    original_name: "notes.txt".into(),
                    mime_type: "text/plain".into(),
                    size: 12,
                    storage_key: grant.storage_key,
                })),
                short_id: Some(grant.short_id.clone()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
        assert!(store.find_by_short_id(&grant.short_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_grant_errors() {
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(Arc::new(MemoryShareStore::new()), storage.clone());

        assert!(svc
            .request_upload_grant("  ", "text/plain")
            .await
            .unwrap_err()
            .is(ErrorKind::Validation));

        storage.fail_signing.store(true, Ordering::SeqCst);
        assert!(svc
            .request_upload_grant("a.txt", "text/plain")
            .await
            .unwrap_err()
            .is(ErrorKind::Storage));
    }

    #[tokio::test]
    async fn test_delete_requires_owner_key() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store.clone(), storage.clone());

        let created = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("a.txt", b"data")),
                ..Default::default()
            })
            .await
            .unwrap();

        let err = svc.delete(&created.short_id, "wrong").await.unwrap_err();
        assert!(err.is(ErrorKind::Unauthorized));
        assert!(store.find_by_short_id(&created.short_id).await.unwrap().is_some());
        assert!(storage.removed().is_empty());

        svc.delete(&created.short_id, &created.owner_key).await.unwrap();
        assert!(store.find_by_short_id(&created.short_id).await.unwrap().is_none());
        assert_eq!(storage.removed().len(), 1);

        let err = svc.delete(&created.short_id, &created.owner_key).await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert_eq!(storage.removed().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_of_expired_share_is_not_found() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store.clone(), storage.clone());

        let now = Utc::now();
        store.insert_raw(
            NewShare {
                short_id: "Old123".into(),
                owner_key: "owner".into(),
                payload: SharePayload::File(FileDescriptor {
                    original_name: "a.txt".into(),
                    mime_type: "text/plain".into(),
                    size: 1,
                    storage_key: "1-Old123-a.txt".into(),
                }),
                burn_on_read: false,
                expires_at: now - chrono::Duration::minutes(1),
                created_at: now - chrono::Duration::hours(1),
            }
            .into_share(),
        );

        let err = svc.delete("Old123", "wrong").await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert!(store.is_empty());
        assert_eq!(storage.removed(), vec!["1-Old123-a.txt".to_string()]);

        let err = svc.delete("Old123", "owner").await.unwrap_err();
        assert!(err.is(ErrorKind::NotFound));
        assert_eq!(storage.removed().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_spares_share_that_reused_the_id() {
        let inner = MemoryShareStore::new();
        let now = Utc::now();
        let new_share = |content: &str| NewShare {
            short_id: "Abc123".into(),
            owner_key: "owner".into(),
            payload: SharePayload::Text(content.into()),
            burn_on_read: false,
            expires_at: now + chrono::Duration::hours(1),
            created_at: now,
        };
        let stale = new_share("old").into_share();
        inner.create(&new_share("new")).await.unwrap();
        let store = Arc::new(StaleReadStore {
            inner,
            snapshot: stale,
        });
        let svc = service(store.clone(), Arc::new(MockObjectStorage::default()));

        svc.delete("Abc123", "owner").await.unwrap();
        let kept = store.inner.find_by_short_id("Abc123").await.unwrap().unwrap();
        assert_eq!(kept.payload, SharePayload::Text("new".into()));
    }

    #[tokio::test]
    async fn test_delete_survives_blob_failure() {
        let store = Arc::new(MemoryShareStore::new());
        let storage = Arc::new(MockObjectStorage::default());
        let svc = service(store.clone(), storage.clone());

        let created = svc
            .create(CreateShareInput {
                kind: Some("file".into()),
                file: Some(inline("a.txt", b"data")),
                ..Default::default()
            })
            .await
            .unwrap();
        storage.fail_removes.store(true, Ordering::SeqCst);

        svc.delete(&created.short_id, &created.owner_key).await.unwrap();
        assert!(store.is_empty());
        assert_eq!(storage.removed().len(), 1);
    }
}
