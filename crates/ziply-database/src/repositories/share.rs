//! PostgreSQL share repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use ziply_core::error::{AppError, ErrorKind};
use ziply_core::result::AppResult;
use ziply_entity::share::{FileDescriptor, NewShare, Share, ShareKind, SharePayload};

use crate::store::ShareStore;

/// Row shape of the `shares` table.
#[derive(Debug, Clone, FromRow)]
struct ShareRow {
    id: Uuid,
    short_id: String,
    owner_key: String,
    kind: ShareKind,
    content: Option<String>,
    file_name: Option<String>,
    file_mime_type: Option<String>,
    file_size: Option<i64>,
    storage_key: Option<String>,
    views: i64,
    burn_on_read: bool,
    expires_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ShareRow> for Share {
    type Error = AppError;

    fn try_from(row: ShareRow) -> Result<Self, Self::Error> {
        let payload = match row.kind {
            ShareKind::Text => SharePayload::Text(row.content.ok_or_else(|| missing(&row.short_id))?),
            ShareKind::Link => SharePayload::Link(row.content.ok_or_else(|| missing(&row.short_id))?),
            ShareKind::File => match (row.file_name, row.file_mime_type, row.file_size, row.storage_key) {
                (Some(original_name), Some(mime_type), Some(size), Some(storage_key)) => {
                    SharePayload::File(FileDescriptor {
                        original_name,
                        mime_type,
                        size,
                        storage_key,
                    })
                }
                _ => return Err(missing(&row.short_id)),
            },
        };

        Ok(Share {
            id: row.id,
            short_id: row.short_id,
            owner_key: row.owner_key,
            payload,
            views: row.views,
            burn_on_read: row.burn_on_read,
            expires_at: row.expires_at,
            created_at: row.created_at,
        })
    }
}

fn missing(short_id: &str) -> AppError {
    AppError::database(format!("Share {short_id} has no payload matching its kind"))
}

fn into_shares(rows: Vec<ShareRow>) -> AppResult<Vec<Share>> {
    rows.into_iter().map(Share::try_from).collect()
}

/// Repository for share records backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgShareRepository {
    pool: PgPool,
}

impl PgShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShareStore for PgShareRepository {
    async fn create(&self, data: &NewShare) -> AppResult<Share> {
        let (content, file) = match &data.payload {
            SharePayload::Text(c) | SharePayload::Link(c) => (Some(c.as_str()), None),
            SharePayload::File(f) => (None, Some(f)),
        };

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        // An expired row that the sweep has not reached yet must not block reuse.
        sqlx::query("DELETE FROM shares WHERE short_id = $1 AND expires_at < $2")
            .bind(&data.short_id)
            .bind(data.created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear expired share", e)
            })?;

        let row = sqlx::query_as::<_, ShareRow>(
            "INSERT INTO shares (id, short_id, owner_key, kind, content, file_name, file_mime_type, \
             file_size, storage_key, views, burn_on_read, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, $10, $11, $12) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.short_id)
        .bind(&data.owner_key)
        .bind(data.payload.kind())
        .bind(content)
        .bind(file.map(|f| f.original_name.as_str()))
        .bind(file.map(|f| f.mime_type.as_str()))
        .bind(file.map(|f| f.size))
        .bind(file.map(|f| f.storage_key.as_str()))
        .bind(data.burn_on_read)
        .bind(data.expires_at)
        .bind(data.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            let unique = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if unique {
                AppError::conflict(format!("Short id '{}' is already taken", data.short_id))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create share", e)
            }
        })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit share", e)
        })?;

        Share::try_from(row)
    }

    async fn find_by_short_id(&self, short_id: &str) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, ShareRow>("SELECT * FROM shares WHERE short_id = $1")
            .bind(short_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))?
            .map(Share::try_from)
            .transpose()
    }

    async fn increment_views(&self, short_id: &str) -> AppResult<Option<i64>> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE shares SET views = views + 1 WHERE short_id = $1 RETURNING views",
        )
        .bind(short_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to increment views", e))
    }

    async fn delete_record(&self, short_id: &str, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM shares WHERE short_id = $1 AND id = $2")
            .bind(short_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn take_record(&self, short_id: &str, id: Uuid) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, ShareRow>(
            "DELETE FROM shares WHERE short_id = $1 AND id = $2 RETURNING *",
        )
        .bind(short_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to take share", e))?
        .map(Share::try_from)
        .transpose()
    }

    async fn delete_expired(&self, now: DateTime<Utc>, limit: u32) -> AppResult<Vec<Share>> {
        let rows = sqlx::query_as::<_, ShareRow>(
            "DELETE FROM shares WHERE id IN ( \
               SELECT id FROM shares WHERE expires_at < $1 \
               ORDER BY expires_at LIMIT $2 FOR UPDATE SKIP LOCKED \
             ) RETURNING *",
        )
        .bind(now)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete expired shares", e)
        })?;
        into_shares(rows)
    }

    async fn is_storage_key_referenced(
        &self,
        storage_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM shares WHERE storage_key = $1) \
             OR EXISTS(SELECT 1 FROM blob_holds WHERE storage_key = $1 AND hold_until > $2)",
        )
        .bind(storage_key)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check storage key", e))
    }

    async fn hold_blob(&self, storage_key: &str, until: DateTime<Utc>) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO blob_holds (storage_key, hold_until) VALUES ($1, $2) \
             ON CONFLICT (storage_key) DO UPDATE \
             SET hold_until = GREATEST(blob_holds.hold_until, EXCLUDED.hold_until)",
        )
        .bind(storage_key)
        .bind(until)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to hold blob", e))?;
        Ok(())
    }

    async fn release_blob_hold(&self, storage_key: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM blob_holds WHERE storage_key = $1")
            .bind(storage_key)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to release blob hold", e)
            })?;
        Ok(())
    }

    async fn purge_blob_holds(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM blob_holds WHERE hold_until <= $1")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge blob holds", e)
            })?;
        Ok(result.rows_affected())
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
