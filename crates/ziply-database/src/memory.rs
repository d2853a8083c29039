//! In-memory share store backed by `DashMap`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use ziply_core::{AppError, AppResult};
use ziply_entity::share::{NewShare, Share};

use crate::store::ShareStore;

/// Share store that keeps records in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryShareStore {
    shares: Arc<DashMap<String, Share>>,
    holds: Arc<DashMap<String, DateTime<Utc>>>,
}

impl MemoryShareStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, bypassing creation checks.
    pub fn insert_raw(&self, share: Share) {
        self.shares.insert(share.short_id.clone(), share);
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

#[async_trait]
impl ShareStore for MemoryShareStore {
    async fn create(&self, data: &NewShare) -> AppResult<Share> {
        match self.shares.entry(data.short_id.clone()) {
            Entry::Occupied(mut slot) => {
                if !slot.get().is_expired(data.created_at) {
                    return Err(AppError::conflict(format!(
                        "Short id '{}' is already taken",
                        data.short_id
                    )));
                }
                let share = data.clone().into_share();
                slot.insert(share.clone());
                Ok(share)
            }
            Entry::Vacant(slot) => {
                let share = data.clone().into_share();
                slot.insert(share.clone());
                Ok(share)
            }
        }
    }

    async fn find_by_short_id(&self, short_id: &str) -> AppResult<Option<Share>> {
        Ok(self.shares.get(short_id).map(|s| s.clone()))
    }

    async fn increment_views(&self, short_id: &str) -> AppResult<Option<i64>> {
        Ok(self.shares.get_mut(short_id).map(|mut s| {
            s.views += 1;
            s.views
        }))
    }

    async fn delete_record(&self, short_id: &str, id: Uuid) -> AppResult<bool> {
        Ok(self
            .shares
            .remove_if(short_id, |_, share| share.id == id)
            .is_some())
    }

    async fn take_record(&self, short_id: &str, id: Uuid) -> AppResult<Option<Share>> {
        Ok(self
            .shares
            .remove_if(short_id, |_, share| share.id == id)
            .map(|(_, share)| share))
    }

    async fn delete_expired(&self, now: DateTime<Utc>, limit: u32) -> AppResult<Vec<Share>> {
        let candidates: Vec<String> = self
            .shares
            .iter()
            .filter(|entry| entry.value().is_expired(now))
            .take(limit as usize)
            .map(|entry| entry.key().clone())
            .collect();

        Ok(candidates
            .into_iter()
            .filter_map(|key| {
                self.shares
                    .remove_if(&key, |_, share| share.is_expired(now))
                    .map(|(_, share)| share)
            })
            .collect())
    }

    async fn is_storage_key_referenced(
        &self,
        storage_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        if self.holds.get(storage_key).is_some_and(|until| *until > now) {
            return Ok(true);
        }
        Ok(self
            .shares
            .iter()
            .any(|entry| entry.value().storage_key() == Some(storage_key)))
    }

    async fn hold_blob(&self, storage_key: &str, until: DateTime<Utc>) -> AppResult<()> {
        self.holds
            .entry(storage_key.to_string())
            .and_modify(|current| *current = (*current).max(until))
            .or_insert(until);
        Ok(())
    }

    async fn release_blob_hold(&self, storage_key: &str) -> AppResult<()> {
        self.holds.remove(storage_key);
        Ok(())
    }

    async fn purge_blob_holds(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let before = self.holds.len();
        self.holds.retain(|_, until| *until > now);
        Ok(before.saturating_sub(self.holds.len()) as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
