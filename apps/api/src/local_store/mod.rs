//! Per-user record collections with a single-primary invariant and a capacity
//! ceiling.
//!
//! Every mutation is read-whole → mutate-in-memory → write-whole against the
//! injected `KeyValueStorage`, holding the owner's lock for the whole cycle.
//! The lock is per process: a store shared by several instances is not
//! serialized across them. Reads fail soft (empty collection), writes fail
//! loud (`StoreError::Write`).

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::storage::{KeyValueStorage, StorageError};

pub mod handlers;
pub mod import;
pub mod models;

pub use models::{
    ExternalJob, ExternalJobPatch, NewExternalJob, NewResume, ResumePatch, StoredResume,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("The {collection} collection is full (maximum {max})")]
    Capacity { collection: &'static str, max: usize },

    #[error("Failed to write collection: {0}")]
    Write(#[from] StorageError),

    #[error("Failed to serialize collection: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A record kept in a per-user collection.
///
/// Collections without a primary concept keep the default no-op primary hooks.
pub trait StoredRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Draft: Send;
    type Patch: Send;

    /// Storage key suffix, also used in capacity error messages.
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    fn from_draft(draft: Self::Draft, id: Uuid, now: DateTime<Utc>) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn patch_sets_primary(_patch: &Self::Patch) -> bool {
        false
    }

    fn touch(&mut self, _now: DateTime<Utc>) {}

    fn is_primary(&self) -> bool {
        false
    }

    fn set_primary(&mut self, _primary: bool) {}
}

/// One async mutex per owner. Entries nobody holds are pruned on the next
/// acquire.
#[derive(Default)]
struct OwnerLocks {
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl OwnerLocks {
    async fn acquire(&self, owner: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(owner.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

pub struct RecordStore<T> {
    storage: Arc<dyn KeyValueStorage>,
    max: Option<usize>,
    locks: Arc<OwnerLocks>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            max: self.max,
            locks: Arc::clone(&self.locks),
            _record: PhantomData,
        }
    }
}

impl<T: StoredRecord> RecordStore<T> {
    /// `max = None` leaves the collection unbounded.
    pub fn new(storage: Arc<dyn KeyValueStorage>, max: Option<usize>) -> Self {
        Self {
            storage,
            max,
            locks: Arc::default(),
            _record: PhantomData,
        }
    }

    fn key(owner: &str) -> String {
        format!("gradindstud:{owner}:{}", T::COLLECTION)
    }

    /// Returns the owner's collection. Missing or corrupt storage yields an
    /// empty collection.
    pub async fn list(&self, owner: &str) -> Vec<T> {
        let key = Self::key(owner);
        let raw = match self.storage.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read {key}: {e}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(records) => records,
            Err(e) => {
                warn!("Discarding corrupt collection {key}: {e}");
                Vec::new()
            }
        }
    }

    pub async fn get(&self, owner: &str, id: Uuid) -> Option<T> {
        self.list(owner).await.into_iter().find(|r| r.id() == id)
    }

    pub async fn primary(&self, owner: &str) -> Option<T> {
        self.list(owner).await.into_iter().find(|r| r.is_primary())
    }

    /// Appends a new record. At capacity nothing is written.
    pub async fn add(&self, owner: &str, draft: T::Draft) -> Result<T, StoreError> {
        let _guard = self.locks.acquire(owner).await;
        let mut records = self.list(owner).await;

        if let Some(max) = self.max {
            if records.len() >= max {
                return Err(StoreError::Capacity {
                    collection: T::COLLECTION,
                    max,
                });
            }
        }

        let record = T::from_draft(draft, Uuid::new_v4(), Utc::now());
        if record.is_primary() {
            for existing in records.iter_mut() {
                existing.set_primary(false);
            }
        }
        records.push(record.clone());

        self.persist(owner, &records).await?;
        debug!("Added {} record {} for {owner}", T::COLLECTION, record.id());
        Ok(record)
    }

    /// Merges `patch` into the record with `id`. Returns `None` (and writes
    /// nothing) when the id is unknown.
    pub async fn update(
        &self,
        owner: &str,
        id: Uuid,
        patch: T::Patch,
    ) -> Result<Option<T>, StoreError> {
        let _guard = self.locks.acquire(owner).await;
        let mut records = self.list(owner).await;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };

        let promotes = T::patch_sets_primary(&patch);
        if promotes {
            for (i, other) in records.iter_mut().enumerate() {
                if i != index {
                    other.set_primary(false);
                }
            }
        }

        let record = &mut records[index];
        record.apply(patch);
        record.touch(Utc::now());
        let updated = record.clone();

        self.persist(owner, &records).await?;
        Ok(Some(updated))
    }

    /// Flags `id` as the single primary record.
    pub async fn set_primary(&self, owner: &str, id: Uuid) -> Result<Option<T>, StoreError> {
        let _guard = self.locks.acquire(owner).await;
        let mut records = self.list(owner).await;
        if !records.iter().any(|r| r.id() == id) {
            return Ok(None);
        }

        let now = Utc::now();
        let mut promoted = None;
        for record in records.iter_mut() {
            let is_target = record.id() == id;
            if record.is_primary() != is_target {
                record.set_primary(is_target);
                record.touch(now);
            }
            if is_target {
                promoted = Some(record.clone());
            }
        }

        self.persist(owner, &records).await?;
        Ok(promoted)
    }

    /// Removes the record. A deleted primary is not replaced.
    pub async fn delete(&self, owner: &str, id: Uuid) -> Result<bool, StoreError> {
        let _guard = self.locks.acquire(owner).await;
        let mut records = self.list(owner).await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }

        self.persist(owner, &records).await?;
        Ok(true)
    }

    async fn persist(&self, owner: &str, records: &[T]) -> Result<(), StoreError> {
        let key = Self::key(owner);
        let raw = serde_json::to_string(records)?;
        self.storage.set(&key, &raw).await.map_err(|e| {
            warn!("Failed to write {key}: {e}");
            StoreError::Write(e)
        })
    }
}
