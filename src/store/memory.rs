//! In-memory record store for testing and ephemeral use.

use std::collections::BTreeMap;
use std::sync::RwLock;

use xxhash_rust::xxh64::Xxh64;

use super::types::{RecordStore, Snapshot, StoreError};
use crate::types::{EntityKey, StoredBlob};

type Rows = BTreeMap<EntityKey, StoredBlob>;

/// All rows live in a `BTreeMap` behind a `RwLock`; snapshots are kept as
/// whole copies next to it. Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RwLock<Rows>,
    snapshots: RwLock<Vec<Rows>>,
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Poisoned(e.to_string())
}

fn fingerprint(rows: &Rows) -> u64 {
    let mut hasher = Xxh64::new(0);
    for (key, blob) in rows {
        hasher.update(&key.to_le_bytes());
        hasher.update(&(blob.len() as u64).to_le_bytes());
        hasher.update(blob);
    }
    hasher.digest()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = (EntityKey, StoredBlob)>) -> Self {
        Self {
            rows: RwLock::new(rows.into_iter().collect()),
            snapshots: RwLock::new(Vec::new()),
        }
    }

    pub fn get(&self, key: EntityKey) -> Result<Option<StoredBlob>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.get(&key).cloned())
    }

    /// Number of snapshots taken so far.
    pub fn snapshot_count(&self) -> Result<usize, StoreError> {
        Ok(self.snapshots.read().map_err(poisoned)?.len())
    }

    /// Put the rows of snapshot `index` back, discarding current content.
    pub fn restore(&self, index: usize) -> Result<bool, StoreError> {
        let snapshots = self.snapshots.read().map_err(poisoned)?;
        let Some(saved) = snapshots.get(index) else {
            return Ok(false);
        };
        *self.rows.write().map_err(poisoned)? = saved.clone();
        Ok(true)
    }
}

impl RecordStore for MemoryStore {
    fn get_all_records(&self) -> Result<Vec<(EntityKey, StoredBlob)>, StoreError> {
        let rows = self.rows.read().map_err(poisoned)?;
        Ok(rows.iter().map(|(k, v)| (*k, v.clone())).collect())
    }

    fn set_record(&self, key: EntityKey, blob: &[u8]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        rows.insert(key, blob.to_vec());
        Ok(())
    }

    /// Applied under a single write lock, so readers never see half a batch.
    fn set_records(&self, batch: &[(EntityKey, StoredBlob)]) -> Result<(), StoreError> {
        let mut rows = self.rows.write().map_err(poisoned)?;
        for (key, blob) in batch {
            rows.insert(*key, blob.clone());
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let copy = self.rows.read().map_err(poisoned)?.clone();
        let fingerprint = fingerprint(&copy);
        let mut snapshots = self.snapshots.write().map_err(poisoned)?;
        snapshots.push(copy);
        Ok(Snapshot {
            location: format!("memory#{}", snapshots.len() - 1),
            fingerprint,
        })
    }
}
