use std::path::PathBuf;
use thiserror::Error;

use crate::types::{EntityKey, StoredBlob};

/// Recovery copy taken before a write pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Where the copy lives (a file path, or a label for in-process copies).
    pub location: String,
    /// xxh64 of the snapshotted content.
    pub fingerprint: u64,
}

/// The key-value store holding one blob per entity.
///
/// Implementations must be `Send + Sync`; the session never holds a store
/// across threads itself, but callers may.
pub trait RecordStore: Send + Sync {
    /// Every row, in the store's own key order.
    fn get_all_records(&self) -> Result<Vec<(EntityKey, StoredBlob)>, StoreError>;

    /// Overwrite the blob under `key` completely.
    fn set_record(&self, key: EntityKey, blob: &[u8]) -> Result<(), StoreError>;

    /// Write a batch. The default is a sequence of independent single-key
    /// writes; backends with transactions override this to commit atomically.
    fn set_records(&self, batch: &[(EntityKey, StoredBlob)]) -> Result<(), StoreError> {
        for (key, blob) in batch {
            self.set_record(*key, blob)?;
        }
        Ok(())
    }

    /// Copy the whole store somewhere recoverable.
    fn snapshot(&self) -> Result<Snapshot, StoreError>;
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The file is a database but not a save: the records table is absent.
    #[error("save has no `{0}` table")]
    MissingTable(String),
    #[error("backup {path:?} mismatch: expected {expected:#018x}, got {actual:#018x}")]
    BackupMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
    #[error("store lock poisoned: {0}")]
    Poisoned(String),
}

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::Redb(e.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Redb(e.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        match e {
            redb::TableError::TableDoesNotExist(name) => StoreError::MissingTable(name),
            other => StoreError::Redb(other.into()),
        }
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Redb(e.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Redb(e.into())
    }
}
