use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use tracing::{debug, info};
use xxhash_rust::xxh64::xxh64;

use super::types::{RecordStore, Snapshot, StoreError};
use crate::types::{EntityKey, StoredBlob};

// Key: integer entity key
// Value: size-prefixed LZ4 blob
pub const CATS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("cats");

/// A save file: one redb database holding the `cats` table.
pub struct CatStore {
    db: Database,
    path: PathBuf,
}

impl CatStore {
    /// Create (or open) the database at `path` and ensure the table exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = Database::create(&path)?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CATS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db, path })
    }

    /// Open an existing save. A database without `cats` is not a save and is
    /// rejected with [`StoreError::MissingTable`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let db = Database::open(&path)?;
        {
            let read_txn = db.begin_read()?;
            read_txn.open_table(CATS_TABLE)?;
        }
        Ok(Self { db, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Retrieve one blob by key.
    pub fn get_record(&self, key: EntityKey) -> Result<Option<StoredBlob>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATS_TABLE)?;
        Ok(table.get(key)?.map(|access| access.value().to_vec()))
    }

    /// `<path>.bak_<stamp>`, with `_N` appended until the name is free.
    fn backup_path(&self) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let mut base = OsString::from(self.path.as_os_str());
        base.push(format!(".bak_{stamp}"));

        let mut candidate = PathBuf::from(&base);
        let mut n = 1;
        while candidate.exists() {
            let mut next = base.clone();
            next.push(format!("_{n}"));
            candidate = PathBuf::from(next);
            n += 1;
        }
        candidate
    }
}

impl RecordStore for CatStore {
    fn get_all_records(&self) -> Result<Vec<(EntityKey, StoredBlob)>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CATS_TABLE)?;

        let mut rows = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            rows.push((key.value(), value.value().to_vec()));
        }
        debug!(rows = rows.len(), "read cats table");
        Ok(rows)
    }

    /// Upsert: the previous blob under `key`, if any, is replaced whole.
    fn set_record(&self, key: EntityKey, blob: &[u8]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CATS_TABLE)?;
            table.insert(key, blob)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// One write transaction for the whole batch: either every key lands or none does.
    fn set_records(&self, batch: &[(EntityKey, StoredBlob)]) -> Result<(), StoreError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CATS_TABLE)?;
            for (key, blob) in batch {
                table.insert(*key, blob.as_slice())?;
                debug!(key, bytes = blob.len(), "staged blob");
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let backup = self.backup_path();
        fs::copy(&self.path, &backup)?;

        let expected = xxh64(&fs::read(&self.path)?, 0);
        let actual = xxh64(&fs::read(&backup)?, 0);
        if expected != actual {
            return Err(StoreError::BackupMismatch {
                path: backup,
                expected,
                actual,
            });
        }

        info!(backup = %backup.display(), "snapshot written");
        Ok(Snapshot {
            location: backup.display().to_string(),
            fingerprint: actual,
        })
    }
}
