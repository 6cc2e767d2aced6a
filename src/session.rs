//! One loaded save: decoded records, located names, and pending renames.
//!
//! A [`LoadedStore`] is built by a single [`LoadedStore::load`] and replaced by
//! the next one. Nothing about the loaded file lives anywhere else.
use tracing::{debug, info, warn};

use crate::config::{BackupPolicy, EditorConfig};
use crate::error::{FrameError, NameError, SessionError};
use crate::frame;
use crate::record::{RawRecord, locate_name, rename};
use crate::store::{RecordStore, Snapshot, StoreError};
use crate::types::*;

pub const UNREADABLE_LABEL: &str = "<unreadable>";
pub const UNKNOWN_NAME_LABEL: &str = "<name unknown>";

/// What became of one row on load.
#[derive(Debug, Clone)]
pub enum LoadedEntity {
    /// The frame did not decode. Skipped for every purpose but reporting.
    Unreadable(FrameError),
    /// Decoded. `name` is an error when the field cannot be trusted, in which
    /// case the entity is read-only.
    Decoded {
        record: RawRecord,
        name: Result<LocatedName, NameError>,
    },
}

impl LoadedEntity {
    pub fn name(&self) -> Option<&str> {
        match self {
            LoadedEntity::Decoded { name: Ok(located), .. } => Some(located.name.as_str()),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<NameSpan> {
        match self {
            LoadedEntity::Decoded { name: Ok(located), .. } => Some(located.span),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&RawRecord> {
        match self {
            LoadedEntity::Decoded { record, .. } => Some(record),
            LoadedEntity::Unreadable(_) => None,
        }
    }

    /// Display text: the name, or a placeholder saying why there is none.
    pub fn label(&self) -> &str {
        match self {
            LoadedEntity::Decoded { name: Ok(located), .. } => located.name.as_str(),
            LoadedEntity::Decoded { name: Err(_), .. } => UNKNOWN_NAME_LABEL,
            LoadedEntity::Unreadable(_) => UNREADABLE_LABEL,
        }
    }

    /// `Some(reason)` when this entity must not be renamed.
    fn rename_blocker(&self) -> Option<String> {
        match self {
            LoadedEntity::Unreadable(e) => Some(e.to_string()),
            LoadedEntity::Decoded { name: Err(e), .. } => Some(e.to_string()),
            LoadedEntity::Decoded { name: Ok(_), .. } => None,
        }
    }
}

/// Row as a list would show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityView<'a> {
    pub key: EntityKey,
    pub label: &'a str,
    pub name: Option<&'a str>,
    pub pending: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Keys written, in store order.
    pub renamed: Vec<EntityKey>,
    /// `None` when the backup policy is [`BackupPolicy::Skip`].
    pub snapshot: Option<Snapshot>,
}

pub struct LoadedStore {
    config: EditorConfig,
    /// Store order, never re-sorted.
    entities: Vec<(EntityKey, LoadedEntity)>,
    index: FastMap<EntityKey, usize>,
    pending: FastMap<EntityKey, String>,
}

impl LoadedStore {
    /// Read every row and decode what can be decoded. Per-entity failures are
    /// recorded, not returned; only a failing store read aborts the load.
    pub fn load<S: RecordStore + ?Sized>(
        store: &S,
        config: EditorConfig,
    ) -> Result<Self, StoreError> {
        let rows = store.get_all_records()?;
        let row_count = rows.len();
        let mut loaded = LoadedStore {
            config,
            entities: Vec::with_capacity(row_count),
            index: FastMap::default(),
            pending: FastMap::default(),
        };

        let (mut unreadable, mut unnamed) = (0usize, 0usize);
        for (key, blob) in rows {
            let entity = match frame::decode(&blob) {
                Ok(record) => {
                    let name = locate_name(&record, loaded.config.max_name_chars);
                    if let Err(e) = &name {
                        warn!(key, error = %e, "name field untrusted, entity is read-only");
                        unnamed += 1;
                    }
                    LoadedEntity::Decoded { record, name }
                }
                Err(e) => {
                    warn!(key, error = %e, "entity unreadable");
                    unreadable += 1;
                    LoadedEntity::Unreadable(e)
                }
            };
            loaded.index.insert(key, loaded.entities.len());
            loaded.entities.push((key, entity));
        }

        info!(
            rows = row_count,
            entities = loaded.entities.len(),
            unreadable,
            unnamed,
            "store loaded"
        );
        Ok(loaded)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, key: EntityKey) -> Option<&LoadedEntity> {
        let &idx = self.index.get(&key)?;
        Some(&self.entities[idx].1)
    }

    pub fn entries(&self) -> impl Iterator<Item = EntityView<'_>> {
        self.entities.iter().map(|(key, entity)| EntityView {
            key: *key,
            label: entity.label(),
            name: entity.name(),
            pending: self.pending.get(key).map(String::as_str),
        })
    }

    /// Case-insensitive filter over the decimal key and the label.
    /// An empty query matches everything.
    pub fn search<'a>(&'a self, query: &str) -> impl Iterator<Item = EntityView<'a>> + 'a {
        let query = query.trim().to_lowercase();
        self.entries().filter(move |view| {
            query.is_empty()
                || view.key.to_string().contains(&query)
                || view.label.to_lowercase().contains(&query)
        })
    }

    /// Queue `new_name` for `key`. An empty name, or one equal to the current
    /// name, drops any queued rename instead.
    pub fn set_pending(&mut self, key: EntityKey, new_name: &str) -> Result<(), SessionError> {
        let entity = self.get(key).ok_or(SessionError::UnknownKey(key))?;
        let new_name = if self.config.trim_names {
            new_name.trim()
        } else {
            new_name
        };

        if new_name.is_empty() || entity.name() == Some(new_name) {
            self.pending.remove(&key);
        } else {
            if new_name.encode_utf16().count() as u64 > self.config.max_name_chars {
                warn!(
                    key,
                    max = self.config.max_name_chars,
                    "new name exceeds the read ceiling; it will load as unknown under this config"
                );
            }
            self.pending.insert(key, new_name.to_owned());
        }
        Ok(())
    }

    pub fn clear_pending(&mut self, key: EntityKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn pending(&self) -> &FastMap<EntityKey, String> {
        &self.pending
    }

    /// Write every pending rename back to `store`.
    ///
    /// Nothing is written unless every pending entity is renamable, the
    /// backup (if required) succeeded, and every new blob encoded. The write
    /// itself goes through [`RecordStore::set_records`], so it is atomic
    /// exactly when the backend's batch write is.
    pub fn apply<S: RecordStore + ?Sized>(
        &mut self,
        store: &S,
    ) -> Result<ApplyReport, SessionError> {
        if self.pending.is_empty() {
            return Err(SessionError::NothingPending);
        }

        let keys: Vec<EntityKey> = self
            .entities
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| self.pending.contains_key(key))
            .collect();

        for &key in &keys {
            let entity = self.get(key).ok_or(SessionError::UnknownKey(key))?;
            if let Some(reason) = entity.rename_blocker() {
                return Err(SessionError::NotRenamable { key, reason });
            }
        }

        let snapshot = match self.config.backup {
            BackupPolicy::Snapshot => Some(store.snapshot()?),
            BackupPolicy::Skip => {
                warn!("writing without a backup snapshot");
                None
            }
        };

        let mut staged = Vec::with_capacity(keys.len());
        let mut batch = Vec::with_capacity(keys.len());
        for &key in &keys {
            let idx = self.index[&key];
            let record = self.entities[idx]
                .1
                .record()
                .ok_or_else(|| SessionError::NotRenamable {
                    key,
                    reason: "record not decoded".into(),
                })?;
            let renamed = rename(record.clone(), &self.pending[&key], self.config.max_name_chars)?;
            batch.push((key, frame::encode(&renamed)?));
            staged.push((idx, renamed));
        }

        store.set_records(&batch)?;

        for (idx, record) in staged {
            let name = locate_name(&record, self.config.max_name_chars);
            debug!(key = self.entities[idx].0, bytes = record.len(), "entity rewritten");
            self.entities[idx].1 = LoadedEntity::Decoded { record, name };
        }
        self.pending.clear();

        info!(renamed = keys.len(), backup = snapshot.is_some(), "renames applied");
        Ok(ApplyReport {
            renamed: keys,
            snapshot,
        })
    }
}
