//! mewsave
//!
//! Rename entities stored as size-prefixed LZ4 records in a key-value save.
//!
//! - [`frame`]: blob ⇄ raw record.
//! - [`record`]: locate and replace the UTF-16 name field, keeping every other
//!   byte of the record.
//! - [`store`]: the key-value collaborator (redb-backed and in-memory).
//! - [`session`]: load a store, queue renames, apply them.

pub mod config;
pub mod error;
pub mod frame;
pub mod record;
pub mod session;
pub mod store;
pub mod types;

pub use config::{BackupPolicy, EditorConfig};
pub use error::{EditError, FrameError, NameError, RangeFault, SessionError};
pub use record::{RawRecord, locate_name, rename, replace_name};
pub use session::{ApplyReport, LoadedStore};
pub use store::{CatStore, MemoryStore, RecordStore, StoreError};
pub use types::{EntityKey, LocatedName, NameSpan};
