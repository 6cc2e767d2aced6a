pub mod db;
pub mod memory;
pub mod types;

pub use db::CatStore;
pub use memory::MemoryStore;
pub use types::{RecordStore, Snapshot, StoreError};
