// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

use crate::store::StoreError;
use crate::types::EntityKey;

/// Failure to unwrap or build the size-prefixed LZ4 container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame too short: {len} bytes, need at least 4")]
    FrameTooShort { len: usize },
    #[error("LZ4 decompression failed: {0}")]
    DecompressionFailed(String),
    #[error("record of {len} bytes does not fit a 32-bit size prefix")]
    RecordTooLarge { len: usize },
}

/// Why a name field could not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeFault {
    #[error("record is {len} bytes, shorter than the 20-byte name header")]
    HeaderTruncated { len: usize },
    #[error("declared {count} chars exceeds the ceiling of {max}")]
    AboveCeiling { count: u64, max: u64 },
    #[error("declared {count} chars overflows a {len}-byte record")]
    Overflow { count: u64, len: usize },
}

/// The name field is unusable. Recoverable: the entity stays read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name field out of range: {0}")]
    OutOfRange(RangeFault),
}

impl From<RangeFault> for NameError {
    fn from(fault: RangeFault) -> Self {
        NameError::OutOfRange(fault)
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error(transparent)]
    Name(#[from] NameError),
    /// The spliced record does not re-parse to the requested name. Never
    /// caused by input data; indicates a bug in the editor.
    #[error("rename produced an inconsistent record: {detail}")]
    Inconsistent { detail: String },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no entity with key {0}")]
    UnknownKey(EntityKey),
    #[error("no pending renames")]
    NothingPending,
    #[error("entity {key} cannot be renamed safely: {reason}")]
    NotRenamable { key: EntityKey, reason: String },
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
