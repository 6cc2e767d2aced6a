//! Size-prefixed LZ4 block framing.
//!
//! The LZ4 stream does not carry its own uncompressed size; the 4-byte prefix
//! is the only source of truth, and the decoded record must match it exactly.
use lz4_flex::block::{compress, decompress_into};

use crate::error::FrameError;
use crate::record::RawRecord;
use crate::types::*;

/// Largest output `payload_len` compressed bytes can legally expand to.
#[inline]
fn max_expansion(payload_len: usize) -> usize {
    payload_len
        .saturating_mul(LZ4_MAX_EXPANSION)
        .saturating_add(LZ4_EXPANSION_SLACK)
}

/// Unwrap a stored blob into the raw record bytes.
pub fn decode(blob: &[u8]) -> Result<RawRecord, FrameError> {
    if blob.len() < SIZE_PREFIX_LEN {
        return Err(FrameError::FrameTooShort { len: blob.len() });
    }
    let (prefix, payload) = blob.split_at(SIZE_PREFIX_LEN);
    let mut size = [0u8; SIZE_PREFIX_LEN];
    size.copy_from_slice(prefix);
    let expected = u32::from_le_bytes(size) as usize;

    // Refuse before allocating: a hostile prefix must not buy a 4 GiB buffer.
    if expected > max_expansion(payload.len()) {
        return Err(FrameError::DecompressionFailed(format!(
            "declared size {expected} exceeds what {} payload bytes can expand to",
            payload.len()
        )));
    }

    let mut data_buf = vec![0u8; expected];
    let written = decompress_into(payload, &mut data_buf)
        .map_err(|e| FrameError::DecompressionFailed(e.to_string()))?;
    if written != expected {
        return Err(FrameError::DecompressionFailed(format!(
            "payload expanded to {written} bytes, prefix declares {expected}"
        )));
    }
    Ok(RawRecord::from_vec(data_buf))
}

/// Wrap a raw record back into a stored blob.
pub fn encode(record: &RawRecord) -> Result<StoredBlob, FrameError> {
    let size = u32::try_from(record.len())
        .map_err(|_| FrameError::RecordTooLarge { len: record.len() })?;
    let compressed = compress(record.as_bytes());

    let mut blob = Vec::with_capacity(SIZE_PREFIX_LEN + compressed.len());
    blob.extend_from_slice(&size.to_le_bytes());
    blob.extend_from_slice(&compressed);
    Ok(blob)
}
