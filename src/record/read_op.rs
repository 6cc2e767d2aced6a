use smol_str::SmolStr;

use super::RawRecord;
use crate::error::{NameError, RangeFault};
use crate::types::*;

/// Find and decode the name block of `record`.
///
/// Fails with [`NameError::OutOfRange`] when the header is truncated, the
/// declared count is above `max_name_chars`, or the string would run past the
/// end of the buffer. Nothing outside the buffer is ever read.
pub fn locate_name(record: &RawRecord, max_name_chars: u64) -> Result<LocatedName, NameError> {
    let len = record.len();
    let count = record
        .read_u64_le(NAME_COUNT_OFFSET)
        .ok_or(RangeFault::HeaderTruncated { len })?;

    if count > max_name_chars {
        return Err(RangeFault::AboveCeiling {
            count,
            max: max_name_chars,
        }
        .into());
    }

    let end = count
        .checked_mul(2)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .and_then(|bytes| NAME_DATA_OFFSET.checked_add(bytes))
        .filter(|&end| end <= len)
        .ok_or(RangeFault::Overflow { count, len })?;

    Ok(LocatedName {
        span: NameSpan {
            start_offset: NAME_COUNT_OFFSET,
            total_length: end - NAME_COUNT_OFFSET,
        },
        name: decode_utf16le(&record.as_bytes()[NAME_DATA_OFFSET..end]),
    })
}

/// Lossy: unpaired surrogates become U+FFFD instead of failing the read.
fn decode_utf16le(bytes: &[u8]) -> SmolStr {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
