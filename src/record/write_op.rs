use super::RawRecord;
use super::read_op::locate_name;
use crate::error::EditError;
use crate::types::*;

impl RawRecord {
    // ════════════════════════════════════════════════════════════════════════
    // Internal: buffer splice
    // ════════════════════════════════════════════════════════════════════════

    /// Replace `old_len` bytes at `offset` with `new_data`.
    /// Handles grow, shrink, and same-size cases.
    fn splice_data(&mut self, offset: usize, old_len: usize, new_data: &[u8]) {
        let new_len = new_data.len();
        let old_end = offset + old_len;
        let tail_len = self.data_buf.len() - old_end;

        if new_len == old_len {
            self.data_buf[offset..offset + new_len].copy_from_slice(new_data);
        } else if new_len > old_len {
            let growth = new_len - old_len;
            self.data_buf.resize(self.data_buf.len() + growth, 0);
            // Shift tail right
            self.data_buf
                .copy_within(old_end..old_end + tail_len, old_end + growth);
            self.data_buf[offset..offset + new_len].copy_from_slice(new_data);
        } else {
            let shrink = old_len - new_len;
            self.data_buf[offset..offset + new_len].copy_from_slice(new_data);
            // Shift tail left
            self.data_buf
                .copy_within(old_end..old_end + tail_len, old_end - shrink);
            self.data_buf.truncate(self.data_buf.len() - shrink);
        }
    }
}

/// Count prefix plus UTF-16LE string, ready to drop into a record.
fn encode_name_block(name: &str) -> Vec<u8> {
    let units: Vec<u16> = name.encode_utf16().collect();
    let mut block = Vec::with_capacity(NAME_COUNT_LEN + units.len() * 2);
    block.extend_from_slice(&(units.len() as u64).to_le_bytes());
    for unit in units {
        block.extend_from_slice(&unit.to_le_bytes());
    }
    block
}

/// Swap the name block at `span` for `new_name`, of any length.
///
/// `span` must come from [`locate_name`] on this same record. Bytes before the
/// span and the whole tail are kept verbatim; the tail simply moves.
///
/// # Panics
///
/// Panics if `span` reaches past the end of `record`, which only happens when
/// it was located in a different buffer.
pub fn replace_name(mut record: RawRecord, span: NameSpan, new_name: &str) -> RawRecord {
    assert!(
        span.start_offset
            .checked_add(span.total_length)
            .is_some_and(|end| end <= record.len()),
        "stale NameSpan {span:?} for a {}-byte record",
        record.len()
    );
    let block = encode_name_block(new_name);
    record.splice_data(span.start_offset, span.total_length, &block);
    record
}

/// Locate, replace, then re-parse to prove the result reads back as `new_name`.
///
/// The new name is not held to `max_name_chars`; the ceiling only guards the
/// read of the existing field.
pub fn rename(
    record: RawRecord,
    new_name: &str,
    max_name_chars: u64,
) -> Result<RawRecord, EditError> {
    let located = locate_name(&record, max_name_chars)?;
    let old_len = record.len();
    let renamed = replace_name(record, located.span, new_name);
    verify_rename(&renamed, old_len, located.span, new_name)?;
    Ok(renamed)
}

fn verify_rename(
    renamed: &RawRecord,
    old_len: usize,
    old_span: NameSpan,
    new_name: &str,
) -> Result<(), EditError> {
    let units = new_name.encode_utf16().count();
    let expected_len = old_len - old_span.total_length + NAME_COUNT_LEN + units * 2;
    if renamed.len() != expected_len {
        return Err(EditError::Inconsistent {
            detail: format!("length {} != expected {expected_len}", renamed.len()),
        });
    }

    let relocated = locate_name(renamed, units as u64).map_err(|e| EditError::Inconsistent {
        detail: format!("re-parse failed: {e}"),
    })?;
    if relocated.name.as_str() != new_name {
        return Err(EditError::Inconsistent {
            detail: format!("re-parsed {:?}, wanted {new_name:?}", relocated.name),
        });
    }
    Ok(())
}
