use crate::types::*;

// ─── Owned record buffer ───────────────────────────────────────────────────
/// Decompressed bytes of one entity.
///
/// Only the fixed prefix and the name block are ever interpreted; everything
/// after the name is carried as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub(crate) data_buf: Vec<u8>,
}

impl RawRecord {
    #[inline]
    pub fn from_vec(data_buf: Vec<u8>) -> Self {
        Self { data_buf }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data_buf
    }

    /// Consume and return the underlying buffer.
    #[inline]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data_buf
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data_buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data_buf.is_empty()
    }

    pub fn breed_id(&self) -> Option<u32> {
        let raw = self.data_buf.get(BREED_ID_OFFSET..BREED_ID_OFFSET + 4)?;
        Some(u32::from_le_bytes(raw.try_into().ok()?))
    }

    pub fn unique_id(&self) -> Option<u64> {
        self.read_u64_le(UNIQUE_ID_OFFSET)
    }

    #[inline]
    pub(crate) fn read_u64_le(&self, offset: usize) -> Option<u64> {
        let raw = self.data_buf.get(offset..offset.checked_add(8)?)?;
        Some(u64::from_le_bytes(raw.try_into().ok()?))
    }
}

impl From<Vec<u8>> for RawRecord {
    fn from(data_buf: Vec<u8>) -> Self {
        Self::from_vec(data_buf)
    }
}

impl AsRef<[u8]> for RawRecord {
    fn as_ref(&self) -> &[u8] {
        &self.data_buf
    }
}
