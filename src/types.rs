use rustc_hash::FxHasher;
use smol_str::SmolStr;
use std::hash::BuildHasherDefault;

/// Integer row key of the external store. Opaque to the codec.
pub type EntityKey = i64;
/// Bytes exactly as persisted under one key.
pub type StoredBlob = Vec<u8>;
pub type FastMap<K, V> = std::collections::HashMap<K, V, BuildHasherDefault<FxHasher>>;

// ─── Frame Layout ───────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ uncompressed_size: u32 (LE)                  │
//  ├──────────────────────────────────────────────┤
//  │ LZ4 block payload (no embedded size)         │
//  └──────────────────────────────────────────────┘

pub const SIZE_PREFIX_LEN: usize = 4;
/// Upper bound on LZ4 block output per input byte; every 255-valued length
/// extension byte adds at most 255 bytes of output.
pub const LZ4_MAX_EXPANSION: usize = 255;
/// Slack for the fixed token/offset overhead of very short streams.
pub const LZ4_EXPANSION_SLACK: usize = 64;

// ─── Record Layout ──────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ breed_id:        u32 (LE)          [0, 4)    │
//  │ unique_id:       u64 (LE)          [4, 12)   │
//  ├──────────────────────────────────────────────┤
//  │ name_char_count: u64 (LE)          [12, 20)  │  ← NameSpan starts here
//  │ name:            UTF-16LE × count            │
//  ├──────────────────────────────────────────────┤
//  │ tail (opaque, preserved byte-for-byte)       │
//  └──────────────────────────────────────────────┘

pub const BREED_ID_OFFSET: usize = 0;
pub const UNIQUE_ID_OFFSET: usize = 4;
pub const NAME_COUNT_OFFSET: usize = 12;
pub const NAME_COUNT_LEN: usize = 8;
pub const NAME_DATA_OFFSET: usize = NAME_COUNT_OFFSET + NAME_COUNT_LEN; // 20

pub const DEFAULT_MAX_NAME_CHARS: u64 = 100;

// ─── NameSpan ───────────────────────────────────────────────────────────────

/// Byte range of the name block (count prefix + string) inside one record.
///
/// Only valid for the exact record it was located in. Splicing a new name
/// consumes the record, so a span cannot outlive its buffer by accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameSpan {
    pub start_offset: usize,
    pub total_length: usize,
}

impl NameSpan {
    /// First byte after the name block, i.e. where the tail begins.
    #[inline]
    pub fn end(&self) -> usize {
        self.start_offset + self.total_length
    }

    /// Number of UTF-16 code units the span's string holds. Zero for a span
    /// too short to hold the count prefix.
    #[inline]
    pub fn char_count(&self) -> usize {
        self.total_length.saturating_sub(NAME_COUNT_LEN) / 2
    }
}

/// A located name: where it lives and what it says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedName {
    pub span: NameSpan,
    pub name: SmolStr,
}
