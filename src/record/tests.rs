// ═══════════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════════
mod name_record_tests {
    use crate::error::{EditError, NameError, RangeFault};
    use crate::frame;
    use crate::record::{RawRecord, locate_name, rename, replace_name};
    use crate::types::*;
    use proptest::prelude::*;

    const TAIL: [u8; 10] = [0xA0, 0xA1, 0xA2, 0xA3, 0xA4, 0xA5, 0xA6, 0xA7, 0xA8, 0xA9];

    fn utf16le(s: &str) -> Vec<u8> {
        s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
    }

    /// 12-byte prefix, name block, then `tail`.
    fn make_record(prefix: [u8; 12], name: &str, tail: &[u8]) -> RawRecord {
        let mut buf = prefix.to_vec();
        buf.extend_from_slice(&(name.encode_utf16().count() as u64).to_le_bytes());
        buf.extend_from_slice(&utf16le(name));
        buf.extend_from_slice(tail);
        RawRecord::from_vec(buf)
    }

    fn cat_record() -> RawRecord {
        make_record([0u8; 12], "Cat", &TAIL)
    }

    /// Record with a raw count that does not have to match the string bytes.
    fn record_with_count(count: u64, body_len: usize) -> RawRecord {
        let mut buf = vec![0u8; 12];
        buf.extend_from_slice(&count.to_le_bytes());
        buf.extend(std::iter::repeat_n(0x41, body_len));
        RawRecord::from_vec(buf)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // locate_name
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_locate_cat() {
        let record = cat_record();
        let located = locate_name(&record, DEFAULT_MAX_NAME_CHARS).unwrap();

        assert_eq!(located.name.as_str(), "Cat");
        assert_eq!(
            located.span,
            NameSpan {
                start_offset: 12,
                total_length: 14
            }
        );
        assert_eq!(located.span.end(), 26);
        assert_eq!(located.span.char_count(), 3);
    }

    #[test]
    fn test_locate_reads_prefix_fields() {
        let mut prefix = [0u8; 12];
        prefix[0..4].copy_from_slice(&42u32.to_le_bytes());
        prefix[4..12].copy_from_slice(&0x0102_0304_0506_0708u64.to_le_bytes());
        let record = make_record(prefix, "Tom", &TAIL);

        assert_eq!(record.breed_id(), Some(42));
        assert_eq!(record.unique_id(), Some(0x0102_0304_0506_0708));
        assert_eq!(locate_name(&record, 100).unwrap().name.as_str(), "Tom");
    }

    #[test]
    fn test_locate_empty_name() {
        let record = make_record([1u8; 12], "", &TAIL);
        let located = locate_name(&record, 100).unwrap();
        assert_eq!(located.name.as_str(), "");
        assert_eq!(located.span.total_length, 8);
    }

    #[test]
    fn test_locate_name_filling_whole_buffer() {
        let record = make_record([0u8; 12], "Whiskers", &[]);
        let located = locate_name(&record, 100).unwrap();
        assert_eq!(located.name.as_str(), "Whiskers");
        assert_eq!(located.span.end(), record.len());
    }

    #[test]
    fn test_locate_non_ascii_name() {
        let record = make_record([0u8; 12], "Mòna 猫 🐈", &TAIL);
        let located = locate_name(&record, 100).unwrap();
        assert_eq!(located.name.as_str(), "Mòna 猫 🐈");
        // The emoji is a surrogate pair: two code units.
        assert_eq!(located.span.char_count(), "Mòna 猫 🐈".encode_utf16().count());
    }

    #[test]
    fn test_locate_unpaired_surrogate_is_replaced() {
        let mut buf = vec![0u8; 12];
        buf.extend_from_slice(&2u64.to_le_bytes());
        buf.extend_from_slice(&0xD800u16.to_le_bytes());
        buf.extend_from_slice(&(b'x' as u16).to_le_bytes());
        let record = RawRecord::from_vec(buf);

        let located = locate_name(&record, 100).unwrap();
        assert_eq!(located.name.as_str(), "\u{FFFD}x");
        assert_eq!(located.span.total_length, 12);
    }

    #[test]
    fn test_locate_header_truncated() {
        for len in [0usize, 4, 12, 19] {
            let record = RawRecord::from_vec(vec![0u8; len]);
            assert_eq!(
                locate_name(&record, 100),
                Err(NameError::OutOfRange(RangeFault::HeaderTruncated { len }))
            );
        }
    }

    #[test]
    fn test_locate_bounds_rejection() {
        // Declares 5 chars (10 bytes) but only 9 bytes follow the header.
        let record = record_with_count(5, 9);
        assert_eq!(
            locate_name(&record, 100),
            Err(NameError::OutOfRange(RangeFault::Overflow { count: 5, len: 29 }))
        );
    }

    #[test]
    fn test_locate_ceiling_rejection() {
        // Buffer is big enough for 150 chars, ceiling is not.
        let record = record_with_count(150, 400);
        assert_eq!(
            locate_name(&record, 100),
            Err(NameError::OutOfRange(RangeFault::AboveCeiling {
                count: 150,
                max: 100
            }))
        );
        // Same record under the looser ceiling seen in another revision.
        assert_eq!(locate_name(&record, 200).unwrap().span.char_count(), 150);
    }

    #[test]
    fn test_locate_huge_count_does_not_overflow() {
        let record = record_with_count(u64::MAX, 16);
        assert!(matches!(
            locate_name(&record, u64::MAX),
            Err(NameError::OutOfRange(RangeFault::Overflow { .. }))
        ));
        let record = record_with_count(u64::MAX / 2 + 1, 16);
        assert!(matches!(
            locate_name(&record, u64::MAX),
            Err(NameError::OutOfRange(RangeFault::Overflow { .. }))
        ));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // replace_name
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_replace_cat_with_mewington() {
        let record = cat_record();
        let original = record.clone();
        let span = locate_name(&record, 100).unwrap().span;

        let renamed = replace_name(record, span, "Mewington");
        assert_eq!(renamed.len(), original.len() - 14 + 26);
        assert_eq!(&renamed.as_bytes()[..12], &original.as_bytes()[..12]);
        assert_eq!(&renamed.as_bytes()[renamed.len() - 10..], &TAIL);

        let located = locate_name(&renamed, 100).unwrap();
        assert_eq!(located.name.as_str(), "Mewington");
        assert_eq!(located.span.total_length, 26);
    }

    #[test]
    fn test_replace_with_empty_name() {
        let record = cat_record();
        let span = locate_name(&record, 100).unwrap().span;

        let renamed = replace_name(record, span, "");
        let located = locate_name(&renamed, 100).unwrap();
        assert_eq!(located.name.as_str(), "");
        assert_eq!(located.span.total_length, 8);
        assert_eq!(renamed.len(), 12 + 8 + TAIL.len());
        assert_eq!(&renamed.as_bytes()[20..], &TAIL);
    }

    #[test]
    fn test_replace_same_length_in_place() {
        let record = cat_record();
        let len = record.len();
        let span = locate_name(&record, 100).unwrap().span;

        let renamed = replace_name(record, span, "Dog");
        assert_eq!(renamed.len(), len);
        assert_eq!(locate_name(&renamed, 100).unwrap().name.as_str(), "Dog");
        assert_eq!(&renamed.as_bytes()[26..], &TAIL);
    }

    #[test]
    #[should_panic(expected = "stale NameSpan")]
    fn test_replace_rejects_span_past_end() {
        let record = cat_record();
        let stale = NameSpan {
            start_offset: 12,
            total_length: record.len(),
        };
        replace_name(record, stale, "Tom");
    }

    #[test]
    fn test_char_count_of_short_span() {
        let span = NameSpan {
            start_offset: 12,
            total_length: 3,
        };
        assert_eq!(span.char_count(), 0);
    }

    #[test]
    fn test_replace_shrinks() {
        let record = make_record([9u8; 12], "Sir Pounce-a-lot", &TAIL);
        let span = locate_name(&record, 100).unwrap().span;

        let renamed = replace_name(record, span, "Bo");
        assert_eq!(renamed.len(), 12 + 8 + 4 + TAIL.len());
        assert_eq!(&renamed.as_bytes()[..12], &[9u8; 12]);
        assert_eq!(&renamed.as_bytes()[24..], &TAIL);
    }

    #[test]
    fn test_replace_far_beyond_ceiling() {
        let record = cat_record();
        let span = locate_name(&record, 100).unwrap().span;
        let long_name = "Mew".repeat(500);

        let renamed = replace_name(record, span, &long_name);
        assert_eq!(renamed.len(), 12 + 8 + 3000 + TAIL.len());
        // Default ceiling refuses to trust it, a wide one reads it back.
        assert!(locate_name(&renamed, 100).is_err());
        assert_eq!(locate_name(&renamed, 1500).unwrap().name.as_str(), long_name);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // rename (checked path)
    // ═══════════════════════════════════════════════════════════════════════

    #[test]
    fn test_rename_checked() {
        let renamed = rename(cat_record(), "Mewington", 100).unwrap();
        assert_eq!(locate_name(&renamed, 100).unwrap().name.as_str(), "Mewington");
    }

    #[test]
    fn test_rename_allows_name_above_ceiling() {
        let name = "x".repeat(250);
        let renamed = rename(cat_record(), &name, 100).unwrap();
        assert_eq!(locate_name(&renamed, 250).unwrap().name.as_str(), name);
    }

    #[test]
    fn test_rename_rejects_untrusted_field() {
        let record = record_with_count(7, 3);
        match rename(record, "Tom", 100) {
            Err(EditError::Name(NameError::OutOfRange(RangeFault::Overflow { count: 7, .. }))) => {}
            other => panic!("expected name error, got {other:?}"),
        }
    }

    #[test]
    fn test_rename_through_frame() {
        let blob = frame::encode(&cat_record()).unwrap();
        let record = frame::decode(&blob).unwrap();
        let renamed = rename(record, "Mewington", 100).unwrap();
        let blob = frame::encode(&renamed).unwrap();

        let reread = frame::decode(&blob).unwrap();
        assert_eq!(locate_name(&reread, 100).unwrap().name.as_str(), "Mewington");
        assert_eq!(&reread.as_bytes()[reread.len() - 10..], &TAIL);
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Laws
    // ═══════════════════════════════════════════════════════════════════════

    proptest! {
        #[test]
        fn prop_rename_roundtrip_preserves_tail(
            prefix in any::<[u8; 12]>(),
            old in "\\PC{0,40}",
            new in "\\PC{0,300}",
            tail in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let record = make_record(prefix, &old, &tail);
            let original_len = record.len();
            let span = locate_name(&record, 100).unwrap().span;

            let renamed = replace_name(record, span, &new);
            let new_units = new.encode_utf16().count();

            prop_assert_eq!(renamed.len(), original_len - span.total_length + 8 + 2 * new_units);
            prop_assert_eq!(&renamed.as_bytes()[..12], &prefix[..]);

            let located = locate_name(&renamed, u64::MAX).unwrap();
            prop_assert_eq!(located.name.as_str(), new.as_str());
            prop_assert_eq!(&renamed.as_bytes()[located.span.end()..], &tail[..]);
        }

        #[test]
        fn prop_locate_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let record = RawRecord::from_vec(bytes);
            if let Ok(located) = locate_name(&record, 100) {
                prop_assert!(located.span.end() <= record.len());
            }
        }
    }
}
