//! Property-based coverage of `SPEC_FULL.md` §8's round-trip laws and
//! invariants.

use ndn_tlv::varnumber::{read_varnumber, size_of_varnumber, write_varnumber, SliceCursor};
use ndn_tlv::{Block, Buffer, Wire};
use proptest::prelude::*;

proptest! {
    /// Law 2: VarNumber round-trips for any u64, and the encoded length
    /// matches the boundary table in §4.1.
    #[test]
    fn varnumber_roundtrips(value: u64) {
        let mut buf = Vec::new();
        write_varnumber(&mut buf, value).unwrap();
        prop_assert_eq!(buf.len(), size_of_varnumber(value));

        let expected_len = if value <= 252 {
            1
        } else if value <= u16::MAX as u64 {
            3
        } else if value <= u32::MAX as u64 {
            5
        } else {
            9
        };
        prop_assert_eq!(buf.len(), expected_len);

        let mut cursor = SliceCursor::new(&buf, 0);
        prop_assert_eq!(read_varnumber(&mut cursor).unwrap(), value);
    }

    /// Law 1: building a Block from (type, payload), encoding, and
    /// reparsing preserves both.
    #[test]
    fn block_roundtrips_type_and_value(
        r#type in 0u32..=0xFFFF_FFFEu32,
        payload in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut block = Block::from_type_value(r#type, Buffer::from_vec(payload.clone()));
        block.encode().unwrap();
        let reparsed = Block::from_buffer(Buffer::copy_from_slice(block.wire().unwrap())).unwrap();
        prop_assert_eq!(reparsed.r#type(), r#type);
        prop_assert_eq!(reparsed.value(), payload.as_slice());
    }

    /// Law 3: a Wire built from any sequence of byte-array appends
    /// linearizes to the exact concatenation of those writes.
    #[test]
    fn wire_get_buffer_matches_concatenated_writes(
        chunks in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 0..8),
    ) {
        let mut wire = Wire::with_capacity(4);
        let mut expected = Vec::new();
        for chunk in &chunks {
            wire.append_array(chunk);
            expected.extend_from_slice(chunk);
        }
        prop_assert_eq!(wire.get_buffer().as_slice(), expected.as_slice());
    }

    /// Invariant: for every Block built from (type, payload) and encoded,
    /// `size == end - begin` is implied by `wire().len() == size()`.
    #[test]
    fn block_size_matches_wire_length(
        r#type in 0u32..=0xFFFF_FFFEu32,
        payload in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut block = Block::from_type_value(r#type, Buffer::from_vec(payload));
        block.encode().unwrap();
        prop_assert_eq!(block.wire().unwrap().len(), block.size().unwrap());
    }

    /// `parse()` is idempotent: calling it twice yields the same
    /// sub-element count and bytes.
    #[test]
    fn block_parse_is_idempotent(
        a_value in prop::collection::vec(any::<u8>(), 0..32),
        b_value in prop::collection::vec(any::<u8>(), 0..32),
    ) {
        let mut outer = Block::from_type(0x01);
        outer.push_back(Block::from_type_value(0x02, Buffer::from_vec(a_value))).unwrap();
        outer.push_back(Block::from_type_value(0x03, Buffer::from_vec(b_value))).unwrap();
        outer.encode().unwrap();
        let reparsed = Block::from_buffer(Buffer::copy_from_slice(outer.wire().unwrap())).unwrap();

        let first = reparsed.elements_size().unwrap();
        let second = reparsed.elements_size().unwrap();
        prop_assert_eq!(first, second);
    }
}
