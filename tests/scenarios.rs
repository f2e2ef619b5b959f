//! End-to-end scenarios S1-S6, exercised through the crate's public API.

use hex_literal::hex;
use ndn_tlv::{Block, Buffer, Encoder, ErrorKind, Wire};

#[test]
fn s1_single_byte_varnumber() {
    let mut encoder = Encoder::new(16);
    let written = encoder.append_byte_array_block(0x05, &[0xAA, 0xBB]);
    assert_eq!(written, 4);
    let wire = encoder.into_wire();
    assert_eq!(wire.get_buffer().as_slice(), &hex!("05 02 AA BB"));

    let block = Block::from_buffer(wire.get_buffer()).unwrap();
    assert_eq!(block.size().unwrap(), 4);
    assert_eq!(block.value_size(), 2);
}

#[test]
fn s2_three_byte_length() {
    let value = vec![0u8; 300];
    let mut block = Block::from_type_value(0x1E, Buffer::from_vec(value));
    block.encode().unwrap();
    let wire = block.wire().unwrap();
    assert_eq!(&wire[..4], &hex!("1E FD 01 2C"));
    assert_eq!(wire.len(), 303);
}

#[test]
fn s3_nested() {
    let mut outer = Block::from_type(0x06);
    outer
        .push_back(Block::from_type_value(0x07, Buffer::copy_from_slice(&[0x01, 0x02])))
        .unwrap();
    outer
        .push_back(Block::from_type_value(0x08, Buffer::copy_from_slice(&[0x03])))
        .unwrap();
    outer.encode().unwrap();
    assert_eq!(
        outer.wire().unwrap(),
        &hex!("06 07 07 02 01 02 08 01 03")
    );

    let reparsed = Block::from_buffer(Buffer::copy_from_slice(outer.wire().unwrap())).unwrap();
    assert_eq!(reparsed.elements_size().unwrap(), 2);
    assert_eq!(reparsed.get(0x07).unwrap().value(), &[0x01, 0x02]);
}

#[test]
fn s4_segmented_wire_growth() {
    let mut wire = Wire::with_capacity(4);
    wire.write_uint32(0xDEADBEEF);
    wire.append_array(&[0x11; 8]);
    assert_eq!(
        wire.get_buffer().as_slice(),
        &hex!("DE AD BE EF 11 11 11 11 11 11 11 11")
    );
    assert_eq!(wire.count_blocks(), 2);
}

#[test]
fn s5_finalize_truncates() {
    let mut wire = Wire::with_capacity(8);
    wire.append_array(&(0u8..8).collect::<Vec<_>>());
    wire.expand(8);
    wire.append_array(&(8u8..16).collect::<Vec<_>>());
    assert_eq!(wire.size(), 16);

    wire.set_position(10).unwrap();
    wire.finalize();
    assert_eq!(wire.size(), 10);
    assert_eq!(wire.count_blocks(), 2);
}

#[test]
fn s6_truncated_parse_raises_length_exceeds() {
    let bytes = hex!("06 03 07 02 01");
    let block = Block::from_buffer_range(Buffer::copy_from_slice(&bytes), 0..bytes.len(), false).unwrap();
    let err = block.parse().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LengthExceeds);
    assert_eq!(block.elements_size().unwrap_err().kind(), ErrorKind::LengthExceeds);

    let mut wire = Wire::with_capacity(8);
    wire.append_array(&bytes[2..]); // the child-only bytes: 07 02 01
    assert_eq!(wire.parse().unwrap_err().kind(), ErrorKind::LengthExceeds);
}

#[test]
fn from_stream_zero_length_and_oversize() {
    let zero = hex!("05 00");
    let block = Block::from_stream(&mut &zero[..]).unwrap();
    assert_eq!(block.r#type(), 0x05);
    assert!(!block.has_value());

    // type=0x05, length=254 marker + u32 8801 (one over MAX_NDN_PACKET_SIZE)
    let mut oversize = vec![0x05u8, 254];
    oversize.extend_from_slice(&8801u32.to_be_bytes());
    let err = Block::from_stream(&mut &oversize[..]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Oversize);
}

#[test]
fn try_from_buffer_reports_truncation_without_raising() {
    let buffer = Buffer::copy_from_slice(&hex!("05 02 AA"));
    let (ok, block) = Block::try_from_buffer(&buffer, 0);
    assert!(!ok);
    assert!(block.empty());
}
