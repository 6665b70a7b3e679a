use mp4meta::{FourCC, ParseError, read_header_at};
use std::io::Cursor;

fn plain_box(size: u32, tag: &[u8; 4]) -> Vec<u8> {
    let mut v = Vec::new();
    v.extend_from_slice(&size.to_be_bytes());
    v.extend_from_slice(tag);
    v
}

#[test]
fn reads_plain_header() {
    let mut data = plain_box(24, b"ftyp");
    data.extend_from_slice(&[0u8; 16]);
    let mut cur = Cursor::new(data);

    let hdr = read_header_at(&mut cur, 0).unwrap().expect("header");
    assert_eq!(hdr.size, 24);
    assert_eq!(hdr.header_size, 8);
    assert_eq!(hdr.typ, FourCC(*b"ftyp"));
}

#[test]
fn reads_large_size_extension() {
    let mut data = plain_box(1, b"mdat");
    data.extend_from_slice(&4_000_000_000u64.to_be_bytes());
    let mut cur = Cursor::new(data);

    let hdr = read_header_at(&mut cur, 0).unwrap().expect("header");
    assert_eq!(hdr.size, 4_000_000_000);
    assert_eq!(hdr.header_size, 16);
    assert_eq!(hdr.typ, FourCC(*b"mdat"));
}

#[test]
fn reads_header_at_nonzero_offset() {
    let mut data = vec![0xAA; 12];
    data.extend_from_slice(&plain_box(16, b"free"));
    data.extend_from_slice(&[0u8; 8]);
    let mut cur = Cursor::new(data);

    let hdr = read_header_at(&mut cur, 12).unwrap().expect("header");
    assert_eq!(hdr.size, 16);
    assert_eq!(hdr.typ, FourCC(*b"free"));
}

#[test]
fn short_input_means_no_more_boxes() {
    let mut empty = Cursor::new(Vec::new());
    assert!(read_header_at(&mut empty, 0).unwrap().is_none());

    let mut partial = Cursor::new(vec![0u8, 0, 0, 24, b'f']);
    assert!(read_header_at(&mut partial, 0).unwrap().is_none());
}

#[test]
fn truncated_large_size_is_fatal() {
    let mut data = plain_box(1, b"mdat");
    data.extend_from_slice(&[0u8; 4]); // only half of the 64-bit size
    let mut cur = Cursor::new(data);

    assert!(matches!(
        read_header_at(&mut cur, 0),
        Err(ParseError::Io(_))
    ));
}

#[test]
fn zero_size_is_malformed() {
    let mut cur = Cursor::new(plain_box(0, b"free"));
    assert!(matches!(
        read_header_at(&mut cur, 0),
        Err(ParseError::MalformedSize(0))
    ));
}

#[test]
fn size_smaller_than_header_is_malformed() {
    let mut cur = Cursor::new(plain_box(4, b"free"));
    assert!(matches!(
        read_header_at(&mut cur, 0),
        Err(ParseError::MalformedSize(4))
    ));

    // large-size variant: resolved size below the 16-byte header
    let mut data = plain_box(1, b"mdat");
    data.extend_from_slice(&12u64.to_be_bytes());
    let mut cur = Cursor::new(data);
    assert!(matches!(
        read_header_at(&mut cur, 0),
        Err(ParseError::MalformedSize(12))
    ));
}
