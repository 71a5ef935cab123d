use bitstream::{BitReader, BitWriter};

#[test]
fn section_header_shaped_roundtrip() {
    // zig-zag section index, mode bit, 13-bit count, then 12-bit positions
    let mut writer = BitWriter::new();
    writer.write_zigzag(-4, 6).unwrap();
    writer.write_bool(false);
    writer.write_bits(3, 13).unwrap();
    for pos in [0u64, 0x123, 0xFFF] {
        writer.write_bits(pos, 12).unwrap();
        writer.write_bits(1, 1).unwrap();
    }
    let bytes = writer.finish();

    let mut reader = BitReader::new(&bytes);
    assert_eq!(reader.read_zigzag(6).unwrap(), -4);
    assert!(!reader.read_bool());
    assert_eq!(reader.read_bits(13).unwrap(), 3);
    for pos in [0u64, 0x123, 0xFFF] {
        assert_eq!(reader.read_bits(12).unwrap(), pos);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
    }
    assert!(reader.ensure_in_bounds().is_ok());
}

#[test]
fn reused_buffer_roundtrip() {
    let mut first = BitWriter::new();
    first.write_bits(0xDEAD, 16).unwrap();
    let buf = first.finish();

    let mut second = BitWriter::with_buffer(buf);
    second.write_bits(0b1, 1).unwrap();
    let bytes = second.finish();
    assert_eq!(bytes, vec![0b1000_0000]);
}

#[test]
fn truncated_stream_is_detected_after_parsing() {
    let mut writer = BitWriter::new();
    writer.write_bits(0xABC, 12).unwrap();
    writer.write_bits(0x3FF, 10).unwrap();
    let mut bytes = writer.finish();
    bytes.truncate(1);

    let mut reader = BitReader::new(&bytes);
    assert_eq!(reader.read_bits(12).unwrap(), 0xAB0);
    let _ = reader.read_bits(10).unwrap();
    assert!(reader.ensure_in_bounds().is_err());
}
