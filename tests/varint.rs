//! Delta-time varint behavior checked against an encoder oracle.

use smfstream::prelude::*;

/// Encode `value` as a base-128 big-endian variable-length integer,
/// the way a MIDI writer would.
fn encode_varint(value: u32) -> Vec<u8> {
    assert!(value <= 0x0FFF_FFFF);
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    groups.reverse();
    groups
}

/// A format 0 file whose only track is an End of Track at delta
/// `delta_bytes`.
fn file_with_delta(delta_bytes: &[u8]) -> Vec<u8> {
    let mut bytes = b"MThd".to_vec();
    bytes.extend_from_slice(&6u32.to_be_bytes());
    bytes.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x60]);
    let mut payload = delta_bytes.to_vec();
    payload.extend_from_slice(&[0xFF, 0x2F, 0x00]);
    bytes.extend_from_slice(b"MTrk");
    bytes.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&payload);
    bytes
}

fn parse_delta(delta_bytes: &[u8]) -> Result<u32, ParseError> {
    let mut parser = Parser::new();
    let mut src = Source::from_bytes(file_with_delta(delta_bytes)).unwrap();
    parser.read_event(&mut src)?;
    parser.read_event(&mut src)?;
    match parser.read_event(&mut src)? {
        Event::Track(te) => Ok(te.delta()),
        other => panic!("expected the End of Track event, got {other:?}"),
    }
}

#[test]
fn round_trips_at_encoding_boundaries() {
    use pretty_assertions::assert_eq;
    let boundaries = [
        (0u32, 1usize),
        (1, 1),
        (0x7F, 1),
        (0x80, 2),
        (0x2000, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (0x0FFF_FFFF, 4),
    ];
    for (value, encoded_len) in boundaries {
        let encoded = encode_varint(value);
        assert_eq!(encoded.len(), encoded_len, "encoding length of {value:#x}");
        assert_eq!(parse_delta(&encoded).unwrap(), value, "round trip of {value:#x}");
    }
}

#[test]
fn known_encodings() {
    use pretty_assertions::assert_eq;
    assert_eq!(encode_varint(0), vec![0x00]);
    assert_eq!(encode_varint(192), vec![0x81, 0x40]);
    assert_eq!(encode_varint(0x0FFF_FFFF), vec![0xFF, 0xFF, 0xFF, 0x7F]);
    assert_eq!(parse_delta(&[0x81, 0x40]).unwrap(), 192);
}

#[test]
fn fifth_continuation_byte_is_rejected() {
    let err = parse_delta(&[0xFF, 0xFF, 0xFF, 0xFF, 0x00]).unwrap_err();
    assert!(matches!(err, ParseError::LongVarint));
    assert_eq!(err.code(), smfstream::code::LONG_VARINT);
}

#[test]
fn redundant_leading_zero_groups_still_decode() {
    use pretty_assertions::assert_eq;
    // 0x80 0x00 is a two-byte encoding of zero.
    assert_eq!(parse_delta(&[0x80, 0x00]).unwrap(), 0);
}
