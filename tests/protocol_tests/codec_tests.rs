//! Codec Tests
//!
//! Tests for packet encoding and incremental decoding.

#[path = "../common/mod.rs"]
mod common;

use rcon_console::protocol::{
    decode, encode, Decoded, Packet, PacketType, MIN_FRAME_SIZE,
};
use rcon_console::RconError;

use common::raw_frame;

fn complete(decoded: Decoded) -> (Packet, usize) {
    match decoded {
        Decoded::Complete { packet, consumed } => (packet, consumed),
        other => panic!("Expected complete frame, got {:?}", other),
    }
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_exact_layout() {
    let encoded = encode(&Packet::new(7, PacketType::Command, "list")).unwrap();

    let mut expected = Vec::new();
    expected.extend_from_slice(&14i32.to_le_bytes()); // 4 + 4 + 4 payload + 2
    expected.extend_from_slice(&7i32.to_le_bytes());
    expected.extend_from_slice(&2i32.to_le_bytes());
    expected.extend_from_slice(b"list");
    expected.extend_from_slice(&[0, 0]);

    assert_eq!(&encoded[..], &expected[..]);
}

#[test]
fn test_encode_empty_payload_is_minimum_frame() {
    let encoded = encode(&Packet::sentinel()).unwrap();

    assert_eq!(encoded.len(), MIN_FRAME_SIZE);
    assert_eq!(&encoded[..4], &10i32.to_le_bytes());
    assert_eq!(&encoded[4..8], &1i32.to_le_bytes());
    assert_eq!(&encoded[8..12], &0i32.to_le_bytes());
}

#[test]
fn test_encode_login_type_code() {
    let encoded = encode(&Packet::login("secret")).unwrap();
    assert_eq!(&encoded[4..8], &0i32.to_le_bytes());
    assert_eq!(&encoded[8..12], &3i32.to_le_bytes());
    assert_eq!(encoded.len(), Packet::login("secret").frame_size());
}

#[test]
fn test_encode_rejects_non_ascii() {
    let result = encode(&Packet::command("say héllo"));
    assert!(matches!(result, Err(RconError::Encoding(_))));
}

#[test]
fn test_encode_negative_request_id() {
    let encoded = encode(&Packet::new(-1, PacketType::Command, "")).unwrap();
    assert_eq!(&encoded[4..8], &(-1i32).to_le_bytes());
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_round_trip() {
    let packets = [
        Packet::login("hunter2"),
        Packet::command("whitelist add Notch"),
        Packet::sentinel(),
        Packet::new(-1, PacketType::Command, ""),
        Packet::new(42, PacketType::Other(9), "odd type"),
    ];

    for packet in packets {
        let encoded = encode(&packet).unwrap();
        let (decoded, consumed) = complete(decode(&encoded).unwrap());
        assert_eq!(decoded, packet);
        assert_eq!(consumed, encoded.len());
    }
}

#[test]
fn test_decode_short_buffers_are_incomplete() {
    let frame = raw_frame(0, 0, b"");
    for len in 0..MIN_FRAME_SIZE {
        match decode(&frame[..len]).unwrap() {
            Decoded::Incomplete { needed } => assert_eq!(needed, MIN_FRAME_SIZE - len),
            other => panic!("Expected incomplete at {} bytes, got {:?}", len, other),
        }
    }
}

#[test]
fn test_decode_garbage_under_minimum_is_incomplete() {
    // Even nonsense is not judged until a minimum frame's worth has arrived
    let garbage = [0xFFu8; 13];
    for len in 0..garbage.len() {
        assert!(matches!(
            decode(&garbage[..len]).unwrap(),
            Decoded::Incomplete { .. }
        ));
    }
}

#[test]
fn test_decode_reports_remaining_bytes_of_declared_frame() {
    let frame = raw_frame(0, 0, b"There are 3 of a max of 20 players online");
    let total = frame.len();

    for len in MIN_FRAME_SIZE..total {
        match decode(&frame[..len]).unwrap() {
            Decoded::Incomplete { needed } => assert_eq!(needed, total - len),
            other => panic!("Expected incomplete at {} bytes, got {:?}", len, other),
        }
    }

    let (packet, consumed) = complete(decode(&frame).unwrap());
    assert_eq!(consumed, total);
    assert_eq!(packet.payload, "There are 3 of a max of 20 players online");
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let mut bytes = raw_frame(0, 0, b"first");
    let first_len = bytes.len();
    bytes.extend_from_slice(&raw_frame(1, 0, b"second"));

    let (packet, consumed) = complete(decode(&bytes).unwrap());
    assert_eq!(packet.payload, "first");
    assert_eq!(consumed, first_len);

    let (packet, _) = complete(decode(&bytes[consumed..]).unwrap());
    assert_eq!(packet.request_id, 1);
    assert_eq!(packet.payload, "second");
}

#[test]
fn test_decode_bad_terminator_is_framing_violation() {
    let mut frame = raw_frame(0, 0, b"abc");
    let last = frame.len() - 1;
    frame[last] = 0x01;

    for _ in 0..3 {
        assert!(matches!(decode(&frame), Err(RconError::FramingViolation(_))));
    }

    let mut frame = raw_frame(0, 0, b"abc");
    let second_last = frame.len() - 2;
    frame[second_last] = b'!';
    assert!(matches!(decode(&frame), Err(RconError::FramingViolation(_))));
}

#[test]
fn test_decode_impossible_length_is_framing_violation() {
    let mut frame = raw_frame(0, 0, b"");
    frame[..4].copy_from_slice(&9i32.to_le_bytes());
    assert!(matches!(decode(&frame), Err(RconError::FramingViolation(_))));

    frame[..4].copy_from_slice(&(-5i32).to_le_bytes());
    assert!(matches!(decode(&frame), Err(RconError::FramingViolation(_))));
}

#[test]
fn test_decode_non_ascii_payload_is_encoding_error() {
    let frame = raw_frame(0, 0, "§aGreen".as_bytes());
    assert!(matches!(decode(&frame), Err(RconError::Encoding(_))));
}

#[test]
fn test_decode_keeps_unknown_type_codes() {
    let frame = raw_frame(5, 77, b"");
    let (packet, _) = complete(decode(&frame).unwrap());
    assert_eq!(packet.packet_type, PacketType::Other(77));
    assert_eq!(packet.packet_type.code(), 77);
}

#[test]
fn test_packet_type_codes() {
    assert_eq!(PacketType::Response.code(), 0);
    assert_eq!(PacketType::Command.code(), 2);
    assert_eq!(PacketType::Login.code(), 3);
    for code in [0, 2, 3] {
        assert_eq!(PacketType::from_code(code).code(), code);
    }
}

#[test]
fn test_listed_codes_are_never_other() {
    let packet = Packet::new(4, PacketType::Other(2), "save-all");
    assert_eq!(packet.packet_type, PacketType::Command);

    let frame = encode(&packet).unwrap();
    let (decoded, _) = complete(decode(&frame).unwrap());
    assert_eq!(decoded, packet);
}
