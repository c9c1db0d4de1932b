//! Tests for FrameReader
//!
//! These tests verify:
//! - Frames split across many reads are reassembled
//! - Reads never go past the end of the current frame
//! - Peer close and protocol violations surface as errors

#[path = "../common/mod.rs"]
mod common;

use std::io::{self, Read};

use rcon_console::network::{FrameReader, READ_CHUNK_SIZE};
use rcon_console::protocol::PacketType;
use rcon_console::RconError;

use common::{fragment, raw_frame, sentinel_echo, MockStream};

// =============================================================================
// Reassembly Tests
// =============================================================================

#[test]
fn test_read_single_frame() {
    let mut stream = MockStream::with_frames(&[fragment("pong")]);
    let mut reader = FrameReader::new();

    let packet = reader.read_frame(&mut stream).unwrap();

    assert_eq!(packet.request_id, 0);
    assert_eq!(packet.packet_type, PacketType::Response);
    assert_eq!(packet.payload, "pong");
}

#[test]
fn test_read_frame_delivered_byte_by_byte() {
    let payload = "Seed: [-4172144997902289642]";
    let mut stream = MockStream::with_frames(&[fragment(payload)]).chunked(1);
    let mut reader = FrameReader::new();

    let packet = reader.read_frame(&mut stream).unwrap();

    assert_eq!(packet.payload, payload);
    assert_eq!(stream.remaining(), 0);
}

#[test]
fn test_read_consecutive_frames() {
    let mut stream =
        MockStream::with_frames(&[fragment("A"), fragment("B"), sentinel_echo()]).chunked(3);
    let mut reader = FrameReader::new();

    assert_eq!(reader.read_frame(&mut stream).unwrap().payload, "A");
    assert_eq!(reader.read_frame(&mut stream).unwrap().payload, "B");
    let last = reader.read_frame(&mut stream).unwrap();
    assert_eq!(last.request_id, 1);
    assert_eq!(reader.buffered(), raw_frame(1, 0, b"Unknown request 0").len());
}

// =============================================================================
// Boundary Tests
// =============================================================================

#[test]
fn test_never_reads_past_frame_boundary() {
    let first = fragment("exactly one frame");
    let second = fragment("left untouched");
    let mut stream = MockStream::with_frames(&[first.clone(), second.clone()]);
    let mut reader = FrameReader::new();

    reader.read_frame(&mut stream).unwrap();

    // The second frame is still entirely in the stream
    assert_eq!(stream.position(), first.len());
    assert_eq!(stream.remaining(), second.len());

    // Every read asked for no more than the frame still lacked
    let requested: usize = stream.read_requests.iter().sum();
    assert_eq!(requested, first.len());
}

#[test]
fn test_first_read_requests_minimum_frame() {
    let mut stream = MockStream::with_frames(&[fragment("")]);
    let mut reader = FrameReader::new();

    reader.read_frame(&mut stream).unwrap();

    assert_eq!(stream.read_requests, vec![14]);
}

// =============================================================================
// Error Tests
// =============================================================================

#[test]
fn test_zero_byte_read_is_connection_closed() {
    let mut stream = MockStream::new(Vec::new());
    let mut reader = FrameReader::new();

    let result = reader.read_frame(&mut stream);
    assert!(matches!(result, Err(RconError::ConnectionClosed)));
}

#[test]
fn test_peer_closes_mid_frame() {
    let frame = fragment("truncated response");
    let mut stream = MockStream::new(frame[..frame.len() - 5].to_vec());
    let mut reader = FrameReader::new();

    let result = reader.read_frame(&mut stream);
    assert!(matches!(result, Err(RconError::ConnectionClosed)));
}

#[test]
fn test_bad_terminator_is_framing_violation() {
    let mut frame = fragment("abc");
    let last = frame.len() - 1;
    frame[last] = 0x7F;
    let mut stream = MockStream::new(frame);
    let mut reader = FrameReader::new();

    let result = reader.read_frame(&mut stream);
    assert!(matches!(result, Err(RconError::FramingViolation(_))));
}

#[test]
fn test_payload_limit_rejects_before_reading_body() {
    let frame = fragment(&"x".repeat(100));
    let mut stream = MockStream::new(frame);
    let mut reader = FrameReader::new().with_max_payload_size(Some(64));

    let result = reader.read_frame(&mut stream);

    assert!(matches!(result, Err(RconError::FrameTooLarge { size: 100, max: 64 })));
    assert_eq!(stream.position(), 14);
}

#[test]
fn test_payload_limit_allows_frames_at_limit() {
    let mut stream = MockStream::with_frames(&[fragment(&"y".repeat(64))]);
    let mut reader = FrameReader::new().with_max_payload_size(Some(64));

    assert_eq!(reader.read_frame(&mut stream).unwrap().payload.len(), 64);
}

/// Fails with a fixed error kind a set number of times, then delegates
struct Flaky {
    inner: MockStream,
    failures: usize,
    kind: io::ErrorKind,
}

impl Read for Flaky {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(io::Error::new(self.kind, "scripted"));
        }
        self.inner.read(buf)
    }
}

#[test]
fn test_foreign_banner_does_not_size_reads_from_prefix() {
    // "SSH-" read as a little-endian length declares roughly 760 MB
    let mut stream = MockStream::new(b"SSH-2.0-OpenSSH_".to_vec());
    let mut reader = FrameReader::new();

    let result = reader.read_frame(&mut stream);

    assert!(matches!(result, Err(RconError::ConnectionClosed)));
    assert!(stream.read_requests.iter().all(|&n| n <= READ_CHUNK_SIZE));
    assert!(reader.buffered() <= 16);
}

#[test]
fn test_frame_larger_than_one_chunk() {
    let payload = "z".repeat(3 * READ_CHUNK_SIZE + 17);
    let frame = fragment(&payload);
    let total = frame.len();
    let mut stream = MockStream::new(frame);
    let mut reader = FrameReader::new();

    assert_eq!(reader.read_frame(&mut stream).unwrap().payload, payload);
    assert!(stream.read_requests.iter().all(|&n| n <= READ_CHUNK_SIZE));
    assert_eq!(stream.read_requests.iter().sum::<usize>(), total);
}

#[test]
fn test_interrupted_reads_are_retried() {
    let mut stream = Flaky {
        inner: MockStream::with_frames(&[fragment("ok")]),
        failures: 3,
        kind: io::ErrorKind::Interrupted,
    };
    let mut reader = FrameReader::new();

    assert_eq!(reader.read_frame(&mut stream).unwrap().payload, "ok");
}

#[test]
fn test_socket_timeout_maps_to_timeout() {
    for kind in [io::ErrorKind::WouldBlock, io::ErrorKind::TimedOut] {
        let mut stream = Flaky {
            inner: MockStream::with_frames(&[fragment("late")]),
            failures: 1,
            kind,
        };
        let mut reader = FrameReader::new();

        assert!(matches!(reader.read_frame(&mut stream), Err(RconError::Timeout)));
    }
}

#[test]
fn test_other_io_errors_propagate() {
    let mut stream = Flaky {
        inner: MockStream::new(Vec::new()),
        failures: 1,
        kind: io::ErrorKind::ConnectionReset,
    };
    let mut reader = FrameReader::new();

    match reader.read_frame(&mut stream) {
        Err(RconError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("Expected IO error, got {:?}", other.map(|p| p.payload)),
    }
}
