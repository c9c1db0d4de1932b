//! Protocol codec
//!
//! Encoding and decoding functions for the RCON wire protocol. No I/O happens
//! here; see [`crate::network::FrameReader`] for the stream side.
//!
//! ## Wire Format
//!
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬────────┐
//! │ Len (4)  │  Id (4)  │ Type (4) │   Payload (ASCII)   │ 00 00  │
//! └──────────┴──────────┴──────────┴─────────────────────┴────────┘
//! ```
//!
//! All integers are little-endian `i32`. `Len` counts every byte after
//! itself, so the smallest frame is 14 bytes with `Len = 10`.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{RconError, Result};
use super::{Packet, PacketType};

/// Length prefix size
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Request id + type
pub const HEADER_SIZE: usize = 8;

/// Two null bytes closing every frame
pub const TERMINATOR: [u8; 2] = [0x00, 0x00];

/// Smallest declared length: header + empty payload + terminator
pub const MIN_FRAME_LENGTH: i32 = (HEADER_SIZE + TERMINATOR.len()) as i32;

/// Smallest complete frame on the wire
pub const MIN_FRAME_SIZE: usize = LENGTH_PREFIX_SIZE + MIN_FRAME_LENGTH as usize;

/// Outcome of [`decode`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A full frame was parsed from the front of the buffer
    Complete { packet: Packet, consumed: usize },

    /// More bytes are required; `needed` is how many beyond the current buffer
    Incomplete { needed: usize },
}

// =============================================================================
// Encoding
// =============================================================================

/// Check that a payload fits the protocol's single-byte text encoding
pub fn validate_payload(payload: &str) -> Result<()> {
    match payload.char_indices().find(|(_, c)| !c.is_ascii()) {
        Some((index, c)) => Err(RconError::Encoding(format!(
            "non-ASCII character {:?} at byte {}",
            c, index
        ))),
        None => Ok(()),
    }
}

/// Encode a packet to a complete frame
///
/// Format: len (4) + request_id (4) + type (4) + payload + 00 00
pub fn encode(packet: &Packet) -> Result<Bytes> {
    validate_payload(&packet.payload)?;

    let body_len = HEADER_SIZE + packet.payload.len() + TERMINATOR.len();
    let length = i32::try_from(body_len).map_err(|_| RconError::FrameTooLarge {
        size: packet.payload.len(),
        max: i32::MAX as usize - MIN_FRAME_LENGTH as usize,
    })?;

    let mut frame = BytesMut::with_capacity(LENGTH_PREFIX_SIZE + body_len);
    frame.put_i32_le(length);
    frame.put_i32_le(packet.request_id);
    frame.put_i32_le(packet.packet_type.code());
    frame.put_slice(packet.payload.as_bytes());
    frame.put_slice(&TERMINATOR);

    Ok(frame.freeze())
}

// =============================================================================
// Decoding
// =============================================================================

/// Read the length prefix, if at least four bytes are available
pub fn declared_length(buf: &[u8]) -> Option<i32> {
    if buf.len() < LENGTH_PREFIX_SIZE {
        return None;
    }
    let mut prefix = &buf[..LENGTH_PREFIX_SIZE];
    Some(prefix.get_i32_le())
}

/// Decode one frame from the front of `buf`
///
/// Short input is never an error: it yields [`Decoded::Incomplete`] with the
/// number of bytes still missing. Once a whole frame is present, a bad
/// terminator or an impossible length is a [`RconError::FramingViolation`].
/// Bytes past the frame are left alone.
pub fn decode(buf: &[u8]) -> Result<Decoded> {
    let length = match declared_length(buf) {
        Some(length) => length,
        None => {
            return Ok(Decoded::Incomplete {
                needed: MIN_FRAME_SIZE - buf.len(),
            })
        }
    };

    if length < MIN_FRAME_LENGTH {
        if buf.len() < MIN_FRAME_SIZE {
            return Ok(Decoded::Incomplete {
                needed: MIN_FRAME_SIZE - buf.len(),
            });
        }
        return Err(RconError::FramingViolation(format!(
            "declared length {} is below the minimum of {}",
            length, MIN_FRAME_LENGTH
        )));
    }

    let total = LENGTH_PREFIX_SIZE + length as usize;
    if buf.len() < total {
        return Ok(Decoded::Incomplete {
            needed: total - buf.len(),
        });
    }

    let frame = &buf[..total];
    let terminator = &frame[total - TERMINATOR.len()..];
    if terminator != TERMINATOR {
        return Err(RconError::FramingViolation(format!(
            "expected null terminator, found {:02x} {:02x}",
            terminator[0], terminator[1]
        )));
    }

    let mut header = &frame[LENGTH_PREFIX_SIZE..LENGTH_PREFIX_SIZE + HEADER_SIZE];
    let request_id = header.get_i32_le();
    let packet_type = PacketType::from_code(header.get_i32_le());

    let payload_end = total - TERMINATOR.len();
    let payload = decode_payload(&frame[LENGTH_PREFIX_SIZE + HEADER_SIZE..payload_end])?;

    Ok(Decoded::Complete {
        packet: Packet {
            request_id,
            packet_type,
            payload,
        },
        consumed: total,
    })
}

fn decode_payload(bytes: &[u8]) -> Result<String> {
    if let Some(index) = bytes.iter().position(|b| !b.is_ascii()) {
        return Err(RconError::Encoding(format!(
            "non-ASCII byte 0x{:02x} at payload offset {}",
            bytes[index], index
        )));
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| RconError::Encoding(e.to_string()))
}
