//! Frame Reader
//!
//! Pulls exactly one frame at a time off a byte stream.

use std::io::{ErrorKind, Read};

use bytes::BytesMut;

use crate::error::{RconError, Result};
use crate::protocol::{
    decode, declared_length, Decoded, Packet, MIN_FRAME_LENGTH, MIN_FRAME_SIZE,
};

/// Largest single read; the buffer only grows by bytes actually received
pub const READ_CHUNK_SIZE: usize = 64 * 1024;

/// Accumulates reads until one complete frame is available
///
/// Each call to [`FrameReader::read_frame`] starts from an empty buffer and
/// only ever asks the stream for the bytes the current frame still lacks, so
/// nothing belonging to the next frame is consumed.
#[derive(Debug)]
pub struct FrameReader {
    /// Bytes of the frame being assembled
    buffer: BytesMut,

    /// Optional cap on the declared payload size
    max_payload_size: Option<usize>,
}

impl FrameReader {
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(MIN_FRAME_SIZE),
            max_payload_size: None,
        }
    }

    /// Reject frames whose declared payload exceeds `max` bytes
    pub fn with_max_payload_size(mut self, max: Option<usize>) -> Self {
        self.max_payload_size = max;
        self
    }

    /// Read one complete frame from `reader`
    ///
    /// Blocks until the frame is complete. A zero-byte read is reported as
    /// [`RconError::ConnectionClosed`]; an elapsed socket timeout as
    /// [`RconError::Timeout`].
    pub fn read_frame<R: Read>(&mut self, reader: &mut R) -> Result<Packet> {
        self.buffer.clear();

        loop {
            match decode(&self.buffer)? {
                Decoded::Complete { packet, .. } => return Ok(packet),
                Decoded::Incomplete { needed } => {
                    self.check_declared_size()?;
                    self.fill(reader, needed)?;
                }
            }
        }
    }

    /// Bytes buffered for the frame in progress
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    fn check_declared_size(&self) -> Result<()> {
        let declared = declared_length(&self.buffer);
        let (Some(max), Some(length)) = (self.max_payload_size, declared) else {
            return Ok(());
        };

        let size = (length as i64 - MIN_FRAME_LENGTH as i64).max(0) as usize;
        if size > max {
            return Err(RconError::FrameTooLarge { size, max });
        }
        Ok(())
    }

    /// Issue a single read for at most `needed` more bytes, capped at one chunk
    fn fill<R: Read>(&mut self, reader: &mut R, needed: usize) -> Result<()> {
        let start = self.buffer.len();
        self.buffer.resize(start + needed.min(READ_CHUNK_SIZE), 0);

        loop {
            match reader.read(&mut self.buffer[start..]) {
                Ok(0) => {
                    self.buffer.truncate(start);
                    return Err(RconError::ConnectionClosed);
                }
                Ok(n) => {
                    self.buffer.truncate(start + n);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    self.buffer.truncate(start);
                    return Err(match e.kind() {
                        // Unix reports an elapsed SO_RCVTIMEO as WouldBlock, Windows as TimedOut
                        ErrorKind::WouldBlock | ErrorKind::TimedOut => RconError::Timeout,
                        _ => RconError::Io(e),
                    });
                }
            }
        }
    }
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}
