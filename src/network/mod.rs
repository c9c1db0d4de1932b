//! Network Module
//!
//! Blocking TCP plumbing for the RCON client.
//!
//! ## Architecture
//! - `FrameReader` pulls one frame at a time off the stream
//! - `Connection` owns the stream and its lifecycle state
//! - The handshake and command session drive a `Connection`
//!
//! A connection carries one request at a time. Fragments of two concurrent
//! commands would interleave, so callers sharing a connection must serialize
//! access (see `SharedClient` and `CommandWorker`).

mod frame_reader;
mod connection;
mod handshake;
mod session;

pub use frame_reader::{FrameReader, READ_CHUNK_SIZE};
pub use connection::{Connection, ConnectionState, Transport};
