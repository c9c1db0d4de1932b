//! Connection
//!
//! Owns the stream to one RCON server and sequences packets over it.

use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use bytes::Bytes;

use crate::config::Config;
use crate::error::{RconError, Result};
use crate::protocol::{encode, validate_payload, Packet};
use super::FrameReader;

/// A byte stream an RCON connection can run over
///
/// Implemented for [`TcpStream`]; anything else that is `Read + Write`
/// (in-memory pipes, TLS wrappers) can opt in.
pub trait Transport: Read + Write {
    /// Release the underlying resource. Called once, from `close`.
    fn shutdown(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Transport for TcpStream {
    fn shutdown(&mut self) -> std::io::Result<()> {
        match TcpStream::shutdown(self, Shutdown::Both) {
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// Lifecycle of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket open, login not yet accepted
    Connected,

    /// Login accepted; commands may be sent
    Authenticated,

    /// Closed explicitly or after a fatal error; cannot be reused
    Closed,
}

/// A single connection to an RCON server
pub struct Connection<S: Transport = TcpStream> {
    /// Underlying stream
    stream: S,

    /// Frame assembly for incoming packets
    reader: FrameReader,

    /// Current lifecycle state
    state: ConnectionState,

    /// Optional cap on outgoing payloads
    max_payload_size: Option<usize>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection<TcpStream> {
    /// Open a TCP connection to the configured server
    ///
    /// Resolves `host[:port]`, connects (with the configured timeout, if any)
    /// and applies socket options. No login is performed.
    pub fn open(config: &Config) -> Result<Self> {
        let (host, port) = config.target()?;
        let addrs: Vec<SocketAddr> = (host.as_str(), port).to_socket_addrs()?.collect();
        if addrs.is_empty() {
            return Err(RconError::Config(format!("'{}' did not resolve to any address", host)));
        }

        let stream = connect_any(&addrs, config)?;

        stream.set_nodelay(config.nodelay)?;
        stream.set_read_timeout(config.read_timeout())?;
        stream.set_write_timeout(config.write_timeout())?;

        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| format!("{}:{}", host, port));

        tracing::debug!("Connected to {}", peer_addr);

        Ok(Self::from_stream(stream, peer_addr).with_max_payload_size(config.max_payload_size))
    }
}

/// Try each resolved address in turn, returning the first success or the last error
fn connect_any(addrs: &[SocketAddr], config: &Config) -> Result<TcpStream> {
    let mut last_err = None;

    for addr in addrs {
        let attempt = match config.connect_timeout() {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout),
            None => TcpStream::connect(addr),
        };
        match attempt {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Connect to {} failed: {}", addr, e);
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) if e.kind() == ErrorKind::TimedOut => RconError::Timeout,
        Some(e) => RconError::Io(e),
        None => RconError::Config("no address to connect to".to_string()),
    })
}

impl<S: Transport> Connection<S> {
    /// Wrap an already-open stream. The connection starts unauthenticated.
    pub fn from_stream(stream: S, peer_addr: impl Into<String>) -> Self {
        Self {
            stream,
            reader: FrameReader::new(),
            state: ConnectionState::Connected,
            max_payload_size: None,
            peer_addr: peer_addr.into(),
        }
    }

    /// Cap payloads in both directions at `max` bytes
    pub fn with_max_payload_size(mut self, max: Option<usize>) -> Self {
        self.max_payload_size = max;
        self.reader = FrameReader::new().with_max_payload_size(max);
        self
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == ConnectionState::Authenticated
    }

    pub fn is_closed(&self) -> bool {
        self.state == ConnectionState::Closed
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }

    /// Borrow the underlying stream
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    // =========================================================================
    // Packet I/O
    // =========================================================================

    /// Encode and write one packet
    ///
    /// Nothing is written if the payload cannot be encoded.
    pub fn send(&mut self, packet: &Packet) -> Result<()> {
        let frame = self.encode_outgoing(packet)?;
        self.write_frames(&[frame])
    }

    /// Block until one complete frame has been received
    pub fn receive(&mut self) -> Result<Packet> {
        self.ensure_open()?;

        match self.reader.read_frame(&mut self.stream) {
            Ok(packet) => {
                tracing::trace!(
                    request_id = packet.request_id,
                    packet_type = packet.packet_type.code(),
                    len = packet.payload.len(),
                    "Received packet from {}",
                    self.peer_addr
                );
                Ok(packet)
            }
            Err(e) => {
                // The rest of the response is still unread; the stream cannot be resynchronized
                if matches!(e, RconError::Encoding(_)) {
                    tracing::warn!("Undecodable payload from {}: {}", self.peer_addr, e);
                    self.close();
                }
                Err(self.fail(e))
            }
        }
    }

    /// Log in with the shared secret
    pub fn authenticate(&mut self, password: &str) -> Result<()> {
        super::handshake::authenticate(self, password)
    }

    /// Run a command and return its reassembled output
    pub fn command(&mut self, text: &str) -> Result<String> {
        super::session::execute(self, text)
    }

    /// Close the connection. Further operations return [`RconError::Closed`].
    pub fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;

        if let Err(e) = self.stream.shutdown() {
            tracing::debug!("Error shutting down connection to {}: {}", self.peer_addr, e);
        }
        tracing::debug!("Connection to {} closed", self.peer_addr);
    }

    // =========================================================================
    // Crate-internal helpers
    // =========================================================================

    pub(crate) fn ensure_open(&self) -> Result<()> {
        match self.state {
            ConnectionState::Closed => Err(RconError::Closed),
            _ => Ok(()),
        }
    }

    pub(crate) fn mark_authenticated(&mut self) {
        self.state = ConnectionState::Authenticated;
    }

    /// Validate and encode a packet without touching the stream
    pub(crate) fn encode_outgoing(&self, packet: &Packet) -> Result<Bytes> {
        validate_payload(&packet.payload)?;
        if let Some(max) = self.max_payload_size {
            if packet.payload.len() > max {
                return Err(RconError::FrameTooLarge {
                    size: packet.payload.len(),
                    max,
                });
            }
        }
        encode(packet)
    }

    /// Write pre-encoded frames back to back, then flush
    pub(crate) fn write_frames(&mut self, frames: &[Bytes]) -> Result<()> {
        self.ensure_open()?;

        for frame in frames {
            if let Err(e) = self.stream.write_all(frame) {
                return Err(self.fail(e.into()));
            }
        }
        if let Err(e) = self.stream.flush() {
            return Err(self.fail(e.into()));
        }

        tracing::trace!(frames = frames.len(), "Sent to {}", self.peer_addr);
        Ok(())
    }

    /// Close on fatal errors and hand the error back
    pub(crate) fn fail(&mut self, err: RconError) -> RconError {
        let err = match err {
            RconError::Io(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                RconError::Timeout
            }
            other => other,
        };

        if err.is_fatal() {
            tracing::warn!("Connection to {} failed: {}", self.peer_addr, err);
            self.close();
        }
        err
    }
}
