//! Error types for the RCON client
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using RconError
pub type Result<T> = std::result::Result<T, RconError>;

/// Unified error type for RCON operations
#[derive(Debug, Error)]
pub enum RconError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Timed out waiting for the server")]
    Timeout,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Framing violation: {0}")]
    FramingViolation(String),

    #[error("Payload of {size} bytes exceeds limit of {max} bytes")]
    FrameTooLarge { size: usize, max: usize },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    // -------------------------------------------------------------------------
    // State Errors
    // -------------------------------------------------------------------------
    #[error("Invalid connection state: {0}")]
    InvalidState(String),

    #[error("Connection is closed")]
    Closed,

    #[error("Command worker has stopped")]
    WorkerStopped,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl RconError {
    /// Whether the error always leaves the connection unusable.
    ///
    /// After a fatal error the byte stream can no longer be trusted to be
    /// aligned on a frame boundary. `Encoding` is not counted: it is harmless
    /// when raised for outgoing text, but an undecodable reply closes the
    /// connection. `Closed` means the connection was already gone. Check the
    /// connection state rather than this flag to decide whether to continue.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RconError::Io(_)
                | RconError::ConnectionClosed
                | RconError::Timeout
                | RconError::FramingViolation(_)
                | RconError::FrameTooLarge { .. }
                | RconError::AuthenticationFailed
        )
    }
}
