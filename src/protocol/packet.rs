//! Packet definitions
//!
//! Represents a single RCON frame, in either direction.

/// Request id used for the login packet; the server echoes it on success
pub const LOGIN_REQUEST_ID: i32 = 0;

/// Request id carried by every fragment of a command's response
pub const COMMAND_REQUEST_ID: i32 = 0;

/// Request id of the follow-up packet marking the end of a response
pub const SENTINEL_REQUEST_ID: i32 = 1;

/// Request id a server returns when the login is rejected
pub const AUTH_FAILURE_REQUEST_ID: i32 = -1;

/// Packet type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PacketType {
    /// SERVERDATA_RESPONSE_VALUE (0)
    Response,

    /// SERVERDATA_EXECCOMMAND (2); servers also use this code for the auth reply
    Command,

    /// SERVERDATA_AUTH (3)
    Login,

    /// Any code not listed above, kept verbatim.
    ///
    /// Never holds 0, 2 or 3; [`Packet::new`] folds those into the named
    /// variants so a decoded packet compares equal to the one encoded.
    Other(i32),
}

impl PacketType {
    /// Wire code for this type
    pub fn code(self) -> i32 {
        match self {
            PacketType::Response => 0,
            PacketType::Command => 2,
            PacketType::Login => 3,
            PacketType::Other(code) => code,
        }
    }

    /// Map a wire code back to a type
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => PacketType::Response,
            2 => PacketType::Command,
            3 => PacketType::Login,
            other => PacketType::Other(other),
        }
    }
}

/// A single protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    /// Client-chosen id, echoed by the server
    pub request_id: i32,

    /// Packet type
    pub packet_type: PacketType,

    /// ASCII text payload
    pub payload: String,
}

impl Packet {
    pub fn new(request_id: i32, packet_type: PacketType, payload: impl Into<String>) -> Self {
        Self {
            request_id,
            packet_type: PacketType::from_code(packet_type.code()),
            payload: payload.into(),
        }
    }

    /// Login packet carrying the shared secret
    pub fn login(password: impl Into<String>) -> Self {
        Self::new(LOGIN_REQUEST_ID, PacketType::Login, password)
    }

    /// Command packet
    pub fn command(text: impl Into<String>) -> Self {
        Self::new(COMMAND_REQUEST_ID, PacketType::Command, text)
    }

    /// Empty response-typed packet sent after a command.
    ///
    /// The server answers it only after every fragment of the preceding
    /// command, so its echo marks the end of that command's output.
    pub fn sentinel() -> Self {
        Self::new(SENTINEL_REQUEST_ID, PacketType::Response, String::new())
    }

    /// Size of the frame once encoded, length prefix included
    pub fn frame_size(&self) -> usize {
        super::codec::LENGTH_PREFIX_SIZE
            + super::codec::HEADER_SIZE
            + self.payload.len()
            + super::codec::TERMINATOR.len()
    }
}
