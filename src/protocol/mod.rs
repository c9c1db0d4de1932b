//! Protocol Module
//!
//! Defines the RCON wire protocol (Source / Minecraft flavour).
//!
//! ## Frame Format
//! ```text
//! ┌──────────┬──────────┬──────────┬─────────────────────┬────────┐
//! │ Len (4)  │  Id (4)  │ Type (4) │      Payload        │ 00 00  │
//! └──────────┴──────────┴──────────┴─────────────────────┴────────┘
//! ```
//!
//! ### Packet Types
//! - 3: LOGIN    - Payload: password
//! - 2: COMMAND  - Payload: command text (also the auth reply code)
//! - 0: RESPONSE - Payload: command output
//!
//! ### Request Ids
//! - 0: login and command requests, echoed on every response fragment
//! - 1: end-of-response sentinel
//! - -1: returned by the server when login fails

mod packet;
mod codec;

pub use packet::{
    Packet, PacketType, AUTH_FAILURE_REQUEST_ID, COMMAND_REQUEST_ID, LOGIN_REQUEST_ID,
    SENTINEL_REQUEST_ID,
};
pub use codec::{
    decode, declared_length, encode, validate_payload, Decoded, HEADER_SIZE, LENGTH_PREFIX_SIZE,
    MIN_FRAME_LENGTH, MIN_FRAME_SIZE, TERMINATOR,
};
