//! Command Session
//!
//! Runs one command and reassembles its possibly fragmented output.
//!
//! ## Sentinel Protocol
//! ```text
//!   client                          server
//!     │── COMMAND   id=0 "list" ──────▶│
//!     │── RESPONSE  id=1 ""     ──────▶│
//!     │◀───────────── id=0 "There are"─│   fragment
//!     │◀───────────── id=0 " 3 of..."  │   fragment
//!     │◀───────────── id=1 ...         │   sentinel echo: done
//! ```
//!
//! Response frames carry no "more follows" flag. The server handles requests
//! on one stream in order, so the sentinel's echo can only arrive after the
//! last fragment of the command before it.

use crate::error::{RconError, Result};
use crate::protocol::{Packet, COMMAND_REQUEST_ID};
use super::{Connection, ConnectionState, Transport};

/// Execute `text` and return the concatenated response fragments
///
/// Both the command and the sentinel are encoded before anything is written,
/// so an encoding error leaves the connection usable. The sentinel's own
/// payload is discarded.
pub(crate) fn execute<S: Transport>(conn: &mut Connection<S>, text: &str) -> Result<String> {
    match conn.state() {
        ConnectionState::Authenticated => {}
        ConnectionState::Connected => {
            return Err(RconError::InvalidState("not authenticated".to_string()))
        }
        ConnectionState::Closed => return Err(RconError::Closed),
    }

    let request = conn.encode_outgoing(&Packet::command(text))?;
    let sentinel = conn.encode_outgoing(&Packet::sentinel())?;
    conn.write_frames(&[request, sentinel])?;

    let mut response = String::new();
    let mut fragments = 0usize;

    loop {
        let packet = conn.receive()?;
        if packet.request_id != COMMAND_REQUEST_ID {
            break;
        }
        fragments += 1;
        response.push_str(&packet.payload);
    }

    tracing::debug!(fragments, len = response.len(), "Command completed on {}", conn.peer_addr());
    Ok(response)
}
