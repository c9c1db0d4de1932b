//! Authentication Handshake
//!
//! One login exchange per connection: send the password, read one reply.

use crate::error::{RconError, Result};
use crate::protocol::{Packet, LOGIN_REQUEST_ID};
use super::{Connection, ConnectionState, Transport};

/// Log in on a freshly opened connection
///
/// The server echoes the login's request id on success and answers with any
/// other id (canonically -1) on failure. A rejected login closes the
/// connection.
pub(crate) fn authenticate<S: Transport>(conn: &mut Connection<S>, password: &str) -> Result<()> {
    match conn.state() {
        ConnectionState::Connected => {}
        ConnectionState::Authenticated => {
            return Err(RconError::InvalidState("already authenticated".to_string()))
        }
        ConnectionState::Closed => return Err(RconError::Closed),
    }

    conn.send(&Packet::login(password))?;
    let reply = conn.receive()?;

    if reply.request_id != LOGIN_REQUEST_ID {
        tracing::warn!(
            request_id = reply.request_id,
            "Login rejected by {}",
            conn.peer_addr()
        );
        conn.close();
        return Err(RconError::AuthenticationFailed);
    }

    conn.mark_authenticated();
    tracing::debug!("Authenticated with {}", conn.peer_addr());
    Ok(())
}
