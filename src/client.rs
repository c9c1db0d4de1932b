//! Client Module
//!
//! The surface other layers consume: connect, run commands, close.
//!
//! ## Concurrency
//! - `RconClient::command` takes `&mut self`, so one command is in flight
//! - `SharedClient` puts the client behind a mutex for use across threads
//! - `CommandWorker` (see `worker`) moves it onto a dedicated thread

use std::net::TcpStream;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::network::{Connection, ConnectionState, Transport};

/// An authenticated RCON client
pub struct RconClient<S: Transport = TcpStream> {
    connection: Connection<S>,
}

impl RconClient<TcpStream> {
    /// Open a TCP connection and log in
    ///
    /// A rejected password yields `AuthenticationFailed` and the socket is
    /// closed before returning.
    pub fn connect(config: Config) -> Result<Self> {
        tracing::debug!("Connecting to {}", config.address);
        let connection = Connection::open(&config)?;
        Self::handshake(connection, &config.password)
    }
}

impl<S: Transport> RconClient<S> {
    /// Log in over an already-open connection
    pub fn handshake(mut connection: Connection<S>, password: &str) -> Result<Self> {
        connection.authenticate(password)?;
        Ok(Self { connection })
    }

    /// Execute a command and return its full output, exactly as sent by the server
    pub fn command(&mut self, text: &str) -> Result<String> {
        self.connection.command(text)
    }

    /// Close the connection; the client cannot be used afterwards
    pub fn close(&mut self) {
        self.connection.close();
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_closed()
    }

    pub fn peer_addr(&self) -> &str {
        self.connection.peer_addr()
    }

    /// Make the client shareable across threads
    pub fn into_shared(self) -> SharedClient<S> {
        SharedClient {
            inner: Arc::new(Mutex::new(self)),
        }
    }
}

/// A cloneable handle serializing commands through a mutex
///
/// Callers block while another command is in flight on the same connection.
pub struct SharedClient<S: Transport = TcpStream> {
    inner: Arc<Mutex<RconClient<S>>>,
}

impl<S: Transport> Clone for SharedClient<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Transport> SharedClient<S> {
    pub fn command(&self, text: &str) -> Result<String> {
        self.inner.lock().command(text)
    }

    /// Close the connection for every handle
    pub fn close(&self) {
        self.inner.lock().close();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().is_closed()
    }
}
