//! Configuration for the RCON client
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{RconError, Result};

/// Port used when the address carries none
pub const DEFAULT_PORT: u16 = 25575;

/// Main configuration for an RCON connection
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target Configuration
    // -------------------------------------------------------------------------
    /// Server address as `host[:port]`
    pub address: String,

    /// Shared RCON secret sent in the login packet
    pub password: String,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP connect timeout (milliseconds, 0 = OS default)
    pub connect_timeout_ms: u64,

    /// Socket read timeout (milliseconds, 0 = block indefinitely)
    pub read_timeout_ms: u64,

    /// Socket write timeout (milliseconds, 0 = block indefinitely)
    pub write_timeout_ms: u64,

    /// Disable Nagle's algorithm; the command and sentinel are written back to back
    pub nodelay: bool,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Optional cap on a single packet's payload, in bytes.
    /// Minecraft servers reject requests above 1446 bytes and split
    /// responses at 4096, but nothing is enforced unless set.
    pub max_payload_size: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: format!("127.0.0.1:{}", DEFAULT_PORT),
            password: String::new(),
            connect_timeout_ms: 0,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            nodelay: true,
            max_payload_size: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Split `address` into host and port, defaulting the port to 25575.
    ///
    /// Accepts `host`, `host:port`, `[v6]` and `[v6]:port`.
    pub fn target(&self) -> Result<(String, u16)> {
        parse_target(&self.address)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        millis(self.connect_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        millis(self.read_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        millis(self.write_timeout_ms)
    }
}

fn millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn parse_target(address: &str) -> Result<(String, u16)> {
    let address = address.trim();
    if address.is_empty() {
        return Err(RconError::Config("empty server address".to_string()));
    }

    // Bracketed IPv6 literal
    if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest.split_once(']').ok_or_else(|| {
            RconError::Config(format!("unterminated IPv6 literal in '{}'", address))
        })?;
        let port = match tail {
            "" => DEFAULT_PORT,
            _ => {
                let port = tail.strip_prefix(':').ok_or_else(|| {
                    RconError::Config(format!("unexpected '{}' after IPv6 literal", tail))
                })?;
                parse_port(port)?
            }
        };
        return Ok((host.to_string(), port));
    }

    match address.split_once(':') {
        Some((host, port)) if !host.is_empty() => Ok((host.to_string(), parse_port(port)?)),
        Some(_) => Err(RconError::Config(format!("missing host in '{}'", address))),
        None => Ok((address.to_string(), DEFAULT_PORT)),
    }
}

fn parse_port(port: &str) -> Result<u16> {
    port.parse::<u16>()
        .map_err(|_| RconError::Config(format!("invalid port '{}'", port)))
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the server address (`host[:port]`)
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.config.address = address.into();
        self
    }

    /// Set the RCON password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Toggle TCP_NODELAY on the socket
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Cap the payload size of every packet sent or received
    pub fn max_payload_size(mut self, size: usize) -> Self {
        self.config.max_payload_size = Some(size);
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
