//! # rcon-console
//!
//! A blocking client for the Source / Minecraft RCON protocol:
//! - Length-prefixed little-endian packet codec
//! - One-shot password authentication
//! - Multi-packet response reassembly via a sentinel request
//! - Optional connect/read/write timeouts and payload caps
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │            RconClient / SharedClient / CommandWorker         │
//! │              connect · command(text) · close                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌──────────────┐
//!   │  Handshake  │          │   Command    │
//!   │   (login)   │          │   Session    │
//!   └──────┬──────┘          └──────┬───────┘
//!          └────────────┬───────────┘
//!                       ▼
//!                ┌─────────────┐
//!                │ Connection  │──── TcpStream
//!                └──────┬──────┘
//!                       ▼
//!          ┌─────────────┐   ┌─────────────┐
//!          │ FrameReader │──▶│   Codec     │
//!          └─────────────┘   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use rcon_console::{Config, RconClient};
//!
//! let config = Config::builder()
//!     .address("localhost:25575")
//!     .password("hunter2")
//!     .build();
//!
//! let mut client = RconClient::connect(config)?;
//! let players = client.command("list")?;
//! println!("{}", players);
//! client.close();
//! # Ok::<(), rcon_console::RconError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;
pub mod worker;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{RconError, Result};
pub use config::{Config, DEFAULT_PORT};
pub use client::{RconClient, SharedClient};
pub use worker::{CommandWorker, PendingCommand};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
