//! Core error types for the bililive client

use bl_protocol::ProtocolError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by directory resolution and session setup
#[derive(Error, Debug)]
pub enum ClientError {
    /// Room lookup reported an invalid room or returned no data
    #[error("Room not found: {room_id}")]
    RoomNotFound { room_id: u64 },

    /// Relay directory could not be queried or refused the request
    #[error("Relay directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// Every candidate relay failed to dial
    #[error("No reachable relay endpoint ({attempted} attempted)")]
    NoReachableEndpoint { attempted: usize },

    /// Bytes received did not form a valid frame
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] ProtocolError),

    /// Relay refused the handshake
    #[error("Authentication rejected: {reason}")]
    AuthenticationRejected { reason: String },

    /// Connection dropped while the session needed it
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}

/// Transport-level errors raised by a `Connector` or its halves
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Dial failed
    #[error("Failed to connect to {url}: {message}")]
    Dial { url: String, message: String },

    /// Dial did not finish in time
    #[error("Timed out connecting to {0}")]
    Timeout(String),

    /// Write failed
    #[error("Send failed: {0}")]
    Send(String),

    /// Read failed
    #[error("Receive failed: {0}")]
    Receive(String),

    /// Connection already closed
    #[error("Connection closed")]
    Closed,
}

/// Errors raised by a `RoomLookup` collaborator
#[derive(Error, Debug)]
pub enum LookupError {
    /// Request could not be sent or completed
    #[error("Lookup request failed: {0}")]
    Request(String),

    /// Service answered with a non-success HTTP status
    #[error("Lookup service returned status {0}")]
    Status(u16),

    /// Response body was not the expected JSON
    #[error("Invalid lookup response: {0}")]
    Decode(String),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
