//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identity of a room, resolved once per connection attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomIdentity {
    /// Room id supplied by the caller (may be a short/vanity id)
    pub room_id: u64,
    /// Canonical room id used on the relay
    pub real_room_id: u64,
    /// Id of the room owner
    pub uid: i64,
}

impl fmt::Display for RoomIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.room_id == self.real_room_id {
            write!(f, "room-{}", self.real_room_id)
        } else {
            write!(f, "room-{} ({})", self.real_room_id, self.room_id)
        }
    }
}

/// Opaque credential for a single handshake
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a token issued by the directory
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the raw token
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(<{} bytes>)", self.0.len())
    }
}

impl From<String> for SessionToken {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SessionToken {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A relay server able to terminate the chat socket
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelayEndpoint {
    /// Host name
    pub host: String,
    /// Plain TCP port
    pub port: u16,
    /// Non-secure WebSocket port
    pub ws_port: u16,
    /// Secure WebSocket port
    pub wss_port: u16,
}

impl RelayEndpoint {
    /// Secure WebSocket target for this relay
    pub fn wss_url(&self) -> String {
        format!("wss://{}:{}/sub", self.host, self.wss_port)
    }

    /// Non-secure WebSocket target for this relay
    pub fn ws_url(&self) -> String {
        format!("ws://{}:{}/sub", self.host, self.ws_port)
    }
}

impl fmt::Display for RelayEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.wss_port)
    }
}
