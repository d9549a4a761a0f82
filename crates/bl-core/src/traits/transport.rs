//! Relay transport traits
//!
//! A `Connector` dials a relay URL and hands back the two halves of the
//! duplex connection. The session moves the sink into its heartbeat task
//! and the source into its receiver task, so each half has one owner.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::ConnectionError;

/// A message exchanged over the relay socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireMessage {
    /// Binary message (every protocol frame)
    Binary(Bytes),
    /// Text message
    Text(String),
    /// Peer closed the connection
    Close,
}

/// Writer half of a relay connection
#[async_trait]
pub trait WireSink: Send {
    /// Send one message
    async fn send(&mut self, message: WireMessage) -> Result<(), ConnectionError>;

    /// Close the connection from our side
    async fn close(&mut self) -> Result<(), ConnectionError>;
}

/// Reader half of a relay connection
#[async_trait]
pub trait WireSource: Send {
    /// Receive the next message
    ///
    /// Returns None once the connection is gone.
    async fn recv(&mut self) -> Option<Result<WireMessage, ConnectionError>>;
}

/// A freshly dialed relay connection split into its two halves
pub struct Connection {
    /// Writer half
    pub sink: Box<dyn WireSink>,
    /// Reader half
    pub source: Box<dyn WireSource>,
}

impl Connection {
    /// Bundle the two halves of a connection
    pub fn new(sink: impl WireSink + 'static, source: impl WireSource + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            source: Box::new(source),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection").finish_non_exhaustive()
    }
}

/// Dials relay endpoints
#[async_trait]
pub trait Connector: Send + Sync {
    /// Open a connection to the given relay URL
    async fn dial(&self, url: &str) -> Result<Connection, ConnectionError>;
}
