//! bl-client: Live-chat relay client
//!
//! Resolves a room through the directory, dials its relays in priority
//! order, authenticates, and then keeps the connection alive with a
//! heartbeat while streaming inbound frames to the caller.

pub mod client;
pub mod directory;
pub mod session;
pub mod transport;

pub use client::Client;
pub use directory::{Directory, HttpLookup, Resolution};
pub use session::{Session, SessionEvent, SessionState};
pub use transport::WsConnector;
