//! Relay transports

mod ws;

pub use ws::WsConnector;
