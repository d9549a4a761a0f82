//! bl-core: Core types, configuration and collaborator traits
//!
//! This crate provides the shared domain types, error kinds and the
//! lookup/transport seams used by the directory and the relay session.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use error::{ClientError, ConfigError, ConnectionError, LookupError};
pub use types::{RelayEndpoint, RoomIdentity, SessionToken};
