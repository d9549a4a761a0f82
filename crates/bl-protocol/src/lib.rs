//! bl-protocol: Wire protocol for the live-chat relay
//!
//! This crate defines the fixed-header binary framing used on the relay
//! WebSocket, the operation codes, and the JSON handshake payloads.

pub mod auth;
pub mod codec;
pub mod error;
pub mod frame;
pub mod operation;

pub use auth::{AuthRequest, AuthResponse, AUTH_PROTOCOL_VERSION};
pub use codec::FrameCodec;
pub use error::ProtocolError;
pub use frame::{
    encode, heartbeat_frame, Frame, FrameHeader, DEFAULT_PROTOCOL_VERSION, DEFAULT_SEQUENCE,
    HEADER_SIZE, MAX_FRAME_SIZE,
};
pub use operation::{Operation, ProtocolVersion};
