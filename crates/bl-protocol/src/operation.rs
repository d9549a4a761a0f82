//! Operation codes and payload versions
//!
//! # Message Flow
//!
//! 1. Client dials the relay and sends `UserAuthentication`
//! 2. Relay answers with `ConnectSuccess` carrying `{"code":0}`
//! 3. Client sends `Heartbeat` every 30 seconds, relay answers `HeartbeatReply`
//! 4. Relay pushes `Message` frames for every room event

/// Operation code carried in the frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Operation {
    /// Keep-alive ping (client → relay)
    Heartbeat = 2,
    /// Keep-alive reply, payload is the room popularity counter
    HeartbeatReply = 3,
    /// Room event notification (relay → client)
    Message = 5,
    /// Authentication request (client → relay)
    UserAuthentication = 7,
    /// Authentication acknowledgment (relay → client)
    ConnectSuccess = 8,
}

impl Operation {
    /// Convert to the wire value
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Convert from the wire value
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            2 => Some(Self::Heartbeat),
            3 => Some(Self::HeartbeatReply),
            5 => Some(Self::Message),
            7 => Some(Self::UserAuthentication),
            8 => Some(Self::ConnectSuccess),
            _ => None,
        }
    }
}

/// Encoding of a frame payload, as declared by the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProtocolVersion {
    /// Plain JSON body
    Json = 0,
    /// 4-byte big-endian integer (heartbeat replies)
    Int32 = 1,
    /// zlib-compressed batch of frames
    Zlib = 2,
    /// brotli-compressed batch of frames
    Brotli = 3,
}

impl ProtocolVersion {
    /// Convert to the wire value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Convert from the wire value
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Json),
            1 => Some(Self::Int32),
            2 => Some(Self::Zlib),
            3 => Some(Self::Brotli),
            _ => None,
        }
    }

    /// Whether the payload is a compressed batch of inner frames
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Zlib | Self::Brotli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_roundtrip() {
        for op in [
            Operation::Heartbeat,
            Operation::HeartbeatReply,
            Operation::Message,
            Operation::UserAuthentication,
            Operation::ConnectSuccess,
        ] {
            assert_eq!(Operation::from_i32(op.as_i32()), Some(op));
        }
        assert_eq!(Operation::from_i32(0), None);
        assert_eq!(Operation::from_i32(-2), None);
    }

    #[test]
    fn test_protocol_version_compression() {
        assert!(ProtocolVersion::Brotli.is_compressed());
        assert!(ProtocolVersion::Zlib.is_compressed());
        assert!(!ProtocolVersion::Json.is_compressed());
        assert_eq!(ProtocolVersion::from_u16(9), None);
        assert_eq!(ProtocolVersion::from_u16(3), Some(ProtocolVersion::Brotli));
    }
}
