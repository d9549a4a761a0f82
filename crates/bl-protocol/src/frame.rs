//! Frame header encoding/decoding
//!
//! Every message on the wire is a single frame with a 16-byte header:
//! - length: 4 bytes (u32, big-endian), header + payload
//! - header_length: 2 bytes (u16, big-endian), always `HEADER_SIZE`
//! - protocol_version: 2 bytes (u16, big-endian)
//! - operation: 4 bytes (i32, big-endian)
//! - sequence_id: 4 bytes (i32, big-endian)
//!
//! The payload follows the header verbatim.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::ProtocolError;
use crate::operation::Operation;

/// Size of the frame header in bytes
pub const HEADER_SIZE: usize = 16;

/// Protocol version written into every outgoing header
pub const DEFAULT_PROTOCOL_VERSION: u16 = 1;

/// Sequence id written into every outgoing header
pub const DEFAULT_SEQUENCE: i32 = 1;

/// Upper bound accepted by the streaming codec (16MB)
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

/// Body the relay expects inside a heartbeat frame
const HEARTBEAT_BODY: &[u8] = b"[object Object]";

/// Fixed-size frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Total frame length (header + payload)
    pub length: u32,
    /// Header length, must equal `HEADER_SIZE`
    pub header_length: u16,
    /// Payload encoding version
    pub protocol_version: u16,
    /// Raw operation code
    pub operation: i32,
    /// Sequence id
    pub sequence_id: i32,
}

impl FrameHeader {
    /// Create a header for a payload of the given length
    ///
    /// Fails if the whole frame would exceed `MAX_FRAME_SIZE`.
    pub fn new(
        operation: i32,
        sequence_id: i32,
        payload_length: usize,
    ) -> Result<Self, ProtocolError> {
        let size = HEADER_SIZE.saturating_add(payload_length);
        let length = u32::try_from(size)
            .ok()
            .filter(|_| size <= MAX_FRAME_SIZE)
            .ok_or(ProtocolError::FrameTooLarge {
                size,
                max: MAX_FRAME_SIZE,
            })?;

        Ok(Self {
            length,
            header_length: HEADER_SIZE as u16,
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            operation,
            sequence_id,
        })
    }

    /// Encode the header into a byte buffer
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.reserve(HEADER_SIZE);
        dst.put_u32(self.length);
        dst.put_u16(self.header_length);
        dst.put_u16(self.protocol_version);
        dst.put_i32(self.operation);
        dst.put_i32(self.sequence_id);
    }

    /// Peek a header from the front of a buffer without consuming it
    ///
    /// Returns None if there aren't enough bytes in the buffer.
    /// Returns Err if the header declares a non-conformant header length
    /// or a total length smaller than the header itself.
    pub fn peek(src: &[u8]) -> Result<Option<Self>, ProtocolError> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let mut cursor = &src[..HEADER_SIZE];
        let header = Self {
            length: cursor.get_u32(),
            header_length: cursor.get_u16(),
            protocol_version: cursor.get_u16(),
            operation: cursor.get_i32(),
            sequence_id: cursor.get_i32(),
        };

        if header.header_length as usize != HEADER_SIZE {
            return Err(ProtocolError::InvalidHeaderLength(header.header_length));
        }
        if (header.length as usize) < HEADER_SIZE {
            return Err(ProtocolError::LengthMismatch {
                declared: header.length as usize,
                actual: src.len(),
            });
        }

        Ok(Some(header))
    }
}

/// A complete frame with header fields and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Total frame length (header + payload)
    pub length: u32,
    /// Header length as sent by the peer
    pub header_length: u16,
    /// Payload encoding version
    pub protocol_version: u16,
    /// Raw operation code
    pub operation: i32,
    /// Sequence id
    pub sequence_id: i32,
    /// Payload bytes following the header
    pub payload: Bytes,
}

impl Frame {
    /// Create an outgoing frame with the default protocol version
    pub fn new(
        operation: Operation,
        sequence_id: i32,
        payload: impl Into<Bytes>,
    ) -> Result<Self, ProtocolError> {
        let payload = payload.into();
        let header = FrameHeader::new(operation.as_i32(), sequence_id, payload.len())?;
        Ok(Self::from_parts(header, payload))
    }

    fn from_parts(header: FrameHeader, payload: Bytes) -> Self {
        Self {
            length: header.length,
            header_length: header.header_length,
            protocol_version: header.protocol_version,
            operation: header.operation,
            sequence_id: header.sequence_id,
            payload,
        }
    }

    /// Known operation for this frame, if any
    pub fn op(&self) -> Option<Operation> {
        Operation::from_i32(self.operation)
    }

    /// Header fields of this frame
    pub fn header(&self) -> FrameHeader {
        FrameHeader {
            length: self.length,
            header_length: self.header_length,
            protocol_version: self.protocol_version,
            operation: self.operation,
            sequence_id: self.sequence_id,
        }
    }

    /// Serialize the frame into wire bytes
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(HEADER_SIZE + self.payload.len());
        self.header().encode(&mut buf);
        buf.extend_from_slice(&self.payload);
        buf.freeze()
    }

    /// Decode exactly one frame from a complete message
    ///
    /// The buffer must hold a single frame: its declared length has to
    /// match the buffer length.
    pub fn decode(src: impl Into<Bytes>) -> Result<Self, ProtocolError> {
        let mut src = src.into();

        // Validate header
        let header = FrameHeader::peek(&src)?.ok_or(ProtocolError::Truncated {
            expected: HEADER_SIZE,
            actual: src.len(),
        })?;

        // Check the declared length covers exactly this message
        if header.length as usize != src.len() {
            return Err(ProtocolError::LengthMismatch {
                declared: header.length as usize,
                actual: src.len(),
            });
        }

        // Extract payload
        let payload = src.split_off(HEADER_SIZE);
        Ok(Self::from_parts(header, payload))
    }
}

/// Encode an operation, sequence id and payload into wire bytes
pub fn encode(
    operation: Operation,
    sequence_id: i32,
    payload: &[u8],
) -> Result<Bytes, ProtocolError> {
    let frame = Frame::new(operation, sequence_id, Bytes::copy_from_slice(payload))?;
    Ok(frame.to_bytes())
}

/// The keep-alive frame sent periodically while a session is active
pub fn heartbeat_frame() -> Result<Bytes, ProtocolError> {
    encode(Operation::Heartbeat, DEFAULT_SEQUENCE, HEARTBEAT_BODY)
}
