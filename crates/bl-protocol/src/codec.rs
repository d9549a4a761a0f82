//! Tokio codec for concatenated frames
//!
//! Relays batch several frames back to back inside one (decompressed)
//! message body. `FrameCodec` splits such a buffer into individual frames
//! applying the same header checks as `Frame::decode`.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error::ProtocolError;
use crate::frame::{Frame, FrameHeader, HEADER_SIZE, MAX_FRAME_SIZE};

/// Codec for encoding/decoding protocol frames
#[derive(Debug, Default)]
pub struct FrameCodec {
    /// Header of the frame currently being decoded (if any)
    pending_header: Option<FrameHeader>,
}

impl FrameCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self {
            pending_header: None,
        }
    }

    /// Split a complete buffer into the frames it contains
    ///
    /// Fails if a header is invalid or if trailing bytes do not form a
    /// whole frame.
    pub fn split(buf: &[u8]) -> Result<Vec<Frame>, ProtocolError> {
        let mut codec = Self::new();
        let mut src = BytesMut::from(buf);
        let mut frames = Vec::new();

        while let Some(frame) = codec.decode(&mut src)? {
            frames.push(frame);
        }

        if !src.is_empty() {
            return Err(ProtocolError::Truncated {
                expected: codec
                    .pending_header
                    .map_or(HEADER_SIZE, |h| h.length as usize),
                actual: src.len(),
            });
        }

        tracing::trace!(frames = frames.len(), bytes = buf.len(), "split batch");
        Ok(frames)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        // Resume a partially received frame or read a new header
        let header = match self.pending_header.take() {
            Some(h) => h,
            None => match FrameHeader::peek(src)? {
                Some(h) => h,
                None => return Ok(None),
            },
        };

        // Check frame size limit
        let frame_len = header.length as usize;
        if frame_len > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: frame_len,
                max: MAX_FRAME_SIZE,
            });
        }

        // Wait for the rest of the frame
        if src.len() < frame_len {
            self.pending_header = Some(header);
            src.reserve(frame_len - src.len());
            return Ok(None);
        }

        // Extract the frame
        let bytes = src.split_to(frame_len).freeze();
        Frame::decode(bytes).map(Some)
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let frame_len = frame.length as usize;
        if frame_len > MAX_FRAME_SIZE {
            return Err(ProtocolError::FrameTooLarge {
                size: frame_len,
                max: MAX_FRAME_SIZE,
            });
        }

        frame.header().encode(dst);
        dst.extend_from_slice(&frame.payload);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encode;
    use crate::operation::Operation;

    #[test]
    fn test_split_batched_frames() {
        let mut batch = BytesMut::new();
        for (op, seq, payload) in [
            (Operation::Message, 0, &br#"{"cmd":"A"}"#[..]),
            (Operation::Message, 0, &br#"{"cmd":"B"}"#[..]),
            (Operation::HeartbeatReply, 1, &[0u8, 0, 0, 9][..]),
        ] {
            batch.extend_from_slice(&encode(op, seq, payload).unwrap());
        }

        let frames = FrameCodec::split(&batch).unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].payload.as_ref(), br#"{"cmd":"A"}"#);
        assert_eq!(frames[1].payload.as_ref(), br#"{"cmd":"B"}"#);
        assert_eq!(frames[2].op(), Some(Operation::HeartbeatReply));
    }

    #[test]
    fn test_codec_partial_read() {
        let mut codec = FrameCodec::new();
        let full = encode(Operation::Message, 3, b"partial payload").unwrap();

        let mut partial = BytesMut::from(&full[..HEADER_SIZE - 1]);
        assert!(codec.decode(&mut partial).unwrap().is_none());

        partial.extend_from_slice(&full[HEADER_SIZE - 1..HEADER_SIZE + 2]);
        assert!(codec.decode(&mut partial).unwrap().is_none());

        partial.extend_from_slice(&full[HEADER_SIZE + 2..]);
        let frame = codec.decode(&mut partial).unwrap().unwrap();
        assert_eq!(frame.sequence_id, 3);
        assert_eq!(frame.payload.as_ref(), b"partial payload");
        assert!(partial.is_empty());
    }

    #[test]
    fn test_codec_encode_matches_frame_bytes() {
        let mut codec = FrameCodec::new();
        let frame = Frame::new(Operation::UserAuthentication, 1, &b"{}"[..]).unwrap();

        let mut buf = BytesMut::new();
        codec.encode(frame.clone(), &mut buf).unwrap();

        assert_eq!(buf.freeze(), frame.to_bytes());
    }

    #[test]
    fn test_split_rejects_trailing_bytes() {
        let mut batch = BytesMut::from(&encode(Operation::Message, 0, b"ok").unwrap()[..]);
        batch.extend_from_slice(&[0, 0, 0]);
        assert!(matches!(
            FrameCodec::split(&batch),
            Err(ProtocolError::Truncated { .. })
        ));
    }

    #[test]
    fn test_oversize_frame_rejected() {
        let mut codec = FrameCodec::new();
        let mut buf = BytesMut::new();
        FrameHeader {
            length: (MAX_FRAME_SIZE + 1) as u32,
            header_length: HEADER_SIZE as u16,
            protocol_version: 0,
            operation: 5,
            sequence_id: 0,
        }
        .encode(&mut buf);

        assert!(matches!(
            codec.decode(&mut buf),
            Err(ProtocolError::FrameTooLarge { .. })
        ));
    }
}
