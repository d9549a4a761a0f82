//! Protocol error types

use thiserror::Error;

/// Errors that can occur during protocol operations
///
/// Every variant except `Json` and `Io` describes a malformed frame.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Buffer shorter than the fixed header
    #[error("Truncated frame: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Declared frame length disagrees with the bytes received
    #[error("Frame length mismatch: header declares {declared} bytes, buffer holds {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Header length field is not the protocol constant
    #[error("Invalid header length: {0}")]
    InvalidHeaderLength(u16),

    /// Frame exceeds the maximum accepted size
    #[error("Frame too large: {size} bytes exceeds maximum of {max} bytes")]
    FrameTooLarge { size: usize, max: usize },

    /// Payload (de)serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// Whether this error means the bytes did not form a valid frame
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::LengthMismatch { .. }
                | Self::InvalidHeaderLength(_)
                | Self::FrameTooLarge { .. }
        )
    }
}
