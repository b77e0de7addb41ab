//! Error types for zfm-core

/// Result type alias for zfm-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame did not start with `EF 01`
    #[error("Bad start code: expected 0xEF01, got 0x{received:04X}")]
    BadStartCode {
        received: u16,
    },

    /// Declared length cannot hold the checksum field
    #[error("Bad packet length: {length} (minimum is 2)")]
    BadLength {
        length: u16,
    },

    /// Checksum verification failed
    #[error("Checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },

    /// Buffer ended before a full frame was decoded
    #[error("Packet too short: expected at least {expected} bytes, got {actual} bytes")]
    PacketTooShort {
        expected: usize,
        actual: usize,
    },

    /// Payload does not fit the 16-bit length field
    #[error("Payload too large: {size} bytes (maximum is {max})")]
    PayloadTooLarge {
        size: usize,
        max: usize,
    },

    /// Unknown packet type tag
    #[error("Unknown packet type: 0x{0:02X}")]
    UnknownPacketType(u8),

    /// Unknown instruction code
    #[error("Unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Invalid session state
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

impl Error {
    /// Check if the error came from a damaged or misaligned frame
    ///
    /// Such errors usually clear up on the next exchange because the decoder
    /// resynchronizes on the start code.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::BadStartCode { .. }
                | Self::BadLength { .. }
                | Self::ChecksumMismatch { .. }
                | Self::PacketTooShort { .. }
        )
    }
}
