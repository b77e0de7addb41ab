//! Protocol constants

use std::time::Duration;

/// Frame start marker, high byte first on the wire
pub const START_CODE: u16 = 0xEF01;

/// Default module address (all modules answer to it until reassigned)
pub const DEFAULT_ADDRESS: u32 = 0xFFFF_FFFF;

/// Default handshake password
pub const DEFAULT_PASSWORD: u32 = 0x0000_0000;

/// Default serial baud rate
pub const DEFAULT_BAUD_RATE: u32 = 57600;

/// Per-byte reply timeout
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(750);

/// Size of a fingerprint template in bytes
pub const TEMPLATE_SIZE: usize = 512;

/// Payload size of one data packet during template transfer
pub const DATA_CHUNK_SIZE: usize = 128;

/// Number of pages covered by a full-library search
pub const SEARCH_PAGE_COUNT: u16 = 0x0100;

/// Sensor-side feature buffers
pub mod buffer {
    /// First character buffer (priming capture, register and search source)
    pub const SLOT_1: u8 = 0x01;

    /// Second character buffer (enrollment confirmation capture)
    pub const SLOT_2: u8 = 0x02;
}

/// Parameter ids accepted by the set-system-parameter command
pub mod system_param {
    /// Matching security level (1..=5)
    pub const SECURITY_LEVEL: u8 = 5;
}
