//! Sensor parameter and search result structures

use std::fmt;

use byteorder::{BigEndian, ByteOrder};

use crate::error::{Error, Result};

/// Snapshot of the module's system parameters
///
/// Read fresh on every request; nothing here is cached by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorParameters {
    /// Template library capacity
    pub library_size: u16,

    /// Matching security level (operationally 1..=5)
    pub security_level: u8,

    /// Status register
    pub status_register: Option<u16>,

    /// System identifier code
    pub system_id: Option<u16>,

    /// Module address
    pub device_address: Option<u32>,

    /// Data packet size in bytes
    pub packet_size: Option<u16>,

    /// Serial baud rate
    pub baud_rate: Option<u32>,
}

impl SensorParameters {
    /// Shortest reply carrying library size and security level
    pub const MIN_REPLY_LEN: usize = 10;

    /// Reply length of the complete 16-byte parameter block
    pub const FULL_REPLY_LEN: usize = 18;

    pub fn new(library_size: u16, security_level: u8) -> Self {
        Self {
            library_size,
            security_level,
            status_register: None,
            system_id: None,
            device_address: None,
            packet_size: None,
            baud_rate: None,
        }
    }

    /// Parse a read-parameters reply (packet type byte first)
    ///
    /// ```text
    /// [0] type  [1] status  [2..4] status reg  [4..6] system id
    /// [6..8] library size  [8..10] security level  [10..14] address
    /// [14..16] packet size code  [16..18] baud multiplier
    /// ```
    pub fn parse(reply: &[u8]) -> Result<Self> {
        if reply.len() < Self::MIN_REPLY_LEN {
            return Err(Error::Parse(format!(
                "parameter reply too short: {} bytes (need {})",
                reply.len(),
                Self::MIN_REPLY_LEN
            )));
        }

        let mut params = Self::new(BigEndian::read_u16(&reply[6..8]), reply[9]);

        if reply.len() >= Self::FULL_REPLY_LEN {
            params.status_register = Some(BigEndian::read_u16(&reply[2..4]));
            params.system_id = Some(BigEndian::read_u16(&reply[4..6]));
            params.device_address = Some(BigEndian::read_u32(&reply[10..14]));
            params.packet_size = match BigEndian::read_u16(&reply[14..16]) {
                code @ 0..=3 => Some(32 << code),
                _ => None,
            };
            params.baud_rate = Some(u32::from(BigEndian::read_u16(&reply[16..18])) * 9600);
        }

        Ok(params)
    }
}

impl fmt::Display for SensorParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sensor[library: {}, security level: {}]",
            self.library_size, self.security_level
        )
    }
}

/// Matching security level accepted by the module
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SecurityLevel(u8);

impl SecurityLevel {
    pub const LOWEST: Self = Self(1);
    pub const HIGHEST: Self = Self(5);

    pub fn new(level: u8) -> Result<Self> {
        if (Self::LOWEST.0..=Self::HIGHEST.0).contains(&level) {
            Ok(Self(level))
        } else {
            Err(Error::Validation(format!(
                "security level must be 1..=5, got {level}"
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for SecurityLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self> {
        Self::new(level)
    }
}

/// Library hit returned by a search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Page id of the matching template
    pub position: u16,

    /// Match score reported by the module
    pub confidence: u16,
}

impl fmt::Display for SearchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} (confidence {})", self.position, self.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FULL_REPLY: [u8; 18] = [
        0x07, 0x00, // type, status
        0x00, 0x04, // status register
        0x00, 0x09, // system id
        0x03, 0xE8, // library size (1000)
        0x00, 0x03, // security level
        0xFF, 0xFF, 0xFF, 0xFF, // address
        0x00, 0x02, // packet size code (128)
        0x00, 0x06, // baud multiplier (57600)
    ];

    #[test]
    fn test_parse_full_block() {
        let params = SensorParameters::parse(&FULL_REPLY).unwrap();

        assert_eq!(params.library_size, 1000);
        assert_eq!(params.security_level, 3);
        assert_eq!(params.status_register, Some(4));
        assert_eq!(params.system_id, Some(9));
        assert_eq!(params.device_address, Some(0xFFFF_FFFF));
        assert_eq!(params.packet_size, Some(128));
        assert_eq!(params.baud_rate, Some(57600));
    }

    #[test]
    fn test_parse_short_block() {
        let params = SensorParameters::parse(&FULL_REPLY[..10]).unwrap();

        assert_eq!(params, SensorParameters::new(1000, 3));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            SensorParameters::parse(&FULL_REPLY[..9]),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_security_level_bounds() {
        assert!(SecurityLevel::new(0).is_err());
        assert_eq!(SecurityLevel::new(1).unwrap(), SecurityLevel::LOWEST);
        assert_eq!(SecurityLevel::try_from(5).unwrap().get(), 5);
        assert!(SecurityLevel::new(6).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            SensorParameters::new(162, 5).to_string(),
            "Sensor[library: 162, security level: 5]"
        );
        let hit = SearchMatch { position: 1, confidence: 50 };
        assert_eq!(hit.to_string(), "#1 (confidence 50)");
    }
}
