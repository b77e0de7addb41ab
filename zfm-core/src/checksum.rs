//! ZFM frame checksum
//!
//! The checksum is the plain 16-bit sum of every byte between the address
//! field and the checksum field itself:
//! 1. Packet type byte
//! 2. Both length bytes
//! 3. Every payload byte
//!
//! Overflow past 0xFFFF is discarded.

use tracing::trace;

/// Calculate a frame checksum
///
/// `length` is the value of the length field (payload length + 2).
///
/// # Examples
///
/// ```
/// use zfm_core::checksum;
///
/// // Verify-password with the default key
/// let sum = checksum::calculate(0x01, 7, &[0x13, 0, 0, 0, 0]);
/// assert_eq!(sum, 0x001B);
/// ```
pub fn calculate(packet_type: u8, length: u16, payload: &[u8]) -> u16 {
    let [len_hi, len_lo] = length.to_be_bytes();

    let checksum = payload
        .iter()
        .fold(
            u16::from(packet_type)
                .wrapping_add(u16::from(len_hi))
                .wrapping_add(u16::from(len_lo)),
            |sum, &byte| sum.wrapping_add(u16::from(byte)),
        );

    trace!(
        packet_type = packet_type,
        length = length,
        payload_len = payload.len(),
        checksum = format!("0x{:04X}", checksum),
        "Calculated checksum"
    );

    checksum
}

/// Verify checksum
pub fn verify(packet_type: u8, length: u16, payload: &[u8], expected: u16) -> bool {
    calculate(packet_type, length, payload) == expected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_verify_password_frame() {
        // Reference frame: EF01 FFFFFFFF 01 0007 13 00000000 001B
        assert_eq!(calculate(0x01, 7, &[0x13, 0, 0, 0, 0]), 0x001B);
    }

    #[test]
    fn test_checksum_get_image_frame() {
        // Reference frame: EF01 FFFFFFFF 01 0003 01 0005
        assert_eq!(calculate(0x01, 3, &[0x01]), 0x0005);
    }

    #[test]
    fn test_checksum_empty_payload() {
        assert_eq!(calculate(0x07, 2, &[]), 0x0009);
    }

    #[test]
    fn test_checksum_counts_both_length_bytes() {
        // 0x0102: high byte 1 + low byte 2 + type 2
        assert_eq!(calculate(0x02, 0x0102, &[]), 5);
    }

    #[test]
    fn test_checksum_wraps_at_16_bits() {
        let payload = vec![0xFF; 300];
        let expected = (0x08u32 + 0x01 + 0x2E + 0xFF * 300) as u16;

        assert_eq!(calculate(0x08, 302, &payload), expected);
    }

    #[test]
    fn test_checksum_verify() {
        let payload = vec![0xAB, 0xCD];
        let checksum = calculate(0x02, 4, &payload);

        assert!(verify(0x02, 4, &payload, checksum));
        assert!(!verify(0x02, 4, &payload, checksum.wrapping_add(1)));
    }
}
