//! Incremental frame decoder
//!
//! Replies arrive one byte at a time over a serial line, so the decoder is
//! fed byte by byte and reports a [`Reply`] once the frame declared by its
//! length field is complete. Bytes preceding the start code are dropped.

use bytes::BytesMut;
use tracing::{trace, warn};

use crate::{
    checksum,
    constants::START_CODE,
    error::{Error, Result},
    packet::{Packet, Reply},
};

const START_HI: u8 = (START_CODE >> 8) as u8;
const START_LO: u8 = START_CODE as u8;

/// Offset of the packet type byte
const TYPE_OFFSET: usize = 6;

/// Byte-at-a-time reply decoder
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buf: BytesMut,
    length: Option<u16>,
    discarded: usize,
}

impl FrameDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes accumulated for the current frame
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Number of stray bytes skipped while looking for a start code
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Drop any partial frame
    pub fn reset(&mut self) {
        self.buf.clear();
        self.length = None;
        self.discarded = 0;
    }

    /// Feed one byte
    ///
    /// Returns `Ok(Some(reply))` when the byte completes a frame; the decoder
    /// is then ready for the next frame. On error the partial frame is
    /// dropped as well.
    ///
    /// # Errors
    ///
    /// - [`Error::BadStartCode`] if the byte after `0xEF` is not `0x01`
    /// - [`Error::BadLength`] if the length field is below 2
    /// - [`Error::ChecksumMismatch`] if the trailing checksum is wrong
    pub fn push(&mut self, byte: u8) -> Result<Option<Reply>> {
        if self.buf.is_empty() && byte != START_HI {
            self.discarded += 1;
            return Ok(None);
        }

        self.buf.extend_from_slice(&[byte]);

        if self.buf.len() == Packet::HEADER_SIZE {
            if let Err(e) = self.read_header() {
                self.reset();
                return Err(e);
            }
        }

        let Some(length) = self.length else {
            return Ok(None);
        };

        if self.buf.len() < Packet::HEADER_SIZE + usize::from(length) {
            return Ok(None);
        }

        let result = self.finish(length);
        self.reset();
        result.map(Some)
    }

    fn read_header(&mut self) -> Result<()> {
        if self.buf[0] != START_HI || self.buf[1] != START_LO {
            return Err(Error::BadStartCode {
                received: u16::from_be_bytes([self.buf[0], self.buf[1]]),
            });
        }

        let length = u16::from_be_bytes([self.buf[7], self.buf[8]]);
        if usize::from(length) < Packet::CHECKSUM_SIZE {
            return Err(Error::BadLength { length });
        }

        if self.discarded > 0 {
            warn!(discarded = self.discarded, "Skipped stray bytes before frame start");
        }

        self.length = Some(length);
        Ok(())
    }

    fn finish(&self, length: u16) -> Result<Reply> {
        let packet_type = self.buf[TYPE_OFFSET];
        let payload_end = Packet::HEADER_SIZE + usize::from(length) - Packet::CHECKSUM_SIZE;
        let payload = &self.buf[Packet::HEADER_SIZE..payload_end];
        let received = u16::from_be_bytes([self.buf[payload_end], self.buf[payload_end + 1]]);

        let expected = checksum::calculate(packet_type, length, payload);
        if expected != received {
            return Err(Error::ChecksumMismatch { expected, received });
        }

        let mut raw = BytesMut::with_capacity(1 + payload.len());
        raw.extend_from_slice(&[packet_type]);
        raw.extend_from_slice(payload);

        trace!(
            "Decoded frame: {:02X?}",
            &self.buf[..self.buf.len().min(32)]
        );

        Ok(Reply::new(raw.freeze()))
    }
}

/// Decode the first complete frame found in a buffer
///
/// Bytes after the frame are ignored.
///
/// # Examples
///
/// ```
/// use zfm_core::{decode, Command, Packet};
///
/// let encoded = Packet::command(Command::GetImage, &[]).encode().unwrap();
/// let reply = decode(&encoded).unwrap();
///
/// assert_eq!(reply.as_bytes(), &[0x01, 0x01]);
/// ```
pub fn decode(buf: &[u8]) -> Result<Reply> {
    let mut decoder = FrameDecoder::new();

    for &byte in buf {
        if let Some(reply) = decoder.push(byte)? {
            return Ok(reply);
        }
    }

    let expected = match decoder.length {
        Some(length) => Packet::HEADER_SIZE + usize::from(length),
        None => Packet::HEADER_SIZE + Packet::CHECKSUM_SIZE,
    };

    Err(Error::PacketTooShort {
        expected,
        actual: decoder.position(),
    })
}
