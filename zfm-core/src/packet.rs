//! ZFM protocol packet structure and encoding

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    checksum,
    command::{Command, Status},
    constants::{DEFAULT_ADDRESS, START_CODE},
    error::{Error, Result},
};

/// Packet identifier byte
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Host to module instruction
    Command = 0x01,

    /// Intermediate packet of a multi-packet data transfer
    Data = 0x02,

    /// Module reply carrying a confirmation code
    Ack = 0x07,

    /// Last packet of a multi-packet data transfer
    EndData = 0x08,
}

impl From<PacketType> for u8 {
    fn from(packet_type: PacketType) -> u8 {
        packet_type as u8
    }
}

impl TryFrom<u8> for PacketType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Command),
            0x02 => Ok(Self::Data),
            0x07 => Ok(Self::Ack),
            0x08 => Ok(Self::EndData),
            _ => Err(Error::UnknownPacketType(value)),
        }
    }
}

/// ZFM protocol packet
///
/// # Packet Structure
///
/// ```text
/// ┌───────────┬───────────┬──────────┬───────────┬───────────┬───────────┐
/// │ StartCode │  Address  │   Type   │  Length   │  Payload  │ Checksum  │
/// │  2 bytes  │  4 bytes  │  1 byte  │  2 bytes  │  N bytes  │  2 bytes  │
/// │  0xEF01   │ (BE u32)  │          │ (BE, N+2) │           │ (BE u16)  │
/// └───────────┴───────────┴──────────┴───────────┴───────────┴───────────┘
/// ```
///
/// All multi-byte values are big-endian.
///
/// # Examples
///
/// ```
/// use zfm_core::{Command, Packet};
///
/// let packet = Packet::command(Command::GetImage, &[]);
/// let encoded = packet.encode().unwrap();
///
/// assert_eq!(
///     encoded.as_ref(),
///     &[0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x03, 0x01, 0x00, 0x05]
/// );
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Packet {
    /// Packet identifier
    pub packet_type: PacketType,

    /// Packet payload (instruction + parameters, or raw data)
    pub payload: Bytes,
}

impl Packet {
    /// Bytes preceding the payload: start code, address, type, length
    pub const HEADER_SIZE: usize = 9;

    /// Trailing checksum size
    pub const CHECKSUM_SIZE: usize = 2;

    /// Largest payload the 16-bit length field can describe
    pub const MAX_PAYLOAD_SIZE: usize = u16::MAX as usize - Self::CHECKSUM_SIZE;

    /// Create a packet of any type
    pub fn new(packet_type: PacketType, payload: impl Into<Bytes>) -> Self {
        Self {
            packet_type,
            payload: payload.into(),
        }
    }

    /// Create a command packet: instruction code followed by its parameters
    ///
    /// # Examples
    ///
    /// ```
    /// use zfm_core::{Command, Packet};
    ///
    /// let packet = Packet::command(Command::ImageToTemplate, &[0x01]);
    /// assert_eq!(packet.payload.as_ref(), &[0x02, 0x01]);
    /// ```
    pub fn command(command: Command, params: &[u8]) -> Self {
        let mut payload = BytesMut::with_capacity(1 + params.len());
        payload.put_u8(command.into());
        payload.put_slice(params);

        Self::new(PacketType::Command, payload.freeze())
    }

    /// Create a data packet (`last` selects the end-of-data tag)
    pub fn data(chunk: impl Into<Bytes>, last: bool) -> Self {
        let packet_type = if last {
            PacketType::EndData
        } else {
            PacketType::Data
        };

        Self::new(packet_type, chunk)
    }

    /// Value of the length field (payload + checksum)
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the payload exceeds
    /// [`MAX_PAYLOAD_SIZE`](Self::MAX_PAYLOAD_SIZE).
    pub fn length(&self) -> Result<u16> {
        u16::try_from(self.payload.len() + Self::CHECKSUM_SIZE).map_err(|_| {
            Error::PayloadTooLarge {
                size: self.payload.len(),
                max: Self::MAX_PAYLOAD_SIZE,
            }
        })
    }

    /// Calculate checksum for this packet
    pub fn checksum(&self) -> Result<u16> {
        Ok(checksum::calculate(
            self.packet_type.into(),
            self.length()?,
            &self.payload,
        ))
    }

    /// Encode packet to bytes
    ///
    /// The codec does not enforce the module's per-packet size limit;
    /// callers split data transfers into [`DATA_CHUNK_SIZE`] pieces.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PayloadTooLarge`] if the length field would overflow.
    ///
    /// [`DATA_CHUNK_SIZE`]: crate::constants::DATA_CHUNK_SIZE
    pub fn encode(&self) -> Result<BytesMut> {
        let length = self.length()?;
        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u16(START_CODE);
        buf.put_u32(DEFAULT_ADDRESS);
        buf.put_u8(self.packet_type.into());
        buf.put_u16(length);
        buf.put_slice(&self.payload);
        buf.put_u16(checksum::calculate(self.packet_type.into(), length, &self.payload));

        Ok(buf)
    }

    /// Get total encoded size
    pub fn size(&self) -> usize {
        Self::HEADER_SIZE + self.payload.len() + Self::CHECKSUM_SIZE
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("packet_type", &self.packet_type)
            .field("length", &self.length().ok())
            .field("checksum", &self.checksum().ok().map(|sum| format!("0x{:04X}", sum)))
            .field("payload", &hex::encode_upper(&self.payload))
            .finish()
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Packet[{:?}](len={})",
            self.packet_type,
            self.payload.len()
        )
    }
}

/// Decoded reply: packet type byte followed by the payload
///
/// `as_bytes()[0]` is the packet type, `as_bytes()[1]` the confirmation code
/// of an acknowledgement. Header, address, length and checksum are stripped.
#[derive(Clone, PartialEq, Eq)]
pub struct Reply {
    raw: Bytes,
}

impl Reply {
    pub(crate) fn new(raw: Bytes) -> Self {
        Self { raw }
    }

    /// Raw packet type byte
    pub fn packet_type_byte(&self) -> u8 {
        self.raw[0]
    }

    /// Packet type, if it is one the protocol defines
    pub fn packet_type(&self) -> Option<PacketType> {
        PacketType::try_from(self.packet_type_byte()).ok()
    }

    /// Check if this is an acknowledgement packet
    pub fn is_ack(&self) -> bool {
        self.packet_type() == Some(PacketType::Ack)
    }

    /// Check if this is a data or end-of-data packet
    pub fn is_data(&self) -> bool {
        matches!(
            self.packet_type(),
            Some(PacketType::Data | PacketType::EndData)
        )
    }

    /// Check if this is the final packet of a data transfer
    pub fn is_end_of_data(&self) -> bool {
        self.packet_type() == Some(PacketType::EndData)
    }

    /// Confirmation code (first payload byte), if any
    pub fn status(&self) -> Option<Status> {
        self.raw.get(1).copied().map(Status::from_code)
    }

    /// Payload without the packet type byte
    pub fn payload(&self) -> &[u8] {
        &self.raw[1..]
    }

    /// Type byte and payload as one slice
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Number of bytes in the reply, type byte included
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// A reply always carries at least its type byte
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Space separated upper-case hex rendering for diagnostics
    pub fn to_hex(&self) -> String {
        self.raw
            .chunks(1)
            .map(hex::encode_upper)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reply")
            .field("packet_type", &format!("0x{:02X}", self.packet_type_byte()))
            .field("payload", &hex::encode_upper(self.payload()))
            .finish()
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
