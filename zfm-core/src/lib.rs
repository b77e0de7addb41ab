//! # zfm-core
//!
//! Core protocol implementation for ZFM-20 / R30x fingerprint sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Packet structure and encoding
//! - Incremental, resynchronizing frame decoding
//! - Checksum calculation
//! - Instruction and confirmation codes
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod decoder;
pub mod error;
pub mod packet;
pub mod session;

pub use command::{Command, Status};
pub use decoder::{decode, FrameDecoder};
pub use error::{Error, Result};
pub use packet::{Packet, PacketType, Reply};
pub use session::{Session, SessionState};
