//! # zfm
//!
//! Rust driver for ZFM-20 / R30x capacitive fingerprint sensor modules.
//!
//! ## Features
//!
//! - Type-safe implementation of the module's framed serial protocol
//! - Async/await API using Tokio, with a bounded wait on every reply
//! - Stable error keys for localized messages
//! - Serial port and TCP serial-bridge transports
//!
//! ## Quick Start
//!
//! ```no_run
//! use zfm::{FingerprintSensor, ZfmSensor};
//!
//! #[tokio::main]
//! async fn main() -> zfm::Result<()> {
//!     let mut sensor = ZfmSensor::new("/dev/ttyUSB0");
//!     sensor.connect().await?;
//!
//!     let params = sensor.read_parameters().await?;
//!     println!("{}", params);
//!
//!     sensor.close().await;
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod sensor;

// Re-exports
pub use device::ZfmSensor;
pub use error::{Error, ErrorKind, Result};
pub use sensor::FingerprintSensor;

// Re-export types
pub use zfm_core::{decode, Command, Packet, PacketType, Reply, Session, Status};
pub use zfm_transport::{SerialTransport, TcpTransport, Transport};
pub use zfm_types::{SearchMatch, SecurityLevel, SensorParameters, Template};
