//! Transport layer for ZFM sensors
//!
//! Provides byte-stream links to the module: a local serial port, or a
//! TCP bridge exposing the module's UART.

pub mod error;
pub mod serial;
pub mod tcp;

pub use error::{Error, Result};
pub use serial::SerialTransport;
pub use tcp::TcpTransport;

use async_trait::async_trait;

/// Byte-stream link to a sensor module
///
/// Implementations never impose a reply deadline of their own;
/// `read_byte` waits until a byte arrives and the caller bounds the wait.
#[async_trait]
pub trait Transport: Send {
    /// Open the link
    async fn connect(&mut self) -> Result<()>;
    
    /// Close the link
    async fn disconnect(&mut self) -> Result<()>;
    
    /// Check if connected
    fn is_connected(&self) -> bool;
    
    /// Write raw bytes and flush them to the line
    async fn send(&mut self, data: &[u8]) -> Result<()>;
    
    /// Wait for the next byte from the line
    async fn read_byte(&mut self) -> Result<u8>;
    
    /// Port name or address, for diagnostics
    fn port_name(&self) -> String;
}
