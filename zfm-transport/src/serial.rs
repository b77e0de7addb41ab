//! Serial port transport
//!
//! The module's UART runs 8N1 at 57600 baud unless reconfigured. Port I/O
//! is blocking, so it runs on tokio's blocking pool; reads return after the
//! port's own read timeout when the line is quiet.

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, trace, warn};

use zfm_core::constants::DEFAULT_BAUD_RATE;

use crate::{error::*, Transport};

/// Open port plus the bytes read from it but not yet consumed
struct Line {
    port: Box<dyn SerialPort>,
    rx: VecDeque<u8>,
}

impl Line {
    /// Read whatever arrives before the port's read timeout
    fn fill(&mut self) -> Result<usize> {
        let mut buf = [0u8; 64];

        match self.port.read(&mut buf) {
            Ok(n) => {
                self.rx.extend(&buf[..n]);
                trace!("Received {} bytes: {:02X?}", n, &buf[..n]);
                Ok(n)
            }
            Err(e) if e.kind() == io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.port.write_all(data)?;
        self.port.flush()?;
        Ok(())
    }
}

/// Serial transport for ZFM sensors
pub struct SerialTransport {
    path: String,
    baud_rate: u32,
    read_timeout: Duration,
    // Shared with the blocking task so a cancelled read keeps what it got
    line: Option<Arc<Mutex<Line>>>,
}

impl SerialTransport {
    /// Create new serial transport at the default baud rate
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_baud_rate(path, DEFAULT_BAUD_RATE)
    }

    /// Create new serial transport
    pub fn with_baud_rate(path: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            path: path.into(),
            baud_rate,
            read_timeout: Duration::from_millis(50),
            line: None,
        }
    }

    /// Set how long one blocking read waits on a quiet line
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    fn line(&self) -> Result<Arc<Mutex<Line>>> {
        self.line.clone().ok_or(Error::NotConnected)
    }
}

async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(io::Error::other)?
}

#[async_trait]
impl Transport for SerialTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Opening {} at {} baud...", self.path, self.baud_rate);

        let builder = serialport::new(self.path.as_str(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(self.read_timeout);

        let port = blocking(move || {
            let port = builder.open()?;
            // Drop whatever the module sent before we were listening
            port.clear(ClearBuffer::All)?;
            Ok(port)
        })
        .await?;

        debug!("Opened {}", self.path);

        self.line = Some(Arc::new(Mutex::new(Line {
            port,
            rx: VecDeque::with_capacity(64),
        })));
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.line.take().is_some() {
            debug!("Closed {}", self.path);
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.line.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let line = self.line()?;
        let data = data.to_vec();

        trace!("Sending {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        blocking(move || line.lock().write(&data)).await
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let line = self.line()?;

        loop {
            let next = line.lock().rx.pop_front();
            if let Some(byte) = next {
                return Ok(byte);
            }

            let line = Arc::clone(&line);
            blocking(move || line.lock().fill()).await?;
        }
    }

    fn port_name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_connected() {
            warn!("Serial transport dropped while still connected");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serial_transport_create() {
        let transport = SerialTransport::new("/dev/ttyUSB0");
        assert!(!transport.is_connected());
        assert_eq!(transport.baud_rate(), 57600);
        assert_eq!(transport.port_name(), "/dev/ttyUSB0");
    }

    #[tokio::test]
    async fn test_serial_transport_requires_connection() {
        let mut transport = SerialTransport::with_baud_rate("/dev/ttyUSB0", 9600)
            .with_read_timeout(Duration::from_millis(10));

        assert!(matches!(transport.send(&[0x00]).await, Err(Error::NotConnected)));
        assert!(matches!(transport.read_byte().await, Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_serial_transport_missing_port() {
        let mut transport = SerialTransport::new("/dev/zfm-missing-port");

        let result = transport.connect().await;
        assert!(matches!(result, Err(Error::Serial(_))));
        assert!(!transport.is_connected());
    }

    #[tokio::test]
    async fn test_serial_transport_disconnect_idempotent() {
        let mut transport = SerialTransport::new("/dev/ttyUSB0");

        transport.disconnect().await.unwrap();
        transport.disconnect().await.unwrap();
        assert!(!transport.is_connected());
    }
}
