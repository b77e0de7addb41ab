//! TCP transport
//!
//! For modules wired to a serial-to-network bridge (ser2net or similar)
//! that forwards the raw UART byte stream over a TCP socket.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Buf, BytesMut};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace, warn};

use crate::{error::*, Transport};

/// UART bytes carried over a TCP bridge
pub struct TcpTransport {
    host: String,
    port: u16,
    connect_timeout: Duration,
    stream: Option<TcpStream>,
    rx: BytesMut,
}

impl TcpTransport {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            connect_timeout: Duration::from_secs(5),
            stream: None,
            rx: BytesMut::with_capacity(256),
        }
    }

    /// Set how long to wait for the bridge to accept (default: 5s)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Pull whatever the bridge has forwarded into `rx`
    async fn fill(&mut self) -> Result<usize> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        // read_buf is cancel safe, so an expired deadline loses no data
        let n = stream.read_buf(&mut self.rx).await?;
        if n == 0 {
            return Err(Error::ConnectionClosed);
        }

        trace!("Bridge forwarded {} bytes", n);
        Ok(n)
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(Error::AlreadyConnected);
        }

        debug!("Dialing bridge {}:{}...", self.host, self.port);

        let dial = TcpStream::connect((self.host.as_str(), self.port));
        let stream = timeout(self.connect_timeout, dial)
            .await
            .map_err(|_| Error::ConnectionTimeout)??;

        // One frame is a handful of bytes; send it now
        stream.set_nodelay(true)?;

        self.rx.clear();
        self.stream = Some(stream);

        debug!("Bridge {} up", self.port_name());
        Ok(())
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.rx.clear();

        let Some(mut stream) = self.stream.take() else {
            return Ok(());
        };

        if let Err(e) = stream.shutdown().await {
            debug!("Bridge shutdown: {}", e);
        }

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    async fn send(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Forwarding {} bytes: {:02X?}", data.len(), &data[..data.len().min(32)]);

        stream.write_all(data).await?;
        stream.flush().await?;
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        if self.rx.is_empty() {
            self.fill().await?;
        }

        Ok(self.rx.get_u8())
    }

    fn port_name(&self) -> String {
        match self.stream.as_ref().and_then(|s| s.peer_addr().ok()) {
            Some(peer) => peer.to_string(),
            None => format!("{}:{}", self.host, self.port),
        }
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if self.stream.is_some() {
            warn!("TCP bridge transport dropped while still connected");
        }
    }
}
