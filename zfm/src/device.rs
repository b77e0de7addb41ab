//! ZFM-20 / R30x sensor implementation

use std::time::Duration;

use async_trait::async_trait;
use bytes::BytesMut;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use zfm_core::{
    constants::{
        buffer::{SLOT_1, SLOT_2},
        system_param, DATA_CHUNK_SIZE, DEFAULT_PASSWORD, DEFAULT_READ_TIMEOUT, SEARCH_PAGE_COUNT,
        TEMPLATE_SIZE,
    },
    Command, FrameDecoder, Packet, Reply, Session, Status,
};
use zfm_transport::{SerialTransport, TcpTransport, Transport};
use zfm_types::{SearchMatch, SecurityLevel, SensorParameters, Template};

use crate::error::{Error, Result};
use crate::sensor::FingerprintSensor;

/// ZFM fingerprint sensor
///
/// Drives one module over an exclusively owned transport. Every operation
/// takes `&mut self`: the protocol has no request ids, so only one exchange
/// may be in flight.
///
/// # Examples
///
/// ```no_run
/// use zfm::{FingerprintSensor, ZfmSensor};
///
/// #[tokio::main]
/// async fn main() -> zfm::Result<()> {
///     let mut sensor = ZfmSensor::new("/dev/ttyUSB0");
///
///     sensor.connect().await?;
///
///     if sensor.has_fingerprint().await? {
///         match sensor.search_fingerprint().await? {
///             Some(position) => println!("Matched #{}", position),
///             None => println!("Unknown finger"),
///         }
///     }
///
///     sensor.close().await;
///     Ok(())
/// }
/// ```
pub struct ZfmSensor {
    transport: Box<dyn Transport>,
    session: Session,
    decoder: FrameDecoder,
    timeout: Duration,
    password: u32,
}

impl ZfmSensor {
    /// Create a sensor on a serial port at the default baud rate (57600)
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_transport(Box::new(SerialTransport::new(path)))
    }

    /// Create a sensor on a serial port
    pub fn with_baud_rate(path: impl Into<String>, baud_rate: u32) -> Self {
        Self::with_transport(Box::new(SerialTransport::with_baud_rate(path, baud_rate)))
    }

    /// Create a sensor reached through a TCP serial bridge
    pub fn over_tcp(addr: impl Into<String>, port: u16) -> Self {
        Self::with_transport(Box::new(TcpTransport::new(addr, port)))
    }

    /// Create a sensor on any transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(),
            decoder: FrameDecoder::new(),
            timeout: DEFAULT_READ_TIMEOUT,
            password: DEFAULT_PASSWORD,
        }
    }

    /// Set the per-byte reply timeout (default: 750ms)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the handshake password (default: 0)
    pub fn with_password(mut self, password: u32) -> Self {
        self.password = password;
        self
    }

    /// Session state handle
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.session.is_connected() && self.transport.is_connected()
    }

    /// Search the library, reporting the match score as well as the position
    pub async fn search_match(&mut self) -> Result<Option<SearchMatch>> {
        self.ensure_connected()?;

        let [count_hi, count_lo] = SEARCH_PAGE_COUNT.to_be_bytes();
        let reply = self
            .command_ack(Command::HighSpeedSearch, &[SLOT_1, 0x00, 0x00, count_hi, count_lo])
            .await?;

        match reply.status() {
            Some(Status::Ok) if reply.len() >= 6 => {
                let bytes = reply.as_bytes();
                let hit = SearchMatch {
                    position: u16::from_be_bytes([bytes[2], bytes[3]]),
                    confidence: u16::from_be_bytes([bytes[4], bytes[5]]),
                };

                debug!(
                    "Found fingerprint with number {} with confidence {}",
                    hit.position, hit.confidence
                );

                Ok(Some(hit))
            }
            Some(Status::NotFound) => {
                debug!("No matching fingerprint in library");
                Ok(None)
            }
            _ => Err(Error::bad_data(&reply)),
        }
    }

    /// Compare the finger primed by
    /// [`has_fingerprint`](FingerprintSensor::has_fingerprint) with the
    /// template stored at `position`
    ///
    /// Returns the match score, or `None` if the two do not match.
    pub async fn verify_fingerprint(&mut self, position: u16) -> Result<Option<u16>> {
        self.ensure_connected()?;

        let [pos_hi, pos_lo] = position.to_be_bytes();
        self.command_ok(Command::Load, &[SLOT_2, pos_hi, pos_lo]).await?;

        let reply = self.command_ack(Command::Match, &[]).await?;
        match reply.status() {
            Some(Status::Ok) if reply.len() >= 4 => {
                let bytes = reply.as_bytes();
                let score = u16::from_be_bytes([bytes[2], bytes[3]]);

                debug!("Finger matches #{} with score {}", position, score);
                Ok(Some(score))
            }
            Some(Status::NoMatch) => Ok(None),
            _ => Err(Error::bad_data(&reply)),
        }
    }

    /// Read a stored template back from the library
    pub async fn load_model(&mut self, position: u16) -> Result<Template> {
        self.ensure_connected()?;

        debug!("Loading template #{}...", position);

        let [pos_hi, pos_lo] = position.to_be_bytes();
        self.command_ok(Command::Load, &[SLOT_1, pos_hi, pos_lo]).await?;

        self.upload(SLOT_1).await
    }

    // Command sequences

    async fn handshake(&mut self) -> Result<()> {
        let password = self.password.to_be_bytes();
        let reply = self.exchange(Command::VerifyPassword, &password).await?;

        if !reply.is_ack() || reply.status() != Some(Status::Ok) {
            return Err(Error::CantConnect {
                reason: format!("reply is: {}", reply.to_hex()),
            });
        }

        Ok(())
    }

    async fn get_image(&mut self) -> Result<bool> {
        let reply = self.command_ack(Command::GetImage, &[]).await?;

        match reply.status() {
            Some(Status::Ok) => Ok(true),
            status => {
                debug!("No image captured: {:?}", status);
                Ok(false)
            }
        }
    }

    async fn image_to_template(&mut self, slot: u8) -> Result<bool> {
        let reply = self.command_ack(Command::ImageToTemplate, &[slot]).await?;

        match reply.status() {
            Some(Status::Ok) => Ok(true),
            status => {
                debug!("Feature extraction into buffer {} failed: {:?}", slot, status);
                Ok(false)
            }
        }
    }

    async fn register_model(&mut self) -> Result<()> {
        let reply = self.command_ack(Command::RegisterModel, &[]).await?;

        match reply.status() {
            Some(Status::Ok) => Ok(()),
            Some(Status::EnrollMismatch) => Err(Error::FingerprintsDontMatch),
            _ => Err(Error::bad_data(&reply)),
        }
    }

    async fn upload(&mut self, slot: u8) -> Result<Template> {
        self.command_ok(Command::Upload, &[slot]).await?;

        let mut data = BytesMut::with_capacity(TEMPLATE_SIZE);
        loop {
            let reply = self.receive_reply().await?;
            if !reply.is_data() {
                return Err(Error::bad_data(&reply));
            }

            data.extend_from_slice(reply.payload());

            if reply.is_end_of_data() {
                break;
            }
        }

        debug!("Uploaded {} template bytes from buffer {}", data.len(), slot);

        let len = data.len();
        Template::new(data.freeze()).map_err(|_| Error::BadData {
            reply: format!("template of {} bytes", len),
        })
    }

    async fn download(&mut self, slot: u8, template: &Template) -> Result<()> {
        self.command_ok(Command::Download, &[slot]).await?;

        let data = template.clone().into_bytes();
        let chunks = data.len().div_ceil(DATA_CHUNK_SIZE);

        for index in 0..chunks {
            let start = index * DATA_CHUNK_SIZE;
            let end = (start + DATA_CHUNK_SIZE).min(data.len());
            let packet = Packet::data(data.slice(start..end), index + 1 == chunks);

            self.send_packet(&packet).await?;
        }

        Ok(())
    }

    async fn store(&mut self, slot: u8, position: u16) -> Result<()> {
        let [pos_hi, pos_lo] = position.to_be_bytes();
        self.command_ok(Command::Store, &[slot, pos_hi, pos_lo]).await?;

        debug!("Stored buffer {} at #{}", slot, position);
        Ok(())
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    /// Send a command and require an acknowledgement with status OK
    async fn command_ok(&mut self, command: Command, params: &[u8]) -> Result<Reply> {
        let reply = self.command_ack(command, params).await?;

        if reply.status() != Some(Status::Ok) {
            return Err(Error::bad_data(&reply));
        }

        Ok(reply)
    }

    /// Send a command and require an acknowledgement, whatever its status
    async fn command_ack(&mut self, command: Command, params: &[u8]) -> Result<Reply> {
        let reply = self.exchange(command, params).await?;

        if !reply.is_ack() || reply.status().is_none() {
            return Err(Error::bad_data(&reply));
        }

        Ok(reply)
    }

    async fn exchange(&mut self, command: Command, params: &[u8]) -> Result<Reply> {
        let sequence = self.session.record_exchange();
        trace!(sequence, "Exchange {}", command);

        self.send_packet(&Packet::command(command, params)).await?;
        self.receive_reply().await
    }

    async fn send_packet(&mut self, packet: &Packet) -> Result<()> {
        trace!("Sending: {:?}", packet);

        let data = packet.encode()?;
        self.transport.send(&data).await.map_err(Error::CantWrite)?;

        Ok(())
    }

    async fn receive_reply(&mut self) -> Result<Reply> {
        self.decoder.reset();

        loop {
            let byte = match timeout(self.timeout, self.transport.read_byte()).await {
                Ok(byte) => byte.map_err(Error::CantRead)?,
                Err(_) => {
                    let index = self.decoder.position();
                    warn!("Sensor not responding (timeout at index {})", index);
                    return Err(Error::NotResponding {
                        index,
                        waited: self.timeout,
                    });
                }
            };

            if let Some(reply) = self.decoder.push(byte)? {
                trace!("Received: {:?}", reply);
                return Ok(reply);
            }
        }
    }
}

#[async_trait]
impl FingerprintSensor for ZfmSensor {
    async fn connect(&mut self) -> Result<()> {
        if self.is_connected() {
            debug!("Already connected to {}", self.transport.port_name());
            return Ok(());
        }
        // Link lost under an established session: start over
        self.session.close();

        info!("Connecting to {}...", self.transport.port_name());

        self.transport.connect().await.map_err(Error::CantOpen)?;

        if let Err(e) = self.handshake().await {
            if let Err(close_err) = self.transport.disconnect().await {
                warn!("Error while disconnecting from fingerprint sensor: {}", close_err);
            }

            return Err(match e {
                Error::CantConnect { .. } => e,
                other => Error::Handshake(Box::new(other)),
            });
        }

        self.session.establish()?;

        info!("Connected to fingerprint sensor on {}", self.transport.port_name());
        Ok(())
    }

    async fn close(&mut self) {
        if self.transport.is_connected() {
            info!("Disconnecting from {}...", self.transport.port_name());

            if let Err(e) = self.transport.disconnect().await {
                warn!("Error while disconnecting from fingerprint sensor: {}", e);
            }
        }

        self.session.close();
    }

    async fn has_fingerprint(&mut self) -> Result<bool> {
        self.ensure_connected()?;

        if !self.get_image().await? {
            return Ok(false);
        }

        self.image_to_template(SLOT_1).await
    }

    async fn search_fingerprint(&mut self) -> Result<Option<u16>> {
        Ok(self.search_match().await?.map(|hit| hit.position))
    }

    async fn create_model(&mut self) -> Result<Option<Template>> {
        self.ensure_connected()?;

        if !self.get_image().await? {
            return Ok(None);
        }
        if !self.image_to_template(SLOT_2).await? {
            return Ok(None);
        }

        self.register_model().await?;
        self.upload(SLOT_1).await.map(Some)
    }

    async fn save_model(&mut self, template: &Template, position: u16) -> Result<()> {
        self.ensure_connected()?;

        self.download(SLOT_1, template).await?;
        self.store(SLOT_1, position).await
    }

    async fn save_stored_model(&mut self, position: u16) -> Result<()> {
        self.ensure_connected()?;

        self.store(SLOT_1, position).await
    }

    async fn delete_model(&mut self, position: u16, count: u16) -> Result<()> {
        self.ensure_connected()?;

        let [pos_hi, pos_lo] = position.to_be_bytes();
        let [count_hi, count_lo] = count.to_be_bytes();
        self.command_ok(Command::Delete, &[pos_hi, pos_lo, count_hi, count_lo])
            .await?;

        debug!("Deleted {} template(s) from #{}", count, position);
        Ok(())
    }

    async fn clear_all_saved(&mut self) -> Result<()> {
        self.ensure_connected()?;

        warn!("Emptying fingerprint library...");

        self.command_ok(Command::Empty, &[]).await?;
        Ok(())
    }

    async fn template_count(&mut self) -> Result<u16> {
        self.ensure_connected()?;

        let reply = self.command_ok(Command::TemplateCount, &[]).await?;
        let bytes = reply.as_bytes();
        if bytes.len() < 4 {
            return Err(Error::bad_data(&reply));
        }

        Ok(u16::from_be_bytes([bytes[2], bytes[3]]))
    }

    async fn read_parameters(&mut self) -> Result<SensorParameters> {
        self.ensure_connected()?;

        let reply = self.command_ok(Command::ReadSysParam, &[]).await?;
        let params = SensorParameters::parse(reply.as_bytes()).map_err(|_| Error::bad_data(&reply))?;

        debug!("Sensor parameters: {}", params);
        Ok(params)
    }

    async fn set_security_level(&mut self, level: u8) -> Result<()> {
        let level = SecurityLevel::new(level)?;
        self.ensure_connected()?;

        self.command_ok(Command::SetSysParam, &[system_param::SECURITY_LEVEL, level.get()])
            .await?;

        debug!("Security level set to {}", level.get());
        Ok(())
    }
}
