//! Scripted in-memory transport shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use zfm::{Packet, PacketType, Reply, Transport, ZfmSensor};

/// Both ends of the fake line, kept by the test after the transport moves
#[derive(Clone, Default)]
pub struct Wire {
    inner: Arc<Mutex<WireInner>>,
}

#[derive(Default)]
struct WireInner {
    incoming: VecDeque<u8>,
    sent: Vec<Vec<u8>>,
    connected: bool,
}

impl Wire {
    /// Queue raw bytes for the sensor to "send"
    pub fn push_bytes(&self, bytes: &[u8]) {
        self.inner.lock().unwrap().incoming.extend(bytes);
    }

    /// Queue an acknowledgement carrying `payload`
    pub fn push_ack(&self, payload: &[u8]) {
        self.push_bytes(&Packet::new(PacketType::Ack, payload.to_vec()).encode().unwrap());
    }

    /// Queue a data packet
    pub fn push_data(&self, payload: &[u8], last: bool) {
        self.push_bytes(&Packet::data(payload.to_vec(), last).encode().unwrap());
    }

    /// Every frame written by the driver, one entry per send
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().sent.clone()
    }

    /// Frames written by the driver, decoded to type + payload
    pub fn sent_replies(&self) -> Vec<Reply> {
        self.sent()
            .iter()
            .map(|frame| zfm::decode(frame).unwrap())
            .collect()
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().unwrap().incoming.len()
    }

    pub fn is_connected(&self) -> bool {
        self.inner.lock().unwrap().connected
    }
}

pub struct ScriptedTransport {
    wire: Wire,
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> zfm_transport::Result<()> {
        self.wire.inner.lock().unwrap().connected = true;
        Ok(())
    }

    async fn disconnect(&mut self) -> zfm_transport::Result<()> {
        self.wire.inner.lock().unwrap().connected = false;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.wire.is_connected()
    }

    async fn send(&mut self, data: &[u8]) -> zfm_transport::Result<()> {
        self.wire.inner.lock().unwrap().sent.push(data.to_vec());
        Ok(())
    }

    async fn read_byte(&mut self) -> zfm_transport::Result<u8> {
        let next = self.wire.inner.lock().unwrap().incoming.pop_front();

        match next {
            Some(byte) => Ok(byte),
            // A silent sensor: only the caller's deadline ends the wait
            None => std::future::pending().await,
        }
    }

    fn port_name(&self) -> String {
        "scripted".to_string()
    }
}

/// Sensor on a scripted line, not yet connected
pub fn sensor() -> (ZfmSensor, Wire) {
    let wire = Wire::default();
    let transport = ScriptedTransport { wire: wire.clone() };

    (ZfmSensor::with_transport(Box::new(transport)), wire)
}

/// Sensor that already completed the handshake; the handshake frame is
/// removed from the sent log
pub async fn connected_sensor() -> (ZfmSensor, Wire) {
    use zfm::FingerprintSensor;

    let (mut sensor, wire) = sensor();
    wire.push_ack(&[0x00]);
    sensor.connect().await.unwrap();
    wire.inner.lock().unwrap().sent.clear();

    (sensor, wire)
}

/// Deterministic 512-byte template content
pub fn template_bytes() -> Vec<u8> {
    (0..512).map(|i| (i % 251) as u8).collect()
}
