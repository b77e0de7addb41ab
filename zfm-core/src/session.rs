//! Session bookkeeping for a sensor link
//!
//! A session tracks:
//! - Connection state (handshake done or not)
//! - Number of request/reply exchanges performed
//!
//! The protocol carries no request identifiers, so the exchange counter only
//! exists for diagnostics.

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    /// No handshake performed
    #[default]
    Disconnected,

    /// Password verified, ready for commands
    Connected,
}

/// Link state owned by the sensor driving it
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    exchanges: u64,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected
    }

    /// Mark the handshake as done
    pub fn establish(&mut self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::InvalidSessionState(format!(
                "Cannot establish from state: {:?}",
                self.state
            )));
        }

        self.state = SessionState::Connected;
        Ok(())
    }

    /// Close session and reset the exchange counter
    pub fn close(&mut self) {
        self.state = SessionState::Disconnected;
        self.exchanges = 0;
    }

    /// Record one request/reply exchange, returning its sequence number
    pub fn record_exchange(&mut self) -> u64 {
        let sequence = self.exchanges;
        self.exchanges += 1;
        sequence
    }

    /// Exchanges performed since the session was last closed
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }
}
