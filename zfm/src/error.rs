//! High-level error types

use std::fmt;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Can't connect to fingerprint sensor: {0}")]
    CantOpen(#[source] zfm_transport::Error),

    /// The sensor answered the handshake, but not with OK
    #[error("Can't initialize fingerprint sensor: {reason}")]
    CantConnect { reason: String },

    /// The handshake exchange itself failed
    #[error("Can't initialize fingerprint sensor: {0}")]
    Handshake(#[source] Box<Error>),

    #[error("Got wrong data from fingerprint sensor: {reply}")]
    BadData { reply: String },

    #[error("Malformed packet from fingerprint sensor: {0}")]
    Core(#[from] zfm_core::Error),

    #[error("Can't write data to sensor: {0}")]
    CantWrite(#[source] zfm_transport::Error),

    #[error("Can't read data from sensor: {0}")]
    CantRead(#[source] zfm_transport::Error),

    #[error("Timeout at index {index} after {waited:?}")]
    NotResponding { index: usize, waited: Duration },

    #[error("Fingerprints doesn't match")]
    FingerprintsDontMatch,

    #[error("Fingerprint sensor not connected")]
    NotConnected,

    #[error("Invalid argument: {0}")]
    Types(#[from] zfm_types::Error),
}

/// Stable error category
///
/// Callers key localized messages off [`ErrorKind::key`]; the `Display`
/// text of [`Error`] is diagnostic only and may change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CantConnect,
    BadData,
    CantWrite,
    CantRead,
    NotResponding,
    FingerprintsDontMatch,
    NotConnected,
    InvalidArgument,
}

impl ErrorKind {
    pub fn key(self) -> &'static str {
        match self {
            Self::CantConnect => "sensor.cant.connect",
            Self::BadData => "sensor.bad.data",
            Self::CantWrite => "sensor.cant.write",
            Self::CantRead => "sensor.cant.read",
            Self::NotResponding => "sensor.not.responding",
            Self::FingerprintsDontMatch => "sensor.fingerprints.doesnt.match",
            Self::NotConnected => "sensor.not.connected",
            Self::InvalidArgument => "sensor.invalid.argument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Error {
    pub(crate) fn bad_data(reply: &zfm_core::Reply) -> Self {
        Self::BadData {
            reply: reply.to_hex(),
        }
    }

    /// Stable category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CantOpen(_) | Self::CantConnect { .. } | Self::Handshake(_) => {
                ErrorKind::CantConnect
            }
            Self::BadData { .. } | Self::Core(_) => ErrorKind::BadData,
            Self::CantWrite(_) => ErrorKind::CantWrite,
            Self::CantRead(_) => ErrorKind::CantRead,
            Self::NotResponding { .. } => ErrorKind::NotResponding,
            Self::FingerprintsDontMatch => ErrorKind::FingerprintsDontMatch,
            Self::NotConnected => ErrorKind::NotConnected,
            Self::Types(_) => ErrorKind::InvalidArgument,
        }
    }

    /// Stable message key, e.g. `sensor.bad.data`
    pub fn key(&self) -> &'static str {
        self.kind().key()
    }

    /// Check if repeating the whole operation might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_framing(),
            _ => matches!(
                self,
                Self::NotResponding { .. } | Self::FingerprintsDontMatch | Self::BadData { .. }
            ),
        }
    }

    /// Check if error requires reconnection
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::NotConnected
                | Self::CantOpen(_)
                | Self::CantConnect { .. }
                | Self::Handshake(_)
                | Self::CantWrite(_)
                | Self::CantRead(_)
        )
    }
}
