//! Fingerprint template container

use std::fmt;

use bytes::Bytes;

use crate::error::{Error, Result};

/// Extracted fingerprint features, exactly [`Template::SIZE`] bytes
///
/// The content is opaque; only its length is checked.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Template(Bytes);

impl Template {
    pub const SIZE: usize = 512;

    /// Wrap template bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] unless `data` is exactly 512 bytes.
    pub fn new(data: impl Into<Bytes>) -> Result<Self> {
        let data = data.into();

        if data.len() != Self::SIZE {
            return Err(Error::Validation(format!(
                "template must be {} bytes, got {}",
                Self::SIZE,
                data.len()
            )));
        }

        Ok(Self(data))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }
}

impl TryFrom<Vec<u8>> for Template {
    type Error = Error;

    fn try_from(data: Vec<u8>) -> Result<Self> {
        Self::new(data)
    }
}

impl TryFrom<&[u8]> for Template {
    type Error = Error;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::new(Bytes::copy_from_slice(data))
    }
}

impl AsRef<[u8]> for Template {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Template").field(&self.0.len()).finish()
    }
}
