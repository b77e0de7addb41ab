//! Sensor capability interface

use async_trait::async_trait;

use zfm_types::{SensorParameters, Template};

use crate::error::Result;

/// General interface to a fingerprint sensor
///
/// Operations that depend on a captured finger rely on feature buffers held
/// inside the module: call [`has_fingerprint`](Self::has_fingerprint) first,
/// then [`create_model`](Self::create_model) or
/// [`search_fingerprint`](Self::search_fingerprint) without another capture
/// in between.
#[async_trait]
pub trait FingerprintSensor: Send {
    /// Connect to the sensor. Must be called before any other method.
    async fn connect(&mut self) -> Result<()>;

    /// Release the link. Never fails; teardown problems are only logged.
    async fn close(&mut self);

    /// Check whether a finger is placed on the sensor and, if so, keep its
    /// features in the module's first buffer.
    async fn has_fingerprint(&mut self) -> Result<bool>;

    /// Search the template library for the finger primed by
    /// [`has_fingerprint`](Self::has_fingerprint).
    ///
    /// Returns the library position of the match, or `None` if nothing
    /// matched.
    async fn search_fingerprint(&mut self) -> Result<Option<u16>>;

    /// Capture the same finger again and build a template from both captures.
    ///
    /// Returns `None` if no finger is on the sensor.
    async fn create_model(&mut self) -> Result<Option<Template>>;

    /// Store a template at `position` in the module's library
    async fn save_model(&mut self, template: &Template, position: u16) -> Result<()>;

    /// Store the template built by the last [`create_model`](Self::create_model)
    /// at `position` without sending it back to the module.
    async fn save_stored_model(&mut self, position: u16) -> Result<()>;

    /// Delete `count` templates starting at `position`
    async fn delete_model(&mut self, position: u16, count: u16) -> Result<()>;

    /// Remove every stored template
    async fn clear_all_saved(&mut self) -> Result<()>;

    /// Number of templates currently stored
    async fn template_count(&mut self) -> Result<u16>;

    /// Read basic parameters from the sensor
    async fn read_parameters(&mut self) -> Result<SensorParameters>;

    /// Set the matching security level, 1 (lowest) to 5 (highest)
    ///
    /// Levels outside that range are rejected without talking to the sensor.
    async fn set_security_level(&mut self, level: u8) -> Result<()>;
}
