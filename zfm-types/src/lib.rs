//! Type definitions for zfm

pub mod error;
pub mod parameters;
pub mod template;

pub use error::{Error, Result};
pub use parameters::{SearchMatch, SecurityLevel, SensorParameters};
pub use template::Template;
