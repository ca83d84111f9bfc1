//! Configuration for the subscription registry.
//!
//! # Example
//! ```rust,ignore
//! use signal_registry::RegistryConfig;
//!
//! let config = RegistryConfig::new()
//!     .with_strict_validation(true)
//!     .with_debug_logging(true);
//!
//! // Or from the extension's settings document
//! let config = RegistryConfig::from_json(r#"{ "disconnect_on_drop": false }"#)?;
//! ```

use crate::error::ConfigValidationError;
use serde::{Deserialize, Serialize};

/// Default capacity hint for the per-source group map.
pub const DEFAULT_EXPECTED_SOURCES: usize = 8;

/// Registry configuration.
///
/// All fields have defaults matching the permissive behaviour hosts expect,
/// so `RegistryConfig::default()` is usually all that is needed.
///
/// # Fields
///
/// * `strict_validation` - Reject `create` calls that lack a source, event
///   name or callback with an error instead of skipping them. Default: false.
///
/// * `disconnect_on_drop` - Disconnect every subscription when the registry
///   is dropped. Default: true.
///
/// * `debug_logging` - Log per-subscription activity at `debug` instead of
///   `trace`. Default: false.
///
/// * `expected_sources` - Capacity hint for the number of distinct sources.
///   Default: 8.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Turn invalid `create` input into an error.
    pub strict_validation: bool,
    /// Disconnect everything when the registry is dropped.
    pub disconnect_on_drop: bool,
    /// Verbose per-subscription logging.
    pub debug_logging: bool,
    /// Capacity hint for the source group map.
    pub expected_sources: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            strict_validation: false,
            disconnect_on_drop: true,
            debug_logging: false,
            expected_sources: DEFAULT_EXPECTED_SOURCES,
        }
    }
}

impl RegistryConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// Missing keys take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigValidationError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigValidationError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Set strict input validation.
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Set whether dropping the registry disconnects its subscriptions.
    pub fn with_disconnect_on_drop(mut self, enabled: bool) -> Self {
        self.disconnect_on_drop = enabled;
        self
    }

    /// Set verbose logging.
    pub fn with_debug_logging(mut self, enabled: bool) -> Self {
        self.debug_logging = enabled;
        self
    }

    /// Set the source capacity hint.
    pub fn with_expected_sources(mut self, count: usize) -> Self {
        self.expected_sources = count;
        self
    }

    /// Check that every field holds a usable value.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.expected_sources == 0 {
            return Err(ConfigValidationError::InvalidExpectedSources);
        }
        Ok(())
    }
}
