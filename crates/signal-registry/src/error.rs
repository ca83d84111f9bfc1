//! Error types for the subscription registry
//!
//! Three failure classes exist around a subscription:
//!
//! - [`InvalidInput`]: `create` was called without a source, event name or
//!   callback. Silently skipped unless the registry runs in strict mode.
//! - [`SourceError`]: the event source refused the subscription. Passed back
//!   to the caller untouched, wrapped in [`RegistryError::Subscribe`].
//! - Unsubscribe failures have no type: a handle is taken out of its
//!   subscription before it is handed to the source, so it is never passed twice.

use thiserror::Error;

/// Error raised by an [`EventSource`](crate::EventSource) when it cannot
/// attach a callback.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceError {
    /// The source does not declare a signal with this name
    #[error("unknown signal '{signal}' on {source_name}")]
    UnknownSignal {
        /// Name of the emitting object
        source_name: String,
        /// Requested signal name
        signal: String,
    },

    /// The source has been disposed and accepts no more handlers
    #[error("{0} has been disposed")]
    Disposed(String),

    /// Host-specific failure
    #[error("subscribe failed: {0}")]
    Other(String),
}

impl SourceError {
    /// Create a host-specific failure.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

/// Reason a `create` call was rejected before reaching the source.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidInput {
    /// No source object was supplied
    #[error("missing event source")]
    MissingSource,

    /// The event name was empty
    #[error("empty event name")]
    EmptyEventName,

    /// No callback was supplied
    #[error("missing callback")]
    MissingCallback,
}

/// Error returned by [`SubscriptionRegistry`](crate::SubscriptionRegistry) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Input rejected in strict mode
    #[error("invalid subscription input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The source's subscribe primitive failed
    #[error(transparent)]
    Subscribe(#[from] SourceError),
}

impl RegistryError {
    /// Returns true if the error came from input validation.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Error parsing a subscription ID
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Subscription ID must start with 'sub_' prefix
    #[error("Subscription ID must start with 'sub_' prefix")]
    MissingPrefix,

    /// Invalid UUID format
    #[error("Invalid UUID format: {0}")]
    InvalidUuid(#[from] uuid::Error),
}

/// Error type for configuration validation failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigValidationError {
    /// expected_sources must be greater than 0
    #[error("expected_sources must be greater than 0")]
    InvalidExpectedSources,

    /// The configuration document could not be parsed
    #[error("malformed registry config: {0}")]
    Malformed(String),
}
