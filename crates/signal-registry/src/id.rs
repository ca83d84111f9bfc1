//! Identifiers used by the registry and its event sources

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;
use uuid::Uuid;

/// A unique, time-ordered subscription identifier based on UUID v7.
///
/// Displayed with a `sub_` prefix so it stands out in log lines:
///
/// ```rust,ignore
/// let id = SubscriptionId::new();
/// println!("{}", id); // sub_01234567-89ab-7cde-8f01-234567890abc
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new subscription ID using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Parse a subscription ID, requiring the `sub_` prefix.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        let uuid_str = s.strip_prefix("sub_").ok_or(ParseError::MissingPrefix)?;
        Ok(Self(Uuid::parse_str(uuid_str)?))
    }

    /// Parse a subscription ID with or without the `sub_` prefix.
    pub fn parse_lenient(s: &str) -> Result<Self, ParseError> {
        let uuid_str = s.strip_prefix("sub_").unwrap_or(s);
        Ok(Self(Uuid::parse_str(uuid_str)?))
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub_{}", self.0)
    }
}

impl From<Uuid> for SubscriptionId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// Opaque token handed out by an event source when a callback is attached.
///
/// Sources allocate these; zero is never a valid handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerId(NonZeroU64);

impl HandlerId {
    /// Wrap a raw handler number. Returns `None` for zero.
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    /// Raw handler number.
    pub fn get(&self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// Identity of an event source.
///
/// Derived from the address of the source's shared allocation, so two `Arc`s
/// pointing at the same object produce the same id regardless of whether they
/// are typed as the concrete source or as `dyn EventSource`. The registry keeps
/// every source alive for as long as it holds subscriptions against it, so an
/// address cannot be recycled into a different source while it is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(usize);

impl SourceId {
    /// Identity of the object behind `source`.
    pub fn of<S: ?Sized>(source: &Arc<S>) -> Self {
        Self(Arc::as_ptr(source) as *const () as usize)
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src_{:x}", self.0)
    }
}
