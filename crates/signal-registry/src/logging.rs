//! Injected logging for registry activity.
//!
//! The registry reports what it does through a [`RegistryLogger`] instead of
//! calling a global logger directly, so hosts can route or silence it.
//! [`TracingLogger`] is the default and emits structured `tracing` events.

use crate::error::{InvalidInput, SourceError};
use crate::id::{HandlerId, SourceId};
use crate::subscription::Subscription;

// =============================================================================
// Logger Trait
// =============================================================================

/// Receives notifications about subscription lifecycle events.
///
/// The per-subscription hooks must be provided; the rest default to
/// `tracing` events.
pub trait RegistryLogger: Send + Sync {
    /// A subscription was attached.
    fn subscribed(&self, subscription: &Subscription);

    /// A subscription was detached and its handler released.
    fn unsubscribed(&self, subscription: &Subscription, handler: HandlerId);

    /// A `create` call was skipped for missing input.
    ///
    /// Default implementation logs a debug message.
    fn skipped(&self, reason: InvalidInput, event_name: &str) {
        tracing::debug!(reason = %reason, event = %event_name, "Subscription skipped");
    }

    /// A source refused a subscription.
    ///
    /// Default implementation logs a warning with structured fields.
    fn subscribe_failed(&self, source_id: SourceId, event_name: &str, error: &SourceError) {
        tracing::warn!(
            source_id = %source_id,
            event = %event_name,
            error = %error,
            "Subscribe failed"
        );
    }

    /// A bulk teardown detached `detached` of `total` tracked subscriptions.
    ///
    /// Default implementation logs a debug message.
    fn disconnected_all(&self, detached: usize, total: usize) {
        tracing::debug!(detached, total, "Disconnected all subscriptions");
    }

    /// A group teardown detached `detached` subscriptions of one source.
    ///
    /// Default implementation logs a debug message.
    fn disconnected_source(&self, source_id: SourceId, detached: usize) {
        tracing::debug!(source_id = %source_id, detached, "Disconnected source subscriptions");
    }
}

// =============================================================================
// TracingLogger
// =============================================================================

/// Default logger backed by the `tracing` crate.
///
/// Per-subscription events go out at `trace`, or at `debug` when verbose.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger {
    verbose: bool,
}

impl TracingLogger {
    /// Create a tracing logger.
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl RegistryLogger for TracingLogger {
    fn subscribed(&self, subscription: &Subscription) {
        let subscription_id = subscription.id();
        let source_id = subscription.source_id();
        let event = subscription.event_name();
        if self.verbose {
            tracing::debug!(
                subscription_id = %subscription_id,
                source_id = %source_id,
                event = %event,
                "Subscription connected"
            );
        } else {
            tracing::trace!(
                subscription_id = %subscription_id,
                source_id = %source_id,
                event = %event,
                "Subscription connected"
            );
        }
    }

    fn unsubscribed(&self, subscription: &Subscription, handler: HandlerId) {
        let subscription_id = subscription.id();
        let source_id = subscription.source_id();
        let event = subscription.event_name();
        if self.verbose {
            tracing::debug!(
                subscription_id = %subscription_id,
                source_id = %source_id,
                event = %event,
                handler_id = %handler,
                "Subscription disconnected"
            );
        } else {
            tracing::trace!(
                subscription_id = %subscription_id,
                source_id = %source_id,
                event = %event,
                handler_id = %handler,
                "Subscription disconnected"
            );
        }
    }
}

// =============================================================================
// NoopLogger
// =============================================================================

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl RegistryLogger for NoopLogger {
    fn subscribed(&self, _subscription: &Subscription) {}

    fn unsubscribed(&self, _subscription: &Subscription, _handler: HandlerId) {}

    fn skipped(&self, _reason: InvalidInput, _event_name: &str) {}

    fn subscribe_failed(&self, _source_id: SourceId, _event_name: &str, _error: &SourceError) {}

    fn disconnected_all(&self, _detached: usize, _total: usize) {}

    fn disconnected_source(&self, _source_id: SourceId, _detached: usize) {}
}

// =============================================================================
// MockLogger
// =============================================================================

#[cfg(test)]
use std::sync::{Arc, Mutex};

/// A captured logger notification.
#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogRecord {
    /// `subscribed` was called for this event
    Subscribed(String),
    /// `unsubscribed` was called for this event and handler
    Unsubscribed(String, HandlerId),
    /// `skipped` was called
    Skipped(InvalidInput),
    /// `subscribe_failed` was called
    Failed(String),
    /// `disconnected_all` was called with this count
    DisconnectedAll(usize),
    /// `disconnected_source` was called with this count
    DisconnectedSource(usize),
}

/// A mock logger that captures notifications for testing.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MockLogger {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

#[cfg(test)]
impl MockLogger {
    /// Creates a new mock logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured records.
    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    fn push(&self, record: LogRecord) {
        self.records.lock().unwrap().push(record);
    }
}

#[cfg(test)]
impl RegistryLogger for MockLogger {
    fn subscribed(&self, subscription: &Subscription) {
        self.push(LogRecord::Subscribed(subscription.event_name().to_owned()));
    }

    fn unsubscribed(&self, subscription: &Subscription, handler: HandlerId) {
        self.push(LogRecord::Unsubscribed(
            subscription.event_name().to_owned(),
            handler,
        ));
    }

    fn skipped(&self, reason: InvalidInput, _event_name: &str) {
        self.push(LogRecord::Skipped(reason));
    }

    fn subscribe_failed(&self, _source_id: SourceId, event_name: &str, _error: &SourceError) {
        self.push(LogRecord::Failed(event_name.to_owned()));
    }

    fn disconnected_all(&self, detached: usize, _total: usize) {
        self.push(LogRecord::DisconnectedAll(detached));
    }

    fn disconnected_source(&self, _source_id: SourceId, detached: usize) {
        self.push(LogRecord::DisconnectedSource(detached));
    }
}
