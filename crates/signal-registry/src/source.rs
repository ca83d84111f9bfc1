//! The event-source capability the registry subscribes through

use crate::error::SourceError;
use crate::id::HandlerId;
use std::sync::Arc;

/// Payload delivered to callbacks when an event fires.
///
/// The registry never looks inside it; emitters decide its shape.
pub type Payload = serde_json::Value;

/// Shared callback invoked on every emission of the subscribed event.
pub type Callback = Arc<dyn Fn(&Payload) + Send + Sync>;

/// Wrap a closure into a [`Callback`].
pub fn callback<F>(f: F) -> Callback
where
    F: Fn(&Payload) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// An object that emits named events and lets callers attach to them.
///
/// Implemented by host emitter objects (panel buttons, network clients,
/// settings stores) and by the in-crate [`SignalEmitter`](crate::SignalEmitter).
pub trait EventSource: Send + Sync {
    /// Attach `callback` to `event_name` and return the handle needed to
    /// detach it again.
    fn subscribe(&self, event_name: &str, callback: Callback) -> Result<HandlerId, SourceError>;

    /// Detach a previously attached callback.
    ///
    /// Callers must pass each handle at most once.
    fn unsubscribe(&self, handler: HandlerId);
}
