//! A single tracked attachment of a callback to an event source.

use crate::id::{HandlerId, SourceId, SubscriptionId};
use crate::source::{Callback, EventSource};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// One registration of a callback against an event on a source.
///
/// A subscription is *active* while it holds the handler returned by the
/// source and *inactive* once that handler has been given back. The handler
/// is taken out before the source is asked to unsubscribe, so the transition
/// happens once no matter how many teardown paths race for it.
pub struct Subscription {
    id: SubscriptionId,
    source: Arc<dyn EventSource>,
    source_id: SourceId,
    event_name: String,
    callback: Callback,
    handler: Mutex<Option<HandlerId>>,
    created_at: Instant,
}

impl Subscription {
    pub(crate) fn new(
        source: Arc<dyn EventSource>,
        event_name: &str,
        callback: Callback,
        handler: HandlerId,
    ) -> Self {
        let source_id = SourceId::of(&source);
        Self {
            id: SubscriptionId::new(),
            source,
            source_id,
            event_name: event_name.to_owned(),
            callback,
            handler: Mutex::new(Some(handler)),
            created_at: Instant::now(),
        }
    }

    /// Unique subscription ID
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The source this subscription is attached to.
    pub fn source(&self) -> &Arc<dyn EventSource> {
        &self.source
    }

    /// Identity of the source, as used for grouping.
    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Name of the subscribed event.
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// The attached callback.
    pub fn callback(&self) -> &Callback {
        &self.callback
    }

    /// Handler returned by the source, or `None` once disconnected.
    pub fn handler(&self) -> Option<HandlerId> {
        *self.handler.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if the callback is still attached.
    pub fn is_active(&self) -> bool {
        self.handler().is_some()
    }

    /// Time since the subscription was created.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Detach from the source if still attached.
    ///
    /// Returns the handler that was released, or `None` if the subscription
    /// was already inactive.
    pub(crate) fn deactivate(&self) -> Option<HandlerId> {
        let handler = self
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;
        self.source.unsubscribe(handler);
        Some(handler)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("source_id", &self.source_id)
            .field("event_name", &self.event_name)
            .field("handler", &self.handler())
            .finish_non_exhaustive()
    }
}
