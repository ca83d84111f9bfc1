//! Shared fixtures for registry tests

use crate::{Callback, EventSource, HandlerId, Payload, SourceError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Event source that records every call made to it.
#[derive(Debug, Default)]
pub struct RecordingSource {
    next_id: AtomicU64,
    subscribed: Mutex<Vec<(String, HandlerId)>>,
    unsubscribed: Mutex<Vec<HandlerId>>,
    failure: Mutex<Option<SourceError>>,
}

impl RecordingSource {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following subscribe call fail with `error`.
    pub fn fail_with(&self, error: SourceError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    /// `(event name, handler)` for every successful subscribe call.
    pub fn subscribed(&self) -> Vec<(String, HandlerId)> {
        self.subscribed.lock().unwrap().clone()
    }

    /// Handlers passed to unsubscribe, in call order.
    pub fn unsubscribed(&self) -> Vec<HandlerId> {
        self.unsubscribed.lock().unwrap().clone()
    }

    pub fn subscribe_count(&self) -> usize {
        self.subscribed.lock().unwrap().len()
    }

    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribed.lock().unwrap().len()
    }
}

impl EventSource for RecordingSource {
    fn subscribe(&self, event_name: &str, _callback: Callback) -> Result<HandlerId, SourceError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        let raw = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let handler = HandlerId::new(raw).unwrap();
        self.subscribed
            .lock()
            .unwrap()
            .push((event_name.to_owned(), handler));
        Ok(handler)
    }

    fn unsubscribe(&self, handler: HandlerId) {
        let mut unsubscribed = self.unsubscribed.lock().unwrap();
        assert!(
            !unsubscribed.contains(&handler),
            "{handler} unsubscribed twice"
        );
        unsubscribed.push(handler);
    }
}

/// A callback that does nothing.
pub fn noop() -> Callback {
    Arc::new(|_: &Payload| {})
}

/// Erase a concrete source for `create`.
pub fn erased<S: EventSource + 'static>(source: &Arc<S>) -> Option<Arc<dyn EventSource>> {
    Some(source.clone() as Arc<dyn EventSource>)
}
