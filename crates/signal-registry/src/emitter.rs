//! In-process signal emitter implementing [`EventSource`].
//!
//! Handlers are stored as shared [`Callback`]s and snapshotted on emit:
//!
//! - a handler removed *during* an emission still runs in that round;
//! - a handler added *during* an emission does not run until the next one.
//!
//! The handler table is never locked while callbacks run, so a callback may
//! connect or disconnect (directly or through a registry) without deadlocking.

use crate::error::SourceError;
use crate::id::HandlerId;
use crate::source::{Callback, EventSource, Payload};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

struct HandlerEntry {
    id: HandlerId,
    signal: String,
    callback: Callback,
}

/// A named object that emits signals to connected handlers.
pub struct SignalEmitter {
    name: String,
    signals: Option<HashSet<String>>,
    handlers: Mutex<Vec<HandlerEntry>>,
    next_id: AtomicU64,
    disposed: AtomicBool,
    subscribe_calls: AtomicUsize,
    unsubscribe_calls: AtomicUsize,
}

impl SignalEmitter {
    /// Create an emitter that accepts handlers for any signal name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signals: None,
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            disposed: AtomicBool::new(false),
            subscribe_calls: AtomicUsize::new(0),
            unsubscribe_calls: AtomicUsize::new(0),
        }
    }

    /// Create an emitter that only accepts the declared signal names.
    pub fn with_signals<I, T>(name: impl Into<String>, signals: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            signals: Some(signals.into_iter().map(Into::into).collect()),
            ..Self::new(name)
        }
    }

    /// Name of the emitting object.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke every handler connected to `signal` with `payload`.
    ///
    /// Returns the number of handlers invoked.
    pub fn emit(&self, signal: &str, payload: &Payload) -> usize {
        let snapshot: Vec<Callback> = self
            .lock()
            .iter()
            .filter(|entry| entry.signal == signal)
            .map(|entry| entry.callback.clone())
            .collect();

        for callback in &snapshot {
            callback(payload);
        }
        snapshot.len()
    }

    /// Drop every handler and refuse new ones.
    pub fn dispose(&self) {
        self.disposed.store(true, Ordering::Release);
        let dropped = std::mem::take(&mut *self.lock());
        if !dropped.is_empty() {
            tracing::debug!(emitter = %self.name, handlers = dropped.len(), "Emitter disposed with live handlers");
        }
    }

    /// Check if [`dispose`](Self::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Number of connected handlers.
    pub fn handler_count(&self) -> usize {
        self.lock().len()
    }

    /// Number of handlers connected to `signal`.
    pub fn handler_count_for(&self, signal: &str) -> usize {
        self.lock().iter().filter(|e| e.signal == signal).count()
    }

    /// Check if `handler` is still connected.
    pub fn is_connected(&self, handler: HandlerId) -> bool {
        self.lock().iter().any(|e| e.id == handler)
    }

    /// Number of successful `subscribe` calls so far.
    pub fn subscribe_calls(&self) -> usize {
        self.subscribe_calls.load(Ordering::Relaxed)
    }

    /// Number of `unsubscribe` calls so far, valid or not.
    pub fn unsubscribe_calls(&self) -> usize {
        self.unsubscribe_calls.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<HandlerEntry>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn allocate_id(&self) -> Result<HandlerId, SourceError> {
        let raw = self.next_id.fetch_add(1, Ordering::Relaxed);
        HandlerId::new(raw).ok_or_else(|| SourceError::other("handler ids exhausted"))
    }
}

impl EventSource for SignalEmitter {
    fn subscribe(&self, event_name: &str, callback: Callback) -> Result<HandlerId, SourceError> {
        if self.is_disposed() {
            return Err(SourceError::Disposed(self.name.clone()));
        }
        if let Some(signals) = &self.signals {
            if !signals.contains(event_name) {
                return Err(SourceError::UnknownSignal {
                    source_name: self.name.clone(),
                    signal: event_name.to_owned(),
                });
            }
        }

        let id = self.allocate_id()?;
        self.lock().push(HandlerEntry {
            id,
            signal: event_name.to_owned(),
            callback,
        });
        self.subscribe_calls.fetch_add(1, Ordering::Relaxed);
        Ok(id)
    }

    fn unsubscribe(&self, handler: HandlerId) {
        self.unsubscribe_calls.fetch_add(1, Ordering::Relaxed);
        // The entry is dropped after the lock is released: its callback may
        // own the last reference to something that unsubscribes on drop.
        let removed = {
            let mut handlers = self.lock();
            handlers
                .iter()
                .position(|e| e.id == handler)
                .map(|index| handlers.remove(index))
        };
        if removed.is_none() && !self.is_disposed() {
            tracing::warn!(
                emitter = %self.name,
                handler_id = %handler,
                "No handler with this id is connected"
            );
        }
    }
}

impl std::fmt::Debug for SignalEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalEmitter")
            .field("name", &self.name)
            .field("handlers", &self.handler_count())
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, Callback) {
        let hits = Arc::new(AtomicUsize::new(0));
        let cb_hits = hits.clone();
        let cb: Callback = Arc::new(move |_: &Payload| {
            cb_hits.fetch_add(1, Ordering::SeqCst);
        });
        (hits, cb)
    }

    #[test]
    fn test_emit_reaches_matching_handlers_only() {
        let emitter = SignalEmitter::new("network-client");
        let (hits, cb) = counter();
        emitter.subscribe("changed", cb).unwrap();

        assert_eq!(emitter.emit("changed", &json!({ "ssid": "home" })), 1);
        assert_eq!(emitter.emit("removed", &json!(null)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe_detaches() {
        let emitter = SignalEmitter::new("network-client");
        let (hits, cb) = counter();
        let id = emitter.subscribe("changed", cb).unwrap();

        emitter.unsubscribe(id);
        assert!(!emitter.is_connected(id));
        assert_eq!(emitter.emit("changed", &json!(null)), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(emitter.unsubscribe_calls(), 1);
    }

    #[test]
    fn test_unknown_handler_is_ignored() {
        let emitter = SignalEmitter::new("network-client");
        let (_, cb) = counter();
        let id = emitter.subscribe("changed", cb).unwrap();
        emitter.unsubscribe(id);
        emitter.unsubscribe(id);
        assert_eq!(emitter.unsubscribe_calls(), 2);
        assert_eq!(emitter.handler_count(), 0);
    }

    #[test]
    fn test_declared_signals_are_enforced() {
        let emitter = SignalEmitter::with_signals("panel-button", ["clicked"]);
        let (_, cb) = counter();
        assert!(emitter.subscribe("clicked", cb.clone()).is_ok());

        let err = emitter.subscribe("hovered", cb).unwrap_err();
        assert_eq!(
            err,
            SourceError::UnknownSignal {
                source_name: "panel-button".into(),
                signal: "hovered".into(),
            }
        );
        assert_eq!(emitter.subscribe_calls(), 1);
    }

    #[test]
    fn test_disposed_emitter_refuses_handlers() {
        let emitter = SignalEmitter::new("settings");
        let (_, cb) = counter();
        let id = emitter.subscribe("changed", cb.clone()).unwrap();

        emitter.dispose();
        assert!(emitter.is_disposed());
        assert_eq!(emitter.handler_count(), 0);
        assert_eq!(
            emitter.subscribe("changed", cb),
            Err(SourceError::Disposed("settings".into()))
        );
        // Late unsubscribe after dispose is harmless
        emitter.unsubscribe(id);
    }

    #[test]
    fn test_handler_added_during_emit_waits_for_next_round() {
        let emitter = Arc::new(SignalEmitter::new("menu"));
        let (late_hits, late_cb) = counter();

        let inner = emitter.clone();
        let added = Arc::new(AtomicBool::new(false));
        let added_flag = added.clone();
        emitter
            .subscribe(
                "open",
                Arc::new(move |_: &Payload| {
                    if !added_flag.swap(true, Ordering::SeqCst) {
                        inner.subscribe("open", late_cb.clone()).unwrap();
                    }
                }),
            )
            .unwrap();

        assert_eq!(emitter.emit("open", &json!(null)), 1);
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);
        assert_eq!(emitter.emit("open", &json!(null)), 2);
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }
}
