//! Subscription registry for tracking callbacks attached to event sources.
//!
//! The [`SubscriptionRegistry`] records every callback it attaches, grouped by
//! the source it was attached to, and guarantees each one is detached exactly
//! once: either in bulk, per source, or when the registry is dropped.
//!
//! Records are never removed. Teardown only releases handlers, so a callback
//! that tears the registry down from inside its own dispatch sees the same
//! collections it started with.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::RegistryConfig;
use crate::error::{ConfigValidationError, InvalidInput, RegistryResult};
use crate::id::{SourceId, SubscriptionId};
use crate::logging::{RegistryLogger, TracingLogger};
use crate::metrics::{RegistryMetrics, RegistryStats};
use crate::source::{Callback, EventSource, Payload};
use crate::subscription::Subscription;

/// Subscriptions in insertion order, plus per-source indices into them.
#[derive(Debug, Default)]
struct Groups {
    all: Vec<Arc<Subscription>>,
    by_source: HashMap<SourceId, Vec<usize>>,
}

impl Groups {
    fn with_capacity(sources: usize) -> Self {
        Self {
            all: Vec::new(),
            by_source: HashMap::with_capacity(sources),
        }
    }

    fn group(&self, source_id: SourceId) -> Vec<Arc<Subscription>> {
        self.by_source
            .get(&source_id)
            .map(|indices| indices.iter().map(|&i| Arc::clone(&self.all[i])).collect())
            .unwrap_or_default()
    }
}

/// Tracks event subscriptions and tears them down on request.
///
/// All methods take `&self`, so callbacks may hold an `Arc` to the registry
/// and disconnect from inside an emission. The internal lock is never held
/// while calling into a source.
///
/// # Example
/// ```rust,ignore
/// let registry = SubscriptionRegistry::new();
/// let button = Arc::new(SignalEmitter::new("panel-button"));
///
/// registry.connect(&button, "clicked", |_| show_qr_code())?;
/// registry.connect(&network, "notify::active-connection", |_| refresh())?;
///
/// // Network client replaced: drop only its handlers
/// registry.disconnect_by_source(&network);
///
/// // Extension disabled
/// registry.disconnect_all();
/// ```
pub struct SubscriptionRegistry {
    groups: Mutex<Groups>,
    config: RegistryConfig,
    logger: Arc<dyn RegistryLogger>,
    metrics: RegistryMetrics,
}

impl SubscriptionRegistry {
    /// Create a registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with the given configuration.
    ///
    /// The configuration is taken as is; `expected_sources` only sizes the
    /// initial group map. Use [`try_with_config`](Self::try_with_config) to
    /// reject invalid values.
    pub fn with_config(config: RegistryConfig) -> Self {
        let logger = Arc::new(TracingLogger::new(config.debug_logging));
        Self {
            groups: Mutex::new(Groups::with_capacity(config.expected_sources)),
            config,
            logger,
            metrics: RegistryMetrics::default(),
        }
    }

    /// Create a registry after validating the configuration.
    pub fn try_with_config(config: RegistryConfig) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    /// Replace the logger.
    pub fn with_logger(mut self, logger: Arc<dyn RegistryLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Get the active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Attach `callback` to `event_name` on `source` and track it.
    ///
    /// With a missing source, an empty event name or a missing callback
    /// nothing is attached and `Ok(None)` is returned, unless strict
    /// validation is enabled, in which case the same condition is an
    /// [`InvalidInput`] error. A failure from the source's subscribe call is
    /// returned unchanged and nothing is recorded.
    pub fn create(
        &self,
        source: Option<Arc<dyn EventSource>>,
        event_name: &str,
        callback: Option<Callback>,
    ) -> RegistryResult<Option<Arc<Subscription>>> {
        let (source, callback) = match check_input(source, event_name, callback) {
            Ok(parts) => parts,
            Err(reason) => {
                self.metrics.record_skipped();
                self.logger.skipped(reason, event_name);
                if self.config.strict_validation {
                    return Err(reason.into());
                }
                return Ok(None);
            }
        };

        let handler = match source.subscribe(event_name, Arc::clone(&callback)) {
            Ok(handler) => handler,
            Err(err) => {
                self.metrics.record_failed();
                self.logger
                    .subscribe_failed(SourceId::of(&source), event_name, &err);
                return Err(err.into());
            }
        };

        let subscription = Arc::new(Subscription::new(source, event_name, callback, handler));
        {
            let mut groups = self.lock();
            let index = groups.all.len();
            groups.all.push(Arc::clone(&subscription));
            groups
                .by_source
                .entry(subscription.source_id())
                .or_default()
                .push(index);
        }

        self.metrics.record_created();
        self.logger.subscribed(&subscription);
        Ok(Some(subscription))
    }

    /// Attach a closure to `event_name` on a concrete source.
    ///
    /// Convenience over [`create`](Self::create) for call sites that always
    /// have a source and a callback at hand.
    pub fn connect<S, F>(
        &self,
        source: &Arc<S>,
        event_name: &str,
        f: F,
    ) -> RegistryResult<Option<Arc<Subscription>>>
    where
        S: EventSource + 'static,
        F: Fn(&Payload) + Send + Sync + 'static,
    {
        let source: Arc<dyn EventSource> = Arc::clone(source) as Arc<dyn EventSource>;
        self.create(Some(source), event_name, Some(Arc::new(f)))
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Detach every tracked subscription.
    ///
    /// Returns how many subscriptions this call detached; a second call in a
    /// row returns 0 and makes no unsubscribe calls.
    pub fn disconnect_all(&self) -> usize {
        let snapshot = self.lock().all.clone();
        let detached = self.release_each(&snapshot);
        if detached > 0 {
            self.logger.disconnected_all(detached, snapshot.len());
        }
        detached
    }

    /// Detach every subscription created against `source`.
    ///
    /// Subscriptions on other sources are untouched. A source the registry
    /// has never seen is a no-op.
    pub fn disconnect_by_source<S: ?Sized>(&self, source: &Arc<S>) -> usize {
        let source_id = SourceId::of(source);
        let group = self.lock().group(source_id);
        let detached = self.release_each(&group);
        if detached > 0 {
            self.logger.disconnected_source(source_id, detached);
        }
        detached
    }

    /// Detach a single subscription created by this registry.
    ///
    /// Returns true if this call released its handler. A subscription owned
    /// by another registry is left alone and yields false.
    pub fn disconnect(&self, subscription: &Subscription) -> bool {
        self.contains(subscription) && self.release(subscription)
    }

    fn release(&self, subscription: &Subscription) -> bool {
        match subscription.deactivate() {
            Some(handler) => {
                self.metrics.record_disconnected();
                self.logger.unsubscribed(subscription, handler);
                true
            }
            None => false,
        }
    }

    fn release_each(&self, subscriptions: &[Arc<Subscription>]) -> usize {
        subscriptions
            .iter()
            .filter(|subscription| self.release(subscription))
            .count()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of tracked subscriptions, active or not.
    pub fn len(&self) -> usize {
        self.lock().all.len()
    }

    /// Check if no subscription was ever created.
    pub fn is_empty(&self) -> bool {
        self.lock().all.is_empty()
    }

    /// Number of subscriptions still attached.
    pub fn active_count(&self) -> usize {
        self.lock().all.iter().filter(|s| s.is_active()).count()
    }

    /// Number of distinct sources with tracked subscriptions.
    pub fn source_count(&self) -> usize {
        self.lock().by_source.len()
    }

    /// Check if `subscription` was created by this registry.
    pub fn contains(&self, subscription: &Subscription) -> bool {
        let groups = self.lock();
        groups
            .by_source
            .get(&subscription.source_id())
            .is_some_and(|indices| {
                indices
                    .iter()
                    .any(|&i| std::ptr::eq(Arc::as_ptr(&groups.all[i]), subscription))
            })
    }

    /// Check if any subscription was created against `source`.
    pub fn contains_source<S: ?Sized>(&self, source: &Arc<S>) -> bool {
        self.lock().by_source.contains_key(&SourceId::of(source))
    }

    /// All tracked subscriptions in creation order.
    pub fn subscriptions(&self) -> Vec<Arc<Subscription>> {
        self.lock().all.clone()
    }

    /// Subscriptions created against `source`, in creation order.
    pub fn subscriptions_for<S: ?Sized>(&self, source: &Arc<S>) -> Vec<Arc<Subscription>> {
        self.lock().group(SourceId::of(source))
    }

    /// Look up a subscription by ID.
    pub fn find(&self, id: SubscriptionId) -> Option<Arc<Subscription>> {
        self.lock().all.iter().find(|s| s.id() == id).cloned()
    }

    /// Snapshot of registry activity.
    pub fn stats(&self) -> RegistryStats {
        let (active, sources) = {
            let groups = self.lock();
            let active = groups.all.iter().filter(|s| s.is_active()).count();
            (active, groups.by_source.len())
        };
        self.metrics.snapshot(active, sources)
    }

    fn lock(&self) -> MutexGuard<'_, Groups> {
        self.groups.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SubscriptionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SubscriptionRegistry {
    fn drop(&mut self) {
        if self.config.disconnect_on_drop {
            self.disconnect_all();
        }
    }
}

impl std::fmt::Debug for SubscriptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let groups = self.lock();
        f.debug_struct("SubscriptionRegistry")
            .field("subscriptions", &groups.all.len())
            .field("sources", &groups.by_source.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn check_input(
    source: Option<Arc<dyn EventSource>>,
    event_name: &str,
    callback: Option<Callback>,
) -> Result<(Arc<dyn EventSource>, Callback), InvalidInput> {
    let source = source.ok_or(InvalidInput::MissingSource)?;
    if event_name.is_empty() {
        return Err(InvalidInput::EmptyEventName);
    }
    let callback = callback.ok_or(InvalidInput::MissingCallback)?;
    Ok((source, callback))
}
