// Counters for registry activity

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals kept by a registry.
#[derive(Debug, Default)]
pub(crate) struct RegistryMetrics {
    created: AtomicU64,
    disconnected: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl RegistryMetrics {
    pub(crate) fn record_created(&self) {
        self.created.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_disconnected(&self) {
        self.disconnected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot the counters; the registry fills in the live figures.
    pub(crate) fn snapshot(&self, active: usize, sources: usize) -> RegistryStats {
        RegistryStats {
            created: self.created.load(Ordering::Relaxed),
            disconnected: self.disconnected.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            active,
            sources,
        }
    }
}

/// Snapshot of registry activity at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    /// Subscriptions successfully created
    pub created: u64,
    /// Subscriptions detached from their source
    pub disconnected: u64,
    /// `create` calls skipped for missing input
    pub skipped: u64,
    /// `create` calls whose source refused the subscription
    pub failed: u64,
    /// Subscriptions currently attached
    pub active: usize,
    /// Distinct sources with at least one subscription record
    pub sources: usize,
}

impl RegistryStats {
    /// Get a human-readable status message
    pub fn status_message(&self) -> String {
        format!(
            "Active: {} subscriptions on {} sources | Created: {} | Disconnected: {} | Skipped: {} | Failed: {}",
            self.active, self.sources, self.created, self.disconnected, self.skipped, self.failed
        )
    }
}
