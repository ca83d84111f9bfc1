#![warn(missing_docs)]
//! # Signal Registry
//!
//! Tracked event subscriptions with guaranteed teardown, for shell extensions
//! that attach callbacks to host objects during `enable` and must detach all
//! of them again during `disable`.
//!
//! ## Overview
//!
//! - **[`EventSource`]** - anything that can attach a callback to a named
//!   event and detach it again by handle
//! - **[`SubscriptionRegistry`]** - attaches callbacks, remembers them grouped
//!   by source, and detaches them in bulk or per source
//! - **[`SignalEmitter`]** - an in-process event source with snapshot-on-emit
//!   dispatch
//!
//! Every handle is released at most once: teardown clears the handle on the
//! [`Subscription`] before calling into the source, so repeated or re-entrant
//! teardown never unsubscribes twice.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use signal_registry::prelude::*;
//!
//! let registry = SubscriptionRegistry::new();
//! let indicator = Arc::new(SignalEmitter::with_signals("indicator", ["clicked"]));
//! let settings = Arc::new(SignalEmitter::new("settings"));
//!
//! // enable()
//! registry.connect(&indicator, "clicked", |_| toggle_menu())?;
//! registry.connect(&settings, "changed::show-password", |v| redraw(v))?;
//!
//! // settings object replaced
//! registry.disconnect_by_source(&settings);
//!
//! // disable()
//! registry.disconnect_all();
//! ```
//!
//! ## Optional inputs
//!
//! [`SubscriptionRegistry::create`] accepts an optional source and callback
//! so call sites can pass collaborators that may not exist. Missing input is
//! skipped silently by default; enable
//! [`RegistryConfig::strict_validation`] to get an error instead.

pub mod config;
pub mod emitter;
pub mod error;
pub mod id;
pub mod logging;
mod metrics;
pub mod registry;
pub mod source;
pub mod subscription;

#[cfg(test)]
mod tests;

pub use config::RegistryConfig;
pub use emitter::SignalEmitter;
pub use error::{
    ConfigValidationError, InvalidInput, ParseError, RegistryError, RegistryResult, SourceError,
};
pub use id::{HandlerId, SourceId, SubscriptionId};
pub use logging::{NoopLogger, RegistryLogger, TracingLogger};
pub use metrics::RegistryStats;
pub use registry::SubscriptionRegistry;
pub use source::{Callback, EventSource, Payload, callback};
pub use subscription::Subscription;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Callback, EventSource, HandlerId, Payload, RegistryConfig, RegistryError,
        RegistryResult, SignalEmitter, SourceError, Subscription, SubscriptionRegistry, callback,
    };
    pub use std::sync::Arc;
}
