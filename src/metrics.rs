//! Backend-agnostic metrics collection via a pluggable sink.
//!
//! A [`PolicyManager`](crate::PolicyManager) reports every lookup and every
//! successful reload to its sink. The default sink drops everything, so
//! managers that never call
//! [`with_metrics_sink`](crate::PolicyManager::with_metrics_sink) pay nothing.
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use policy_tree::PolicyManager;
//! use policy_tree::metrics::{LookupStats, MetricsSink, ReloadStats};
//!
//! #[derive(Default)]
//! struct Counter {
//!     lookups: AtomicU64,
//! }
//!
//! impl MetricsSink for Counter {
//!     fn on_lookup(&self, _stats: &LookupStats) {
//!         self.lookups.fetch_add(1, Ordering::Relaxed);
//!     }
//!
//!     fn on_reload(&self, _stats: &ReloadStats) {}
//! }
//!
//! let counter = Arc::new(Counter::default());
//! let manager = PolicyManager::new().with_metrics_sink(counter.clone());
//! manager.get_policy("/a/b").unwrap();
//! assert_eq!(counter.lookups.load(Ordering::Relaxed), 1);
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use serde::Serialize;

/// Snapshot of a single lookup, passed to [`MetricsSink::on_lookup`].
#[derive(Debug, Clone, Serialize)]
pub struct LookupStats {
    /// Time spent resolving the path, lock wait included
    pub duration: Duration,
    /// The looked-up path, normalized to `/a/b` form
    pub path: String,
    /// Whether a non-empty policy name was found
    pub matched: bool,
}

/// Passed to [`MetricsSink::on_reload`] after a bulk load swapped the tree.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStats {
    /// Time when the new tree became visible
    pub reload_time: SystemTime,
    /// Number of policies inserted into the new tree
    pub loaded: usize,
    /// Number of entries skipped for an empty name or path
    pub skipped: usize,
}

/// Consumer of lookup and reload metrics.
///
/// Implementations are called synchronously on the lookup path and must be
/// cheap and thread-safe.
pub trait MetricsSink: Send + Sync {
    /// Whether lookups should be reported at all. When `false` the manager
    /// skips building [`LookupStats`] entirely.
    fn enabled(&self) -> bool {
        true
    }

    fn on_lookup(&self, stats: &LookupStats);

    fn on_reload(&self, stats: &ReloadStats);
}

/// No-op sink; metrics are silently dropped.
pub(crate) struct NoOpSink;

impl MetricsSink for NoOpSink {
    fn enabled(&self) -> bool {
        false
    }

    fn on_lookup(&self, _stats: &LookupStats) {}
    fn on_reload(&self, _stats: &ReloadStats) {}
}

pub(crate) fn noop_sink() -> Arc<dyn MetricsSink> {
    Arc::new(NoOpSink)
}
