//! Construction methods for DependencyGraph.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use super::graph::{DependencyGraph, GraphInner};
use crate::GraphSnapshot;

/// Milliseconds since the UNIX epoch, used as the default initial version.
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

impl DependencyGraph {
    /// Create an empty graph whose initial version is the current time.
    pub fn new() -> Self {
        Self::with_initial_version(now_millis())
    }

    /// Create an empty graph with an explicit initial version.
    pub fn with_initial_version(initial_version: u64) -> Self {
        Self {
            inner: Arc::new(GraphInner::new(initial_version)),
        }
    }

    /// Rehydrate a graph from a snapshot.
    ///
    /// Records that failed to decode were already dropped while reading the
    /// snapshot. A missing or zero `initial_version` falls back to the
    /// current time. When a specifier appears twice the later record wins.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Self {
        let initial_version = snapshot
            .initial_version
            .filter(|v| *v > 0)
            .unwrap_or_else(now_millis);
        let graph = Self::with_initial_version(initial_version);
        for module in snapshot.modules {
            graph.inner.modules.insert(module.specifier.clone(), module);
        }
        graph
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
