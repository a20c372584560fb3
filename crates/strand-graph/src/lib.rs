//! # strand-graph
//!
//! Incremental module dependency graph for the strand dev server and build.
//!
//! The graph records every known module by specifier together with a version
//! counter and its forward edges. It answers three kinds of questions:
//!
//! - **What does this module need?** [`DependencyGraph::walk`] follows
//!   forward edges depth-first.
//! - **Who is affected when this module changes?** [`DependencyGraph::lookup`]
//!   follows reverse edges, with per-branch pruning.
//! - **Invalidate it.** [`DependencyGraph::update`] bumps the version of a
//!   module and of everything that transitively depends on it, exactly once
//!   each.
//!
//! ## Quick Start
//!
//! ```rust
//! use strand_graph::{DependencyGraph, ModulePatch};
//!
//! let graph = DependencyGraph::with_initial_version(1);
//! graph.mark("/app.tsx", ModulePatch::new().deps(["/lib/util.ts"]));
//! graph.mark("/lib/util.ts", ModulePatch::new());
//!
//! graph.update("/lib/util.ts");
//! assert_eq!(graph.version("/lib/util.ts"), Some(2));
//! assert_eq!(graph.version("/app.tsx"), Some(2));
//! assert_eq!(graph.dependents_of("/lib/util.ts"), vec!["/app.tsx".to_string()]);
//! ```
//!
//! ## Totality
//!
//! No graph operation fails because a specifier is unknown. Edges may point
//! at specifiers that were never registered, or that were removed with
//! [`DependencyGraph::unmark`]; traversals simply skip them. The graph may
//! contain cycles.
//!
//! ## Thread Safety
//!
//! `DependencyGraph` is a cheap `Arc` handle over a sharded concurrent map.
//! Concurrent `mark` calls for the same specifier serialize, calls for
//! different specifiers proceed in parallel. Traversals copy what they need
//! out of the map before invoking visitors, so a visitor may call back into
//! the graph.

pub mod module;
pub mod snapshot;

// In-memory implementation
mod memory;

pub use memory::{DependencyGraph, Visit};
pub use module::{DependencyDescriptor, Module, ModulePatch};
pub use snapshot::GraphSnapshot;

/// Error types for graph serialization.
///
/// Graph operations themselves are total; only reading and writing
/// snapshots can fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Snapshot JSON could not be parsed or produced.
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary encoding failed.
    #[error("Failed to serialize graph to bytes: {0}")]
    Encode(String),

    /// Binary decoding failed.
    #[error("Failed to deserialize graph from bytes: {0}")]
    Decode(String),

    /// Binary snapshot written by an incompatible version.
    #[error("Incompatible graph format version: expected {expected}, got {found}")]
    IncompatibleFormat { expected: u32, found: u32 },
}

/// Result type alias for graph serialization.
pub type Result<T> = std::result::Result<T, Error>;
