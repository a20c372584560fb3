//! In-memory DependencyGraph implementation.
//!
//! Modules live in a lock-sharded concurrent map so that rounds of concurrent
//! transforms can register edges without contending on one global lock.

mod construction;
mod graph;
mod mutations;
mod serialization;
mod traversal;

// Re-export DependencyGraph
pub use graph::DependencyGraph;
pub use traversal::Visit;
