//! # strand-build
//!
//! Concurrent build-closure resolver over the strand module graph.
//!
//! A [`Resolver`] takes a set of root specifiers, runs each reachable
//! specifier through a [`Transform`] exactly once, hands the result to an
//! [`OutputSink`], and records the discovered edges in a shared
//! [`DependencyGraph`]. The [`client`] module wraps this into a complete
//! production client build.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use strand_build::{
//!     DependencyGraph, MemorySink, Resolver, Transform, TransformError, TransformOutput,
//! };
//!
//! struct Passthrough;
//!
//! #[async_trait::async_trait]
//! impl Transform for Passthrough {
//!     async fn transform(
//!         &self,
//!         _specifier: &str,
//!         source: Option<&str>,
//!     ) -> Result<TransformOutput, TransformError> {
//!         Ok(TransformOutput::new(source.unwrap_or_default()))
//!     }
//! }
//!
//! # async fn run() -> Result<(), strand_build::Error> {
//! let resolver = Resolver::new(
//!     DependencyGraph::new(),
//!     Arc::new(Passthrough),
//!     Arc::new(MemorySink::new()),
//! );
//! let report = resolver.resolve(["/app.tsx"]).await?;
//! assert!(report.built("/app.tsx"));
//! # Ok(())
//! # }
//! ```

pub mod cancel;
pub mod client;
pub mod resolver;
pub mod sink;
pub mod transform;

#[cfg(feature = "logging")]
pub mod logging;

pub use cancel::CancellationToken;
pub use client::{ClientBuild, ClientBuildOutput, FsOutputSink, RootSet};
pub use resolver::{
    BuildFailure, BuildReport, FailureKind, ModuleManifest, ResolveError, Resolver,
    ResolverOptions,
};
pub use sink::{MemorySink, OutputSink, WriteError};
pub use transform::{Transform, TransformError, TransformOutput};

pub use strand_config::{BuildConfig, ConfigError, Platform};
pub use strand_graph::{DependencyDescriptor, DependencyGraph, Module, ModulePatch, Visit};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write graph snapshot: {0}")]
    Snapshot(#[from] strand_graph::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
