//! Production client build.
//!
//! [`ClientBuild`] ties configuration, the module graph, and a transform
//! together: it validates the configuration, prepares the output directory,
//! resolves the build closure of the collected roots into files, and leaves
//! a graph snapshot behind for the server build to reuse.

mod companions;
mod output;
mod roots;

pub use companions::{CSS_MODULE_QUERY, CssModuleCompanions, css_module_specifier};
pub use output::{FsOutputSink, prepare_output_dir};
pub use roots::{BUILTIN_MODULE_EXTS, RootSet, is_remote};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use strand_config::BuildConfig;
use strand_graph::DependencyGraph;

use crate::cancel::CancellationToken;
use crate::resolver::{BuildReport, Resolver, ResolverOptions};
use crate::transform::Transform;
use crate::{Error, Result};

/// File the server build reads the client graph back from.
pub const GRAPH_SNAPSHOT_FILE: &str = "server_dependency_graph.js";

/// Result of a finished client build.
#[derive(Debug)]
pub struct ClientBuildOutput {
    pub report: BuildReport,
    pub output_dir: PathBuf,
    /// Path of the written graph snapshot module.
    pub graph_snapshot: PathBuf,
}

pub struct ClientBuild {
    root: PathBuf,
    config: BuildConfig,
    graph: DependencyGraph,
    transform: Arc<dyn Transform>,
    cancel: CancellationToken,
}

impl ClientBuild {
    /// Build for the project at `root`. The transform is wrapped so every
    /// stylesheet a script imports is also built as a CSS module.
    pub fn new<T>(root: impl Into<PathBuf>, config: BuildConfig, transform: T) -> Self
    where
        T: Transform + 'static,
    {
        Self {
            root: root.into(),
            config,
            graph: DependencyGraph::new(),
            transform: Arc::new(CssModuleCompanions::new(transform)),
            cancel: CancellationToken::new(),
        }
    }

    /// Build into an existing graph, e.g. the dev server's.
    pub fn with_graph(mut self, graph: DependencyGraph) -> Self {
        self.graph = graph;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn output_dir(&self) -> PathBuf {
        self.config.output_dir_in(&self.root)
    }

    /// Run the build.
    ///
    /// # Errors
    ///
    /// Configuration errors are returned before any transform runs. Failures
    /// of individual modules do not fail the build; they are listed in the
    /// returned report.
    pub async fn run(&self, mut roots: RootSet) -> Result<ClientBuildOutput> {
        self.config.validate()?;

        if let Some(style_entry) = &self.config.style_entry {
            roots.add_style_entry(style_entry.clone());
        }

        let output_dir = self.output_dir();
        prepare_output_dir(&output_dir).await?;
        tracing::info!(
            roots = roots.len(),
            "building client into {}",
            output_dir.display()
        );

        let options = match self.config.max_concurrency {
            Some(max_concurrency) => ResolverOptions::with_max_concurrency(max_concurrency),
            None => ResolverOptions::default(),
        };
        let resolver = Resolver::new(
            self.graph.clone(),
            Arc::clone(&self.transform),
            Arc::new(FsOutputSink::new(output_dir.clone())),
        )
        .with_options(options)
        .with_cancellation(self.cancel.clone());

        let report = resolver.resolve(roots).await?;
        let graph_snapshot = write_graph_snapshot(&self.graph, &output_dir).await?;

        if !report.is_success() {
            tracing::warn!(
                failures = report.failures.len(),
                "client build finished with failures"
            );
        }

        Ok(ClientBuildOutput {
            report,
            output_dir,
            graph_snapshot,
        })
    }
}

/// Write the graph, without source text, as an ES module exporting the
/// snapshot object.
async fn write_graph_snapshot(graph: &DependencyGraph, output_dir: &Path) -> Result<PathBuf> {
    let module = graph.to_snapshot(false).to_js_module()?;
    let path = output_dir.join(GRAPH_SNAPSHOT_FILE);
    tokio::fs::write(&path, module).await.map_err(Error::Io)?;
    tracing::debug!(modules = graph.len(), "wrote {}", path.display());
    Ok(path)
}
