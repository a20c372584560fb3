//! Build closure resolution.
//!
//! Starting from a set of root specifiers, the resolver transforms every
//! specifier reachable through eager dependency edges exactly once per run.
//! Work proceeds in rounds: each round transforms the whole frontier
//! concurrently, waits for all of it, merges the discovered edges into the
//! [`DependencyGraph`], and derives the next frontier from them. A specifier
//! discovered in round N is never processed before round N + 1.

mod report;

pub use report::{BuildFailure, BuildReport, FailureKind, ModuleManifest};

use std::sync::Arc;

use indexmap::IndexSet;
use strand_graph::{DependencyGraph, Module, ModulePatch};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::cancel::CancellationToken;
use crate::sink::{OutputSink, WriteError};
use crate::transform::{Transform, TransformError, TransformOutput};

/// Upper bound used when no explicit concurrency is configured.
const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum transforms running at once within a round. Must be at least 1
    /// and at most [`Semaphore::MAX_PERMITS`].
    pub max_concurrency: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_concurrency: num_cpus::get().clamp(1, DEFAULT_MAX_CONCURRENCY),
        }
    }
}

impl ResolverOptions {
    pub fn with_max_concurrency(max_concurrency: usize) -> Self {
        Self { max_concurrency }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("invalid resolver options: {0}")]
    InvalidOptions(String),

    /// The run was cancelled between rounds. Carries everything built so far.
    #[error("build cancelled after {} rounds", .report.rounds)]
    Cancelled { report: Box<BuildReport> },
}

/// Working set of a single run.
#[derive(Debug, Default)]
struct BuildClosure {
    visited: IndexSet<String>,
    frontier: IndexSet<String>,
}

impl BuildClosure {
    fn new<I>(roots: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            visited: IndexSet::new(),
            frontier: roots.into_iter().collect(),
        }
    }

    /// Take the frontier, keep the specifiers not yet visited, and mark them
    /// visited before any work on them starts.
    fn next_batch(&mut self) -> Vec<String> {
        let frontier = std::mem::take(&mut self.frontier);
        frontier
            .into_iter()
            .filter(|specifier| self.visited.insert(specifier.clone()))
            .collect()
    }

    fn enqueue(&mut self, specifier: &str) {
        if !self.visited.contains(specifier) {
            self.frontier.insert(specifier.to_owned());
        }
    }
}

/// What happened to one specifier in a round.
enum Outcome {
    Built(TransformOutput),
    /// Transformed, but persisting the content failed. The edges are still
    /// known and still feed the closure.
    WriteFailed(TransformOutput, WriteError),
    TransformFailed(TransformError),
}

/// Computes build closures over a shared [`DependencyGraph`].
pub struct Resolver {
    graph: DependencyGraph,
    transform: Arc<dyn Transform>,
    sink: Arc<dyn OutputSink>,
    options: ResolverOptions,
    cancel: CancellationToken,
}

impl Resolver {
    pub fn new(
        graph: DependencyGraph,
        transform: Arc<dyn Transform>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            graph,
            transform,
            sink,
            options: ResolverOptions::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Transform and write everything reachable from `roots`.
    ///
    /// Per-specifier failures do not stop the run; they are collected in
    /// [`BuildReport::failures`] and the failing specifier is not retried.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::InvalidOptions` for a concurrency bound of zero or
    /// above [`Semaphore::MAX_PERMITS`], and
    /// `ResolveError::Cancelled` if the token was cancelled before a round.
    pub async fn resolve<I, S>(&self, roots: I) -> Result<BuildReport, ResolveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.options.max_concurrency == 0 {
            return Err(ResolveError::InvalidOptions(
                "max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.options.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ResolveError::InvalidOptions(format!(
                "max_concurrency must be at most {}",
                Semaphore::MAX_PERMITS
            )));
        }

        let mut closure = BuildClosure::new(roots.into_iter().map(Into::into));
        let mut report = BuildReport::default();
        tracing::info!(
            roots = closure.frontier.len(),
            max_concurrency = self.options.max_concurrency,
            "resolving build closure"
        );

        while !closure.frontier.is_empty() {
            if self.cancel.is_cancelled() {
                tracing::info!(rounds = report.rounds, "build closure cancelled");
                report.visited = closure.visited;
                return Err(ResolveError::Cancelled {
                    report: Box::new(report),
                });
            }

            let batch = closure.next_batch();
            if batch.is_empty() {
                break;
            }
            report.rounds += 1;
            tracing::debug!(round = report.rounds, size = batch.len(), "starting round");

            let outcomes = self.run_round(&batch).await;
            self.merge_round(batch, outcomes, &mut closure, &mut report);
        }

        report.visited = closure.visited;
        tracing::info!(
            modules = report.visited.len(),
            failures = report.failures.len(),
            rounds = report.rounds,
            "build closure resolved"
        );
        Ok(report)
    }

    /// Fan out one task per specifier and wait for all of them.
    ///
    /// The returned vector is index-aligned with `batch`; a `None` slot means
    /// the task panicked.
    async fn run_round(&self, batch: &[String]) -> Vec<Option<Outcome>> {
        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency));
        let mut join_set = JoinSet::new();

        for (index, specifier) in batch.iter().enumerate() {
            let specifier = specifier.clone();
            let source = self
                .graph
                .get(&specifier)
                .filter(Module::is_loaded)
                .map(|module| module.source_code);
            let transform = Arc::clone(&self.transform);
            let sink = Arc::clone(&self.sink);
            let permit = Arc::clone(&semaphore);

            join_set.spawn(async move {
                // The semaphore is never closed, so this only waits.
                let _permit = permit.acquire().await;
                let outcome = build_one(&specifier, source.as_deref(), &*transform, &*sink).await;
                (index, outcome)
            });
        }

        let mut outcomes: Vec<Option<Outcome>> = batch.iter().map(|_| None).collect();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(join_err) => tracing::error!("build task failed: {join_err}"),
            }
        }
        outcomes
    }

    /// Record a round's outcomes in the graph and the report, in batch order,
    /// and compute the next frontier.
    fn merge_round(
        &self,
        batch: Vec<String>,
        outcomes: Vec<Option<Outcome>>,
        closure: &mut BuildClosure,
        report: &mut BuildReport,
    ) {
        for (specifier, outcome) in batch.into_iter().zip(outcomes) {
            let output = match outcome {
                Some(Outcome::Built(output)) => {
                    report
                        .modules
                        .insert(specifier.clone(), ModuleManifest::from(&output));
                    output
                }
                Some(Outcome::WriteFailed(output, error)) => {
                    record_failure(report, &specifier, error.into());
                    output
                }
                Some(Outcome::TransformFailed(error)) => {
                    record_failure(report, &specifier, error.into());
                    continue;
                }
                None => {
                    let error = TransformError::Aborted {
                        specifier: specifier.clone(),
                        reason: "build task panicked".to_string(),
                    };
                    record_failure(report, &specifier, error.into());
                    continue;
                }
            };

            self.register(&specifier, &output);

            for dep in output.deps.iter().filter(|dep| !dep.dynamic) {
                closure.enqueue(&dep.specifier);
            }
            for companion in &output.companions {
                closure.enqueue(companion);
            }
        }
    }

    /// Store the module's edges and style metadata, and make sure every
    /// dependency target exists in the graph.
    fn register(&self, specifier: &str, output: &TransformOutput) {
        let patch = ModulePatch {
            deps: Some(output.deps.clone()),
            inline_css: output.inline_css.clone(),
            atomic_css: output.atomic_css,
            ..ModulePatch::default()
        };
        self.graph.mark(specifier, patch);
        for dep in &output.deps {
            self.graph.ensure(&dep.specifier);
        }
    }
}

async fn build_one(
    specifier: &str,
    source: Option<&str>,
    transform: &dyn Transform,
    sink: &dyn OutputSink,
) -> Outcome {
    let output = match transform.transform(specifier, source).await {
        Ok(output) => output,
        Err(error) => return Outcome::TransformFailed(error),
    };
    match sink.write(specifier, &output.content).await {
        Ok(()) => Outcome::Built(output),
        Err(error) => Outcome::WriteFailed(output, error),
    }
}

fn record_failure(report: &mut BuildReport, specifier: &str, error: FailureKind) {
    tracing::warn!("failed to build {specifier}: {error}");
    report.failures.push(BuildFailure {
        specifier: specifier.to_owned(),
        error,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_batch_marks_visited_and_skips_seen() {
        let mut closure = BuildClosure::new(["/a.ts".to_string(), "/b.ts".to_string()]);
        assert_eq!(closure.next_batch(), vec!["/a.ts", "/b.ts"]);
        assert!(closure.frontier.is_empty());

        closure.enqueue("/a.ts");
        closure.enqueue("/c.ts");
        closure.enqueue("/c.ts");
        assert_eq!(closure.next_batch(), vec!["/c.ts"]);
        assert_eq!(closure.visited.len(), 3);
    }

    #[test]
    fn default_options_are_bounded() {
        let options = ResolverOptions::default();
        assert!(options.max_concurrency >= 1);
        assert!(options.max_concurrency <= DEFAULT_MAX_CONCURRENCY);
    }
}
