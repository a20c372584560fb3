//! Shared test utilities for strand-build tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use strand_build::{
    CancellationToken, DependencyDescriptor, MemorySink, OutputSink, Transform, TransformError,
    TransformOutput, WriteError,
};

/// Transform backed by a fixed table of specifier -> dependencies.
///
/// Specifiers missing from the table build with no dependencies.
#[derive(Default)]
pub struct MapTransform {
    deps: HashMap<String, Vec<DependencyDescriptor>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
    cancel_after: Option<(String, CancellationToken)>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MapTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module<I, D>(mut self, specifier: &str, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DependencyDescriptor>,
    {
        self.deps
            .insert(specifier.to_string(), deps.into_iter().map(Into::into).collect());
        self
    }

    pub fn failing(mut self, specifier: &str) -> Self {
        self.failing.insert(specifier.to_string());
        self
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Cancel `token` while transforming `specifier`.
    pub fn cancel_after(mut self, specifier: &str, token: CancellationToken) -> Self {
        self.cancel_after = Some((specifier.to_string(), token));
        self
    }

    /// Specifiers transformed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, specifier: &str) -> usize {
        self.calls.lock().iter().filter(|s| *s == specifier).count()
    }

    /// Largest number of transforms observed running at once.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transform for MapTransform {
    async fn transform(
        &self,
        specifier: &str,
        _source: Option<&str>,
    ) -> Result<TransformOutput, TransformError> {
        self.calls.lock().push(specifier.to_string());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some((trigger, token)) = &self.cancel_after {
            if trigger == specifier {
                token.cancel();
            }
        }

        if self.failing.contains(specifier) {
            return Err(TransformError::Syntax {
                specifier: specifier.to_string(),
                message: "unexpected token".to_string(),
            });
        }

        let deps = self.deps.get(specifier).cloned().unwrap_or_default();
        Ok(TransformOutput::new(format!("// {specifier}")).with_deps(deps))
    }
}

/// In-memory sink that rejects writes for selected specifiers.
#[derive(Default)]
pub struct FlakySink {
    inner: MemorySink,
    rejected: HashSet<String>,
}

impl FlakySink {
    pub fn rejecting(specifiers: &[&str]) -> Self {
        Self {
            inner: MemorySink::new(),
            rejected: specifiers.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn written(&self) -> Vec<String> {
        self.inner.specifiers()
    }
}

#[async_trait]
impl OutputSink for FlakySink {
    async fn write(&self, specifier: &str, content: &[u8]) -> Result<(), WriteError> {
        if self.rejected.contains(specifier) {
            return Err(WriteError::Io {
                path: specifier.to_string(),
                message: "disk full".to_string(),
            });
        }
        self.inner.write(specifier, content).await
    }
}

pub fn sorted(mut items: Vec<String>) -> Vec<String> {
    items.sort();
    items
}

/// Hands a shared [`MapTransform`] to APIs that take ownership of their
/// transform, so the test can still inspect calls.
pub struct Shared(pub std::sync::Arc<MapTransform>);

#[async_trait]
impl Transform for Shared {
    async fn transform(
        &self,
        specifier: &str,
        source: Option<&str>,
    ) -> Result<TransformOutput, TransformError> {
        self.0.transform(specifier, source).await
    }
}
