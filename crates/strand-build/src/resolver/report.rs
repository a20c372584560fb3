//! Result of one resolver run.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use strand_graph::DependencyDescriptor;

use crate::sink::WriteError;
use crate::transform::{TransformError, TransformOutput};

/// Per-module metadata recorded for manifest generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleManifest {
    pub deps: Vec<DependencyDescriptor>,
    #[serde(rename = "inlineCSS", skip_serializing_if = "Option::is_none")]
    pub inline_css: Option<String>,
    #[serde(rename = "atomicCSS", skip_serializing_if = "Option::is_none")]
    pub atomic_css: Option<bool>,
    /// Size of the written content in bytes
    pub size: usize,
}

impl From<&TransformOutput> for ModuleManifest {
    fn from(output: &TransformOutput) -> Self {
        Self {
            deps: output.deps.clone(),
            inline_css: output.inline_css.clone(),
            atomic_css: output.atomic_css,
            size: output.content.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A specifier that did not build successfully.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{specifier}: {error}")]
pub struct BuildFailure {
    pub specifier: String,
    pub error: FailureKind,
}

/// Outcome of a resolver run, including partial failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Every specifier processed this run, in processing order. Includes
    /// specifiers whose transform or write failed.
    pub visited: IndexSet<String>,
    /// Successful results, keyed by specifier.
    pub modules: IndexMap<String, ModuleManifest>,
    pub failures: Vec<BuildFailure>,
    /// Number of rounds executed
    pub rounds: usize,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Returns true if `specifier` was transformed and written this run.
    pub fn built(&self, specifier: &str) -> bool {
        self.modules.contains_key(specifier)
    }

    pub fn failure(&self, specifier: &str) -> Option<&BuildFailure> {
        self.failures.iter().find(|f| f.specifier == specifier)
    }

    pub fn failed_specifiers(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.specifier.as_str())
    }

    /// Client module manifest as JSON: specifier to module metadata.
    pub fn manifest_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.modules)
    }
}
