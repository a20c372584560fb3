//! Contract for the external transform service.
//!
//! The resolver never looks inside a transform. It only needs the produced
//! content, the discovered dependency edges, and whether the call failed.

use async_trait::async_trait;
use strand_graph::DependencyDescriptor;

/// Result of transforming one specifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOutput {
    /// Transformed code (or CSS) to persist.
    pub content: Vec<u8>,
    /// Dependencies found in the module, in import order.
    pub deps: Vec<DependencyDescriptor>,
    /// Extra specifiers this result needs built alongside it, such as the
    /// script representation of a CSS module.
    pub companions: Vec<String>,
    pub inline_css: Option<String>,
    pub atomic_css: Option<bool>,
}

impl TransformOutput {
    pub fn new(content: impl Into<Vec<u8>>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_deps<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DependencyDescriptor>,
    {
        self.deps = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_companion(mut self, specifier: impl Into<String>) -> Self {
        self.companions.push(specifier.into());
        self
    }

    pub fn with_inline_css(mut self, css: impl Into<String>) -> Self {
        self.inline_css = Some(css.into());
        self
    }

    pub fn with_atomic_css(mut self, atomic_css: bool) -> Self {
        self.atomic_css = Some(atomic_css);
        self
    }
}

/// Errors from transforming a single specifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    /// Source could not be fetched or read.
    #[error("failed to load {specifier}: {message}")]
    Load { specifier: String, message: String },

    /// Source could not be parsed.
    #[error("syntax error in {specifier}: {message}")]
    Syntax { specifier: String, message: String },

    /// Module kind or construct the transform does not handle.
    #[error("unsupported module {specifier}: {reason}")]
    Unsupported { specifier: String, reason: String },

    /// The transform did not complete (task panic or host deadline).
    #[error("transform of {specifier} aborted: {reason}")]
    Aborted { specifier: String, reason: String },
}

impl TransformError {
    pub fn specifier(&self) -> &str {
        match self {
            TransformError::Load { specifier, .. }
            | TransformError::Syntax { specifier, .. }
            | TransformError::Unsupported { specifier, .. }
            | TransformError::Aborted { specifier, .. } => specifier,
        }
    }
}

/// Turns a specifier (and its cached source, if any) into output code.
#[async_trait]
pub trait Transform: Send + Sync {
    async fn transform(
        &self,
        specifier: &str,
        source: Option<&str>,
    ) -> Result<TransformOutput, TransformError>;
}
