//! Contract for persisting transform output.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// Errors from writing the output of a single specifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// The specifier maps to a location outside the output root.
    #[error("invalid output path for {specifier}: {reason}")]
    InvalidPath { specifier: String, reason: String },

    #[error("failed to write {path}: {message}")]
    Io { path: String, message: String },
}

/// Receives the transformed content of every built specifier.
#[async_trait]
pub trait OutputSink: Send + Sync {
    async fn write(&self, specifier: &str, content: &[u8]) -> Result<(), WriteError>;
}

/// Sink that keeps output in memory, keyed by specifier in write order.
///
/// Suits a dev server that serves transformed modules straight from memory.
/// A later write for the same specifier replaces the earlier content.
#[derive(Debug, Default)]
pub struct MemorySink {
    outputs: RwLock<IndexMap<String, Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, specifier: &str) -> Option<Vec<u8>> {
        self.outputs.read().get(specifier).cloned()
    }

    /// Specifiers written so far, in first-write order.
    pub fn specifiers(&self) -> Vec<String> {
        self.outputs.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.outputs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.read().is_empty()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&self, specifier: &str, content: &[u8]) -> Result<(), WriteError> {
        self.outputs
            .write()
            .insert(specifier.to_owned(), content.to_vec());
        Ok(())
    }
}
