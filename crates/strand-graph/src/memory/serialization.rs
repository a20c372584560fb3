//! Serialization methods for DependencyGraph.

use super::graph::DependencyGraph;
use crate::{Error, GraphSnapshot, Module, Result};

/// Leading version of the binary format.
///
/// - Version 1: initial version plus the full module list
const FORMAT_VERSION: u32 = 1;

#[derive(serde::Serialize, serde::Deserialize)]
struct SerializedGraph {
    version: u32,
    initial_version: u64,
    modules: Vec<Module>,
}

fn strip_source(mut module: Module) -> Module {
    module.source_code.clear();
    module
}

impl DependencyGraph {
    /// Capture every module, sorted by specifier.
    ///
    /// With `include_source == false` cached source text is dropped, which
    /// is what a server build needs.
    pub fn to_snapshot(&self, include_source: bool) -> GraphSnapshot {
        let modules = self
            .modules()
            .into_iter()
            .map(|m| if include_source { m } else { strip_source(m) })
            .collect();
        GraphSnapshot::new(modules, Some(self.initial_version()))
    }

    /// Snapshot of the modules reachable from one entry, without source text.
    pub fn subgraph(&self, specifier: &str) -> GraphSnapshot {
        let mut modules = Vec::new();
        self.walk(specifier, |module| modules.push(strip_source(module.clone())));
        GraphSnapshot::new(modules, Some(self.initial_version()))
    }

    /// Serialize the graph to a compact binary form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let serialized = SerializedGraph {
            version: FORMAT_VERSION,
            initial_version: self.initial_version(),
            modules: self.modules(),
        };

        bincode::serde::encode_to_vec(&serialized, bincode::config::standard())
            .map_err(|e| Error::Encode(e.to_string()))
    }

    /// Deserialize a graph written by [`DependencyGraph::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if decoding fails or the format version differs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (serialized, _): (SerializedGraph, _) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| Error::Decode(e.to_string()))?;

        if serialized.version != FORMAT_VERSION {
            return Err(Error::IncompatibleFormat {
                expected: FORMAT_VERSION,
                found: serialized.version,
            });
        }

        Ok(Self::from_snapshot(GraphSnapshot::new(
            serialized.modules,
            Some(serialized.initial_version),
        )))
    }
}
