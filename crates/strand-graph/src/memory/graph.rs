use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::Module;

pub(super) type ModuleMap = DashMap<String, Module, FxBuildHasher>;

/// Registry of modules keyed by specifier.
///
/// The handle is `Arc`-backed: cloning is cheap and every clone observes the
/// same modules. A graph is created once per build or server lifecycle and
/// handed to whoever needs it.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    pub(super) inner: Arc<GraphInner>,
}

#[derive(Debug)]
pub(super) struct GraphInner {
    pub(super) modules: ModuleMap,
    pub(super) initial_version: u64,
}

impl GraphInner {
    pub(super) fn new(initial_version: u64) -> Self {
        Self {
            modules: DashMap::with_hasher(FxBuildHasher),
            initial_version,
        }
    }
}

impl DependencyGraph {
    /// Version assigned to modules created without an explicit version.
    pub fn initial_version(&self) -> u64 {
        self.inner.initial_version
    }

    /// Exact lookup. Returns a copy of the module's current state.
    pub fn get(&self, specifier: &str) -> Option<Module> {
        self.inner.modules.get(specifier).map(|m| m.value().clone())
    }

    pub fn contains(&self, specifier: &str) -> bool {
        self.inner.modules.contains_key(specifier)
    }

    /// Current version of a module, if registered.
    pub fn version(&self, specifier: &str) -> Option<u64> {
        self.inner.modules.get(specifier).map(|m| m.version)
    }

    pub fn len(&self) -> usize {
        self.inner.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.modules.is_empty()
    }

    /// All modules, sorted by specifier.
    pub fn modules(&self) -> Vec<Module> {
        let mut modules: Vec<Module> = self
            .inner
            .modules
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        modules.sort_by(|a, b| a.specifier.cmp(&b.specifier));
        modules
    }

    /// Registered modules with a forward edge to `specifier`, sorted.
    ///
    /// Reverse edges are not stored; they are recomputed from the forward
    /// edges on every call, so stale references left behind by `unmark` only
    /// ever resolve to absent modules.
    pub fn direct_dependents(&self, specifier: &str) -> Vec<String> {
        let mut dependents: Vec<String> = self
            .inner
            .modules
            .iter()
            .filter(|entry| entry.key() != specifier && entry.value().depends_on(specifier))
            .map(|entry| entry.key().clone())
            .collect();
        dependents.sort();
        dependents
    }
}
