//! Traversal methods for DependencyGraph.
//!
//! Every public traversal allocates its own visited set and threads it
//! through the recursive helper, so traversals are reentrant and cycles
//! terminate.

use rustc_hash::FxHashSet as HashSet;

use super::graph::DependencyGraph;
use crate::Module;

/// What a [`DependencyGraph::lookup`] visitor wants next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visit {
    /// Keep walking into the visited module's own dependents.
    #[default]
    Continue,
    /// Do not descend past the visited module.
    Stop,
}

impl From<()> for Visit {
    fn from(_: ()) -> Self {
        Visit::Continue
    }
}

impl From<bool> for Visit {
    fn from(descend: bool) -> Self {
        if descend { Visit::Continue } else { Visit::Stop }
    }
}

impl DependencyGraph {
    /// Walk reverse edges transitively, starting from the modules that
    /// depend on `specifier`.
    ///
    /// `visit` is called at most once per dependent and never for
    /// `specifier` itself. Returning [`Visit::Stop`] (or `false`) prunes the
    /// walk below that dependent; it still counts as visited.
    pub fn lookup<F, R>(&self, specifier: &str, mut visit: F)
    where
        F: FnMut(&str) -> R,
        R: Into<Visit>,
    {
        let mut visited = HashSet::default();
        self.lookup_from(specifier, &mut visit, &mut visited);
    }

    fn lookup_from<F, R>(&self, specifier: &str, visit: &mut F, visited: &mut HashSet<String>)
    where
        F: FnMut(&str) -> R,
        R: Into<Visit>,
    {
        visited.insert(specifier.to_owned());
        for dependent in self.direct_dependents(specifier) {
            if !visited.insert(dependent.clone()) {
                continue;
            }
            if visit(&dependent).into() == Visit::Continue {
                self.lookup_from(&dependent, visit, visited);
            }
        }
    }

    /// Depth-first walk of forward edges (eager and dynamic), in `deps` order.
    ///
    /// `visit` receives each registered module once. Edges to unregistered
    /// specifiers are skipped.
    pub fn walk<F>(&self, specifier: &str, mut visit: F)
    where
        F: FnMut(&Module),
    {
        let mut visited = HashSet::default();
        self.walk_from(specifier, &mut visit, &mut visited);
    }

    fn walk_from<F>(&self, specifier: &str, visit: &mut F, visited: &mut HashSet<String>)
    where
        F: FnMut(&Module),
    {
        // Copy out so no shard lock is held while the visitor runs.
        let Some(module) = self.get(specifier) else {
            return;
        };
        visit(&module);
        visited.insert(module.specifier.clone());

        for dep in &module.deps {
            if !visited.contains(&dep.specifier) {
                self.walk_from(&dep.specifier, visit, visited);
            }
        }
    }

    /// Every module that transitively depends on `specifier`, in discovery order.
    pub fn dependents_of(&self, specifier: &str) -> Vec<String> {
        let mut dependents = Vec::new();
        self.lookup(specifier, |dependent| dependents.push(dependent.to_owned()));
        dependents
    }

    /// Specifiers reachable from `specifier` through forward edges,
    /// including `specifier` itself when it is registered.
    pub fn reachable_from(&self, specifier: &str) -> Vec<String> {
        let mut reachable = Vec::new();
        self.walk(specifier, |module| reachable.push(module.specifier.clone()));
        reachable
    }
}
