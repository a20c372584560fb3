//! Mutation methods for DependencyGraph.

use dashmap::mapref::entry::Entry;
use rustc_hash::FxHashSet as HashSet;

use super::graph::DependencyGraph;
use crate::{Module, ModulePatch};

impl DependencyGraph {
    /// Insert or merge a module and return its resulting state.
    ///
    /// The merge happens under the lock of the shard that owns `specifier`:
    /// two marks of the same specifier serialize, marks of different
    /// specifiers only contend when they hash to the same shard.
    pub fn mark(&self, specifier: &str, patch: ModulePatch) -> Module {
        match self.inner.modules.entry(specifier.to_owned()) {
            Entry::Occupied(mut entry) => {
                patch.apply(entry.get_mut());
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let module = patch.into_module(specifier, self.inner.initial_version);
                entry.insert(module.clone());
                module
            }
        }
    }

    /// Register `specifier` with default fields unless it already exists.
    ///
    /// Returns true if a new module was created.
    pub fn ensure(&self, specifier: &str) -> bool {
        if self.inner.modules.contains_key(specifier) {
            return false;
        }
        match self.inner.modules.entry(specifier.to_owned()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(Module::new(specifier, self.inner.initial_version));
                true
            }
        }
    }

    /// Remove a module. Other modules keep their edges to it.
    pub fn unmark(&self, specifier: &str) -> Option<Module> {
        self.inner.modules.remove(specifier).map(|(_, module)| module)
    }

    /// Record that `specifier` changed.
    ///
    /// Bumps the module's version by one, then does the same for every
    /// module that transitively depends on it. Each affected module is bumped
    /// exactly once per call, however many paths lead to it. Unregistered
    /// specifiers are ignored.
    pub fn update(&self, specifier: &str) {
        let mut visited = HashSet::default();
        self.update_from(specifier, &mut visited);
    }

    fn update_from(&self, specifier: &str, visited: &mut HashSet<String>) {
        match self.inner.modules.get_mut(specifier) {
            Some(mut module) => module.version += 1,
            None => return,
        }
        visited.insert(specifier.to_owned());

        for dependent in self.direct_dependents(specifier) {
            if !visited.contains(&dependent) {
                self.update_from(&dependent, visited);
            }
        }
    }
}
