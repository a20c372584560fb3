use serde::{Deserialize, Serialize};

/// A single tracked module.
///
/// The serialized shape uses the camelCase field names that server builds
/// read back from a graph snapshot (`sourceCode`, `inlineCSS`, `atomicCSS`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub specifier: String,
    pub version: u64,
    /// Cached raw source text. Empty when not loaded.
    #[serde(default)]
    pub source_code: String,
    /// Forward edges, in import order.
    #[serde(default)]
    pub deps: Vec<DependencyDescriptor>,
    /// Inline style payload produced by the transform
    #[serde(default, rename = "inlineCSS")]
    pub inline_css: Option<String>,
    /// Whether the module uses atomic (utility) CSS
    #[serde(default, rename = "atomicCSS")]
    pub atomic_css: Option<bool>,
}

impl Module {
    /// Create a module with no source, no edges and no style metadata.
    pub fn new(specifier: impl Into<String>, version: u64) -> Self {
        Self {
            specifier: specifier.into(),
            version,
            source_code: String::new(),
            deps: Vec::new(),
            inline_css: None,
            atomic_css: None,
        }
    }

    /// Returns true if any forward edge (eager or dynamic) points at `specifier`.
    pub fn depends_on(&self, specifier: &str) -> bool {
        self.deps.iter().any(|dep| dep.specifier == specifier)
    }

    /// Forward edges that take part in eager build-closure walks.
    pub fn eager_deps(&self) -> impl Iterator<Item = &DependencyDescriptor> {
        self.deps.iter().filter(|dep| !dep.dynamic)
    }

    /// Returns true if source text has been cached for this module.
    pub fn is_loaded(&self) -> bool {
        !self.source_code.is_empty()
    }
}

/// A forward edge: "this module depends on `specifier`".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyDescriptor {
    pub specifier: String,
    /// Lazy `import()` edge. Tracked for invalidation, skipped by eager closures.
    #[serde(default)]
    pub dynamic: bool,
}

impl DependencyDescriptor {
    /// An eager (static import) edge.
    pub fn new(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            dynamic: false,
        }
    }

    /// A dynamic (lazy import) edge.
    pub fn dynamic(specifier: impl Into<String>) -> Self {
        Self {
            specifier: specifier.into(),
            dynamic: true,
        }
    }
}

impl From<&str> for DependencyDescriptor {
    fn from(specifier: &str) -> Self {
        Self::new(specifier)
    }
}

impl From<String> for DependencyDescriptor {
    fn from(specifier: String) -> Self {
        Self::new(specifier)
    }
}

/// Field-by-field update applied by [`DependencyGraph::mark`](crate::DependencyGraph::mark).
///
/// `None` keeps the prior value of a field, `Some` overwrites it. A patch
/// applied to a specifier that is not yet registered creates the module,
/// with `source_code` defaulting to empty and `version` to the graph's
/// initial version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModulePatch {
    pub version: Option<u64>,
    pub source_code: Option<String>,
    pub deps: Option<Vec<DependencyDescriptor>>,
    pub inline_css: Option<String>,
    pub atomic_css: Option<bool>,
}

impl ModulePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn source_code(mut self, source_code: impl Into<String>) -> Self {
        self.source_code = Some(source_code.into());
        self
    }

    pub fn deps<I, D>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<DependencyDescriptor>,
    {
        self.deps = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    pub fn inline_css(mut self, inline_css: impl Into<String>) -> Self {
        self.inline_css = Some(inline_css.into());
        self
    }

    pub fn atomic_css(mut self, atomic_css: bool) -> Self {
        self.atomic_css = Some(atomic_css);
        self
    }

    /// Returns true if applying this patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Merge the set fields into an existing module.
    pub fn apply(self, module: &mut Module) {
        if let Some(version) = self.version {
            module.version = version;
        }
        if let Some(source_code) = self.source_code {
            module.source_code = source_code;
        }
        if let Some(deps) = self.deps {
            module.deps = deps;
        }
        if let Some(inline_css) = self.inline_css {
            module.inline_css = Some(inline_css);
        }
        if let Some(atomic_css) = self.atomic_css {
            module.atomic_css = Some(atomic_css);
        }
    }

    /// Build a fresh module from this patch.
    pub fn into_module(self, specifier: &str, initial_version: u64) -> Module {
        let mut module = Module::new(specifier, initial_version);
        self.apply(&mut module);
        module
    }
}
