//! Root specifier supplier for client builds.

use indexmap::IndexSet;
use path_clean::PathClean;
use std::path::PathBuf;

/// Extensions (without the dot) the transform handles as script modules.
pub const BUILTIN_MODULE_EXTS: [&str; 6] = ["js", "jsx", "ts", "tsx", "mjs", "mts"];

/// Returns true for `http://` and `https://` specifiers.
pub fn is_remote(specifier: &str) -> bool {
    specifier.starts_with("https://") || specifier.starts_with("http://")
}

/// The part of a specifier before any query or fragment.
pub(crate) fn path_part(specifier: &str) -> &str {
    let end = specifier.find(['?', '#']).unwrap_or(specifier.len());
    &specifier[..end]
}

fn extension(specifier: &str) -> Option<&str> {
    let path = path_part(specifier);
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rsplit_once('.').map(|(_, ext)| ext)
}

/// Normalize a link to an absolute, slash-separated path.
fn clean_path(link: &str) -> String {
    let cleaned = PathBuf::from("/").join(link.trim_start_matches('/')).clean();
    let mut path = cleaned.to_string_lossy().replace('\\', "/");
    if !path.starts_with('/') {
        path.insert(0, '/');
    }
    path
}

/// Ordered, deduplicated set of build roots.
///
/// Roots come from route files, links found in the HTML entry, and the
/// global style entry. The set keeps first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSet {
    roots: IndexSet<String>,
}

impl RootSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root verbatim. Returns false if it was already present.
    pub fn add(&mut self, specifier: impl Into<String>) -> bool {
        self.roots.insert(specifier.into())
    }

    pub fn add_route(&mut self, filename: impl Into<String>) -> bool {
        self.add(filename)
    }

    /// Add the local stylesheet and script links of the HTML entry.
    ///
    /// Remote links and links with other extensions are skipped. Accepted
    /// links become `.`-prefixed clean paths, e.g. `style/app.css` becomes
    /// `./style/app.css`.
    pub fn add_entry_links<I, S>(&mut self, links: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for link in links {
            let link = link.as_ref();
            if is_remote(link) {
                continue;
            }
            let accepted = match extension(link) {
                Some(ext) => ext == "css" || BUILTIN_MODULE_EXTS.contains(&ext),
                None => false,
            };
            if accepted {
                self.add(format!(".{}", clean_path(link)));
            }
        }
    }

    pub fn add_style_entry(&mut self, specifier: impl Into<String>) -> bool {
        self.add(specifier)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.roots.iter().map(String::as_str)
    }
}

impl IntoIterator for RootSet {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.roots.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for RootSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            roots: iter.into_iter().map(Into::into).collect(),
        }
    }
}
