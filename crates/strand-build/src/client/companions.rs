//! CSS module companion policy.

use async_trait::async_trait;

use super::roots::path_part;
use crate::transform::{Transform, TransformError, TransformOutput};

/// Query marking the script representation of a stylesheet.
pub const CSS_MODULE_QUERY: &str = "module";

pub(crate) fn is_css(specifier: &str) -> bool {
    path_part(specifier).ends_with(".css")
}

/// Returns true for a stylesheet already requested as its script variant.
pub(crate) fn is_css_module(specifier: &str) -> bool {
    is_css(specifier) && has_query_flag(specifier, CSS_MODULE_QUERY)
}

fn has_query_flag(specifier: &str, flag: &str) -> bool {
    let Some((_, rest)) = specifier.split_once('?') else {
        return false;
    };
    let query = rest.split('#').next().unwrap_or_default();
    query
        .split(['&', '?'])
        .any(|pair| pair.split('=').next() == Some(flag))
}

/// The script variant of a stylesheet import, e.g. `./app.css?module`.
pub fn css_module_specifier(specifier: &str) -> String {
    format!("{specifier}?{CSS_MODULE_QUERY}")
}

/// Transform decorator that asks for the script variant of every stylesheet
/// a script module imports.
///
/// A script importing `./app.css` needs `./app.css?module` served next to it,
/// so each eager dependency ending in `.css` of a non-CSS module gets that
/// companion. Dependencies that already carry a query are left alone.
/// Stylesheet results pass through unchanged.
#[derive(Debug, Clone)]
pub struct CssModuleCompanions<T> {
    inner: T,
}

impl<T> CssModuleCompanions<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<T: Transform> Transform for CssModuleCompanions<T> {
    async fn transform(
        &self,
        specifier: &str,
        source: Option<&str>,
    ) -> Result<TransformOutput, TransformError> {
        let mut output = self.inner.transform(specifier, source).await?;
        if is_css(specifier) {
            return Ok(output);
        }

        let companions: Vec<String> = output
            .eager_css_deps()
            .map(css_module_specifier)
            .filter(|companion| !output.companions.contains(companion))
            .collect();
        output.companions.extend(companions);
        Ok(output)
    }
}

impl TransformOutput {
    fn eager_css_deps(&self) -> impl Iterator<Item = &str> {
        self.deps
            .iter()
            .filter(|dep| !dep.dynamic && dep.specifier.ends_with(".css"))
            .map(|dep| dep.specifier.as_str())
    }
}
