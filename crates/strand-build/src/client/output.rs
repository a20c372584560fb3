//! Filesystem output for client builds.
//!
//! Every specifier maps to a file under the output directory:
//!
//! - local specifiers keep their path: `./routes/index.tsx` →
//!   `<out>/routes/index.tsx`
//! - remote specifiers go under `-/<host>`: `https://esm.sh/react@18` →
//!   `<out>/-/esm.sh/react@18.js`
//! - `esm.sh` modules and `?module` stylesheets get a `.js` suffix, since
//!   what is written for them is script
//!
//! Paths are cleaned, and a specifier that would escape the output
//! directory is rejected.

use std::io;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use path_clean::PathClean;

use super::companions::is_css_module;
use super::roots::{is_remote, path_part};
use crate::sink::{OutputSink, WriteError};

const ESM_CDN: &str = "https://esm.sh/";

/// Writes build output into a directory tree.
#[derive(Debug, Clone)]
pub struct FsOutputSink {
    root: PathBuf,
}

impl FsOutputSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the output for `specifier` is written.
    pub fn save_path(&self, specifier: &str) -> Result<PathBuf, WriteError> {
        let invalid = |reason: &str| WriteError::InvalidPath {
            specifier: specifier.to_owned(),
            reason: reason.to_owned(),
        };

        let mut relative = if is_remote(specifier) {
            let without_scheme = specifier
                .split_once("://")
                .map(|(_, rest)| rest)
                .unwrap_or(specifier);
            let path = path_part(without_scheme);
            let (host, path) = path.split_once('/').unwrap_or((path, ""));
            if host.is_empty() {
                return Err(invalid("remote specifier has no host"));
            }
            format!("-/{}/{}", host.replace(':', "_"), path)
        } else {
            path_part(specifier).trim_start_matches('/').to_owned()
        };

        if specifier.starts_with(ESM_CDN) || is_css_module(specifier) {
            relative.push_str(".js");
        }

        let relative = PathBuf::from(relative).clean();
        let escapes = relative.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes {
            return Err(invalid("path escapes the output directory"));
        }
        if relative.as_os_str().is_empty() || relative == Path::new(".") {
            return Err(invalid("specifier has no file path"));
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl OutputSink for FsOutputSink {
    async fn write(&self, specifier: &str, content: &[u8]) -> Result<(), WriteError> {
        let path = self.save_path(specifier)?;
        let io_error = |err: io::Error| WriteError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
        }
        tokio::fs::write(&path, content).await.map_err(io_error)?;
        tracing::debug!("wrote {specifier} to {}", path.display());
        Ok(())
    }
}

/// Empty the output directory of a previous build, or create it.
pub async fn prepare_output_dir(dir: &Path) -> io::Result<()> {
    if !tokio::fs::try_exists(dir).await? {
        return tokio::fs::create_dir_all(dir).await;
    }

    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            tokio::fs::remove_dir_all(entry.path()).await?;
        } else {
            tokio::fs::remove_file(entry.path()).await?;
        }
    }
    Ok(())
}
