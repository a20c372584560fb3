//! File-based config discovery
//!
//! Finds strand configuration files in a project root.

use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, CONFIG_FILES};
use crate::error::{ConfigError, Result};

/// File-based configuration discovery
///
/// # Example
///
/// ```no_run
/// use strand_config::ConfigDiscovery;
///
/// let config = ConfigDiscovery::new(".").load_or_default().unwrap();
/// println!("building into {}", config.output_dir.display());
/// ```
pub struct ConfigDiscovery {
    root: PathBuf,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Config files present in the root, in load order.
    pub fn find(&self) -> Vec<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| self.root.join(name))
            .filter(|path| path.exists())
            .collect()
    }

    /// Load config, requiring at least one config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no config file is present.
    pub fn load(&self) -> Result<BuildConfig> {
        if self.find().is_empty() {
            return Err(ConfigError::NotFound(self.root.clone()));
        }
        BuildConfig::load(&self.root)
    }

    /// Load config, falling back to defaults (plus environment) without a file.
    pub fn load_or_default(&self) -> Result<BuildConfig> {
        BuildConfig::load(&self.root)
    }
}
