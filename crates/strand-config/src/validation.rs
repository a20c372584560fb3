//! Schema validation for build configuration.

use crate::config::{BuildConfig, MAX_CONCURRENCY};
use crate::error::{ConfigError, Result};

impl BuildConfig {
    /// Check the configuration without touching the filesystem.
    ///
    /// An unsupported deploy platform is reported before anything else so a
    /// build can abort immediately.
    pub fn validate(&self) -> Result<()> {
        if !self.platform.is_supported() {
            return Err(ConfigError::UnsupportedPlatform(self.platform));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::invalid(
                "outputDir",
                "output directory cannot be empty",
            ));
        }

        match self.max_concurrency {
            Some(0) => {
                return Err(ConfigError::invalid(
                    "maxConcurrency",
                    "use at least 1, or omit it to pick a default",
                ));
            }
            Some(n) if n > MAX_CONCURRENCY => {
                return Err(ConfigError::invalid(
                    "maxConcurrency",
                    format!("{n} exceeds the limit of {MAX_CONCURRENCY}"),
                ));
            }
            _ => {}
        }

        if !self.base_path.starts_with('/') {
            return Err(ConfigError::invalid(
                "basePath",
                format!("`{}` must start with '/'", self.base_path),
            ));
        }

        if let Some(level) = &self.log_level {
            const LEVELS: [&str; 7] = ["silent", "off", "error", "warn", "warning", "info", "debug"];
            if !LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigError::invalid(
                    "logLevel",
                    format!("unknown level `{level}`"),
                ));
            }
        }

        Ok(())
    }
}
