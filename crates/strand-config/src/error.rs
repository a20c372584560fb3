//! Error types for configuration loading and validation.

use std::path::PathBuf;

use thiserror::Error;

use crate::Platform;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config not found in {}", .0.display())]
    NotFound(PathBuf),

    #[error("deploy to {} is not supported yet", .0.display_name())]
    UnsupportedPlatform(Platform),

    #[error("invalid config value for `{field}`: {hint}")]
    InvalidValue { field: String, hint: String },

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, hint: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.to_string(),
            hint: hint.into(),
        }
    }

    /// Errors that must abort a build before any module work starts.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ConfigError::UnsupportedPlatform(_) | ConfigError::InvalidValue { .. }
        )
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
