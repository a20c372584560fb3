//! Build configuration for strand.
//!
//! Configuration is layered with figment, lowest priority first:
//! built-in defaults, `strand.toml`, `strand.json`, then `STRAND_`-prefixed
//! environment variables.

pub mod config;
pub mod discovery;
pub mod error;
pub mod validation;

// Re-export main types
pub use config::*;
pub use discovery::ConfigDiscovery;
pub use error::*;
