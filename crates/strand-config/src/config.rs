//! Top-level build configuration.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Json, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Config file names, in load order (later files override earlier ones).
pub const CONFIG_FILES: [&str; 2] = ["strand.toml", "strand.json"];

/// Prefix for environment overrides, e.g. `STRAND_OUTPUT_DIR=out`.
///
/// File keys are camelCase (`outputDir`, `maxConcurrency`).
pub const ENV_PREFIX: &str = "STRAND_";

/// Largest accepted `maxConcurrency`, the most permits a tokio semaphore holds.
pub const MAX_CONCURRENCY: usize = usize::MAX >> 3;

/// Deploy target for a production build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Self-hosted server (the only supported target)
    #[default]
    Server,
    Cloudflare,
    Vercel,
}

impl Platform {
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Server => "Server",
            Platform::Cloudflare => "Cloudflare",
            Platform::Vercel => "Vercel",
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Platform::Server)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default)]
    pub platform: Platform,

    /// Directory for build output, relative to the working directory.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Upper bound on concurrent transforms per round.
    /// `None` picks a default from the number of CPUs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,

    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Module the client always loads for global styles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style_entry: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_base_path() -> String {
    "/".to_string()
}

/// `output_dir` -> `outputDir`
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for ch in key.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            output_dir: default_output_dir(),
            max_concurrency: None,
            base_path: default_base_path(),
            style_entry: None,
            log_level: None,
        }
    }
}

impl BuildConfig {
    /// Figment layered from defaults, config files in `root`, and environment.
    pub fn figment(root: &Path) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let toml_path = root.join(CONFIG_FILES[0]);
        if toml_path.exists() {
            figment = figment.merge(Toml::file(toml_path));
        }
        let json_path = root.join(CONFIG_FILES[1]);
        if json_path.exists() {
            figment = figment.merge(Json::file(json_path));
        }

        // Env keys arrive as lowercase snake_case; fields are camelCase.
        figment.merge(Env::prefixed(ENV_PREFIX).map(|key| camel_case(key.as_str()).into()))
    }

    /// Load and validate the configuration for a project root.
    pub fn load(root: &Path) -> Result<Self> {
        Self::from_figment(Self::figment(root))
    }

    /// Extract and validate a configuration from any figment.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        config.validate()?;
        tracing::debug!(
            platform = ?config.platform,
            output_dir = %config.output_dir.display(),
            "loaded build configuration"
        );
        Ok(config)
    }

    /// Output directory resolved against `root` when relative.
    pub fn output_dir_in(&self, root: &Path) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            root.join(&self.output_dir)
        }
    }
}
