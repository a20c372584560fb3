//! Tests for layered configuration loading.

use figment::Jail;
use std::path::PathBuf;
use strand_config::{BuildConfig, ConfigDiscovery, ConfigError, Platform};
use tempfile::TempDir;

#[test]
fn defaults_without_config_file() {
    let dir = TempDir::new().expect("tempdir");

    let config = BuildConfig::from_figment(
        figment::Figment::new().merge(figment::providers::Serialized::defaults(
            BuildConfig::default(),
        )),
    )
    .expect("defaults load");

    assert_eq!(config, BuildConfig::default());
    assert_eq!(config.output_dir, PathBuf::from("dist"));
    assert_eq!(config.platform, Platform::Server);
    assert_eq!(config.output_dir_in(dir.path()), dir.path().join("dist"));

    assert!(matches!(
        ConfigDiscovery::new(dir.path()).load(),
        Err(ConfigError::NotFound(_))
    ));
}

#[test]
fn toml_then_json_then_env() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "strand.toml",
            r#"
outputDir = "build"
maxConcurrency = 4
basePath = "/app"
"#,
        )?;
        jail.create_file("strand.json", r#"{ "maxConcurrency": 2 }"#)?;
        jail.set_env("STRAND_BASE_PATH", "/env");

        let discovery = ConfigDiscovery::new(jail.directory());
        assert_eq!(discovery.find().len(), 2);

        let config = discovery.load().expect("load");
        assert_eq!(config.output_dir, PathBuf::from("build"));
        assert_eq!(config.max_concurrency, Some(2));
        assert_eq!(config.base_path, "/env");
        Ok(())
    });
}

#[test]
fn unsupported_platform_fails_load() {
    Jail::expect_with(|jail| {
        jail.create_file("strand.toml", r#"platform = "cloudflare""#)?;

        let err = BuildConfig::load(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedPlatform(Platform::Cloudflare)));
        assert!(err.is_fatal());
        Ok(())
    });
}

#[test]
fn malformed_field_type_is_load_error() {
    Jail::expect_with(|jail| {
        jail.create_file("strand.toml", r#"maxConcurrency = "many""#)?;

        let err = BuildConfig::load(jail.directory()).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
        assert!(!err.is_fatal());
        Ok(())
    });
}
