//! End-to-end client builds into a temporary directory.

mod helpers;

use std::sync::Arc;

use helpers::{MapTransform, Shared};
use strand_build::client::GRAPH_SNAPSHOT_FILE;
use strand_build::{
    BuildConfig, ClientBuild, ConfigError, DependencyGraph, Error, Platform, RootSet,
};
use strand_graph::GraphSnapshot;
use tempfile::TempDir;

fn site_transform() -> Arc<MapTransform> {
    Arc::new(
        MapTransform::new()
            .module(
                "./routes/index.tsx",
                ["./style/app.css", "https://esm.sh/react@18.2.0"],
            )
            .module("./main.tsx", ["./routes/index.tsx"]),
    )
}

fn site_roots() -> RootSet {
    let mut roots = RootSet::new();
    roots.add_entry_links(["/main.tsx", "https://cdn.example.com/x.js", "favicon.ico"]);
    roots.add_route("./routes/index.tsx");
    roots
}

#[tokio::test]
async fn writes_closure_and_graph_snapshot() {
    let project = TempDir::new().expect("temp dir");
    let transform = site_transform();
    let build = ClientBuild::new(
        project.path(),
        BuildConfig::default(),
        Shared(Arc::clone(&transform)),
    );

    let output = build.run(site_roots()).await.expect("build should succeed");

    assert!(output.report.is_success(), "{:?}", output.report.failures);
    let dist = project.path().join("dist");
    assert_eq!(output.output_dir, dist);
    for file in [
        "main.tsx",
        "routes/index.tsx",
        "style/app.css",
        "style/app.css.js",
        "-/esm.sh/react@18.2.0.js",
    ] {
        assert!(dist.join(file).is_file(), "missing {file}");
    }
    assert_eq!(transform.call_count("./routes/index.tsx"), 1);

    let snapshot = std::fs::read_to_string(dist.join(GRAPH_SNAPSHOT_FILE)).unwrap();
    assert_eq!(output.graph_snapshot, dist.join(GRAPH_SNAPSHOT_FILE));
    let json = snapshot
        .strip_prefix("export default ")
        .expect("snapshot is an ES module");
    let snapshot = GraphSnapshot::from_json(json).unwrap();
    let index = snapshot.get("./routes/index.tsx").unwrap();
    assert!(index.depends_on("./style/app.css"));
    assert!(snapshot.modules.iter().all(|m| m.source_code.is_empty()));

    // The server side rebuilds the same graph from it
    let graph = DependencyGraph::from_snapshot(snapshot);
    assert_eq!(
        graph.dependents_of("./style/app.css"),
        vec!["./routes/index.tsx", "./main.tsx"]
    );
}

#[tokio::test]
async fn previous_output_is_cleared() {
    let project = TempDir::new().expect("temp dir");
    let dist = project.path().join("out");
    std::fs::create_dir_all(dist.join("old")).unwrap();
    std::fs::write(dist.join("old/stale.js"), "stale").unwrap();
    std::fs::write(dist.join("stale.js"), "stale").unwrap();

    let config = BuildConfig {
        output_dir: "out".into(),
        ..BuildConfig::default()
    };
    ClientBuild::new(project.path(), config, MapTransform::new())
        .run(RootSet::from_iter(["./main.tsx"]))
        .await
        .expect("build should succeed");

    assert!(!dist.join("stale.js").exists());
    assert!(!dist.join("old").exists());
    assert!(dist.join("main.tsx").is_file());
}

#[tokio::test]
async fn unsupported_platform_aborts_before_building() {
    let project = TempDir::new().expect("temp dir");
    let transform = site_transform();
    let config = BuildConfig {
        platform: Platform::Vercel,
        ..BuildConfig::default()
    };

    let err = ClientBuild::new(project.path(), config, Shared(Arc::clone(&transform)))
        .run(site_roots())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::UnsupportedPlatform(Platform::Vercel))
    ));
    assert!(transform.calls().is_empty());
    assert!(!project.path().join("dist").exists());
}

#[tokio::test]
async fn oversized_concurrency_is_a_config_error() {
    let project = TempDir::new().expect("temp dir");
    let transform = site_transform();
    let config = BuildConfig {
        max_concurrency: Some(1 << 62),
        ..BuildConfig::default()
    };

    let err = ClientBuild::new(project.path(), config, Shared(Arc::clone(&transform)))
        .run(site_roots())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue { ref field, .. }) if field == "maxConcurrency"
    ));
    assert!(transform.calls().is_empty());
}

#[tokio::test]
async fn style_entry_is_always_built() {
    let project = TempDir::new().expect("temp dir");
    let config = BuildConfig {
        style_entry: Some("./style/global.css".to_string()),
        max_concurrency: Some(2),
        ..BuildConfig::default()
    };

    let output = ClientBuild::new(project.path(), config, MapTransform::new())
        .run(RootSet::new())
        .await
        .expect("build should succeed");

    assert!(output.report.built("./style/global.css"));
    assert!(output.output_dir.join("style/global.css").is_file());
}

#[tokio::test]
async fn escaping_specifier_fails_alone() {
    let project = TempDir::new().expect("temp dir");
    let transform = MapTransform::new().module("./main.tsx", ["../../secret.ts", "./ok.ts"]);

    let output = ClientBuild::new(project.path(), BuildConfig::default(), transform)
        .run(RootSet::from_iter(["./main.tsx"]))
        .await
        .expect("build should succeed");

    assert_eq!(
        output.report.failed_specifiers().collect::<Vec<_>>(),
        vec!["../../secret.ts"]
    );
    assert!(output.report.built("./ok.ts"));
    assert!(!project.path().join("secret.ts").exists());
}
