use std::{fs, path::Path};

use fakenet_core::{
    ParameterError, PluginError, PruneEdges, StrategyParameters, StrategyRegistry, discover,
};
use fakenet_test_support::tracing::RecordingLayer;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn write(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).expect("manifest must be written");
}

#[fixture]
fn plugin_dir() -> TempDir {
    tempfile::tempdir().expect("temp dir must be created")
}

#[rstest]
fn empty_location_yields_empty_collection(plugin_dir: TempDir) {
    write(plugin_dir.path(), "notes.txt", "not a manifest");
    let discovery = discover(&[plugin_dir.path()], &StrategyRegistry::builtin());
    assert!(discovery.is_empty());
    assert!(discovery.failures().is_empty());
}

#[rstest]
fn loads_conforming_manifests_recursively(plugin_dir: TempDir) {
    let nested = plugin_dir.path().join("nested");
    fs::create_dir(&nested).expect("nested dir must be created");
    write(
        plugin_dir.path(),
        "a.pruner.json",
        r#"{"name": "tree", "category": "PruneEdges", "strategy": "nearest-parents",
            "description": "one parent each", "version": "1.0",
            "parameters": {"max_parents": 1}}"#,
    );
    write(
        &nested,
        "b.pruner.json",
        r#"{"name": "sparse", "category": "PruneEdges", "strategy": "random-thinning",
            "parameters": {"keep_probability": 0.2, "seed": 4}}"#,
    );

    let discovery = discover(&[plugin_dir.path()], &StrategyRegistry::builtin());

    let names: Vec<_> = discovery.iter().map(|plugin| plugin.info.name.as_str()).collect();
    assert_eq!(names, ["tree", "sparse"]);
    let tree = discovery.get("tree").expect("tree must load");
    assert_eq!(tree.strategy.name(), "nearest-parents");
    assert_eq!(tree.info.version.as_deref(), Some("1.0"));
    assert_eq!(
        tree.info.path.as_deref(),
        Some(plugin_dir.path().join("a.pruner.json").as_path())
    );
}

#[rstest]
fn skips_other_categories_silently(plugin_dir: TempDir) {
    write(
        plugin_dir.path(),
        "layout.pruner.json",
        r#"{"name": "layout", "category": "LayoutGraph", "strategy": "keep-all"}"#,
    );
    let discovery = discover(&[plugin_dir.path()], &StrategyRegistry::builtin());
    assert!(discovery.is_empty());
    assert!(discovery.failures().is_empty());
}

#[rstest]
fn failures_do_not_abort_discovery(plugin_dir: TempDir) {
    write(plugin_dir.path(), "1-broken.pruner.json", "{ not json");
    write(
        plugin_dir.path(),
        "2-unknown.pruner.json",
        r#"{"name": "ghost", "category": "PruneEdges", "strategy": "no-such-strategy"}"#,
    );
    write(
        plugin_dir.path(),
        "3-invalid.pruner.json",
        r#"{"name": "bad", "category": "PruneEdges", "strategy": "nearest-parents",
            "parameters": {"max_parents": 0}}"#,
    );
    write(
        plugin_dir.path(),
        "4-good.pruner.json",
        r#"{"name": "good", "category": "PruneEdges", "strategy": "keep-all"}"#,
    );
    write(
        plugin_dir.path(),
        "5-duplicate.pruner.json",
        r#"{"name": "good", "category": "PruneEdges", "strategy": "nearest-parents"}"#,
    );
    let missing = plugin_dir.path().join("missing");

    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let discovery = tracing::subscriber::with_default(subscriber, || {
        discover(
            &[plugin_dir.path(), missing.as_path()],
            &StrategyRegistry::builtin(),
        )
    });

    let loaded: Vec<_> = discovery
        .iter()
        .map(|plugin| (plugin.info.name.as_str(), plugin.strategy.name()))
        .collect();
    assert_eq!(loaded, [("good", "keep-all"), ("good", "nearest-parents")]);
    assert_eq!(
        discovery.get("good").map(|plugin| plugin.strategy.name()),
        Some("keep-all")
    );
    let codes: Vec<_> = discovery
        .failures()
        .iter()
        .map(|failure| failure.error.code().as_str())
        .collect();
    assert_eq!(
        codes,
        [
            "PLUGIN_MALFORMED_MANIFEST",
            "PLUGIN_UNKNOWN_STRATEGY",
            "PLUGIN_INVALID_PARAMETER",
            "PLUGIN_MISSING_LOCATION",
        ]
    );
    assert_eq!(discovery.failures()[3].path, missing);
    assert_eq!(layer.events_at(Level::WARN).len(), 4);

    let span = layer.find_span("prune.discover").expect("discover span");
    assert_eq!(span.fields.get("plugins"), Some(&"2".to_owned()));
    assert_eq!(span.fields.get("failures"), Some(&"4".to_owned()));
}

#[rstest]
fn custom_registrations_are_discoverable(plugin_dir: TempDir) {
    struct DropAll;

    impl PruneEdges for DropAll {
        fn name(&self) -> &str {
            "drop-all"
        }

        fn prune(&self, mut graph: fakenet_core::DirectedGraph) -> fakenet_core::DirectedGraph {
            graph.retain_edges(|_| false);
            graph
        }
    }

    let mut registry = StrategyRegistry::builtin();
    registry
        .register("drop-all", |parameters: &StrategyParameters| {
            if let Some(key) = parameters.keys().next() {
                return Err(ParameterError::new(key.as_str(), "is not recognised"));
            }
            Ok(Box::new(DropAll) as Box<dyn PruneEdges>)
        })
        .expect("name must be free");
    write(
        plugin_dir.path(),
        "drop.pruner.json",
        r#"{"name": "nothing", "category": "PruneEdges", "strategy": "drop-all"}"#,
    );

    let discovery = discover(&[plugin_dir.path()], &registry);
    assert_eq!(
        discovery.get("nothing").map(|plugin| plugin.strategy.name()),
        Some("drop-all")
    );
    assert!(matches!(
        registry.register("drop-all", |_: &StrategyParameters| Ok(Box::new(DropAll) as Box<dyn PruneEdges>)),
        Err(PluginError::DuplicateName { .. })
    ));
}

#[rstest]
fn a_single_manifest_file_is_a_valid_location(plugin_dir: TempDir) {
    write(
        plugin_dir.path(),
        "only.pruner.json",
        r#"{"name": "only", "category": "PruneEdges", "strategy": "keep-all"}"#,
    );
    let manifest = plugin_dir.path().join("only.pruner.json");
    let discovery = discover(&[manifest], &StrategyRegistry::builtin());
    assert!(discovery.get("only").is_some());
}
