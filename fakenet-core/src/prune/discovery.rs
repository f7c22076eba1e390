//! Manifest-driven discovery of pruning strategies.
//!
//! Each configured location is walked recursively for `*.pruner.json` files.
//! Manifests declaring the `PruneEdges` category are instantiated through a
//! [`StrategyRegistry`]; anything that goes wrong is recorded against the
//! offending path and the scan carries on.

use std::path::{Path, PathBuf};

use tracing::{Span, debug, field, instrument, warn};
use walkdir::WalkDir;

use crate::error::PluginError;

use super::{
    PruneEdges,
    manifest::{PluginInfo, PluginManifest, is_manifest},
    registry::StrategyRegistry,
};

/// A strategy instantiated from a manifest.
pub struct DiscoveredPlugin {
    /// Manifest metadata.
    pub info: PluginInfo,
    /// The live strategy instance.
    pub strategy: Box<dyn PruneEdges>,
}

impl std::fmt::Debug for DiscoveredPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveredPlugin")
            .field("info", &self.info)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

/// A candidate that could not be loaded.
#[derive(Debug)]
pub struct PluginLoadFailure {
    /// Location or manifest the failure is attributed to.
    pub path: PathBuf,
    /// What went wrong.
    pub error: PluginError,
}

/// Result of a discovery pass.
///
/// Owns every loaded strategy; dropping it releases them.
#[derive(Debug, Default)]
pub struct Discovery {
    plugins: Vec<DiscoveredPlugin>,
    failures: Vec<PluginLoadFailure>,
}

impl Discovery {
    /// Returns the plugin registered under the manifest name `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DiscoveredPlugin> {
        self.plugins.iter().find(|plugin| plugin.info.name == name)
    }

    /// Iterates over the loaded plugins in discovery order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &DiscoveredPlugin> + '_ {
        self.plugins.iter()
    }

    /// Returns the per-candidate failures in discovery order.
    #[must_use]
    pub fn failures(&self) -> &[PluginLoadFailure] {
        &self.failures
    }

    /// Returns the number of loaded plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns whether no plugin was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Consumes the discovery, returning the loaded plugins.
    #[must_use]
    pub fn into_plugins(self) -> Vec<DiscoveredPlugin> {
        self.plugins
    }

    fn fail(&mut self, path: &Path, error: PluginError) {
        warn!(
            path = %path.display(),
            code = %error.code(),
            error = %error,
            "plugin candidate skipped"
        );
        self.failures.push(PluginLoadFailure {
            path: path.to_path_buf(),
            error,
        });
    }
}

/// Scans `locations` for plugin manifests and instantiates them.
///
/// Locations are visited in the order given; files within a location are
/// visited in file-name order. Every conforming manifest is loaded, even when
/// its name repeats an earlier one; [`Discovery::get`] returns the first.
/// Manifests whose category is not `PruneEdges` are ignored.
///
/// # Examples
/// ```
/// use fakenet_core::{StrategyRegistry, discover};
///
/// let dir = tempfile::tempdir()?;
/// std::fs::write(
///     dir.path().join("tree.pruner.json"),
///     r#"{"name": "tree", "category": "PruneEdges", "strategy": "nearest-parents",
///         "parameters": {"max_parents": 1}}"#,
/// )?;
/// let discovery = discover(&[dir.path()], &StrategyRegistry::builtin());
/// assert_eq!(discovery.len(), 1);
/// assert!(discovery.get("tree").is_some());
/// # Ok::<(), std::io::Error>(())
/// ```
#[instrument(
    name = "prune.discover",
    skip_all,
    fields(locations = locations.len(), plugins = field::Empty, failures = field::Empty),
)]
pub fn discover<P: AsRef<Path>>(locations: &[P], registry: &StrategyRegistry) -> Discovery {
    let mut discovery = Discovery::default();

    for location in locations {
        let location = location.as_ref();
        if !location.exists() {
            discovery.fail(
                location,
                PluginError::MissingLocation {
                    path: location.to_path_buf(),
                },
            );
            continue;
        }
        scan_location(location, registry, &mut discovery);
    }

    let span = Span::current();
    span.record("plugins", discovery.len());
    span.record("failures", discovery.failures.len());
    discovery
}

fn scan_location(
    location: &Path,
    registry: &StrategyRegistry,
    discovery: &mut Discovery,
) {
    let walker = WalkDir::new(location)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                let path = source.path().unwrap_or(location).to_path_buf();
                let error = PluginError::Walk {
                    path: path.clone(),
                    source,
                };
                discovery.fail(&path, error);
                continue;
            }
        };
        if !entry.file_type().is_file() || !is_manifest(entry.path()) {
            continue;
        }
        match load_candidate(entry.path(), registry) {
            Ok(Some(plugin)) => {
                if discovery.get(&plugin.info.name).is_some() {
                    debug!(
                        name = %plugin.info.name,
                        path = %entry.path().display(),
                        "plugin name already loaded; lookups return the earlier one"
                    );
                }
                debug!(
                    name = %plugin.info.name,
                    strategy = %plugin.info.strategy,
                    path = %entry.path().display(),
                    "plugin loaded"
                );
                discovery.plugins.push(plugin);
            }
            Ok(None) => {}
            Err(error) => discovery.fail(entry.path(), error),
        }
    }
}

fn load_candidate(
    path: &Path,
    registry: &StrategyRegistry,
) -> Result<Option<DiscoveredPlugin>, PluginError> {
    let manifest = PluginManifest::load(path)?;
    if !manifest.is_prune_edges() {
        debug!(
            path = %path.display(),
            category = %manifest.category,
            "manifest declares another category; ignoring"
        );
        return Ok(None);
    }
    let strategy = registry.instantiate(&manifest.strategy, &manifest.parameters)?;
    Ok(Some(DiscoveredPlugin {
        info: PluginInfo::from_manifest(&manifest, path),
        strategy,
    }))
}
