//! On-disk description of a discoverable pruning strategy.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

use super::registry::StrategyParameters;

/// File-name suffix that marks a plugin manifest.
pub const MANIFEST_SUFFIX: &str = ".pruner.json";

/// Interface category a manifest must declare to be loaded.
pub const PLUGIN_CATEGORY: &str = "PruneEdges";

/// Parsed contents of a `*.pruner.json` file.
///
/// # Examples
/// ```
/// use fakenet_core::PluginManifest;
///
/// let manifest: PluginManifest = serde_json::from_str(r#"{
///     "name": "sparse-tree",
///     "category": "PruneEdges",
///     "strategy": "nearest-parents",
///     "parameters": { "max_parents": 1 }
/// }"#)?;
/// assert_eq!(manifest.strategy, "nearest-parents");
/// assert!(manifest.is_prune_edges());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PluginManifest {
    /// Name the plugin is addressed by.
    pub name: String,
    /// Interface category; only [`PLUGIN_CATEGORY`] is loaded.
    pub category: String,
    /// Registry name of the strategy implementation to instantiate.
    pub strategy: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Constructor parameters forwarded to the registry.
    #[serde(default)]
    pub parameters: StrategyParameters,
}

impl PluginManifest {
    /// Returns whether the manifest declares the pruning interface.
    #[must_use]
    pub fn is_prune_edges(&self) -> bool {
        self.category == PLUGIN_CATEGORY
    }

    /// Reads and parses a manifest file.
    ///
    /// # Errors
    /// Returns [`PluginError::Io`] when the file cannot be read and
    /// [`PluginError::MalformedManifest`] when it is not a valid manifest.
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PluginError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| PluginError::MalformedManifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Metadata describing a loaded strategy.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PluginInfo {
    /// Name the strategy is addressed by.
    pub name: String,
    /// Registry name of the underlying implementation.
    pub strategy: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Free-form version string.
    pub version: Option<String>,
    /// Manifest the strategy was loaded from.
    pub path: Option<PathBuf>,
}

impl PluginInfo {
    pub(crate) fn from_manifest(manifest: &PluginManifest, path: &Path) -> Self {
        Self {
            name: manifest.name.clone(),
            strategy: manifest.strategy.clone(),
            description: manifest.description.clone(),
            version: manifest.version.clone(),
            path: Some(path.to_path_buf()),
        }
    }
}

pub(crate) fn is_manifest(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(MANIFEST_SUFFIX) && name.len() > MANIFEST_SUFFIX.len())
}
