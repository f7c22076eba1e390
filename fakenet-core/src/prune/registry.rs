//! Named constructors for pruning strategies.

use std::{collections::BTreeMap, fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error;

use crate::error::PluginError;

use super::{
    PruneEdges,
    strategies::{KeepAll, NearestParents, PreferentialAttachment, RandomThinning},
};

/// JSON object holding constructor parameters.
pub type StrategyParameters = serde_json::Map<String, Value>;

/// Builds a strategy instance from its parameters.
pub type StrategyConstructor = Arc<
    dyn Fn(&StrategyParameters) -> Result<Box<dyn PruneEdges>, ParameterError> + Send + Sync,
>;

/// A constructor rejected one of its parameters.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("parameter `{parameter}` {reason}")]
pub struct ParameterError {
    /// Offending parameter name.
    pub parameter: String,
    /// Why the value was rejected.
    pub reason: String,
}

impl ParameterError {
    /// Creates a parameter error.
    #[must_use]
    pub fn new(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Name-indexed set of strategy constructors.
///
/// # Examples
/// ```
/// use fakenet_core::{StrategyParameters, StrategyRegistry};
///
/// let registry = StrategyRegistry::builtin();
/// assert!(registry.contains("keep-all"));
///
/// let mut parameters = StrategyParameters::new();
/// parameters.insert("max_parents".into(), 1.into());
/// let strategy = registry.instantiate("nearest-parents", &parameters)?;
/// assert_eq!(strategy.name(), "nearest-parents");
/// # Ok::<(), fakenet_core::PluginError>(())
/// ```
#[derive(Clone, Default)]
pub struct StrategyRegistry {
    constructors: BTreeMap<String, StrategyConstructor>,
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl StrategyRegistry {
    /// Creates a registry with no strategies.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in strategies.
    #[must_use]
    pub fn builtin() -> Self {
        let mut constructors: BTreeMap<String, StrategyConstructor> = BTreeMap::new();
        constructors.insert(
            KeepAll::NAME.to_owned(),
            constructor(|parameters| {
                reject_unknown(parameters, &[])?;
                Ok(Box::new(KeepAll) as Box<dyn PruneEdges>)
            }),
        );
        constructors.insert(
            NearestParents::NAME.to_owned(),
            constructor(|parameters| {
                reject_unknown(parameters, &["max_parents"])?;
                let max_parents = usize_parameter(
                    parameters,
                    "max_parents",
                    NearestParents::DEFAULT_MAX_PARENTS,
                )?;
                Ok(Box::new(NearestParents::new(max_parents)?) as Box<dyn PruneEdges>)
            }),
        );
        constructors.insert(
            RandomThinning::NAME.to_owned(),
            constructor(|parameters| {
                reject_unknown(parameters, &["keep_probability", "seed"])?;
                let keep_probability = f64_parameter(
                    parameters,
                    "keep_probability",
                    RandomThinning::DEFAULT_KEEP_PROBABILITY,
                )?;
                let seed = u64_parameter(parameters, "seed", 0)?;
                Ok(Box::new(RandomThinning::new(keep_probability, seed)?) as Box<dyn PruneEdges>)
            }),
        );
        constructors.insert(
            PreferentialAttachment::NAME.to_owned(),
            constructor(|parameters| {
                reject_unknown(parameters, &["parents", "seed"])?;
                let parents = usize_parameter(
                    parameters,
                    "parents",
                    PreferentialAttachment::DEFAULT_PARENTS,
                )?;
                let seed = u64_parameter(parameters, "seed", 0)?;
                Ok(Box::new(PreferentialAttachment::new(parents, seed)?) as Box<dyn PruneEdges>)
            }),
        );
        Self { constructors }
    }

    /// Registers a custom constructor under `name`.
    ///
    /// # Errors
    /// Returns [`PluginError::DuplicateName`] when `name` is already taken.
    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<(), PluginError>
    where
        F: Fn(&StrategyParameters) -> Result<Box<dyn PruneEdges>, ParameterError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(PluginError::DuplicateName { name });
        }
        self.constructors.insert(name, self::constructor(constructor));
        Ok(())
    }

    /// Returns the registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.constructors.keys().map(String::as_str)
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Instantiates the strategy registered under `name`.
    ///
    /// # Errors
    /// Returns [`PluginError::UnknownStrategy`] when `name` is not registered
    /// and [`PluginError::InvalidParameter`] when the constructor rejects
    /// `parameters`.
    pub fn instantiate(
        &self,
        name: &str,
        parameters: &StrategyParameters,
    ) -> Result<Box<dyn PruneEdges>, PluginError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| PluginError::UnknownStrategy {
                name: name.to_owned(),
            })?;
        constructor(parameters).map_err(|err| PluginError::InvalidParameter {
            strategy: name.to_owned(),
            parameter: err.parameter,
            reason: err.reason,
        })
    }
}

fn constructor<F>(build: F) -> StrategyConstructor
where
    F: Fn(&StrategyParameters) -> Result<Box<dyn PruneEdges>, ParameterError>
        + Send
        + Sync
        + 'static,
{
    Arc::new(build)
}

fn reject_unknown(parameters: &StrategyParameters, allowed: &[&str]) -> Result<(), ParameterError> {
    match parameters.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(ParameterError::new(key.as_str(), "is not recognised")),
        None => Ok(()),
    }
}

fn usize_parameter(
    parameters: &StrategyParameters,
    name: &str,
    default: usize,
) -> Result<usize, ParameterError> {
    match parameters.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|raw| usize::try_from(raw).ok())
            .ok_or_else(|| ParameterError::new(name, "must be a non-negative integer")),
    }
}

fn u64_parameter(
    parameters: &StrategyParameters,
    name: &str,
    default: u64,
) -> Result<u64, ParameterError> {
    match parameters.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| ParameterError::new(name, "must be a non-negative integer")),
    }
}

fn f64_parameter(
    parameters: &StrategyParameters,
    name: &str,
    default: f64,
) -> Result<f64, ParameterError> {
    match parameters.get(name) {
        None => Ok(default),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| ParameterError::new(name, "must be a number")),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::{ParameterError, StrategyParameters, StrategyRegistry};
    use crate::{error::PluginError, prune::KeepAll};

    fn parameters(value: serde_json::Value) -> StrategyParameters {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[rstest]
    fn builtin_lists_names_in_order() {
        let registry = StrategyRegistry::builtin();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec![
                "keep-all",
                "nearest-parents",
                "preferential-attachment",
                "random-thinning",
            ]
        );
    }

    #[rstest]
    fn empty_registry_knows_nothing() {
        let registry = StrategyRegistry::empty();
        assert_eq!(registry.names().count(), 0);
        let err = registry
            .instantiate("keep-all", &StrategyParameters::new())
            .err().expect("empty registry must fail");
        assert!(matches!(err, PluginError::UnknownStrategy { name } if name == "keep-all"));
    }

    #[rstest]
    #[case::keep_all("keep-all", json!({}))]
    #[case::nearest_default("nearest-parents", json!({}))]
    #[case::nearest("nearest-parents", json!({"max_parents": 3}))]
    #[case::thinning("random-thinning", json!({"keep_probability": 0.25, "seed": 9}))]
    #[case::attachment("preferential-attachment", json!({"parents": 1, "seed": 3}))]
    fn instantiates_builtins(#[case] name: &str, #[case] raw: serde_json::Value) {
        let strategy = StrategyRegistry::builtin()
            .instantiate(name, &parameters(raw))
            .expect("builtin must instantiate");
        assert_eq!(strategy.name(), name);
    }

    #[rstest]
    #[case::zero_parents("nearest-parents", json!({"max_parents": 0}), "max_parents")]
    #[case::negative("nearest-parents", json!({"max_parents": -1}), "max_parents")]
    #[case::probability("random-thinning", json!({"keep_probability": 1.5}), "keep_probability")]
    #[case::text_seed("random-thinning", json!({"seed": "abc"}), "seed")]
    #[case::unknown_key("keep-all", json!({"extra": true}), "extra")]
    #[case::zero_attachment("preferential-attachment", json!({"parents": 0}), "parents")]
    fn rejects_invalid_parameters(
        #[case] name: &str,
        #[case] raw: serde_json::Value,
        #[case] expected: &str,
    ) {
        let err = StrategyRegistry::builtin()
            .instantiate(name, &parameters(raw))
            .err().expect("invalid parameters must fail");
        assert_eq!(err.code().as_str(), "PLUGIN_INVALID_PARAMETER");
        assert!(
            matches!(&err, PluginError::InvalidParameter { strategy, parameter, .. }
                if strategy == name && parameter == expected),
            "unexpected error: {err}"
        );
    }

    #[rstest]
    fn register_rejects_duplicates() {
        let mut registry = StrategyRegistry::builtin();
        registry
            .register("identity", |_: &StrategyParameters| {
                Ok(Box::new(KeepAll) as Box<dyn crate::PruneEdges>)
            })
            .expect("fresh name must register");
        assert!(registry.contains("identity"));
        let err = registry
            .register("keep-all", |_: &StrategyParameters| {
                Err(ParameterError::new("unused", "never called"))
            })
            .expect_err("duplicate must fail");
        assert!(matches!(err, PluginError::DuplicateName { name } if name == "keep-all"));
    }
}
