//! Error types for the fakenet core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

use crate::{
    builder::ExecutionStrategy,
    distance::DistanceError,
    graph::NodeId,
    triangulation::{DistributionError, TriangulationError},
};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($pattern:tt)* } )?
                    $( ( $($tuple:tt)* ) )?
                    => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// Error raised while building the outward digraph.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// The builder received no points.
    #[error("point set contains no points")]
    EmptyPointSet,
    /// More seeds were requested than there are points.
    #[error("seed count {seeds} exceeds the {points} available points")]
    InsufficientSeeds {
        /// Requested number of seed points.
        seeds: usize,
        /// Number of points in the set.
        points: usize,
    },
    /// A simplex referenced a point that does not exist.
    #[error("simplex {simplex} references point {index}, but only {point_count} points exist")]
    SimplexIndexOutOfBounds {
        /// Position of the offending simplex.
        simplex: usize,
        /// The out-of-range point index.
        index: NodeId,
        /// Number of points in the set.
        point_count: usize,
    },
    /// Weighting an edge failed.
    #[error("failed to weight edge ({source_node}, {target_node}): {error}")]
    Distance {
        /// Source endpoint of the edge being weighted.
        source_node: NodeId,
        /// Target endpoint of the edge being weighted.
        target_node: NodeId,
        /// Underlying geometry error.
        #[source]
        error: DistanceError,
    },
    /// The requested execution strategy is unavailable in the current build.
    #[error("the requested execution strategy {requested:?} is not available in this build")]
    BackendUnavailable {
        /// Strategy that could not be satisfied by the current build.
        requested: ExecutionStrategy,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// The builder received no points.
        EmptyPointSet => EmptyPointSet => "GRAPH_EMPTY_POINT_SET",
        /// More seeds were requested than there are points.
        InsufficientSeeds => InsufficientSeeds { .. } => "GRAPH_INSUFFICIENT_SEEDS",
        /// A simplex referenced a point that does not exist.
        SimplexIndexOutOfBounds => SimplexIndexOutOfBounds { .. } => "GRAPH_SIMPLEX_INDEX_OUT_OF_BOUNDS",
        /// Weighting an edge failed.
        Distance => Distance { .. } => "GRAPH_DISTANCE_FAILURE",
        /// The requested execution strategy is unavailable in the current build.
        BackendUnavailable => BackendUnavailable { .. } => "GRAPH_BACKEND_UNAVAILABLE",
    }
}

/// Error raised while locating or instantiating a pruning strategy.
///
/// During discovery these are collected per candidate rather than aborting the
/// scan; see [`crate::PluginLoadFailure`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PluginError {
    /// A configured plugin location does not exist.
    #[error("plugin location `{path}` does not exist")]
    MissingLocation {
        /// The configured location.
        path: PathBuf,
    },
    /// Walking a plugin location failed.
    #[error("failed to scan `{path}`: {source}")]
    Walk {
        /// Location being scanned.
        path: PathBuf,
        /// Underlying directory walk error.
        #[source]
        source: walkdir::Error,
    },
    /// A manifest could not be read.
    #[error("failed to read manifest `{path}`: {source}")]
    Io {
        /// Manifest path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A manifest was not valid JSON or lacked required fields.
    #[error("malformed manifest `{path}`: {source}")]
    MalformedManifest {
        /// Manifest path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// No registered strategy matches the requested name.
    #[error("no pruning strategy named `{name}` is registered")]
    UnknownStrategy {
        /// Requested strategy name.
        name: String,
    },
    /// A strategy rejected one of its parameters.
    #[error("strategy `{strategy}` rejected parameter `{parameter}`: {reason}")]
    InvalidParameter {
        /// Strategy being instantiated.
        strategy: String,
        /// Offending parameter name.
        parameter: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// A strategy name was already registered.
    #[error("a pruning strategy named `{name}` is already registered")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`PluginError`] variants.
    enum PluginErrorCode for PluginError {
        /// A configured plugin location does not exist.
        MissingLocation => MissingLocation { .. } => "PLUGIN_MISSING_LOCATION",
        /// Walking a plugin location failed.
        Walk => Walk { .. } => "PLUGIN_WALK_FAILED",
        /// A manifest could not be read.
        Io => Io { .. } => "PLUGIN_IO",
        /// A manifest was not valid JSON or lacked required fields.
        MalformedManifest => MalformedManifest { .. } => "PLUGIN_MALFORMED_MANIFEST",
        /// No registered strategy matches the requested name.
        UnknownStrategy => UnknownStrategy { .. } => "PLUGIN_UNKNOWN_STRATEGY",
        /// A strategy rejected one of its parameters.
        InvalidParameter => InvalidParameter { .. } => "PLUGIN_INVALID_PARAMETER",
        /// A strategy or plugin name was already taken.
        DuplicateName => DuplicateName { .. } => "PLUGIN_DUPLICATE_NAME",
    }
}

/// Error raised when a pruning strategy returns a graph that breaks the
/// pruning contract.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PruneError {
    /// The returned graph does not have the input's node set.
    #[error("strategy `{strategy}` changed the node set ({before} nodes before, {after} after)")]
    NodeSetChanged {
        /// Offending strategy.
        strategy: String,
        /// Node count handed to the strategy.
        before: usize,
        /// Node count returned by the strategy.
        after: usize,
    },
    /// The returned graph contains an edge that was not in the input, or whose
    /// weight differs from the input.
    #[error("strategy `{strategy}` introduced or reweighted edge ({source_node}, {target_node})")]
    EdgeIntroduced {
        /// Offending strategy.
        strategy: String,
        /// Source endpoint of the edge.
        source_node: NodeId,
        /// Target endpoint of the edge.
        target_node: NodeId,
    },
}

define_error_codes! {
    /// Stable codes describing [`PruneError`] variants.
    enum PruneErrorCode for PruneError {
        /// The returned graph does not have the input's node set.
        NodeSetChanged => NodeSetChanged { .. } => "PRUNE_NODE_SET_CHANGED",
        /// The returned graph contains a new or reweighted edge.
        EdgeIntroduced => EdgeIntroduced { .. } => "PRUNE_EDGE_INTRODUCED",
    }
}

/// Error raised by [`crate::Pipeline`] and its builder.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum PipelineError {
    /// The identifier prefix would make letter identifiers look numeric.
    #[error("identifier prefix `{prefix}` must not start with `@`")]
    InvalidPrefix {
        /// The rejected prefix.
        prefix: String,
    },
    /// The point-distribution collaborator failed.
    #[error(transparent)]
    Distribution(#[from] DistributionError),
    /// The triangulation collaborator failed.
    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
    /// Building the outward digraph failed.
    #[error(transparent)]
    Graph(#[from] GraphError),
    /// Connectivity was required but the built graph falls apart.
    #[error("built graph has {components} weakly connected components; expected 1")]
    Disconnected {
        /// Number of weakly connected components.
        components: usize,
    },
    /// The pruning strategy broke its contract.
    #[error(transparent)]
    Prune(#[from] PruneError),
}

define_error_codes! {
    /// Stable codes describing [`PipelineError`] variants.
    enum PipelineErrorCode for PipelineError {
        /// The identifier prefix is invalid.
        InvalidPrefix => InvalidPrefix { .. } => "PIPELINE_INVALID_PREFIX",
        /// The point-distribution collaborator failed.
        Distribution => Distribution(_) => "PIPELINE_DISTRIBUTION_FAILED",
        /// The triangulation collaborator failed.
        Triangulation => Triangulation(_) => "PIPELINE_TRIANGULATION_FAILED",
        /// Building the outward digraph failed.
        Graph => Graph(_) => "PIPELINE_GRAPH_FAILED",
        /// The built graph is not weakly connected.
        Disconnected => Disconnected { .. } => "PIPELINE_DISCONNECTED",
        /// The pruning strategy broke its contract.
        Prune => Prune(_) => "PIPELINE_PRUNE_FAILED",
    }
}

impl PipelineError {
    /// Returns the most specific stable code available: the wrapped error's
    /// code when it has one, otherwise this error's own code.
    #[must_use]
    pub const fn detail_code(&self) -> &'static str {
        match self {
            Self::Graph(error) => error.code().as_str(),
            Self::Prune(error) => error.code().as_str(),
            _ => self.code().as_str(),
        }
    }
}

/// Convenient alias for results returned by the builder.
pub type Result<T> = core::result::Result<T, GraphError>;
