//! Fakenet core library: synthetic interaction networks from triangulated
//! point sets.
//!
//! The generator works in stages. [`DigraphBuilder`] turns the simplices of
//! a radially ordered [`Triangulation`] into an outward [`DirectedGraph`], a
//! [`PruneEdges`] strategy thins it, and [`relabel`] swaps node indices for
//! synthetic identifiers. [`Pipeline`] runs all three.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod distance;
mod error;
mod geometry;
mod graph;
mod pipeline;
mod prune;
mod relabel;
mod triangulation;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DigraphBuilder, ExecutionStrategy, build_graph},
    distance::{Distance, DistanceError, VectorKind, euclidean_distance},
    error::{
        GraphError, GraphErrorCode, PipelineError, PipelineErrorCode, PluginError,
        PluginErrorCode, PruneError, PruneErrorCode, Result,
    },
    geometry::{PointSet, PointSetError},
    graph::{DirectedGraph, EdgeAttributes, EdgeView, NodeId, NodeKind},
    pipeline::{Pipeline, PipelineBuilder, PipelineOutput},
    prune::{
        DiscoveredPlugin, Discovery, KeepAll, MANIFEST_SUFFIX, NearestParents, PLUGIN_CATEGORY,
        ParameterError, PluginInfo, PluginLoadFailure, PluginManifest, PreferentialAttachment,
        PruneEdges, PruneReport, RandomThinning, StrategyConstructor, StrategyParameters,
        StrategyRegistry, discover, prune_checked,
    },
    relabel::{
        LabeledEdge, LabeledGraph, LabeledNode, NUMERIC_MARKER, assign_identifiers, letter_code,
        relabel,
    },
    triangulation::{
        DistributionError, PointDistribution, SeededPoints, Simplex, Triangulation,
        TriangulationError, Triangulator,
    },
};
