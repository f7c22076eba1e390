//! Pluggable edge-pruning strategies.
//!
//! A strategy takes ownership of the built digraph and hands back a graph
//! with a subset of its edges. [`DirectedGraph`] exposes no way to add nodes,
//! add edges, or change weights, so the only thing a strategy can do is remove
//! or annotate. [`prune_checked`] additionally verifies the result for
//! strategies that rebuild the graph from a clone.
//!
//! Strategies are found through a [`StrategyRegistry`] of named constructors
//! and, optionally, JSON manifests discovered on disk (see [`discover`]).

mod discovery;
mod manifest;
mod registry;
mod strategies;

use tracing::{Span, field, info, instrument};

use crate::{error::PruneError, graph::DirectedGraph};

pub use self::discovery::{DiscoveredPlugin, Discovery, PluginLoadFailure, discover};
pub use self::manifest::{MANIFEST_SUFFIX, PLUGIN_CATEGORY, PluginInfo, PluginManifest};
pub use self::registry::{ParameterError, StrategyConstructor, StrategyParameters, StrategyRegistry};
pub use self::strategies::{
    KeepAll, NearestParents, PreferentialAttachment, RandomThinning,
};

/// Edge-pruning strategy applied to a freshly built digraph.
///
/// Implementations receive the graph by value and return it, so a strategy
/// cannot be invoked twice on the same instance. Every strategy must provide
/// [`prune`](PruneEdges::prune); there is no default.
///
/// # Examples
/// ```
/// use fakenet_core::{DirectedGraph, PruneEdges};
///
/// /// Drops every edge longer than a fixed radius.
/// struct ShortEdges(f64);
///
/// impl PruneEdges for ShortEdges {
///     fn name(&self) -> &str { "short-edges" }
///
///     fn prune(&self, mut graph: DirectedGraph) -> DirectedGraph {
///         graph.retain_edges(|edge| edge.weight() <= self.0);
///         graph
///     }
/// }
///
/// let strategy = ShortEdges(1.0);
/// assert_eq!(strategy.name(), "short-edges");
/// ```
pub trait PruneEdges: Send + Sync {
    /// Returns the name the strategy is registered under.
    fn name(&self) -> &str;

    /// Removes zero or more edges from `graph` and returns it.
    fn prune(&self, graph: DirectedGraph) -> DirectedGraph;
}

impl<T: PruneEdges + ?Sized> PruneEdges for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn prune(&self, graph: DirectedGraph) -> DirectedGraph {
        (**self).prune(graph)
    }
}

/// Summary of a single pruning pass.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PruneReport {
    /// Name of the strategy that ran.
    pub strategy: String,
    /// Edge count handed to the strategy.
    pub edges_before: usize,
    /// Edge count returned by the strategy.
    pub edges_after: usize,
}

impl PruneReport {
    /// Returns how many edges the strategy removed.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.edges_before.saturating_sub(self.edges_after)
    }
}

/// Runs `strategy` and verifies that it only removed edges.
///
/// # Errors
/// Returns [`PruneError::NodeSetChanged`] when the node count or any node kind
/// differs from the input, and [`PruneError::EdgeIntroduced`] when the output
/// holds an edge absent from the input or with a different weight.
///
/// # Examples
/// ```
/// use fakenet_core::{KeepAll, PointSet, Simplex, build_graph, prune_checked};
///
/// let points = PointSet::try_from_rows([[0.0], [1.0], [2.0]])?;
/// let graph = build_graph(&points, &[Simplex::from([0, 1, 2])], 1)?;
/// let (pruned, report) = prune_checked(&KeepAll, graph)?;
/// assert_eq!(pruned.edge_count(), 3);
/// assert_eq!(report.removed(), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "prune.apply",
    err,
    skip_all,
    fields(strategy = %strategy.name(), edges_before = graph.edge_count(), edges_after = field::Empty),
)]
pub fn prune_checked(
    strategy: &dyn PruneEdges,
    graph: DirectedGraph,
) -> Result<(DirectedGraph, PruneReport), PruneError> {
    let before = graph.clone();
    let pruned = strategy.prune(graph);
    verify_subgraph(strategy.name(), &before, &pruned)?;

    let report = PruneReport {
        strategy: strategy.name().to_owned(),
        edges_before: before.edge_count(),
        edges_after: pruned.edge_count(),
    };
    Span::current().record("edges_after", report.edges_after);
    #[cfg(feature = "metrics")]
    metrics::counter!("fakenet_edges_pruned").increment(report.removed() as u64);
    info!(
        strategy = %report.strategy,
        removed = report.removed(),
        "pruning completed"
    );
    Ok((pruned, report))
}

fn verify_subgraph(
    strategy: &str,
    before: &DirectedGraph,
    after: &DirectedGraph,
) -> Result<(), PruneError> {
    let same_nodes = before.node_count() == after.node_count()
        && before.nodes().zip(after.nodes()).all(|(l, r)| l == r)
        && before.points() == after.points();
    if !same_nodes {
        return Err(PruneError::NodeSetChanged {
            strategy: strategy.to_owned(),
            before: before.node_count(),
            after: after.node_count(),
        });
    }
    for edge in after.edges() {
        let original = before.edge(edge.source(), edge.target());
        if original.is_none_or(|original| original.weight().to_bits() != edge.weight().to_bits()) {
            return Err(PruneError::EdgeIntroduced {
                strategy: strategy.to_owned(),
                source_node: edge.source(),
                target_node: edge.target(),
            });
        }
    }
    Ok(())
}
