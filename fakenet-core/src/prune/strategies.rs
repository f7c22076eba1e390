//! Built-in pruning strategies.
//!
//! Every strategy visits targets in ascending node order and, within a
//! target, predecessors in ascending order, so a fixed seed always yields the
//! same graph.

use std::cmp::Ordering;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use tracing::debug;

use crate::graph::{DirectedGraph, NodeId};

use super::{PruneEdges, registry::ParameterError};

/// Identity strategy: returns the graph unchanged.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeepAll;

impl KeepAll {
    /// Registry name.
    pub const NAME: &'static str = "keep-all";
}

impl PruneEdges for KeepAll {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prune(&self, graph: DirectedGraph) -> DirectedGraph {
        graph
    }
}

/// Keeps, for every node, only its `max_parents` shortest incoming edges.
///
/// Ties on weight go to the lower source index.
///
/// # Examples
/// ```
/// use fakenet_core::{NearestParents, PointSet, PruneEdges, Simplex, build_graph};
///
/// let points = PointSet::try_from_rows([[0.0], [1.0], [3.0]])?;
/// let graph = build_graph(&points, &[Simplex::from([0, 1, 2])], 1)?;
/// let pruned = NearestParents::new(1)?.prune(graph);
/// assert!(pruned.contains_edge(1, 2));
/// assert!(!pruned.contains_edge(0, 2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NearestParents {
    max_parents: usize,
}

impl NearestParents {
    /// Registry name.
    pub const NAME: &'static str = "nearest-parents";
    /// Parent budget used when the parameter is omitted.
    pub const DEFAULT_MAX_PARENTS: usize = 2;

    /// Creates the strategy.
    ///
    /// # Errors
    /// Returns [`ParameterError`] when `max_parents` is zero.
    pub fn new(max_parents: usize) -> Result<Self, ParameterError> {
        if max_parents == 0 {
            return Err(ParameterError::new("max_parents", "must be at least 1"));
        }
        Ok(Self { max_parents })
    }

    /// Returns the per-node parent budget.
    #[must_use]
    pub fn max_parents(&self) -> usize {
        self.max_parents
    }
}

impl Default for NearestParents {
    fn default() -> Self {
        Self {
            max_parents: Self::DEFAULT_MAX_PARENTS,
        }
    }
}

impl PruneEdges for NearestParents {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prune(&self, mut graph: DirectedGraph) -> DirectedGraph {
        let mut doomed = Vec::new();
        for (target, predecessors) in graph.predecessor_lists().into_iter().enumerate() {
            if predecessors.len() <= self.max_parents {
                continue;
            }
            let mut ranked = weighted_parents(&graph, target, &predecessors);
            ranked.sort_by(by_weight_then_source);
            doomed.extend(
                ranked
                    .into_iter()
                    .skip(self.max_parents)
                    .map(|(source, _)| (source, target)),
            );
        }
        remove_all(&mut graph, &doomed);
        debug!(removed = doomed.len(), strategy = Self::NAME, "parents trimmed");
        graph
    }
}

/// Drops each edge independently with probability `1 - keep_probability`,
/// but never leaves a node that had parents without one.
///
/// When every draw for a node fails, its shortest incoming edge survives.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandomThinning {
    keep_probability: f64,
    seed: u64,
}

impl RandomThinning {
    /// Registry name.
    pub const NAME: &'static str = "random-thinning";
    /// Keep probability used when the parameter is omitted.
    pub const DEFAULT_KEEP_PROBABILITY: f64 = 0.5;

    /// Creates the strategy.
    ///
    /// # Errors
    /// Returns [`ParameterError`] when `keep_probability` lies outside `[0, 1]`.
    pub fn new(keep_probability: f64, seed: u64) -> Result<Self, ParameterError> {
        if !(0.0..=1.0).contains(&keep_probability) {
            return Err(ParameterError::new(
                "keep_probability",
                "must lie within [0, 1]",
            ));
        }
        Ok(Self {
            keep_probability,
            seed,
        })
    }

    /// Returns the per-edge keep probability.
    #[must_use]
    pub fn keep_probability(&self) -> f64 {
        self.keep_probability
    }

    /// Returns the RNG seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PruneEdges for RandomThinning {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prune(&self, mut graph: DirectedGraph) -> DirectedGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut doomed = Vec::new();
        for (target, predecessors) in graph.predecessor_lists().into_iter().enumerate() {
            let kept: Vec<bool> = predecessors
                .iter()
                .map(|_| rng.gen_bool(self.keep_probability))
                .collect();
            let rescued = if kept.iter().any(|&keep| keep) {
                None
            } else {
                weighted_parents(&graph, target, &predecessors)
                    .into_iter()
                    .min_by(by_weight_then_source)
                    .map(|(source, _)| source)
            };
            doomed.extend(
                predecessors
                    .iter()
                    .zip(kept)
                    .filter(|&(&source, keep)| !keep && Some(source) != rescued)
                    .map(|(&source, _)| (source, target)),
            );
        }
        remove_all(&mut graph, &doomed);
        debug!(removed = doomed.len(), strategy = Self::NAME, "edges thinned");
        graph
    }
}

/// Keeps `parents` incoming edges per node, sampled without replacement with
/// probability proportional to `1 +` the number of edges the source has kept
/// so far.
///
/// Nodes are visited in ascending order, so early nodes that win edges become
/// increasingly likely to win more: the retained graph develops hubs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreferentialAttachment {
    parents: usize,
    seed: u64,
}

impl PreferentialAttachment {
    /// Registry name.
    pub const NAME: &'static str = "preferential-attachment";
    /// Parent budget used when the parameter is omitted.
    pub const DEFAULT_PARENTS: usize = 2;

    /// Creates the strategy.
    ///
    /// # Errors
    /// Returns [`ParameterError`] when `parents` is zero.
    pub fn new(parents: usize, seed: u64) -> Result<Self, ParameterError> {
        if parents == 0 {
            return Err(ParameterError::new("parents", "must be at least 1"));
        }
        Ok(Self { parents, seed })
    }

    /// Returns the per-node parent budget.
    #[must_use]
    pub fn parents(&self) -> usize {
        self.parents
    }

    /// Returns the RNG seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl PruneEdges for PreferentialAttachment {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn prune(&self, mut graph: DirectedGraph) -> DirectedGraph {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut retained_out = vec![0_usize; graph.node_count()];
        let mut doomed = Vec::new();

        for (target, mut candidates) in graph.predecessor_lists().into_iter().enumerate() {
            let mut chosen = Vec::with_capacity(self.parents.min(candidates.len()));
            while chosen.len() < self.parents && !candidates.is_empty() {
                let position = sample_position(&mut rng, &candidates, &retained_out);
                let source = candidates.remove(position);
                if let Some(count) = retained_out.get_mut(source) {
                    *count += 1;
                }
                chosen.push(source);
            }
            doomed.extend(candidates.into_iter().map(|source| (source, target)));
        }

        remove_all(&mut graph, &doomed);
        debug!(removed = doomed.len(), strategy = Self::NAME, "parents attached");
        graph
    }
}

fn sample_position(rng: &mut SmallRng, candidates: &[NodeId], retained_out: &[usize]) -> usize {
    let weight = |source: NodeId| 1 + retained_out.get(source).copied().unwrap_or(0);
    let total: usize = candidates.iter().map(|&source| weight(source)).sum();
    let mut ticket = rng.gen_range(0..total);
    for (position, &source) in candidates.iter().enumerate() {
        let share = weight(source);
        if ticket < share {
            return position;
        }
        ticket -= share;
    }
    candidates.len() - 1
}

fn weighted_parents(
    graph: &DirectedGraph,
    target: NodeId,
    predecessors: &[NodeId],
) -> Vec<(NodeId, f64)> {
    predecessors
        .iter()
        .filter_map(|&source| {
            graph
                .edge(source, target)
                .map(|edge| (source, edge.weight()))
        })
        .collect()
}

fn by_weight_then_source(left: &(NodeId, f64), right: &(NodeId, f64)) -> Ordering {
    left.1.total_cmp(&right.1).then(left.0.cmp(&right.0))
}

fn remove_all(graph: &mut DirectedGraph, edges: &[(NodeId, NodeId)]) {
    for &(source, target) in edges {
        graph.remove_edge(source, target);
    }
}
