//! Outward digraph construction from a triangulated point set.
//!
//! Every simplex contributes each unordered pair of its members as a
//! candidate edge. Pairs are canonicalized so the lower index is the source,
//! then discarded when degenerate or when the target is a seed. Surviving
//! pairs are inserted once, weighted by the Euclidean distance between their
//! endpoints. Simplices commonly share faces, so repeated pairs are expected
//! and ignored.

#[cfg(feature = "cpu")]
mod parallel;

use tracing::{Span, debug, field, instrument};

use crate::{
    distance::euclidean_distance,
    error::{GraphError, Result},
    geometry::PointSet,
    graph::{DirectedGraph, NodeId},
    triangulation::{Simplex, Triangulation},
};

/// Simplex count from which [`ExecutionStrategy::Auto`] switches to the
/// parallel path.
const PARALLEL_THRESHOLD: usize = 4_096;

/// Indicates how [`DigraphBuilder`] processes simplices.
///
/// Both paths produce identical graphs: the parallel path collects candidate
/// edges per simplex and merges them in simplex order.
///
/// # Examples
/// ```
/// use fakenet_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::Auto;
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Choose the parallel path for large inputs when it is compiled in.
    #[default]
    Auto,
    /// Process simplices one after another on the calling thread.
    Sequential,
    /// Enumerate and weight candidate edges on the Rayon pool.
    Parallel,
}

impl ExecutionStrategy {
    fn resolve(self, simplices: usize) -> Result<Self> {
        match self {
            Self::Sequential => Ok(Self::Sequential),
            Self::Parallel if cfg!(feature = "cpu") => Ok(Self::Parallel),
            Self::Parallel => Err(GraphError::BackendUnavailable { requested: self }),
            Self::Auto if cfg!(feature = "cpu") && simplices >= PARALLEL_THRESHOLD => {
                Ok(Self::Parallel)
            }
            Self::Auto => Ok(Self::Sequential),
        }
    }

    /// Returns the lowercase label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        }
    }
}

/// Canonical, weighted candidate edge produced from a simplex pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct CandidateEdge {
    pub(crate) source: NodeId,
    pub(crate) target: NodeId,
    pub(crate) weight: f64,
}

/// Configures and runs digraph construction.
///
/// # Examples
/// ```
/// use fakenet_core::{DigraphBuilder, ExecutionStrategy, PointSet, Simplex, Triangulation};
///
/// let points = PointSet::try_from_rows([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])?;
/// let triangulation = Triangulation::new(points, vec![Simplex::from([0, 1, 2])]);
/// let graph = DigraphBuilder::new()
///     .with_seed_count(1)
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build(&triangulation)?;
/// assert_eq!(graph.edge_count(), 3);
/// assert_eq!(graph.in_degree(0), 0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct DigraphBuilder {
    seed_count: usize,
    execution_strategy: ExecutionStrategy,
}

impl Default for DigraphBuilder {
    fn default() -> Self {
        Self {
            seed_count: 1,
            execution_strategy: ExecutionStrategy::Auto,
        }
    }
}

impl DigraphBuilder {
    /// Creates a builder with a single seed and automatic execution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of leading points treated as seeds.
    #[must_use]
    pub fn with_seed_count(mut self, seed_count: usize) -> Self {
        self.seed_count = seed_count;
        self
    }

    /// Returns the configured seed count.
    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.seed_count
    }

    /// Sets the execution strategy.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Builds the outward digraph for a triangulation snapshot.
    ///
    /// # Errors
    /// See [`DigraphBuilder::build_from_parts`].
    pub fn build(&self, triangulation: &Triangulation) -> Result<DirectedGraph> {
        self.build_from_parts(triangulation.points(), triangulation.simplices())
    }

    /// Builds the outward digraph from points and the simplices over them.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyPointSet`] when `points` is empty,
    /// [`GraphError::InsufficientSeeds`] when the seed count exceeds the point
    /// count, [`GraphError::SimplexIndexOutOfBounds`] when a simplex names a
    /// missing point, and [`GraphError::BackendUnavailable`] when the parallel
    /// path is requested without the `cpu` feature.
    #[instrument(
        name = "builder.build_graph",
        err,
        skip_all,
        fields(
            points = points.len(),
            simplices = simplices.len(),
            seeds = self.seed_count,
            strategy = field::Empty,
            edges = field::Empty,
        ),
    )]
    pub fn build_from_parts(
        &self,
        points: &PointSet,
        simplices: &[Simplex],
    ) -> Result<DirectedGraph> {
        validate_inputs(points, simplices, self.seed_count)?;
        let strategy = self.execution_strategy.resolve(simplices.len())?;
        let span = Span::current();
        span.record("strategy", field::display(strategy.as_str()));

        let mut graph = DirectedGraph::with_nodes(points.clone(), self.seed_count);
        match strategy {
            #[cfg(feature = "cpu")]
            ExecutionStrategy::Parallel => {
                for edge in parallel::collect_candidates(points, simplices, self.seed_count)? {
                    graph.insert_edge(edge.source, edge.target, edge.weight);
                }
            }
            _ => insert_sequential(&mut graph, points, simplices, self.seed_count)?,
        }

        span.record("edges", graph.edge_count());
        #[cfg(feature = "metrics")]
        metrics::counter!("fakenet_edges_built").increment(graph.edge_count() as u64);
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "outward digraph built"
        );
        Ok(graph)
    }
}

/// Builds the outward digraph with the default execution strategy.
///
/// # Examples
/// ```
/// use fakenet_core::{PointSet, Simplex, build_graph};
///
/// let points = PointSet::try_from_rows([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])?;
/// let simplices = [Simplex::from([0, 1, 2]), Simplex::from([1, 2, 3])];
/// let graph = build_graph(&points, &simplices, 1)?;
/// let edges: Vec<_> = graph.edges().map(|e| (e.source(), e.target())).collect();
/// assert_eq!(edges, [(0, 1), (0, 2), (1, 2), (1, 3), (2, 3)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
/// See [`DigraphBuilder::build_from_parts`].
pub fn build_graph(
    points: &PointSet,
    simplices: &[Simplex],
    seed_count: usize,
) -> Result<DirectedGraph> {
    DigraphBuilder::new()
        .with_seed_count(seed_count)
        .build_from_parts(points, simplices)
}

fn validate_inputs(points: &PointSet, simplices: &[Simplex], seed_count: usize) -> Result<()> {
    if points.is_empty() {
        return Err(GraphError::EmptyPointSet);
    }
    if seed_count > points.len() {
        return Err(GraphError::InsufficientSeeds {
            seeds: seed_count,
            points: points.len(),
        });
    }
    for (position, simplex) in simplices.iter().enumerate() {
        if let Some(&index) = simplex
            .vertices()
            .iter()
            .find(|&&index| index >= points.len())
        {
            return Err(GraphError::SimplexIndexOutOfBounds {
                simplex: position,
                index,
                point_count: points.len(),
            });
        }
    }
    Ok(())
}

/// Orients a simplex pair outward, or drops it when it is degenerate or would
/// give a seed an incoming edge.
pub(crate) fn canonicalize(
    left: NodeId,
    right: NodeId,
    seed_count: usize,
) -> Option<(NodeId, NodeId)> {
    let (source, target) = if left <= right {
        (left, right)
    } else {
        (right, left)
    };
    if source == target || target < seed_count {
        return None;
    }
    Some((source, target))
}

/// Weighs a canonical pair. Indices were validated up front; a missing point
/// would surface as a zero-length distance error.
pub(crate) fn weigh(points: &PointSet, source: NodeId, target: NodeId) -> Result<CandidateEdge> {
    let left = points.get(source).unwrap_or(&[]);
    let right = points.get(target).unwrap_or(&[]);
    let weight = euclidean_distance(left, right)
        .map_err(|error| GraphError::Distance {
            source_node: source,
            target_node: target,
            error,
        })?
        .value();
    Ok(CandidateEdge {
        source,
        target,
        weight,
    })
}

fn insert_sequential(
    graph: &mut DirectedGraph,
    points: &PointSet,
    simplices: &[Simplex],
    seed_count: usize,
) -> Result<()> {
    for simplex in simplices {
        for (left, right) in simplex.pairs() {
            let Some((source, target)) = canonicalize(left, right, seed_count) else {
                continue;
            };
            if graph.contains_edge(source, target) {
                continue;
            }
            let edge = weigh(points, source, target)?;
            graph.insert_edge(edge.source, edge.target, edge.weight);
        }
    }
    Ok(())
}

#[cfg(test)]
mod property;
