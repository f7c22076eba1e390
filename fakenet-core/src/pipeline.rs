//! End-to-end generation: build, prune, relabel.
//!
//! [`Pipeline`] strings the stages together for callers that hold a
//! triangulation (or the collaborators that produce one) and a pruning
//! strategy.

use tracing::{Span, field, info, instrument};

use crate::{
    builder::{DigraphBuilder, ExecutionStrategy},
    error::PipelineError,
    geometry::PointSet,
    prune::{PruneEdges, PruneReport, prune_checked},
    relabel::{LabeledGraph, NUMERIC_MARKER, relabel},
    triangulation::{PointDistribution, Triangulation, Triangulator},
};

/// Configures a [`Pipeline`].
///
/// # Examples
/// ```
/// use fakenet_core::{ExecutionStrategy, PipelineBuilder};
///
/// let pipeline = PipelineBuilder::new()
///     .with_seed_count(3)
///     .with_prefix("p")
///     .with_execution_strategy(ExecutionStrategy::Sequential)
///     .build()?;
/// assert_eq!(pipeline.seed_count(), 3);
/// assert_eq!(pipeline.prefix(), "p");
/// # Ok::<(), fakenet_core::PipelineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    seed_count: usize,
    prefix: String,
    execution_strategy: ExecutionStrategy,
    require_connected: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            seed_count: 1,
            prefix: String::new(),
            execution_strategy: ExecutionStrategy::Auto,
            require_connected: false,
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder with one seed, no prefix, and automatic execution.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of leading points treated as seeds.
    ///
    /// Ignored by [`Pipeline::run_distribution`], which takes the seed count
    /// from the distribution.
    #[must_use]
    pub fn with_seed_count(mut self, seed_count: usize) -> Self {
        self.seed_count = seed_count;
        self
    }

    /// Sets the prefix used for every synthetic identifier.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sets the execution strategy for the build stage.
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Fails runs whose built graph is not weakly connected.
    #[must_use]
    pub fn require_connected(mut self, required: bool) -> Self {
        self.require_connected = required;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// Returns [`PipelineError::InvalidPrefix`] when the prefix starts with
    /// the numeric identifier marker `@`. Consumers tell letter identifiers
    /// from numeric ones by that leading marker alone.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        if self.prefix.starts_with(NUMERIC_MARKER) {
            return Err(PipelineError::InvalidPrefix {
                prefix: self.prefix,
            });
        }
        Ok(Pipeline {
            seed_count: self.seed_count,
            prefix: self.prefix,
            execution_strategy: self.execution_strategy,
            require_connected: self.require_connected,
        })
    }
}

/// Output of a pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    /// The pruned, relabeled graph.
    pub graph: LabeledGraph,
    /// What the pruning stage did.
    pub report: PruneReport,
}

/// Validated generation pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    seed_count: usize,
    prefix: String,
    execution_strategy: ExecutionStrategy,
    require_connected: bool,
}

impl Pipeline {
    /// Returns the configured seed count.
    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.seed_count
    }

    /// Returns the identifier prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the build-stage execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Returns whether weak connectivity is enforced.
    #[must_use]
    pub fn requires_connected(&self) -> bool {
        self.require_connected
    }

    /// Builds, prunes, and relabels `triangulation`.
    ///
    /// # Errors
    /// Returns [`PipelineError::Graph`] when the build fails,
    /// [`PipelineError::Disconnected`] when connectivity is required and
    /// missing, and [`PipelineError::Prune`] when `pruner` breaks its
    /// contract.
    ///
    /// # Examples
    /// ```
    /// use fakenet_core::{KeepAll, PipelineBuilder, PointSet, Simplex, Triangulation};
    ///
    /// let points = PointSet::try_from_rows([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])?;
    /// let triangulation =
    ///     Triangulation::new(points, vec![Simplex::from([0, 1, 2]), Simplex::from([1, 2, 3])]);
    /// let output = PipelineBuilder::new().build()?.run(&triangulation, &KeepAll)?;
    /// assert_eq!(output.graph.edge_count(), 5);
    /// assert_eq!(output.graph.nodes[0].id, "A");
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn run(
        &self,
        triangulation: &Triangulation,
        pruner: &dyn PruneEdges,
    ) -> Result<PipelineOutput, PipelineError> {
        self.run_with_seeds(triangulation, self.seed_count, pruner)
    }

    /// Triangulates `points` with `triangulator`, then runs the pipeline.
    ///
    /// # Errors
    /// Returns [`PipelineError::Triangulation`] when the collaborator fails,
    /// otherwise see [`Pipeline::run`].
    pub fn run_points(
        &self,
        points: PointSet,
        triangulator: &dyn Triangulator,
        pruner: &dyn PruneEdges,
    ) -> Result<PipelineOutput, PipelineError> {
        let triangulation = triangulator.triangulate(points)?;
        self.run(&triangulation, pruner)
    }

    /// Draws points and the seed count from `distribution`, triangulates
    /// them, then runs the pipeline.
    ///
    /// # Errors
    /// Returns [`PipelineError::Distribution`] when the distribution fails,
    /// otherwise see [`Pipeline::run_points`].
    pub fn run_distribution(
        &self,
        distribution: &dyn PointDistribution,
        triangulator: &dyn Triangulator,
        pruner: &dyn PruneEdges,
    ) -> Result<PipelineOutput, PipelineError> {
        let seeded = distribution.distribute()?;
        let triangulation = triangulator.triangulate(seeded.points)?;
        self.run_with_seeds(&triangulation, seeded.seed_count, pruner)
    }

    #[instrument(
        name = "pipeline.run",
        err,
        skip_all,
        fields(
            points = triangulation.points().len(),
            seeds = seed_count,
            strategy = %pruner.name(),
            edges = field::Empty,
        ),
    )]
    fn run_with_seeds(
        &self,
        triangulation: &Triangulation,
        seed_count: usize,
        pruner: &dyn PruneEdges,
    ) -> Result<PipelineOutput, PipelineError> {
        let graph = DigraphBuilder::new()
            .with_seed_count(seed_count)
            .with_execution_strategy(self.execution_strategy)
            .build(triangulation)?;

        if self.require_connected {
            let components = graph.weak_component_count();
            if components > 1 {
                return Err(PipelineError::Disconnected { components });
            }
        }

        let (pruned, report) = prune_checked(pruner, graph)?;
        let labeled = relabel(&pruned, &self.prefix);
        Span::current().record("edges", labeled.edge_count());
        info!(
            nodes = labeled.node_count(),
            edges = labeled.edge_count(),
            "pipeline completed"
        );
        Ok(PipelineOutput {
            graph: labeled,
            report,
        })
    }
}
