//! Contracts for the collaborators that feed the builder.
//!
//! Neither the triangulation mathematics nor the radial point distribution is
//! implemented here. Callers plug them in through [`Triangulator`] and
//! [`PointDistribution`].

use thiserror::Error;

use crate::{geometry::PointSet, graph::NodeId};

/// Closed geometric cell returned by a triangulation, given as point indices.
///
/// Member order is not significant; the builder canonicalizes every pair.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct Simplex(Vec<NodeId>);

impl Simplex {
    /// Creates a simplex from its member indices.
    #[must_use]
    pub fn new(vertices: impl Into<Vec<NodeId>>) -> Self {
        Self(vertices.into())
    }

    /// Returns the member indices in the order supplied by the collaborator.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertices(&self) -> &[NodeId] { &self.0 }

    /// Returns the number of member indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the simplex has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over every unordered pair of members as `(earlier, later)`
    /// positions in the member list. Pairs are not yet canonicalized.
    pub fn pairs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.0.iter().enumerate().flat_map(move |(position, &left)| {
            self.0
                .iter()
                .skip(position + 1)
                .map(move |&right| (left, right))
        })
    }
}

impl From<Vec<NodeId>> for Simplex {
    fn from(vertices: Vec<NodeId>) -> Self {
        Self(vertices)
    }
}

impl<const N: usize> From<[NodeId; N]> for Simplex {
    fn from(vertices: [NodeId; N]) -> Self {
        Self(vertices.to_vec())
    }
}

/// Snapshot produced by a triangulation collaborator: the simplices together
/// with the point list they index into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Triangulation {
    points: PointSet,
    simplices: Vec<Simplex>,
}

impl Triangulation {
    /// Pairs a point set with the simplices computed over it.
    ///
    /// Indices are validated by the builder, not here, so collaborators can
    /// hand over their raw output unchanged.
    #[must_use]
    pub fn new(points: PointSet, simplices: Vec<Simplex>) -> Self {
        Self { points, simplices }
    }

    /// Returns the triangulated points.
    #[must_use]
    #[rustfmt::skip]
    pub fn points(&self) -> &PointSet { &self.points }

    /// Returns the simplices.
    #[must_use]
    #[rustfmt::skip]
    pub fn simplices(&self) -> &[Simplex] { &self.simplices }

    /// Splits the snapshot into its points and simplices.
    #[must_use]
    pub fn into_parts(self) -> (PointSet, Vec<Simplex>) {
        (self.points, self.simplices)
    }
}

/// Failure reported by a triangulation collaborator.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("triangulation `{triangulator}` failed: {reason}")]
pub struct TriangulationError {
    /// Name of the collaborator that failed.
    pub triangulator: String,
    /// Human-readable failure description.
    pub reason: String,
}

/// Black-box triangulation service.
pub trait Triangulator {
    /// Triangulates `points`, returning the simplices and the points they
    /// index.
    ///
    /// # Errors
    /// Returns [`TriangulationError`] when the point set cannot be
    /// triangulated (for example, degenerate or insufficient input).
    fn triangulate(&self, points: PointSet) -> Result<Triangulation, TriangulationError>;
}

/// Radially ordered points together with the number of leading seed points.
#[derive(Clone, Debug, PartialEq)]
pub struct SeededPoints {
    /// Points ordered by non-decreasing distance from a common center.
    pub points: PointSet,
    /// Number of leading points that share the minimum radius.
    pub seed_count: usize,
}

/// Failure reported by a point-distribution collaborator.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("point distribution `{distribution}` failed: {reason}")]
pub struct DistributionError {
    /// Name of the collaborator that failed.
    pub distribution: String,
    /// Human-readable failure description.
    pub reason: String,
}

/// Producer of radially ordered point sets.
///
/// Implementations guarantee that points ascend in radius and that the first
/// `seed_count` points share the minimum radius. The builder relies on this
/// without checking it.
pub trait PointDistribution {
    /// Produces the ordered points and the seed count.
    ///
    /// # Errors
    /// Returns [`DistributionError`] when the distribution cannot be generated.
    fn distribute(&self) -> Result<SeededPoints, DistributionError>;
}
