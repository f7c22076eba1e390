//! Rayon-backed candidate collection for large triangulations.
//!
//! Workers enumerate and weight the pairs of disjoint simplex ranges. The
//! per-worker lists are concatenated in simplex order, so the caller's
//! sequential merge inserts edges exactly as the single-threaded path would.

use rayon::prelude::*;

use crate::{
    error::{GraphError, Result},
    geometry::PointSet,
    triangulation::Simplex,
};

use super::{CandidateEdge, canonicalize, weigh};

pub(super) fn collect_candidates(
    points: &PointSet,
    simplices: &[Simplex],
    seed_count: usize,
) -> Result<Vec<CandidateEdge>> {
    simplices
        .par_iter()
        .try_fold(Vec::new, |mut acc, simplex| {
            for (left, right) in simplex.pairs() {
                if let Some((source, target)) = canonicalize(left, right, seed_count) {
                    acc.push(weigh(points, source, target)?);
                }
            }
            Ok::<_, GraphError>(acc)
        })
        .try_reduce(Vec::new, |mut left, right| {
            left.extend(right);
            Ok(left)
        })
}
