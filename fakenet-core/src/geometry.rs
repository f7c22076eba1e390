//! Point arena consumed by the digraph builder.
//!
//! Points are stored in a contiguous row-major buffer and addressed by their
//! position in the caller's radial ordering. Two points with identical
//! coordinates are still distinct nodes.

use thiserror::Error;

use crate::graph::NodeId;

/// Errors raised while validating coordinates into a [`PointSet`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum PointSetError {
    /// Points must have at least one coordinate.
    #[error("points must have positive dimension")]
    ZeroDimension,
    /// A point disagreed with the dimensionality of the first point.
    #[error("point {index} has dimension {actual} but expected {expected}")]
    DimensionMismatch {
        /// Position of the offending point.
        index: usize,
        /// Dimensionality established by the first point.
        expected: usize,
        /// Dimensionality of the offending point.
        actual: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("point {index} has a non-finite coordinate on axis {axis}")]
    NonFiniteCoordinate {
        /// Position of the offending point.
        index: usize,
        /// Axis holding the offending coordinate.
        axis: usize,
    },
}

/// Ordered, immutable set of equal-dimension points.
///
/// # Examples
/// ```
/// use fakenet_core::PointSet;
///
/// let points = PointSet::try_from_rows([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])?;
/// assert_eq!(points.len(), 3);
/// assert_eq!(points.dimension(), 2);
/// assert_eq!(points.get(1), Some(&[1.0, 0.0][..]));
/// # Ok::<(), fakenet_core::PointSetError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointSet {
    len: usize,
    dimension: usize,
    coordinates: Vec<f64>,
}

impl PointSet {
    /// Validates `rows` and copies them into a contiguous arena.
    ///
    /// An empty iterator produces an empty set; the builder rejects it later
    /// with [`GraphError::EmptyPointSet`](crate::GraphError::EmptyPointSet).
    ///
    /// # Errors
    /// Returns [`PointSetError`] when rows disagree on dimension, have no
    /// coordinates, or contain non-finite values.
    pub fn try_from_rows<I, R>(rows: I) -> Result<Self, PointSetError>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[f64]>,
    {
        let mut coordinates = Vec::new();
        let mut dimension = None;
        let mut len = 0_usize;

        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *dimension.get_or_insert(row.len());
            if expected == 0 {
                return Err(PointSetError::ZeroDimension);
            }
            if row.len() != expected {
                return Err(PointSetError::DimensionMismatch {
                    index,
                    expected,
                    actual: row.len(),
                });
            }
            if let Some(axis) = row.iter().position(|value| !value.is_finite()) {
                return Err(PointSetError::NonFiniteCoordinate { index, axis });
            }
            coordinates.extend_from_slice(row);
            len += 1;
        }

        Ok(Self {
            len,
            dimension: dimension.unwrap_or(0),
            coordinates,
        })
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the set holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the dimensionality shared by every point (zero when empty).
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the coordinates of the point at `index`.
    #[must_use]
    pub fn get(&self, index: NodeId) -> Option<&[f64]> {
        if index >= self.len {
            return None;
        }
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.coordinates.get(start..end)
    }

    /// Iterates over the points in input order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        // `chunks_exact` panics on a zero chunk size; an empty set has no rows.
        self.coordinates
            .chunks_exact(self.dimension.max(1))
            .take(self.len)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{PointSet, PointSetError};

    #[test]
    fn empty_input_produces_empty_set() {
        let points = PointSet::try_from_rows(Vec::<Vec<f64>>::new()).expect("empty is valid");
        assert!(points.is_empty());
        assert_eq!(points.dimension(), 0);
        assert_eq!(points.iter().count(), 0);
        assert_eq!(points.get(0), None);
    }

    #[rstest]
    #[case::zero_dimension(vec![vec![]], PointSetError::ZeroDimension)]
    #[case::ragged(
        vec![vec![0.0, 0.0], vec![1.0]],
        PointSetError::DimensionMismatch { index: 1, expected: 2, actual: 1 },
    )]
    #[case::nan(
        vec![vec![0.0, 0.0], vec![1.0, f64::NAN]],
        PointSetError::NonFiniteCoordinate { index: 1, axis: 1 },
    )]
    fn rejects_malformed_rows(#[case] rows: Vec<Vec<f64>>, #[case] expected: PointSetError) {
        let err = PointSet::try_from_rows(rows).expect_err("malformed rows must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn duplicate_coordinates_remain_distinct_points() {
        let points =
            PointSet::try_from_rows([[1.0, 1.0], [1.0, 1.0]]).expect("duplicates are valid");
        assert_eq!(points.len(), 2);
        assert_eq!(points.get(0), points.get(1));
        assert_eq!(points.iter().collect::<Vec<_>>(), vec![&[1.0, 1.0][..]; 2]);
    }
}
