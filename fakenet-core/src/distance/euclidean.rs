use crate::distance::helpers::validate_dimensions;
use crate::distance::types::{Distance, DistanceError, Result, Vector, VectorKind};

/// Computes the Euclidean distance between two coordinate vectors.
///
/// # Examples
///
/// ```
/// use fakenet_core::{DistanceError, euclidean_distance};
///
/// fn main() -> Result<(), DistanceError> {
///     let distance = euclidean_distance(&[0.0, 0.0], &[3.0, 4.0])?;
///     assert!((distance.value() - 5.0).abs() < 1e-12);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// - [`DistanceError::ZeroLength`](crate::DistanceError::ZeroLength) when any
///   input is empty.
/// - [`DistanceError::DimensionMismatch`](crate::DistanceError::DimensionMismatch)
///   when input lengths differ.
/// - [`DistanceError::NonFinite`](crate::DistanceError::NonFinite) when a value
///   is NaN or infinite.
/// - [`DistanceError::Overflow`](crate::DistanceError::Overflow) when the
///   distance itself is larger than the largest finite `f64`.
pub fn euclidean_distance(left: &[f64], right: &[f64]) -> Result<Distance> {
    let left = Vector::new(left, VectorKind::Left)?;
    let right = Vector::new(right, VectorKind::Right)?;
    validate_dimensions(&left, &right)?;

    // Squares are taken relative to the largest difference so that finite
    // coordinates near the top of the range do not overflow the sum.
    let diffs = || left.iter().zip(right.iter()).map(|(&l, &r)| (l - r).abs());
    let scale = diffs().fold(0.0_f64, f64::max);
    if scale == 0.0 {
        return Ok(Distance::from_raw(0.0));
    }
    if !scale.is_finite() {
        return Err(DistanceError::Overflow);
    }

    let sum: f64 = diffs()
        .map(|diff| {
            let ratio = diff / scale;
            ratio * ratio
        })
        .sum();
    let value = scale * sum.sqrt();
    if !value.is_finite() {
        return Err(DistanceError::Overflow);
    }
    Ok(Distance::from_raw(value))
}
