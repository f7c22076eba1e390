//! Distance primitives used to weight outward edges.
//!
//! Coordinates are validated before any arithmetic so the builder can surface
//! a precise error instead of producing NaN weights.

mod euclidean;
mod helpers;
mod types;

pub use self::euclidean::euclidean_distance;
pub use self::types::{Distance, DistanceError, VectorKind};
