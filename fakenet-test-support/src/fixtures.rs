//! Radially ordered point sets with hand-built triangulations.
//!
//! Fixtures use plain vectors so they can feed both the library API and the
//! CLI's JSON input document.

use serde::Serialize;

/// Points, simplices and seed count in the CLI input layout.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TriangulatedFixture {
    /// Point coordinates ordered by radius.
    pub points: Vec<Vec<f64>>,
    /// Simplices as point indices.
    pub simplices: Vec<Vec<usize>>,
    /// Number of leading seed points.
    pub seeds: usize,
}

impl TriangulatedFixture {
    /// Renders the fixture as the CLI input document.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

/// The four corners of the unit square split along the `(1, 2)` diagonal,
/// with the origin as the only seed.
#[must_use]
pub fn unit_square() -> TriangulatedFixture {
    TriangulatedFixture {
        points: vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 1.0],
        ],
        simplices: vec![vec![0, 1, 2], vec![1, 2, 3]],
        seeds: 1,
    }
}

/// Concentric rings of `per_ring` points around the origin.
///
/// Ring `r` has radius `r + 1` and point `i` of ring `r` has index
/// `r * per_ring + i`, so indices ascend with radius and the first ring forms
/// the seeds. Adjacent rings are stitched with two triangles per step, and the
/// seed ring is additionally fanned from its first point, which yields pairs
/// between seeds that the builder must discard.
///
/// # Examples
/// ```
/// use fakenet_test_support::fixtures::concentric_rings;
///
/// let fixture = concentric_rings(3, 6);
/// assert_eq!(fixture.points.len(), 18);
/// assert_eq!(fixture.seeds, 6);
/// assert_eq!(fixture.simplices.len(), 2 * 2 * 6 + 4);
/// ```
#[must_use]
pub fn concentric_rings(rings: u32, per_ring: u32) -> TriangulatedFixture {
    let points = (0..rings)
        .flat_map(|ring| {
            let radius = f64::from(ring + 1);
            (0..per_ring).map(move |step| {
                let angle = std::f64::consts::TAU * f64::from(step) / f64::from(per_ring);
                vec![radius * angle.cos(), radius * angle.sin()]
            })
        })
        .collect();

    let width = per_ring as usize;
    let mut simplices = Vec::new();
    for step in 1..width.saturating_sub(1) {
        simplices.push(vec![0, step, step + 1]);
    }
    for ring in 0..(rings as usize).saturating_sub(1) {
        let inner = ring * width;
        let outer = inner + width;
        for step in 0..width {
            let next = (step + 1) % width;
            simplices.push(vec![inner + step, inner + next, outer + step]);
            simplices.push(vec![inner + next, outer + step, outer + next]);
        }
    }

    TriangulatedFixture {
        points,
        simplices,
        seeds: width,
    }
}
