#![allow(dead_code, reason = "each integration test uses a subset of the helpers")]

use fakenet_core::{
    DistributionError, PointDistribution, PointSet, SeededPoints, Simplex, Triangulation,
    TriangulationError, Triangulator,
};
use fakenet_test_support::fixtures::TriangulatedFixture;

/// Converts a raw fixture into the library's triangulation snapshot.
#[must_use]
pub fn triangulation(fixture: &TriangulatedFixture) -> Triangulation {
    let points = PointSet::try_from_rows(&fixture.points).expect("fixture points must be valid");
    let simplices = fixture
        .simplices
        .iter()
        .map(|members| Simplex::new(members.clone()))
        .collect();
    Triangulation::new(points, simplices)
}

/// Triangulator that ignores geometry and replays the fixture's simplices.
pub struct Replay(pub TriangulatedFixture);

impl Triangulator for Replay {
    fn triangulate(&self, points: PointSet) -> Result<Triangulation, TriangulationError> {
        if points.len() != self.0.points.len() {
            return Err(TriangulationError {
                triangulator: "replay".into(),
                reason: format!(
                    "expected {} points, got {}",
                    self.0.points.len(),
                    points.len()
                ),
            });
        }
        let simplices = self
            .0
            .simplices
            .iter()
            .map(|members| Simplex::new(members.clone()))
            .collect();
        Ok(Triangulation::new(points, simplices))
    }
}

/// Distribution that hands out the fixture's points and seed count.
impl PointDistribution for Replay {
    fn distribute(&self) -> Result<SeededPoints, DistributionError> {
        let points =
            PointSet::try_from_rows(&self.0.points).map_err(|err| DistributionError {
                distribution: "replay".into(),
                reason: err.to_string(),
            })?;
        Ok(SeededPoints {
            points,
            seed_count: self.0.seeds,
        })
    }
}
