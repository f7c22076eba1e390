//! Property-based tests for outward digraph construction.
//!
//! Random point clouds are paired with synthetic simplices and the builder's
//! output is compared against a set-based oracle that enumerates every
//! canonical pair directly.

use std::collections::BTreeSet;

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use test_strategy::Arbitrary;

use crate::{
    distance::euclidean_distance,
    geometry::PointSet,
    test_utils::suite_proptest_config,
    triangulation::Simplex,
};

use super::{DigraphBuilder, ExecutionStrategy};

/// Shape of the generated simplex list.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
enum SimplexLayout {
    /// Uniformly sampled triangles and tetrahedra.
    #[weight(3)]
    Scattered,
    /// Every simplex contains point zero, so seeds sit on many faces.
    #[weight(1)]
    Fan,
    /// Scattered simplices with every simplex listed twice in shuffled order.
    #[weight(2)]
    Repeated,
}

#[derive(Clone, Debug)]
struct BuildFixture {
    points: PointSet,
    simplices: Vec<Simplex>,
    seed_count: usize,
}

fn fixture_strategy() -> impl Strategy<Value = BuildFixture> {
    (any::<SimplexLayout>(), any::<u64>()).prop_map(|(layout, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(layout, &mut rng)
    })
}

fn generate_fixture(layout: SimplexLayout, rng: &mut SmallRng) -> BuildFixture {
    let node_count = rng.gen_range(3..=48_usize);
    let dimension = rng.gen_range(1..=3_usize);
    let rows: Vec<Vec<f64>> = (0..node_count)
        .map(|_| (0..dimension).map(|_| rng.gen_range(-10.0..10.0)).collect())
        .collect();
    let points = PointSet::try_from_rows(rows).expect("generated rows must be valid");
    let simplex_count = rng.gen_range(0..=node_count * 2);

    let mut simplices: Vec<Simplex> = (0..simplex_count)
        .map(|_| {
            let size = rng.gen_range(2..=4_usize);
            let mut members: Vec<usize> =
                (0..size).map(|_| rng.gen_range(0..node_count)).collect();
            if layout == SimplexLayout::Fan {
                members[0] = 0;
            }
            Simplex::new(members)
        })
        .collect();
    if layout == SimplexLayout::Repeated {
        let mut copies = simplices.clone();
        for simplex in &mut copies {
            let mut members = simplex.vertices().to_vec();
            members.reverse();
            *simplex = Simplex::new(members);
        }
        simplices.extend(copies);
    }

    BuildFixture {
        points,
        simplices,
        seed_count: rng.gen_range(0..=node_count.min(4)),
    }
}

fn oracle_edges(fixture: &BuildFixture) -> BTreeSet<(usize, usize)> {
    let mut edges = BTreeSet::new();
    for simplex in &fixture.simplices {
        let members = simplex.vertices();
        for (position, &left) in members.iter().enumerate() {
            for &right in &members[position + 1..] {
                let (low, high) = (left.min(right), left.max(right));
                if low != high && high >= fixture.seed_count {
                    edges.insert((low, high));
                }
            }
        }
    }
    edges
}

fn run_oracle_equivalence(fixture: &BuildFixture) -> Result<(), TestCaseError> {
    let graph = DigraphBuilder::new()
        .with_seed_count(fixture.seed_count)
        .with_execution_strategy(ExecutionStrategy::Sequential)
        .build_from_parts(&fixture.points, &fixture.simplices)
        .map_err(|err| TestCaseError::fail(err.to_string()))?;

    let built: BTreeSet<_> = graph
        .edges()
        .map(|edge| (edge.source(), edge.target()))
        .collect();
    prop_assert_eq!(&built, &oracle_edges(fixture));
    prop_assert_eq!(graph.node_count(), fixture.points.len());

    for edge in graph.edges() {
        prop_assert!(edge.source() < edge.target());
        prop_assert!(edge.target() >= fixture.seed_count);
        let expected = euclidean_distance(
            fixture.points.get(edge.source()).unwrap_or(&[]),
            fixture.points.get(edge.target()).unwrap_or(&[]),
        )
        .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(edge.weight(), expected.value());
    }
    for seed in 0..fixture.seed_count {
        prop_assert_eq!(graph.in_degree(seed), 0);
    }
    let in_total: usize = (0..graph.node_count()).map(|n| graph.in_degree(n)).sum();
    let out_total: usize = (0..graph.node_count()).map(|n| graph.out_degree(n)).sum();
    prop_assert_eq!(in_total, graph.edge_count());
    prop_assert_eq!(out_total, graph.edge_count());
    Ok(())
}

#[cfg(feature = "cpu")]
fn run_strategy_equivalence(fixture: &BuildFixture) -> Result<(), TestCaseError> {
    let build = |strategy| {
        DigraphBuilder::new()
            .with_seed_count(fixture.seed_count)
            .with_execution_strategy(strategy)
            .build_from_parts(&fixture.points, &fixture.simplices)
            .map_err(|err| TestCaseError::fail(err.to_string()))
    };
    let sequential = build(ExecutionStrategy::Sequential)?;
    let parallel = build(ExecutionStrategy::Parallel)?;
    prop_assert_eq!(sequential, parallel);
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn builder_matches_pair_oracle(fixture in fixture_strategy()) {
        run_oracle_equivalence(&fixture)?;
    }

    #[cfg(feature = "cpu")]
    #[test]
    fn parallel_and_sequential_agree(fixture in fixture_strategy()) {
        run_strategy_equivalence(&fixture)?;
    }
}

#[rstest::rstest]
#[case::scattered(SimplexLayout::Scattered, 42)]
#[case::fan(SimplexLayout::Fan, 7)]
#[case::repeated(SimplexLayout::Repeated, 999)]
fn oracle_equivalence_fixed_seeds(#[case] layout: SimplexLayout, #[case] seed: u64) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let fixture = generate_fixture(layout, &mut rng);
    run_oracle_equivalence(&fixture).expect("builder must match the oracle");
}
