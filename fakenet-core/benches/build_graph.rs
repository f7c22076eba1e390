//! Digraph construction benchmarks.
//!
//! Builds the outward digraph over concentric rings of increasing size and
//! compares the sequential and rayon-backed execution strategies, then
//! measures the built-in pruning strategies on the largest graph.
#![allow(missing_docs, reason = "Criterion macros generate undocumented items")]
#![allow(
    clippy::expect_used,
    reason = "benchmark setup is infallible for valid constants"
)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use fakenet_core::{
    DigraphBuilder, ExecutionStrategy, PointSet, PruneEdges, Simplex, StrategyRegistry,
    Triangulation,
};
use fakenet_test_support::fixtures::concentric_rings;

/// Points per ring for every dataset.
const PER_RING: u32 = 64;

/// Ring counts to benchmark.
const RING_COUNTS: &[u32] = &[16, 64, 256];

fn rings(ring_count: u32) -> Triangulation {
    let fixture = concentric_rings(ring_count, PER_RING);
    let points = PointSet::try_from_rows(&fixture.points).expect("ring points must be valid");
    let simplices = fixture.simplices.into_iter().map(Simplex::new).collect();
    Triangulation::new(points, simplices)
}

fn strategies() -> Vec<ExecutionStrategy> {
    let mut strategies = vec![ExecutionStrategy::Sequential];
    if cfg!(feature = "cpu") {
        strategies.push(ExecutionStrategy::Parallel);
    }
    strategies
}

fn build_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");
    group.sample_size(20);

    for &ring_count in RING_COUNTS {
        let triangulation = rings(ring_count);
        for strategy in strategies() {
            let builder = DigraphBuilder::new()
                .with_seed_count(PER_RING as usize)
                .with_execution_strategy(strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.as_str(), triangulation.points().len()),
                &triangulation,
                |b, triangulation| {
                    b.iter(|| builder.build(triangulation).expect("build must succeed"));
                },
            );
        }
    }

    group.finish();
}

fn prune(c: &mut Criterion) {
    let mut group = c.benchmark_group("prune");
    group.sample_size(20);

    let ring_count = RING_COUNTS.last().copied().unwrap_or(16);
    let graph = DigraphBuilder::new()
        .with_seed_count(PER_RING as usize)
        .build(&rings(ring_count))
        .expect("build must succeed");
    let registry = StrategyRegistry::builtin();

    for name in registry.names() {
        let strategy = registry
            .instantiate(name, &Default::default())
            .expect("built-in defaults must be valid");
        group.bench_with_input(BenchmarkId::from_parameter(name), &graph, |b, graph| {
            b.iter(|| strategy.prune(graph.clone()));
        });
    }

    group.finish();
}

criterion_group!(benches, build_graph, prune);
criterion_main!(benches);
