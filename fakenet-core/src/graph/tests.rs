use rstest::{fixture, rstest};

use crate::{builder::build_graph, geometry::PointSet, triangulation::Simplex};

use super::{DirectedGraph, NodeKind};

#[fixture]
fn square() -> DirectedGraph {
    let points = PointSet::try_from_rows([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]])
        .expect("points must be valid");
    build_graph(
        &points,
        &[Simplex::from([0, 1, 2]), Simplex::from([1, 2, 3])],
        1,
    )
    .expect("build must succeed")
}

#[rstest]
fn degrees_track_edges(square: DirectedGraph) {
    assert_eq!(square.out_degree(0), 2);
    assert_eq!(square.out_degree(1), 2);
    assert_eq!(square.in_degree(3), 2);
    assert_eq!(square.in_degree(2), 2);
    assert_eq!(square.in_degree(42), 0);
}

#[rstest]
fn successors_and_predecessors_are_ascending(square: DirectedGraph) {
    assert_eq!(square.successors(1).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(square.successors(3).count(), 0);
    assert_eq!(
        square.predecessor_lists(),
        vec![vec![], vec![0], vec![0, 1], vec![1, 2]]
    );
}

#[rstest]
fn nodes_report_kinds_in_order(square: DirectedGraph) {
    let nodes: Vec<_> = square.nodes().collect();
    assert_eq!(
        nodes,
        vec![
            (0, NodeKind::Seed),
            (1, NodeKind::Interior),
            (2, NodeKind::Interior),
            (3, NodeKind::Interior),
        ]
    );
    assert_eq!(square.point(3), Some(&[1.0, 1.0][..]));
}

#[rstest]
fn remove_edge_updates_degrees(mut square: DirectedGraph) {
    assert_eq!(square.remove_edge(1, 2), Some(2.0_f64.sqrt()));
    assert_eq!(square.remove_edge(1, 2), None);
    assert_eq!(square.edge_count(), 4);
    assert_eq!(square.in_degree(2), 1);
    assert_eq!(square.out_degree(1), 1);
}

#[rstest]
fn retain_edges_counts_removals(mut square: DirectedGraph) {
    let removed = square.retain_edges(|edge| edge.weight() < 1.1);
    assert_eq!(removed, 1);
    assert!(!square.contains_edge(1, 2));
    assert_eq!(square.node_count(), 4);
}

#[rstest]
fn annotations_attach_to_existing_edges_only(mut square: DirectedGraph) {
    assert!(square.annotate_edge(0, 1, "role", "spine"));
    assert!(!square.annotate_edge(0, 3, "role", "spine"));
    let edge = square.edge(0, 1).expect("edge must exist");
    assert_eq!(edge.attributes().get("role").map(String::as_str), Some("spine"));
    assert!((edge.weight() - 1.0).abs() < f64::EPSILON);
}

#[rstest]
fn weak_components_follow_removals(mut square: DirectedGraph) {
    assert!(square.is_weakly_connected());
    square.retain_edges(|edge| edge.target() != 3);
    assert_eq!(square.weak_component_count(), 2);
    assert!(!square.is_weakly_connected());
}

#[rstest]
fn edgeless_graph_counts_every_node_as_a_component() {
    let points = PointSet::try_from_rows([[0.0], [1.0], [2.0]]).expect("points must be valid");
    let graph = DirectedGraph::with_nodes(points, 3);
    assert_eq!(graph.seed_count(), 3);
    assert_eq!(graph.weak_component_count(), 3);
}

#[rstest]
fn insert_edge_is_idempotent() {
    let points = PointSet::try_from_rows([[0.0], [1.0]]).expect("points must be valid");
    let mut graph = DirectedGraph::with_nodes(points, 1);
    assert!(graph.insert_edge(0, 1, 1.0));
    assert!(!graph.insert_edge(0, 1, 5.0));
    assert_eq!(graph.edge(0, 1).map(|edge| edge.weight()), Some(1.0));
    assert_eq!(graph.in_degree(1), 1);
}
