//! Identifier normalization for emitted graphs.
//!
//! Node identities are replaced with synthetic names: parentless nodes get
//! letter codes (`A`, `B`, ...), every other node gets an `@`-prefixed
//! number. Nodes are visited in ascending index, so the same graph and prefix
//! always produce the same names.

mod labeled;

use tracing::{debug, instrument};

use crate::graph::{DirectedGraph, NodeId};

pub use self::labeled::{LabeledEdge, LabeledGraph, LabeledNode};

/// Marker prepended to numeric identifiers.
pub const NUMERIC_MARKER: char = '@';

/// Returns the bijective base-26 letter code for the zero-based `ordinal`.
///
/// Codes run `A` to `Z`, then `AA`, `AB`, ..., `ZZ`, then `AAA`, matching
/// spreadsheet column names, so distinct ordinals never share a code.
///
/// # Examples
/// ```
/// use fakenet_core::letter_code;
///
/// assert_eq!(letter_code(0), "A");
/// assert_eq!(letter_code(25), "Z");
/// assert_eq!(letter_code(26), "AA");
/// assert_eq!(letter_code(701), "ZZ");
/// assert_eq!(letter_code(702), "AAA");
/// ```
#[must_use]
pub fn letter_code(ordinal: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = ordinal;
    loop {
        letters.push(b'A' + (remaining % 26) as u8);
        if remaining < 26 {
            break;
        }
        remaining = remaining / 26 - 1;
    }
    letters.iter().rev().map(|&byte| char::from(byte)).collect()
}

/// Computes the synthetic identifier of every node, indexed by node.
///
/// Letter and numeric counters advance independently: the third parentless
/// node is `C` no matter how many numbered nodes precede it.
#[must_use]
pub fn assign_identifiers(graph: &DirectedGraph, prefix: &str) -> Vec<String> {
    let mut letters = 0_usize;
    let mut numbers = 0_usize;
    (0..graph.node_count())
        .map(|node| {
            if graph.in_degree(node) == 0 {
                letters += 1;
                format!("{prefix}{}", letter_code(letters - 1))
            } else {
                numbers += 1;
                format!("{NUMERIC_MARKER}{prefix}{numbers}")
            }
        })
        .collect()
}

/// Produces a copy of `graph` with synthetic identifiers.
///
/// The input is left untouched. Weights, edge attributes and node kinds are
/// carried over unchanged.
///
/// # Examples
/// ```
/// use fakenet_core::{PointSet, Simplex, build_graph, relabel};
///
/// let points = PointSet::try_from_rows([[0.0], [1.0], [2.0]])?;
/// let graph = build_graph(&points, &[Simplex::from([0, 1, 2])], 1)?;
/// let labeled = relabel(&graph, "n");
/// let ids: Vec<_> = labeled.nodes.iter().map(|node| node.id.as_str()).collect();
/// assert_eq!(ids, ["nA", "@n1", "@n2"]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "relabel.apply",
    skip_all,
    fields(nodes = graph.node_count(), edges = graph.edge_count(), prefix = %prefix),
)]
pub fn relabel(graph: &DirectedGraph, prefix: &str) -> LabeledGraph {
    let identifiers = assign_identifiers(graph, prefix);
    let nodes = graph
        .nodes()
        .zip(&identifiers)
        .map(|((_, kind), id)| LabeledNode {
            id: id.clone(),
            kind,
        })
        .collect();
    let identifier = |node: NodeId| identifiers.get(node).cloned().unwrap_or_default();
    let edges = graph
        .edges()
        .map(|edge| LabeledEdge {
            source: identifier(edge.source()),
            target: identifier(edge.target()),
            weight: edge.weight(),
            attributes: edge.attributes().clone(),
        })
        .collect();
    let labeled = LabeledGraph { nodes, edges };
    debug!(roots = labeled.roots().count(), "identifiers assigned");
    labeled
}
