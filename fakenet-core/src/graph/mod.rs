//! Outward digraph produced by the builder and reshaped by pruning.
//!
//! Nodes are indices into the [`PointSet`] arena. Every edge points from a
//! lower index to a higher one, so the graph is acyclic by construction. The
//! public mutation surface only removes edges or annotates them: inserting
//! edges and changing weights is reserved for the builder.

mod connectivity;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::PointSet;

use self::connectivity::DisjointSet;

/// Stable node identity: the position of the point in the input ordering.
pub type NodeId = usize;

/// String attributes attached to an edge.
pub type EdgeAttributes = BTreeMap<String, String>;

/// Categorical node attribute.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Innermost point; never receives an incoming edge.
    Seed,
    /// Any other point.
    Interior,
}

impl NodeKind {
    /// Returns the lowercase label used in logs and rendered output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Interior => "interior",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
struct EdgeData {
    weight: f64,
    attributes: EdgeAttributes,
}

/// Borrowed view of a single edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeView<'a> {
    source: NodeId,
    target: NodeId,
    data: &'a EdgeData,
}

impl<'a> EdgeView<'a> {
    /// Returns the lower-indexed endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> NodeId { self.source }

    /// Returns the higher-indexed endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> NodeId { self.target }

    /// Returns the Euclidean distance between the endpoints.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> f64 { self.data.weight }

    /// Returns the attributes attached to the edge.
    #[must_use]
    #[rustfmt::skip]
    pub fn attributes(&self) -> &'a EdgeAttributes { &self.data.attributes }
}

/// Directed, weighted, acyclic graph over an ordered point set.
///
/// Invariants upheld by every constructor and mutator:
///
/// - no self-edges and every edge satisfies `source < target`;
/// - no edge targets a seed node;
/// - at most one edge per ordered pair.
#[derive(Clone, Debug, PartialEq)]
pub struct DirectedGraph {
    points: PointSet,
    kinds: Vec<NodeKind>,
    edges: BTreeMap<(NodeId, NodeId), EdgeData>,
    in_degree: Vec<usize>,
    out_degree: Vec<usize>,
}

impl DirectedGraph {
    /// Creates an edgeless graph whose first `seed_count` nodes are seeds.
    pub(crate) fn with_nodes(points: PointSet, seed_count: usize) -> Self {
        let node_count = points.len();
        let kinds = (0..node_count)
            .map(|index| {
                if index < seed_count {
                    NodeKind::Seed
                } else {
                    NodeKind::Interior
                }
            })
            .collect();
        Self {
            points,
            kinds,
            edges: BTreeMap::new(),
            in_degree: vec![0; node_count],
            out_degree: vec![0; node_count],
        }
    }

    /// Inserts `(source, target)` unless it is already present.
    ///
    /// Returns `true` when the edge was added. Callers must have canonicalized
    /// the pair and filtered seed targets.
    pub(crate) fn insert_edge(&mut self, source: NodeId, target: NodeId, weight: f64) -> bool {
        debug_assert!(source < target, "edges must point outward");
        debug_assert_eq!(self.kind(target), Some(NodeKind::Interior));
        if self.edges.contains_key(&(source, target)) {
            return false;
        }
        self.edges.insert(
            (source, target),
            EdgeData {
                weight,
                attributes: EdgeAttributes::new(),
            },
        );
        self.adjust_degrees(source, target, true);
        true
    }

    fn adjust_degrees(&mut self, source: NodeId, target: NodeId, added: bool) {
        if let (Some(out), Some(incoming)) = (
            self.out_degree.get_mut(source),
            self.in_degree.get_mut(target),
        ) {
            if added {
                *out += 1;
                *incoming += 1;
            } else {
                *out -= 1;
                *incoming -= 1;
            }
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.kinds.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the number of seed nodes.
    #[must_use]
    pub fn seed_count(&self) -> usize {
        self.kinds
            .iter()
            .filter(|kind| **kind == NodeKind::Seed)
            .count()
    }

    /// Returns the point arena backing the nodes.
    #[must_use]
    #[rustfmt::skip]
    pub fn points(&self) -> &PointSet { &self.points }

    /// Returns the coordinates of `node`.
    #[must_use]
    pub fn point(&self, node: NodeId) -> Option<&[f64]> {
        self.points.get(node)
    }

    /// Returns the kind of `node`.
    #[must_use]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.kinds.get(node).copied()
    }

    /// Iterates over every node in ascending index order.
    pub fn nodes(&self) -> impl ExactSizeIterator<Item = (NodeId, NodeKind)> + '_ {
        self.kinds.iter().copied().enumerate()
    }

    /// Iterates over every edge ordered by `(source, target)`.
    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeView<'_>> + '_ {
        self.edges
            .iter()
            .map(|(&(source, target), data)| EdgeView {
                source,
                target,
                data,
            })
    }

    /// Returns the edge `(source, target)` if present.
    #[must_use]
    pub fn edge(&self, source: NodeId, target: NodeId) -> Option<EdgeView<'_>> {
        self.edges
            .get(&(source, target))
            .map(|data| EdgeView {
                source,
                target,
                data,
            })
    }

    /// Returns whether the edge `(source, target)` is present.
    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.edges.contains_key(&(source, target))
    }

    /// Returns the number of edges targeting `node`.
    #[must_use]
    pub fn in_degree(&self, node: NodeId) -> usize {
        self.in_degree.get(node).copied().unwrap_or(0)
    }

    /// Returns the number of edges leaving `node`.
    #[must_use]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_degree.get(node).copied().unwrap_or(0)
    }

    /// Iterates over the targets of edges leaving `node`, ascending.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.edges
            .range((node, 0)..=(node, NodeId::MAX))
            .map(|(&(_, target), _)| target)
    }

    /// Returns, for every node, the ascending list of its predecessors.
    ///
    /// Computed in a single pass over the edges; prefer this over repeated
    /// per-node scans when visiting the whole graph.
    #[must_use]
    pub fn predecessor_lists(&self) -> Vec<Vec<NodeId>> {
        let mut lists = vec![Vec::new(); self.node_count()];
        for &(source, target) in self.edges.keys() {
            if let Some(list) = lists.get_mut(target) {
                list.push(source);
            }
        }
        lists
    }

    /// Removes the edge `(source, target)`, returning its weight.
    pub fn remove_edge(&mut self, source: NodeId, target: NodeId) -> Option<f64> {
        let removed = self.edges.remove(&(source, target))?;
        self.adjust_degrees(source, target, false);
        Some(removed.weight)
    }

    /// Keeps only the edges for which `keep` returns `true`.
    ///
    /// Returns the number of removed edges.
    pub fn retain_edges(&mut self, mut keep: impl FnMut(EdgeView<'_>) -> bool) -> usize {
        let doomed: Vec<(NodeId, NodeId)> = self
            .edges()
            .filter(|edge| !keep(*edge))
            .map(|edge| (edge.source(), edge.target()))
            .collect();
        for &(source, target) in &doomed {
            self.remove_edge(source, target);
        }
        doomed.len()
    }

    /// Attaches `key = value` to an existing edge.
    ///
    /// Returns `false` when the edge does not exist.
    pub fn annotate_edge(
        &mut self,
        source: NodeId,
        target: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.edges.get_mut(&(source, target)) {
            Some(data) => {
                data.attributes.insert(key.into(), value.into());
                true
            }
            None => false,
        }
    }

    /// Counts weakly connected components, ignoring edge direction.
    #[must_use]
    pub fn weak_component_count(&self) -> usize {
        let mut components = DisjointSet::new(self.node_count());
        for &(source, target) in self.edges.keys() {
            components.union(source, target);
        }
        components.components()
    }

    /// Returns whether every node is reachable from every other when edge
    /// direction is ignored.
    #[must_use]
    pub fn is_weakly_connected(&self) -> bool {
        self.weak_component_count() <= 1
    }
}

#[cfg(test)]
mod tests;
