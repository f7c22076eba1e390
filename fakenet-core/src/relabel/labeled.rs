use serde::{Deserialize, Serialize};

use crate::graph::{EdgeAttributes, NodeKind};

/// Node of a [`LabeledGraph`].
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LabeledNode {
    /// Synthetic identifier.
    pub id: String,
    /// Kind carried over from the source graph.
    pub kind: NodeKind,
}

/// Edge of a [`LabeledGraph`], addressed by node identifiers.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct LabeledEdge {
    /// Identifier of the source node.
    pub source: String,
    /// Identifier of the target node.
    pub target: String,
    /// Euclidean distance between the original endpoints.
    pub weight: f64,
    /// Attributes carried over from the source graph.
    #[serde(default, skip_serializing_if = "EdgeAttributes::is_empty")]
    pub attributes: EdgeAttributes,
}

/// Emitted graph whose nodes carry synthetic identifiers.
///
/// Nodes appear in the original index order; edges in `(source, target)`
/// order of the original indices.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct LabeledGraph {
    /// Nodes in original index order.
    pub nodes: Vec<LabeledNode>,
    /// Edges in original `(source, target)` order.
    pub edges: Vec<LabeledEdge>,
}

impl LabeledGraph {
    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Looks a node up by identifier.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&LabeledNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Looks an edge up by endpoint identifiers.
    #[must_use]
    pub fn edge(&self, source: &str, target: &str) -> Option<&LabeledEdge> {
        self.edges
            .iter()
            .find(|edge| edge.source == source && edge.target == target)
    }

    /// Returns the number of edges targeting `id`.
    #[must_use]
    pub fn in_degree(&self, id: &str) -> usize {
        self.edges.iter().filter(|edge| edge.target == id).count()
    }

    /// Returns the number of edges leaving `id`.
    #[must_use]
    pub fn out_degree(&self, id: &str) -> usize {
        self.edges.iter().filter(|edge| edge.source == id).count()
    }

    /// Iterates over the nodes without incoming edges.
    pub fn roots(&self) -> impl Iterator<Item = &LabeledNode> + '_ {
        self.nodes
            .iter()
            .filter(|node| !self.edges.iter().any(|edge| edge.target == node.id))
    }
}
