//! Sequential union-find used for weak-connectivity checks.
//!
//! Uses union by rank with path halving. Node ids outside the structure are
//! ignored rather than panicking, because the graph guarantees every edge
//! endpoint is a valid node.

pub(super) struct DisjointSet {
    parents: Vec<usize>,
    ranks: Vec<u8>,
    components: usize,
}

impl DisjointSet {
    pub(super) fn new(node_count: usize) -> Self {
        Self {
            parents: (0..node_count).collect(),
            ranks: vec![0; node_count],
            components: node_count,
        }
    }

    pub(super) fn components(&self) -> usize {
        self.components
    }

    fn find(&mut self, node: usize) -> Option<usize> {
        let mut current = node;
        loop {
            let parent = *self.parents.get(current)?;
            if parent == current {
                return Some(current);
            }
            let grandparent = *self.parents.get(parent)?;
            self.parents[current] = grandparent;
            current = grandparent;
        }
    }

    /// Merges the sets holding `left` and `right`; returns `true` when they
    /// were previously disjoint.
    pub(super) fn union(&mut self, left: usize, right: usize) -> bool {
        let (Some(left_root), Some(right_root)) = (self.find(left), self.find(right)) else {
            return false;
        };
        if left_root == right_root {
            return false;
        }

        let (parent, child) = if self.ranks[left_root] >= self.ranks[right_root] {
            (left_root, right_root)
        } else {
            (right_root, left_root)
        };
        self.parents[child] = parent;
        if self.ranks[parent] == self.ranks[child] {
            self.ranks[parent] = self.ranks[parent].saturating_add(1);
        }
        self.components -= 1;
        true
    }
}
