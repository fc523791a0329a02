//! Union-find (disjoint set union) structure used during component discovery.
//!
//! The component builder merges the endpoints of every surviving edge and
//! then groups nodes by their final representative. This module provides the
//! union-find structure that tracks component membership while that happens.
//! The structure covers a fixed universe of dense node indices and lives for
//! exactly one decomposition call.

#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Two-pass find: locate the root, then re-link every visited node
    /// directly to it. Compression never changes the logical partition.
    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    /// Union by size: the smaller root is attached under the larger one and
    /// the surviving root absorbs the smaller set's size. Returns the
    /// surviving root; a no-op when both nodes already share one.
    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        if self.size[left] < self.size[right] {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        self.size[left] += self.size[right];
        left
    }
}
