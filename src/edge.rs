//! Canonicalized, undirected tour edges.

use crate::node::NodeId;

/// An undirected edge between two distinct nodes. The pair is canonicalized
/// (smaller id first) at construction time so that `Edge(a, b) == Edge(b, a)`
/// without a runtime comparison at every use site — the Rust analogue of the
/// original source's sort-on-construction trick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(NodeId, NodeId);

impl Edge {
    /// Builds a canonical edge. Panics if `a == b`: an edge always joins two
    /// distinct nodes in a tour.
    pub fn new(a: NodeId, b: NodeId) -> Self {
        assert_ne!(a, b, "an edge must join two distinct nodes");
        if a < b {
            Edge(a, b)
        } else {
            Edge(b, a)
        }
    }

    pub fn a(&self) -> NodeId {
        self.0
    }

    pub fn b(&self) -> NodeId {
        self.1
    }

    pub fn contains(&self, n: NodeId) -> bool {
        self.0 == n || self.1 == n
    }
}
