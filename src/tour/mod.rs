//! The doubly linked tour and its Lin-Kernighan swap primitives.
//!
//! Nodes live in a flat arena (`Vec<Node>`) addressed by `NodeId`; the tour
//! order itself is carried entirely by each node's `pred`/`succ`/`pos`
//! fields, never by the arena's own index order. This mirrors the original
//! source's `Tour`/`Tsp` node graph, translated from Python object references
//! to arena indices.

use std::collections::HashSet;

use crate::cost::{CostMatrix, Scalar};
use crate::edge::Edge;
use crate::error::{CyklError, Result};
use crate::node::{Coord, Node, NodeId};

mod restore;
mod swap;
#[cfg(test)]
mod tests;

pub use swap::SwapKind;
use swap::SwapRecord;

/// A tour over `N` nodes, represented as a doubly linked cycle.
#[derive(Debug, Clone)]
pub struct Tour {
    nodes: Vec<Node>,
    edges: HashSet<Edge>,
    cost: Scalar,
    swap_stack: Vec<SwapRecord>,
}

impl Tour {
    /// Builds a tour visiting `coords` in the given order: `coords[i]`'s
    /// successor is `coords[i + 1]`, wrapping at the end. Fails if fewer
    /// than 3 nodes are given (a cycle needs at least a triangle).
    pub fn new(coords: Vec<Coord>) -> Result<Self> {
        let n = coords.len();
        if n < 3 {
            return Err(CyklError::TooFewNodes(n));
        }
        let nodes: Vec<Node> = coords
            .into_iter()
            .enumerate()
            .map(|(i, coord)| {
                let id = NodeId(i);
                let pred = NodeId((i + n - 1) % n);
                let succ = NodeId((i + 1) % n);
                Node {
                    id,
                    coord,
                    pred,
                    succ,
                    pos: i as i64,
                }
            })
            .collect();

        let mut tour = Tour {
            nodes,
            edges: HashSet::new(),
            cost: 0.0,
            swap_stack: Vec::new(),
        };
        tour.rebuild_edges();
        Ok(tour)
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn cost(&self) -> Scalar {
        self.cost
    }

    pub fn edges(&self) -> &HashSet<Edge> {
        &self.edges
    }

    /// Nodes in arena (id) order — stable across swaps, unlike tour order.
    pub fn get_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn coord(&self, id: NodeId) -> &Coord {
        &self.nodes[id.index()].coord
    }

    #[inline]
    pub fn succ(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].succ
    }

    #[inline]
    pub fn pred(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].pred
    }

    #[inline]
    pub fn pos(&self, id: NodeId) -> i64 {
        self.nodes[id.index()].pos
    }

    #[inline]
    fn set_succ(&mut self, id: NodeId, succ: NodeId) {
        self.nodes[id.index()].succ = succ;
    }

    #[inline]
    fn set_pred(&mut self, id: NodeId, pred: NodeId) {
        self.nodes[id.index()].pred = pred;
    }

    #[inline]
    fn set_pos(&mut self, id: NodeId, pos: i64) {
        self.nodes[id.index()].pos = pos;
    }

    /// `true` iff `m` lies strictly between `a` and `b` when walking forward
    /// from `a`, determined from `pos` in O(1). Only valid while `pos` is a
    /// consistent total order over the whole tour — not during the
    /// temporary two-cycle intermediate state of an unfeasible swap.
    pub fn between_pos(&self, a: NodeId, m: NodeId, b: NodeId) -> bool {
        let (pa, pm, pb) = (self.pos(a), self.pos(m), self.pos(b));
        if pa <= pb {
            pa < pm && pm < pb
        } else {
            pa < pm || pm < pb
        }
    }

    /// `true` iff `m` lies strictly between `a` and `b` walking forward from
    /// `a` via `succ`, in O(N). Used whenever `pos` can't be trusted, e.g.
    /// while the tour is temporarily split into two disjoint cycles.
    pub fn between_succ(&self, a: NodeId, m: NodeId, b: NodeId) -> bool {
        let mut cur = self.succ(a);
        while cur != b {
            if cur == m {
                return true;
            }
            cur = self.succ(cur);
            if cur == a {
                return false;
            }
        }
        false
    }

    /// Default `between`: O(1) `pos`-based test.
    pub fn between(&self, a: NodeId, m: NodeId, b: NodeId) -> bool {
        self.between_pos(a, m, b)
    }

    /// Recomputes every node's `pos` by walking `succ` from node 0,
    /// assigning consecutive indices `0..size`. Used after an operation
    /// (shuffle, double bridge) that leaves `pos` globally inconsistent.
    pub fn renumber_pos(&mut self) {
        let start = NodeId(0);
        let mut cur = start;
        let mut i = 0i64;
        loop {
            self.set_pos(cur, i);
            i += 1;
            cur = self.succ(cur);
            if cur == start {
                break;
            }
        }
    }

    /// Recomputes `cost` as the sum of every tour edge's cost.
    pub fn set_cost(&mut self, matrix: &CostMatrix) {
        let start = NodeId(0);
        let mut cur = start;
        let mut total = 0.0;
        loop {
            let next = self.succ(cur);
            total += matrix.cost(cur, next);
            cur = next;
            if cur == start {
                break;
            }
        }
        self.cost = total;
    }

    /// Rebuilds `edges` from the current `succ` chain.
    pub fn rebuild_edges(&mut self) {
        let start = NodeId(0);
        let mut cur = start;
        let mut edges = HashSet::with_capacity(self.nodes.len());
        loop {
            let next = self.succ(cur);
            edges.insert(Edge::new(cur, next));
            cur = next;
            if cur == start {
                break;
            }
        }
        self.edges = edges;
    }

    /// Shuffles the tour into a uniformly random permutation (Fisher-Yates
    /// on the node order, then rewires `pred`/`succ`/`pos` and rebuilds
    /// `edges`), mirroring `Tour.shuffle` in the original source.
    pub fn shuffle<R: rand::Rng>(&mut self, rng: &mut R) {
        use rand::seq::SliceRandom;
        let n = self.nodes.len();
        let mut order: Vec<usize> = (1..n).collect();
        order.shuffle(rng);
        order.push(0);

        let mut prev_idx = *order.last().unwrap();
        for (i, &idx) in order.iter().enumerate() {
            let succ_idx = order[(i + 1) % order.len()];
            self.nodes[idx].pred = NodeId(prev_idx);
            self.nodes[idx].succ = NodeId(succ_idx);
            self.nodes[idx].pos = i as i64;
            prev_idx = idx;
        }
        self.rebuild_edges();
        self.swap_stack.clear();
    }

    /// Directly overwrites a node's `pred`/`succ`/`pos`, bypassing the swap
    /// primitives. Used by full-tour reconstructions (`set_order`) that
    /// replace the entire linked structure at once rather than rewiring a
    /// handful of nodes.
    fn set_node_links(&mut self, id: NodeId, pred: NodeId, succ: NodeId, pos: i64) {
        self.set_pred(id, pred);
        self.set_succ(id, succ);
        self.set_pos(id, pos);
    }

    /// The tour's current visiting order, starting at node 0.
    pub fn order(&self) -> Vec<NodeId> {
        let start = NodeId(0);
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cur = start;
        loop {
            order.push(cur);
            cur = self.succ(cur);
            if cur == start {
                break;
            }
        }
        order
    }

    /// Rewires `pred`/`succ`/`pos` to the cyclic order given by `order`,
    /// then rebuilds `edges`. `order` must be a permutation of every node.
    pub(crate) fn set_order(&mut self, order: &[NodeId]) {
        let n = order.len();
        for (i, &id) in order.iter().enumerate() {
            let pred = order[(i + n - 1) % n];
            let succ = order[(i + 1) % n];
            self.set_node_links(id, pred, succ, i as i64);
        }
        self.rebuild_edges();
    }

    /// Total number of recorded, not-yet-restored swaps.
    pub fn swap_stack_len(&self) -> usize {
        self.swap_stack.len()
    }

    pub fn clear_swap_stack(&mut self) {
        self.swap_stack.clear();
    }
}

#[cfg(test)]
mod build_tests {
    use super::*;

    fn hexagon_coords() -> Vec<Coord> {
        vec![
            Coord::D2 { x: 1.0, y: 3.0 },
            Coord::D2 { x: 1.5, y: 2.5 },
            Coord::D2 { x: 2.0, y: 2.0 },
            Coord::D2 { x: 2.0, y: 1.0 },
            Coord::D2 { x: 2.0, y: 0.0 },
            Coord::D2 { x: 1.5, y: -0.5 },
            Coord::D2 { x: 1.0, y: -1.0 },
            Coord::D2 { x: 0.5, y: -0.5 },
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 0.0, y: 1.0 },
            Coord::D2 { x: 0.0, y: 2.0 },
            Coord::D2 { x: 0.5, y: 2.5 },
        ]
    }

    #[test]
    fn too_few_nodes_is_rejected() {
        let coords = vec![Coord::D2 { x: 0.0, y: 0.0 }, Coord::D2 { x: 1.0, y: 1.0 }];
        assert_eq!(Tour::new(coords), Err(CyklError::TooFewNodes(2)));
    }

    #[test]
    fn new_tour_has_natural_order_and_all_edges() {
        let tour = Tour::new(hexagon_coords()).unwrap();
        assert_eq!(tour.size(), 12);
        assert_eq!(tour.edges().len(), 12);
        for i in 0..12 {
            assert_eq!(tour.succ(NodeId(i)), NodeId((i + 1) % 12));
            assert_eq!(tour.pred(NodeId(i)), NodeId((i + 11) % 12));
        }
    }
}
