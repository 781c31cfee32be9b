//! The 2-opt/3-opt-family swap primitives that Lin-Kernighan search recurses
//! over: classification (`is_swap_feasible`/`is_swap_unfeasible`), execution
//! (`swap_feasible`/`swap_unfeasible`/`swap_node_between_t2_t3`), and the
//! 4-opt double-bridge kick. Every quadruple/octuple is named `t1..t8`
//! after the classic Lin-Kernighan paper's notation, carried through from
//! the original source.

use log::trace;

use crate::node::NodeId;

use super::Tour;

/// What kind of swap a `SwapRecord` represents, so `restore` knows how to
/// invert it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapKind {
    /// A 2-opt reversal joining two edges into a single feasible tour.
    Feasible,
    /// Same as `Feasible`, but internally reversed the "other" arc because
    /// it was shorter. Purely informational — both forms invert the same
    /// way — kept so the stack is a faithful trace of what happened.
    FeasibleReversed,
    /// Splits the tour into two disjoint cycles.
    Unfeasible,
    /// Splices a second disjoint cycle back into the first.
    NodeBetweenT2T3,
    /// Same as `NodeBetweenT2T3`, but the spliced-in cycle's orientation
    /// had to be flipped first to line up the endpoints.
    NodeBetweenT2T3Reversed,
    /// A 4-opt double bridge: breaks 4 edges, reconnects with no reversal.
    DoubleBridge,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct SwapRecord {
    pub kind: SwapKind,
    pub t1: NodeId,
    pub t2: NodeId,
    pub t3: NodeId,
    pub t4: NodeId,
    /// Only used by `DoubleBridge`, which breaks 4 edges at once.
    pub t5: NodeId,
    pub t6: NodeId,
    pub t7: NodeId,
    pub t8: NodeId,
    /// Only meaningful for `Feasible`/`FeasibleReversed`/`Unfeasible`/
    /// `NodeBetweenT2T3*`: whether `pos` was left untouched, or (for
    /// `Unfeasible`) whether the `t1-t4` arc's orientation was flipped.
    pub is_subtour: bool,
}

impl SwapRecord {
    fn simple(kind: SwapKind, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId, is_subtour: bool) -> Self {
        SwapRecord {
            kind,
            t1,
            t2,
            t3,
            t4,
            t5: NodeId(0),
            t6: NodeId(0),
            t7: NodeId(0),
            t8: NodeId(0),
            is_subtour,
        }
    }

    fn bridge(t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId, t5: NodeId, t6: NodeId, t7: NodeId, t8: NodeId) -> Self {
        SwapRecord {
            kind: SwapKind::DoubleBridge,
            t1,
            t2,
            t3,
            t4,
            t5,
            t6,
            t7,
            t8,
            is_subtour: false,
        }
    }
}

impl Tour {
    /// Are edges `(t1,t2)` and `(t3,t4)` breakable into a single feasible
    /// tour by joining `(t2,t3)` and `(t1,t4)`? Requires the four nodes be
    /// distinct and the orientation of `t4` relative to `t3` to match the
    /// orientation of `t2` relative to `t1`.
    pub fn is_swap_feasible(&self, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId) -> bool {
        if !all_distinct(&[t1, t2, t3, t4]) {
            return false;
        }
        if self.succ(t1) == t2 {
            self.pred(t3) == t4
        } else if self.pred(t1) == t2 {
            self.succ(t3) == t4
        } else {
            false
        }
    }

    /// Are edges `(t1,t2)` and `(t3,t4)` breakable into two disjoint
    /// feasible cycles? Requires the opposite local orientation from
    /// `is_swap_feasible`, and that neither new cycle degenerates (no two
    /// of the four nodes may already be adjacent beyond the defining
    /// edges).
    pub fn is_swap_unfeasible(&self, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId) -> bool {
        if !all_distinct(&[t1, t2, t3, t4]) {
            return false;
        }
        let direction_ok = if self.succ(t1) == t2 {
            self.succ(t3) == t4
        } else if self.pred(t1) == t2 {
            self.pred(t3) == t4
        } else {
            false
        };
        if !direction_ok {
            return false;
        }
        let adjacent = |x: NodeId, y: NodeId| self.succ(x) == y || self.pred(x) == y;
        !adjacent(t2, t3) && !adjacent(t4, t1)
    }

    /// Executes a feasible 2-opt swap: breaks `(t1,t2)` and `(t3,t4)`,
    /// reverses the shorter of the two resulting arcs, and rejoins as
    /// `(t3,t2)` and `(t1,t4)`. Assumes `is_swap_feasible(t1,t2,t3,t4)`
    /// (or its mirror direction) already holds — callers that haven't
    /// checked get silently wrong results, matching the original source's
    /// contract.
    ///
    /// `is_subtour` skips updating `pos`: used while operating on a
    /// temporarily disjoint sub-cycle where no single consistent position
    /// order exists yet.
    pub fn swap_feasible(&mut self, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId, is_subtour: bool, record: bool) {
        let (mut a, mut b, mut c, mut d) = (t1, t2, t3, t4);
        if self.succ(a) != b {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut c, &mut d);
        }

        let mut seg_size = self.pos(b) - self.pos(c);
        if seg_size < 0 {
            seg_size += self.size() as i64;
        }
        let mut reversed_other_arc = false;
        if 2 * seg_size > self.size() as i64 {
            let (na, nb, nc, nd) = (d, c, b, a);
            a = na;
            b = nb;
            c = nc;
            d = nd;
            reversed_other_arc = true;
        }

        // Reverse the segment from `c` to `a` inclusive, walking the old
        // `succ` chain; `a`'s successor marks the end.
        let pos_start = self.pos(a);
        let mut pos = pos_start;
        let mut node = c;
        let end_node = self.succ(a);
        while node != end_node {
            let old_succ = self.succ(node);
            let old_pred = self.pred(node);
            self.set_succ(node, old_pred);
            self.set_pred(node, old_succ);
            if !is_subtour {
                self.set_pos(node, pos);
                pos -= 1;
            }
            node = old_succ;
        }

        self.set_succ(c, b);
        self.set_pred(b, c);
        self.set_pred(a, d);
        self.set_succ(d, a);

        if record {
            let kind = if reversed_other_arc {
                SwapKind::FeasibleReversed
            } else {
                SwapKind::Feasible
            };
            trace!("swap_feasible t1={} t2={} t3={} t4={} kind={:?}", t1, t2, t3, t4, kind);
            self.swap_stack.push(SwapRecord::simple(kind, t1, t2, t3, t4, is_subtour));
        }
    }

    /// Executes an unfeasible 2-opt swap: breaks `(t1,t2)` and `(t3,t4)`,
    /// and rejoins as `(t1,t4)`/`(t3,t2)` *without* reversing any segment,
    /// producing two disjoint cycles (one containing the `t1-t4` arc, the
    /// other the `t2-t3` arc). `pos` is left untouched — it is no longer a
    /// consistent total order once the tour splits.
    ///
    /// `reverse_subtour`, when set, additionally flips the orientation of
    /// the cycle now containing `t1`. Used by `restore` to invert a
    /// previous reversed `swap_node_between_t2_t3`.
    pub fn swap_unfeasible(&mut self, t1: NodeId, t2: NodeId, t3: NodeId, t4: NodeId, reverse_subtour: bool, record: bool) {
        self.set_succ(t1, t4);
        self.set_pred(t4, t1);
        self.set_succ(t3, t2);
        self.set_pred(t2, t3);

        if reverse_subtour {
            self.reverse_cycle_orientation(t1);
        }

        if record {
            trace!("swap_unfeasible t1={} t2={} t3={} t4={}", t1, t2, t3, t4);
            self.swap_stack
                .push(SwapRecord::simple(SwapKind::Unfeasible, t1, t2, t3, t4, reverse_subtour));
        }
    }

    /// Splices the disjoint cycle containing `t5`/`t6` back into the cycle
    /// containing `t1`/`t4`, producing a single Hamiltonian cycle again.
    /// `t4` must currently be the successor or predecessor of `t1` (the
    /// two ends of the unfeasible `t1-t4` arc); `t5`/`t6` must be adjacent
    /// on the other cycle. Reverses the `t5-t6` cycle first if needed so
    /// its endpoints line up with `t1`/`t4`'s orientation.
    pub fn swap_node_between_t2_t3(&mut self, t1: NodeId, t4: NodeId, t5: NodeId, t6: NodeId, record: bool) {
        let need_reverse = self.succ(t6) == t5;
        if need_reverse {
            self.reverse_cycle_orientation(t5);
        }

        if self.succ(t1) == t4 {
            self.set_succ(t1, t6);
            self.set_pred(t6, t1);
            self.set_succ(t5, t4);
            self.set_pred(t4, t5);
        } else {
            self.set_succ(t4, t5);
            self.set_pred(t5, t4);
            self.set_succ(t6, t1);
            self.set_pred(t1, t6);
        }

        if record {
            let kind = if need_reverse {
                SwapKind::NodeBetweenT2T3Reversed
            } else {
                SwapKind::NodeBetweenT2T3
            };
            trace!("swap_node_between_t2_t3 t1={} t4={} t5={} t6={} kind={:?}", t1, t4, t5, t6, kind);
            self.swap_stack
                .push(SwapRecord::simple(kind, t1, t4, t5, t6, need_reverse));
        }
    }

    /// Flips `succ`/`pred` for every node of the cycle containing `start`,
    /// without touching `pos`. Self-inverse: applying it twice restores
    /// the original orientation.
    pub(super) fn reverse_cycle_orientation(&mut self, start: NodeId) {
        let mut node = start;
        loop {
            let old_succ = self.succ(node);
            let old_pred = self.pred(node);
            self.set_succ(node, old_pred);
            self.set_pred(node, old_succ);
            node = old_succ;
            if node == start {
                break;
            }
        }
    }

    /// Classifies 4 candidate edges (each given as an unordered node pair)
    /// as a valid double bridge, returning the canonical `(t1..t8)` if so.
    /// Each pair must currently be a tour edge (either direction); the 4
    /// edges must partition the cycle into exactly 4 arcs.
    pub fn is_swap_double_bridge(
        &self,
        pairs: [(NodeId, NodeId); 4],
    ) -> Option<[NodeId; 8]> {
        self.classify_double_bridge(pairs)
    }

    fn classify_double_bridge(&self, pairs: [(NodeId, NodeId); 4]) -> Option<[NodeId; 8]> {
        // Canonicalize each pair so that `succ(a) == b`.
        let mut directed = [(NodeId(0), NodeId(0)); 4];
        for (i, &(x, y)) in pairs.iter().enumerate() {
            directed[i] = if self.succ(x) == y {
                (x, y)
            } else if self.succ(y) == x {
                (y, x)
            } else {
                return None;
            };
        }

        // Determine the cyclic order of the 4 edges by walking forward
        // from each edge's head until another (not yet placed) edge's
        // tail is reached.
        let mut order = vec![0usize];
        let mut remaining: Vec<usize> = (1..4).collect();
        for _ in 0..3 {
            let (_, last_b) = directed[*order.last().unwrap()];
            let mut cur = self.succ(last_b);
            let mut next_idx = None;
            for _ in 0..=self.size() {
                if let Some(pos) = remaining.iter().position(|&j| directed[j].0 == cur) {
                    next_idx = Some(remaining.remove(pos));
                    break;
                }
                cur = self.succ(cur);
            }
            order.push(next_idx?);
        }
        if order.len() != 4 {
            return None;
        }

        let (o0, o1, o2, o3) = (order[0], order[1], order[2], order[3]);
        let t1 = directed[o0].0;
        let t2 = directed[o0].1;
        let t3 = directed[o2].0;
        let t4 = directed[o2].1;
        let t5 = directed[o3].0;
        let t6 = directed[o3].1;
        let t7 = directed[o1].0;
        let t8 = directed[o1].1;
        Some([t1, t2, t3, t4, t5, t6, t7, t8])
    }

    /// Executes a 4-opt double bridge given the 8 endpoints of the 4 edges
    /// to break (in any of the orderings `is_swap_double_bridge` accepts —
    /// this re-derives the canonical form itself, so it can be called
    /// directly with raw edge endpoints). Breaks `(t1,t2)`, `(t3,t4)`,
    /// `(t5,t6)`, `(t7,t8)` and reconnects as `(t1,t4)`, `(t2,t3)`,
    /// `(t5,t8)`, `(t6,t7)` — no segment is reversed. Returns `false`
    /// (no-op) if the 8 nodes don't form a valid double bridge.
    pub fn swap_double_bridge(
        &mut self,
        t1: NodeId,
        t2: NodeId,
        t3: NodeId,
        t4: NodeId,
        t5: NodeId,
        t6: NodeId,
        t7: NodeId,
        t8: NodeId,
        record: bool,
    ) -> bool {
        let pairs = [(t1, t2), (t3, t4), (t5, t6), (t7, t8)];
        let canonical = match self.classify_double_bridge(pairs) {
            Some(c) => c,
            None => return false,
        };
        let [t1, t2, t3, t4, t5, t6, t7, t8] = canonical;

        self.set_succ(t1, t4);
        self.set_pred(t4, t1);
        self.set_succ(t3, t2);
        self.set_pred(t2, t3);
        self.set_succ(t5, t8);
        self.set_pred(t8, t5);
        self.set_succ(t7, t6);
        self.set_pred(t6, t7);

        self.renumber_pos();

        if record {
            trace!(
                "swap_double_bridge t1={} t2={} t3={} t4={} t5={} t6={} t7={} t8={}",
                t1, t2, t3, t4, t5, t6, t7, t8
            );
            self.swap_stack.push(SwapRecord::bridge(t1, t2, t3, t4, t5, t6, t7, t8));
        }
        true
    }
}

fn all_distinct(nodes: &[NodeId]) -> bool {
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            if nodes[i] == nodes[j] {
                return false;
            }
        }
    }
    true
}
