//! Undoing recorded swaps, in LIFO order, to get back to a prior tour
//! state without rebuilding it from scratch.

use super::swap::{SwapKind, SwapRecord};
use super::Tour;
use crate::edge::Edge;

impl Tour {
    /// Commits the first `n` entries of the swap stack into the tracked
    /// `edges` set: every swap kind breaks `(t1,t2)`/`(t3,t4)` and joins
    /// `(t2,t3)`/`(t4,t1)` under the record's own `(t1,t2,t3,t4)` labeling,
    /// so the update is uniform across swap kinds. Used by `lk1_main` to
    /// splice the committed tour forward to whichever chain index held the
    /// best close gain, without walking succ/pred to rediscover it.
    pub(crate) fn commit_edges_through(&mut self, n: usize) {
        for record in self.swap_stack.iter().take(n) {
            let (n1, n2, n3, n4) = (record.t1, record.t2, record.t3, record.t4);
            self.edges.remove(&Edge::new(n1, n2));
            self.edges.remove(&Edge::new(n3, n4));
            self.edges.insert(Edge::new(n2, n3));
            self.edges.insert(Edge::new(n4, n1));
        }
    }

    /// Undoes the last `n` recorded swaps (fewer if the stack is shorter).
    pub fn restore(&mut self, n: usize) {
        for _ in 0..n {
            match self.swap_stack.pop() {
                Some(record) => self.undo(record),
                None => break,
            }
        }
    }

    /// Undoes every recorded swap, returning the tour to the state it was
    /// in before any of them were applied.
    pub fn restore_all(&mut self) {
        let n = self.swap_stack.len();
        self.restore(n);
    }

    fn undo(&mut self, record: SwapRecord) {
        match record.kind {
            SwapKind::Feasible | SwapKind::FeasibleReversed => {
                // swap_feasible(t1,t2,t3,t4) leaves succ(t3)=t2, succ(t4)=t1;
                // breaking those and rejoining as (t1,t2)/(t4,t3) — i.e.
                // calling swap_feasible(t4,t1,t2,t3) — restores the
                // original edges and re-reverses the same segment back.
                self.swap_feasible(record.t4, record.t1, record.t2, record.t3, record.is_subtour, false);
            }
            SwapKind::Unfeasible => {
                // swap_unfeasible(t1,t2,t3,t4) leaves succ(t1)=t4,
                // succ(t3)=t2. Restoring succ(t1)=t2 and succ(t3)=t4 is
                // swap_unfeasible(t1,t4,t3,t2); undo any subtour-orientation
                // flip first so the edge being restored matches original.
                if record.is_subtour {
                    self.reverse_cycle_orientation(record.t1);
                }
                self.swap_unfeasible(record.t1, record.t4, record.t3, record.t2, false, false);
            }
            SwapKind::NodeBetweenT2T3 | SwapKind::NodeBetweenT2T3Reversed => {
                // swap_node_between_t2_t3(t1,t4,t5,t6) (recorded as
                // t1,t2=t4,t3=t5,t4=t6) leaves succ(t1)=t6 and succ(t5)=t6's
                // partner edge intact; splitting back into two disjoint
                // cycles is swap_unfeasible(t1,t6,t5,t4), then undo any
                // cycle-A orientation flip that was applied going in.
                let (t1, t4, t5, t6) = (record.t1, record.t2, record.t3, record.t4);
                self.swap_unfeasible(t1, t6, t5, t4, false, false);
                if record.is_subtour {
                    self.reverse_cycle_orientation(t5);
                }
            }
            SwapKind::DoubleBridge => {
                // The four original edges are exactly the ones this move
                // replaced; restore them directly.
                let (t1, t2, t3, t4, t5, t6, t7, t8) =
                    (record.t1, record.t2, record.t3, record.t4, record.t5, record.t6, record.t7, record.t8);
                self.set_succ(t1, t2);
                self.set_pred(t2, t1);
                self.set_succ(t3, t4);
                self.set_pred(t4, t3);
                self.set_succ(t5, t6);
                self.set_pred(t6, t5);
                self.set_succ(t7, t8);
                self.set_pred(t8, t7);
                self.renumber_pos();
            }
        }
    }
}
