//! LK1: the full Lin-Kernighan variant — several candidates tried per
//! recursion level (bounded by `SolverConfig::backtracking`), an unfeasible
//! branch that temporarily splits the tour into two cycles and repairs it
//! via `swap_node_between_t2_t3`, and a double-bridge kick to escape local
//! optima once no further improving move is found. Grounded on `Tsp.lk1_*`
//! in `examples/original_source/src/lk_heuristic/models/tsp.py`.

use std::collections::HashSet;

use log::debug;
use rand::seq::SliceRandom;

use crate::cost::Scalar;
use crate::edge::Edge;
use crate::neighbor::get_best_neighbors;
use crate::node::NodeId;
use crate::solver::Solver;

/// Which primitive `lk1_feasible_search` applies before computing the
/// close gain: a plain feasible 2-opt, or the splice that repairs the
/// two-cycle state left by `lk1_unfeasible_search`.
#[derive(Clone, Copy)]
enum SwapFunc {
    Feasible,
    NodeBetweenT2T3,
}

impl Solver {
    /// One level of the feasible search chain: applies `swap_func` at
    /// `(t1,t2,t3,t4)`, records the gain of closing here, then extends the
    /// chain from `t4` via `lk1_extend`. Assumes the caller has already
    /// established that this swap is feasible — `get_best_neighbors`
    /// filters for that before a candidate ever reaches here, so this
    /// function never re-checks it and never falls back to the unfeasible
    /// branch (that branch is only ever entered once, from `lk1_main`).
    #[allow(clippy::too_many_arguments)]
    fn lk1_feasible_search(
        &mut self,
        level: usize,
        gain: Scalar,
        swap_func: SwapFunc,
        t1: NodeId,
        t2: NodeId,
        t3: NodeId,
        t4: NodeId,
        broken_edges: &mut HashSet<Edge>,
        joined_edges: &mut HashSet<Edge>,
    ) {
        let broken_edge = Edge::new(t3, t4);
        let broken_cost = self.matrix.cost(t3, t4);

        if level >= self.config.reduction_level()
            && self.cycles <= self.config.reduction_cycle()
            && self.reduction_edges.contains(&broken_edge)
        {
            return;
        }

        broken_edges.insert(Edge::new(t1, t2));
        joined_edges.insert(Edge::new(t2, t3));

        match swap_func {
            SwapFunc::Feasible => self.tour.swap_feasible(t1, t2, t3, t4, false, true),
            SwapFunc::NodeBetweenT2T3 => self.tour.swap_node_between_t2_t3(t1, t2, t3, t4, true),
        }

        let joined_close_edge = Edge::new(t4, t1);
        let joined_close_cost = self.matrix.cost(t4, t1);
        let joined_close_valid =
            !self.tour.edges().contains(&joined_close_edge) && !broken_edges.contains(&joined_close_edge);

        let close_gain = gain + (broken_cost - joined_close_cost);
        self.close_gains.push(Some(close_gain));
        if close_gain > self.best_close_gain {
            self.best_close_gain = close_gain;
        }

        self.lk1_extend(
            level,
            gain,
            broken_edge,
            broken_cost,
            close_gain,
            joined_close_edge,
            joined_close_valid,
            t1,
            t4,
            broken_edges,
            joined_edges,
        );
    }

    /// Scans `t4`'s best neighbors for the first `(next_y_head,
    /// next_x_head)` passing the disjoint/gain/next-xi gate, then commits
    /// unconditionally to it: either closing here (if closing beats
    /// exploring) or recursing one level deeper. Never retries a sibling
    /// candidate once one has passed the gate and been committed to,
    /// matching the ground truth's single `return` inside the loop body.
    #[allow(clippy::too_many_arguments)]
    fn lk1_extend(
        &mut self,
        level: usize,
        gain: Scalar,
        broken_edge: Edge,
        broken_cost: Scalar,
        close_gain: Scalar,
        joined_close_edge: Edge,
        joined_close_valid: bool,
        t1: NodeId,
        t4: NodeId,
        broken_edges: &mut HashSet<Edge>,
        joined_edges: &mut HashSet<Edge>,
    ) {
        let limit = self.config.backtracking().at(level).max(1);
        let candidates = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t4, Some(t1));
        for ((next_y_head, next_x_head), _) in candidates.into_iter().take(limit) {
            let joined_edge = Edge::new(t4, next_y_head);
            let joined_cost = self.matrix.cost(t4, next_y_head);
            let explore_gain = gain + (broken_cost - joined_cost);

            let disjoint_criteria = !broken_edges.contains(&broken_edge)
                && !joined_edges.contains(&broken_edge)
                && !self.tour.edges().contains(&joined_edge)
                && !broken_edges.contains(&joined_edge);
            let gain_criteria = explore_gain > self.config.gain_precision();
            let next_broken_edge = Edge::new(next_y_head, next_x_head);
            let next_xi_criteria = !broken_edges.contains(&next_broken_edge) && !joined_edges.contains(&next_broken_edge);

            if !(disjoint_criteria && gain_criteria && next_xi_criteria) {
                continue;
            }

            let succ_hash = self.succ_hash();
            if self.solutions.contains(&succ_hash) {
                return;
            }

            if close_gain > explore_gain
                && close_gain >= self.best_close_gain
                && close_gain > self.config.gain_precision()
                && joined_close_valid
            {
                broken_edges.insert(broken_edge);
                joined_edges.insert(joined_close_edge);
                return;
            }

            self.lk1_feasible_search(level + 1, explore_gain, SwapFunc::Feasible, t1, t4, next_y_head, next_x_head, broken_edges, joined_edges);
            return;
        }
    }

    /// The level-1 alternative search entered when `(t1,t2,t3,t4)` splits
    /// the tour into two disjoint cycles rather than joining into one.
    /// Looks for `(t5,t6)` that repairs the split, classifying each
    /// candidate as Case A (`t5` lies on the `t1-t4` arc, requiring a
    /// further `(t7,t8)` pick before recursing at level 4) or Case B (`t5`
    /// lies on the `t2-t3` arc, recursing directly at level 3). Only ever
    /// called once, from `lk1_main` — it never recurses into itself.
    fn lk1_unfeasible_search(
        &mut self,
        gain: Scalar,
        t1: NodeId,
        t2: NodeId,
        t3: NodeId,
        t4: NodeId,
        broken_edges: &mut HashSet<Edge>,
        joined_edges: &mut HashSet<Edge>,
    ) {
        broken_edges.insert(Edge::new(t1, t2));
        joined_edges.insert(Edge::new(t2, t3));

        let broken_edge_1 = Edge::new(t3, t4);
        let broken_cost_1 = self.matrix.cost(t3, t4);

        self.tour.swap_unfeasible(t1, t2, t3, t4, false, true);
        self.close_gains.push(None);

        let limit = self.config.backtracking().at(1).max(1);
        let candidates = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t4, None);
        for ((t5, t6), _) in candidates.into_iter().take(limit) {
            let joined_edge_1 = Edge::new(t4, t5);
            let joined_cost_1 = self.matrix.cost(t4, t5);
            let mut explore_gain = gain + (broken_cost_1 - joined_cost_1);

            let gain_criteria = explore_gain > self.config.gain_precision();
            let valid_nodes =
                t5 != t1 && t5 != t2 && t5 != t3 && t5 != t4 && t6 != t1 && t6 != t2 && t6 != t3 && t6 != t4;
            if !(valid_nodes && gain_criteria) {
                continue;
            }

            let broken_edge_2 = Edge::new(t5, t6);
            let broken_cost_2 = self.matrix.cost(t5, t6);

            let t1_after_t4 = self.tour.succ(t4) == t1;
            let t5_between_t1_t4 = if t1_after_t4 {
                self.tour.between(t1, t5, t4)
            } else {
                self.tour.between(t4, t5, t1)
            };

            if t5_between_t1_t4 {
                if !self.tour.is_swap_feasible(t1, t4, t5, t6) {
                    continue;
                }

                let limit3 = self.config.backtracking().at(2).max(1);
                let candidates3 = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t6, None);
                for ((t7, t8), _) in candidates3.into_iter().take(limit3) {
                    let joined_edge_2 = Edge::new(t6, t7);
                    let joined_cost_2 = self.matrix.cost(t6, t7);
                    explore_gain += broken_cost_2 - joined_cost_2;

                    let gain_criteria = explore_gain > self.config.gain_precision();

                    let t2_after_t3 = self.tour.succ(t3) == t2;
                    let t7_between_t2_t3 = if t2_after_t3 {
                        self.tour.between(t2, t7, t3)
                    } else {
                        self.tour.between(t3, t7, t2)
                    };

                    let valid_nodes = t7 != t2 && t7 != t3 && t8 != t2 && t8 != t3;

                    if gain_criteria && valid_nodes && t7_between_t2_t3 {
                        let broken_edge_3 = Edge::new(t7, t8);

                        self.tour.swap_feasible(t1, t4, t5, t6, true, true);
                        self.close_gains.push(None);

                        broken_edges.insert(broken_edge_1);
                        broken_edges.insert(broken_edge_2);
                        broken_edges.insert(broken_edge_3);
                        joined_edges.insert(joined_edge_1);
                        joined_edges.insert(joined_edge_2);

                        self.lk1_feasible_search(4, explore_gain, SwapFunc::NodeBetweenT2T3, t1, t6, t7, t8, broken_edges, joined_edges);
                        return;
                    }
                }
                // No (t7,t8) passed the gate for this t5 — try the next t5
                // candidate, same as the ground truth's fall-through.
            } else {
                broken_edges.insert(broken_edge_1);
                broken_edges.insert(broken_edge_2);
                joined_edges.insert(joined_edge_1);

                self.lk1_feasible_search(3, explore_gain, SwapFunc::NodeBetweenT2T3, t1, t4, t5, t6, broken_edges, joined_edges);
                return;
            }
        }

        self.tour.restore(1);
    }

    /// One outer pass over every node as `t1`, both tour directions. After
    /// the feasible/unfeasible search chain unwinds (for whatever reason —
    /// success, exhaustion, or a repeat-tour checkout), splices the tour
    /// forward to whichever index along the chain held the best close
    /// gain, not just the final state reached. Returns `true` and leaves
    /// the tour improved on the first such splice.
    pub(crate) fn lk1_main(&mut self) -> bool {
        for t1 in self.tour.get_nodes() {
            for t2 in [self.tour.pred(t1), self.tour.succ(t1)] {
                let broken_cost = self.matrix.cost(t1, t2);

                let limit = self.config.backtracking().at(0).max(1);
                let candidates = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t2, None);
                for ((t3, t4), _) in candidates.into_iter().take(limit) {
                    let joined_edge = Edge::new(t3, t2);
                    let joined_cost = self.matrix.cost(t3, t2);
                    let gain = broken_cost - joined_cost;

                    if self.tour.edges().contains(&joined_edge) || gain <= self.config.gain_precision() {
                        continue;
                    }

                    let mut broken_edges = HashSet::new();
                    let mut joined_edges = HashSet::new();
                    self.close_gains.clear();
                    self.best_close_gain = 0.0;

                    if self.tour.is_swap_feasible(t1, t2, t3, t4) {
                        self.lk1_feasible_search(1, gain, SwapFunc::Feasible, t1, t2, t3, t4, &mut broken_edges, &mut joined_edges);
                    } else if self.tour.is_swap_unfeasible(t1, t2, t3, t4) {
                        self.lk1_unfeasible_search(gain, t1, t2, t3, t4, &mut broken_edges, &mut joined_edges);
                    }

                    if self.close_gains.is_empty() {
                        continue;
                    }

                    let max_gain = self.close_gains.iter().flatten().copied().fold(Scalar::MIN, Scalar::max);
                    if max_gain <= 0.0 {
                        self.close_gains.clear();
                        self.tour.restore_all();
                        continue;
                    }

                    let best_index = self
                        .close_gains
                        .iter()
                        .position(|g| *g == Some(max_gain))
                        .expect("max_gain was folded from an entry of close_gains");
                    self.tour.commit_edges_through(best_index + 1);
                    self.tour.restore((self.close_gains.len() - 1) - best_index);
                    self.tour.set_cost(&self.matrix);
                    self.solutions.insert(self.succ_hash());
                    self.solutions.insert(self.pred_hash());
                    self.close_gains.clear();
                    self.tour.clear_swap_stack();
                    return true;
                }
            }
        }
        false
    }

    /// Applies a random double-bridge kick, re-runs `lk1_main` to a new
    /// local optimum, and keeps the result only if it beats the pre-kick
    /// cost; otherwise undoes the kick and tries again, up to
    /// `config.max_double_bridge_tests()` attempts.
    fn lk1_double_bridge_search(&mut self) -> bool {
        let n = self.tour.size();
        if n < 8 {
            return false;
        }
        let before_cost = self.tour.cost();

        for _ in 0..self.config.max_double_bridge_tests() {
            let mut starts: Vec<NodeId> = self.tour.get_nodes().collect();
            starts.shuffle(&mut self.rng);
            let picked: Vec<NodeId> = starts.into_iter().take(4).collect();
            let pairs = [
                (picked[0], self.tour.succ(picked[0])),
                (picked[1], self.tour.succ(picked[1])),
                (picked[2], self.tour.succ(picked[2])),
                (picked[3], self.tour.succ(picked[3])),
            ];

            let classified = match self.tour.is_swap_double_bridge(pairs) {
                Some(t) => t,
                None => continue,
            };
            let applied = self.tour.swap_double_bridge(
                classified[0],
                classified[1],
                classified[2],
                classified[3],
                classified[4],
                classified[5],
                classified[6],
                classified[7],
                true,
            );
            if !applied {
                continue;
            }
            self.tour.set_cost(&self.matrix);

            while self.lk1_main() {}

            if self.tour.cost() < before_cost - self.config.gain_precision() {
                self.tour.clear_swap_stack();
                self.double_bridge_gain += before_cost - self.tour.cost();
                return true;
            }
            self.tour.restore_all();
            self.tour.set_cost(&self.matrix);
        }
        false
    }

    /// Runs `lk1_main` to a local optimum, then keeps kicking with
    /// `lk1_double_bridge_search` and re-optimizing as long as each kick
    /// finds a better tour.
    pub fn lk1_improve(&mut self) {
        let mut cycles = 0usize;
        while self.lk1_main() {
            cycles += 1;
            debug!("lk1_improve cycle {}, tour cost = {}", cycles, self.tour.cost());
            if self.config.reduction_cycle() > 0 && cycles % self.config.reduction_cycle() == 0 {
                self.reduce_edges();
            }
        }
        self.cycles = cycles;

        while self.lk1_double_bridge_search() {
            debug!("lk1_improve double-bridge kick accepted, tour cost = {}", self.tour.cost());
            self.reduction_edges.clear();
        }
    }

    /// Marks up to `reduction_level` of the current tour's edges as
    /// already explored, so later `lk1_main` passes skip re-breaking them.
    /// A cheap way to stop repeatedly re-examining edges that survived
    /// several improvement cycles untouched.
    fn reduce_edges(&mut self) {
        let level = self.config.reduction_level();
        for edge in self.tour.edges().iter().take(level) {
            self.reduction_edges.insert(*edge);
        }
    }
}
