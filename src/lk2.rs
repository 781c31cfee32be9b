//! LK2: Helsgaun's simplified Lin-Kernighan — feasible swaps only, no
//! backtracking vector, no unfeasible-branch exploration. Grounded on
//! `Tsp.lk2_select_broken_edge` / `lk2_select_joined_edge` / `lk2_main` /
//! `lk2_improve` in
//! `examples/original_source/src/lk_heuristic/models/tsp.py`.

use std::collections::HashSet;

use log::debug;

use crate::edge::Edge;
use crate::neighbor::get_best_neighbors;
use crate::node::NodeId;
use crate::solver::Solver;

impl Solver {
    /// Tries to close the tour by joining `(t4, t1)`: if `(t1,t2,t3,t4)` is
    /// a feasible swap and the resulting gain is positive, applies it and
    /// reports success; otherwise recurses one level deeper via
    /// `lk2_select_joined_edge`.
    fn lk2_select_broken_edge(
        &mut self,
        gain: f64,
        t1: NodeId,
        t2: NodeId,
        t3: NodeId,
        t4: NodeId,
        broken_edges: &mut HashSet<Edge>,
        joined_edges: &mut HashSet<Edge>,
    ) -> bool {
        if t1 == t4 {
            return false;
        }
        let broken_edge = Edge::new(t1, t2);
        if broken_edges.contains(&broken_edge) {
            return false;
        }
        if !self.tour.is_swap_feasible(t1, t2, t3, t4) {
            return false;
        }

        let old_cost = self.tour.cost();
        self.tour.swap_feasible(t1, t2, t3, t4, false, true);
        broken_edges.insert(broken_edge);

        let close_gain = gain + self.matrix.cost(t1, t4) - self.matrix.cost(t3, t4);
        let succ_hash = self.succ_hash();
        if self.solutions.contains(&succ_hash) {
            self.tour.restore(1);
            return false;
        }

        if close_gain > self.config.gain_precision() {
            joined_edges.insert(Edge::new(t3, t4));
            self.tour.set_cost(&self.matrix);
            let expected = old_cost - close_gain;
            if (self.tour.cost() - expected).abs() > 1e-6 {
                debug!(
                    "lk2 delta gain error: expected {} got {}",
                    expected,
                    self.tour.cost()
                );
            }
            self.solutions.insert(succ_hash);
            self.solutions.insert(self.pred_hash());
            return true;
        }

        if self.lk2_select_joined_edge(close_gain, t1, t4, broken_edges, joined_edges) {
            return true;
        }
        self.tour.restore(1);
        false
    }

    /// Picks a new `(t3, t4)` neighbor pair extending the chain from `t4`,
    /// and tries to close via `lk2_select_broken_edge`.
    fn lk2_select_joined_edge(
        &mut self,
        gain: f64,
        t1: NodeId,
        t4: NodeId,
        broken_edges: &mut HashSet<Edge>,
        joined_edges: &mut HashSet<Edge>,
    ) -> bool {
        let broken_cost = self.matrix.cost(t4, t1);
        let candidates = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t4, Some(t1));
        for ((t5, t6), _) in candidates {
            let joined_edge = Edge::new(t4, t5);
            let joined_cost = self.matrix.cost(t4, t5);
            let explore_gain = gain + (broken_cost - joined_cost);

            if broken_edges.contains(&joined_edge)
                || self.tour.edges().contains(&joined_edge)
                || explore_gain <= self.config.gain_precision()
            {
                continue;
            }

            joined_edges.insert(joined_edge);
            return self.lk2_select_broken_edge(explore_gain, t1, t4, t5, t6, broken_edges, joined_edges);
        }
        false
    }

    /// One outer pass over every node as `t1`, trying both tour
    /// directions; returns `true` on the first improving move found.
    pub(crate) fn lk2_main(&mut self) -> bool {
        for t1 in self.tour.get_nodes() {
            for t2 in [self.tour.pred(t1), self.tour.succ(t1)] {
                let candidates = get_best_neighbors(&self.tour, &self.matrix, &self.neighbors, t2, None);
                for ((t3, t4), gain) in candidates {
                    if gain <= self.config.gain_precision() {
                        continue;
                    }
                    let mut broken_edges = HashSet::new();
                    let mut joined_edges = HashSet::new();
                    if self.lk2_select_broken_edge(gain, t1, t2, t3, t4, &mut broken_edges, &mut joined_edges) {
                        self.tour.clear_swap_stack();
                        return true;
                    }
                    self.tour.restore_all();
                }
            }
        }
        false
    }

    /// Runs `lk2_main` to a local optimum (no improving move left).
    pub fn lk2_improve(&mut self) {
        let mut swaps = 0;
        while self.lk2_main() {
            swaps += 1;
            debug!("lk2_improve cycle {}, tour cost = {}", swaps, self.tour.cost());
        }
    }
}
