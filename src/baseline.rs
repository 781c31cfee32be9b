//! Construction baselines: greedy nearest-neighbor and brute-force exact
//! search, used for comparison against the LK engines on small instances.
//! Grounded on `Tsp.nn_improve` / `Tsp.bf_improve` in
//! `examples/original_source/src/lk_heuristic/models/tsp.py`.

use log::{info, warn};

use crate::node::NodeId;
use crate::solver::Solver;

impl Solver {
    /// Rebuilds the tour greedily: starting from node 0, repeatedly visits
    /// the nearest not-yet-visited node.
    pub fn nn_improve(&mut self) {
        let n = self.tour.size();
        let mut visited = vec![false; n];
        let mut order = Vec::with_capacity(n);

        let mut current = NodeId(0);
        visited[0] = true;
        order.push(current);

        for _ in 1..n {
            let mut best: Option<(NodeId, f64)> = None;
            for candidate in 0..n {
                if visited[candidate] {
                    continue;
                }
                let candidate = NodeId(candidate);
                let cost = self.matrix.cost(current, candidate);
                if best.map_or(true, |(_, best_cost)| cost < best_cost) {
                    best = Some((candidate, cost));
                }
            }
            let (next, _) = best.expect("at least one unvisited node remains");
            visited[next.index()] = true;
            order.push(next);
            current = next;
        }

        self.tour.set_order(&order);
        self.tour.set_cost(&self.matrix);
        info!("nn_improve finished, tour cost = {}", self.tour.cost());
    }

    /// Exhaustively searches every tour with node 0 fixed as the starting
    /// point, keeping the cheapest. Only practical for small instances —
    /// `(n-1)!` permutations.
    pub fn bf_improve(&mut self) {
        let n = self.tour.size();
        if n > 10 {
            warn!("bf_improve called with {} nodes, ({}-1)! permutations is likely too slow", n, n);
        }

        let rest: Vec<NodeId> = (1..n).map(NodeId).collect();
        let mut best_order: Option<Vec<NodeId>> = None;
        let mut best_cost = f64::INFINITY;

        let mut current = rest.clone();
        self.permute(&mut current, 0, &mut |perm| {
            let mut order = Vec::with_capacity(n);
            order.push(NodeId(0));
            order.extend_from_slice(perm);
            let cost = self.tour_cost_of(&order);
            if cost < best_cost {
                best_cost = cost;
                best_order = Some(order);
            }
        });

        if let Some(order) = best_order {
            self.tour.set_order(&order);
            self.tour.set_cost(&self.matrix);
        }
        info!("bf_improve finished, tour cost = {}", self.tour.cost());
    }

    /// Heap's algorithm, visiting every permutation of `items[k..]` in
    /// place and calling `visit` on each full permutation.
    fn permute(&self, items: &mut Vec<NodeId>, k: usize, visit: &mut dyn FnMut(&[NodeId])) {
        if k == items.len() {
            visit(items);
            return;
        }
        for i in k..items.len() {
            items.swap(k, i);
            self.permute(items, k + 1, visit);
            items.swap(k, i);
        }
    }

    fn tour_cost_of(&self, order: &[NodeId]) -> f64 {
        let n = order.len();
        let mut total = 0.0;
        for i in 0..n {
            total += self.matrix.cost(order[i], order[(i + 1) % n]);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;
    use crate::cost::CostFn;
    use crate::node::Coord;

    fn square_coords() -> Vec<Coord> {
        vec![
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 10.0, y: 10.0 },
            Coord::D2 { x: 10.0, y: 0.0 },
            Coord::D2 { x: 0.0, y: 10.0 },
        ]
    }

    #[test]
    fn nn_improve_finds_the_perimeter_tour() {
        let mut solver = Solver::new(square_coords(), CostFn::Euc2d, SolverConfig::default()).unwrap();
        solver.nn_improve();
        assert!((solver.tour().cost() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn bf_improve_finds_the_optimal_tour() {
        let mut solver = Solver::new(square_coords(), CostFn::Euc2d, SolverConfig::default()).unwrap();
        solver.bf_improve();
        assert!((solver.tour().cost() - 40.0).abs() < 1e-9);
    }
}
