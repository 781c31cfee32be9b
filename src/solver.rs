//! The outer driver: owns the tour, cost matrix, neighbor index and search
//! state, and dispatches to whichever improvement method the config names.
//! Grounded on the `Tsp` class in
//! `examples/original_source/src/lk_heuristic/models/tsp.py`.

use std::collections::HashSet;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{SolverConfig, Variant};
use crate::cost::{CostFn, CostMatrix, Scalar};
use crate::edge::Edge;
use crate::error::Result;
use crate::neighbor::NeighborIndex;
use crate::node::Coord;
use crate::tour::Tour;

/// Owns one TSP instance's tour and all mutable search state for a run of
/// LK1, LK2, nearest-neighbor or brute-force improvement.
pub struct Solver {
    pub(crate) tour: Tour,
    pub(crate) matrix: CostMatrix,
    pub(crate) neighbors: NeighborIndex,
    pub(crate) config: SolverConfig,
    pub(crate) rng: StdRng,

    // LK1/LK2 shared search bookkeeping.
    pub(crate) close_gains: Vec<Option<Scalar>>,
    pub(crate) best_close_gain: Scalar,
    pub(crate) solutions: HashSet<u64>,
    pub(crate) reduction_edges: HashSet<Edge>,
    pub(crate) cycles: usize,
    pub(crate) double_bridge_gain: Scalar,
}

impl Solver {
    pub fn new(coords: Vec<Coord>, cost_fn: CostFn, config: SolverConfig) -> Result<Self> {
        let mut tour = Tour::new(coords.clone())?;
        let matrix = CostMatrix::build(&coords, cost_fn);
        let neighbors = NeighborIndex::build(&matrix, config.neighbor_list_size());
        let mut rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        if config.shuffle_initial_tour() {
            tour.shuffle(&mut rng);
        }
        tour.set_cost(&matrix);

        Ok(Solver {
            tour,
            matrix,
            neighbors,
            config,
            rng,
            close_gains: Vec::new(),
            best_close_gain: 0.0,
            solutions: HashSet::new(),
            reduction_edges: HashSet::new(),
            cycles: 0,
            double_bridge_gain: 0.0,
        })
    }

    pub fn tour(&self) -> &Tour {
        &self.tour
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Runs whichever method `config.variant()` names to local-optimality
    /// (or, for brute force / nearest-neighbor, to completion).
    pub fn improve(&mut self) {
        match self.config.variant() {
            Variant::Lk1 => {
                self.lk1_improve();
            }
            Variant::Lk2 => {
                self.lk2_improve();
            }
            Variant::NearestNeighbor => {
                self.nn_improve();
            }
            Variant::BruteForce => {
                self.bf_improve();
            }
        }
        info!("solver finished, tour cost = {}", self.tour.cost());
    }

    /// Repeats `improve()` for `runs` independent attempts (shuffling first
    /// when `config.shuffle_initial_tour()` is set), keeping whichever
    /// attempt's resulting tour is cheapest and leaving the tour in that
    /// state when done. Grounded on `solve()`'s run loop in
    /// `examples/original_source/src/lk_heuristic/utils/solver_funcs.py`.
    pub fn run(&mut self, runs: usize) -> Scalar {
        let mut best_order: Option<Vec<crate::node::NodeId>> = None;
        let mut best_cost = Scalar::INFINITY;

        for run in 1..=runs.max(1) {
            if self.config.shuffle_initial_tour() {
                self.tour.shuffle(&mut self.rng);
            }
            self.tour.set_cost(&self.matrix);

            self.improve();

            if self.tour.cost() < best_cost {
                best_cost = self.tour.cost();
                best_order = Some(self.tour.order());
            }
            info!("run {}/{}: cost = {}, best so far = {}", run, runs, self.tour.cost(), best_cost);
        }

        if let Some(order) = best_order {
            self.tour.set_order(&order);
            self.tour.set_cost(&self.matrix);
        }
        best_cost
    }

    /// 64-bit FNV-1a fingerprint of the `succ` sequence starting at node 0,
    /// used to detect a search branch cycling back to an already-seen
    /// tour. Any order-sensitive hash works; FNV-1a is cheap and simple.
    pub(crate) fn succ_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;
        let mut hash = FNV_OFFSET;
        for id in self.tour.get_nodes() {
            let succ = self.tour.succ(id);
            hash ^= succ.index() as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }

    pub(crate) fn pred_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf29ce484222325;
        const FNV_PRIME: u64 = 0x100000001b3;
        let mut hash = FNV_OFFSET;
        for id in self.tour.get_nodes() {
            let pred = self.tour.pred(id);
            hash ^= pred.index() as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SolverConfig;

    fn square_coords() -> Vec<Coord> {
        vec![
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 10.0, y: 0.0 },
            Coord::D2 { x: 10.0, y: 10.0 },
            Coord::D2 { x: 0.0, y: 10.0 },
        ]
    }

    #[test]
    fn new_solver_computes_initial_cost() {
        let solver = Solver::new(square_coords(), CostFn::Euc2d, SolverConfig::default()).unwrap();
        assert!((solver.tour().cost() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn succ_hash_changes_after_a_swap() {
        let mut solver = Solver::new(square_coords(), CostFn::Euc2d, SolverConfig::default()).unwrap();
        let before = solver.succ_hash();
        solver
            .tour
            .swap_feasible(crate::node::NodeId(0), crate::node::NodeId(1), crate::node::NodeId(3), crate::node::NodeId(2), false, false);
        let after = solver.succ_hash();
        assert_ne!(before, after);
    }

    #[test]
    fn run_keeps_the_best_of_several_attempts() {
        let config = SolverConfig::builder().variant(Variant::NearestNeighbor).build();
        let mut solver = Solver::new(square_coords(), CostFn::Euc2d, config).unwrap();
        let best = solver.run(3);
        assert!((best - 40.0).abs() < 1e-9);
        assert!((solver.tour().cost() - 40.0).abs() < 1e-9);
    }
}
