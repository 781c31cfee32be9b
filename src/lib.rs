//! `cykl` implements a Lin-Kernighan family local-search heuristic for the
//! symmetric Euclidean Travelling Salesman Problem: a doubly linked tour
//! with 2-opt/3-opt swap primitives, a nearest-neighbor candidate index,
//! and two search engines (LK1, the full backtracking/unfeasible-branch
//! variant with a double-bridge kick; LK2, Helsgaun's simplified
//! feasible-only variant), wrapped in a small driver that also offers
//! nearest-neighbor and brute-force baselines.

pub mod baseline;
pub mod config;
pub mod cost;
pub mod edge;
pub mod error;
pub mod lk1;
pub mod lk2;
pub mod neighbor;
pub mod node;
pub mod solver;
pub mod tour;

pub use config::{SolverConfig, Variant};
pub use cost::{CostFn, CostMatrix, Scalar};
pub use edge::Edge;
pub use error::{CyklError, Result};
pub use neighbor::NeighborIndex;
pub use node::{Coord, Node, NodeId};
pub use solver::Solver;
pub use tour::Tour;
