//! Concrete Euclidean cost functions and the dense cost matrix built from
//! them. Grounded on `examples/original_source/utils/cost_funcs.py`.

use crate::node::{Coord, NodeId};

pub type Scalar = f64;

/// The distance metric used to price every edge of the tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostFn {
    Euc2d,
    Euc3d,
}

impl CostFn {
    pub fn distance(&self, a: &Coord, b: &Coord) -> Scalar {
        match self {
            CostFn::Euc2d => {
                let dx = a.x() - b.x();
                let dy = a.y() - b.y();
                (dx * dx + dy * dy).sqrt()
            }
            CostFn::Euc3d => {
                let dx = a.x() - b.x();
                let dy = a.y() - b.y();
                let dz = a.z().unwrap_or(0.0) - b.z().unwrap_or(0.0);
                (dx * dx + dy * dy + dz * dz).sqrt()
            }
        }
    }
}

/// Dense, symmetric, row-major cost matrix over the `N` nodes of a tour.
/// Built once at construction time and never mutated afterward — node
/// coordinates don't move during a search, only `pred`/`succ`/`pos` do.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    n: usize,
    costs: Vec<Scalar>,
}

impl CostMatrix {
    pub fn build(coords: &[Coord], cost_fn: CostFn) -> Self {
        let n = coords.len();
        let mut costs = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = cost_fn.distance(&coords[i], &coords[j]);
                costs[i * n + j] = d;
                costs[j * n + i] = d;
            }
        }
        CostMatrix { n, costs }
    }

    #[inline]
    pub fn cost(&self, a: NodeId, b: NodeId) -> Scalar {
        self.costs[a.index() * self.n + b.index()]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn euc_2d_matches_pythagoras() {
        let a = Coord::D2 { x: 0.0, y: 0.0 };
        let b = Coord::D2 { x: 3.0, y: 4.0 };
        assert!(approx_eq!(f64, CostFn::Euc2d.distance(&a, &b), 5.0, epsilon = 1e-9));
    }

    #[test]
    fn euc_3d_matches_pythagoras() {
        let a = Coord::D3 { x: 0.0, y: 0.0, z: 0.0 };
        let b = Coord::D3 { x: 2.0, y: 3.0, z: 6.0 };
        assert!(approx_eq!(f64, CostFn::Euc3d.distance(&a, &b), 7.0, epsilon = 1e-9));
    }

    #[test]
    fn cost_matrix_is_symmetric() {
        let coords = vec![
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 1.0, y: 0.0 },
            Coord::D2 { x: 0.0, y: 1.0 },
        ];
        let cm = CostMatrix::build(&coords, CostFn::Euc2d);
        for i in 0..3 {
            for j in 0..3 {
                assert!(approx_eq!(
                    f64,
                    cm.cost(NodeId(i), NodeId(j)),
                    cm.cost(NodeId(j), NodeId(i)),
                    epsilon = 1e-12
                ));
            }
        }
        assert_eq!(cm.cost(NodeId(0), NodeId(0)), 0.0);
    }
}
