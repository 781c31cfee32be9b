//! Per-node nearest-neighbor candidate lists and the gain-ranked candidate
//! generator LK1/LK2 both search over.

use crate::cost::{CostMatrix, Scalar};
use crate::node::NodeId;
use crate::tour::Tour;

/// For each node, its `k` nearest other nodes by cost, ascending. Built
/// once from the cost matrix and never mutated — candidate lists don't
/// change as the tour is rearranged, only which candidates are still
/// usable (checked by the caller via `is_swap_feasible`).
#[derive(Debug, Clone)]
pub struct NeighborIndex {
    lists: Vec<Vec<NodeId>>,
}

impl NeighborIndex {
    pub fn build(matrix: &CostMatrix, k: usize) -> Self {
        let n = matrix.len();
        let k = k.min(n.saturating_sub(1));
        let mut lists = Vec::with_capacity(n);
        for i in 0..n {
            let id = NodeId(i);
            let mut others: Vec<NodeId> = (0..n).filter(|&j| j != i).map(NodeId).collect();
            others.sort_by(|&a, &b| {
                matrix
                    .cost(id, a)
                    .partial_cmp(&matrix.cost(id, b))
                    .unwrap()
                    .then(a.index().cmp(&b.index()))
            });
            others.truncate(k);
            lists.push(others);
        }
        NeighborIndex { lists }
    }

    pub fn of(&self, node: NodeId) -> &[NodeId] {
        &self.lists[node.index()]
    }
}

/// Gain-sorted `(t3, t4)` candidates for extending a search from `t2`: for
/// each of `t2`'s nearest neighbors `t3`, both of `t3`'s current tour
/// neighbors are offered as `t4`. When `t1` is given, candidates that
/// wouldn't form a feasible swap with `t1`/`t2` are dropped. Descending by
/// gain `cost(t3,t4) - cost(t2,t3)`.
pub fn get_best_neighbors(
    tour: &Tour,
    matrix: &CostMatrix,
    index: &NeighborIndex,
    t2: NodeId,
    t1: Option<NodeId>,
) -> Vec<((NodeId, NodeId), Scalar)> {
    let mut candidates = Vec::new();
    for &t3 in index.of(t2) {
        for t4 in [tour.pred(t3), tour.succ(t3)] {
            if t4 == t2 {
                continue;
            }
            if let Some(t1) = t1 {
                if !tour.is_swap_feasible(t1, t2, t3, t4) {
                    continue;
                }
            }
            let gain = matrix.cost(t3, t4) - matrix.cost(t2, t3);
            candidates.push(((t3, t4), gain));
        }
    }
    candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Coord;

    fn square_matrix() -> CostMatrix {
        let coords = vec![
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 1.0, y: 0.0 },
            Coord::D2 { x: 1.0, y: 1.0 },
            Coord::D2 { x: 0.0, y: 1.0 },
        ];
        CostMatrix::build(&coords, crate::cost::CostFn::Euc2d)
    }

    #[test]
    fn neighbor_lists_are_sorted_ascending_by_cost() {
        let matrix = square_matrix();
        let index = NeighborIndex::build(&matrix, 3);
        let list = index.of(NodeId(0));
        for w in list.windows(2) {
            assert!(matrix.cost(NodeId(0), w[0]) <= matrix.cost(NodeId(0), w[1]));
        }
    }

    #[test]
    fn neighbor_list_truncates_to_k() {
        let matrix = square_matrix();
        let index = NeighborIndex::build(&matrix, 2);
        assert_eq!(index.of(NodeId(0)).len(), 2);
    }

    #[test]
    fn best_neighbors_sorted_descending_by_gain() {
        let coords = vec![
            Coord::D2 { x: 0.0, y: 0.0 },
            Coord::D2 { x: 1.0, y: 0.0 },
            Coord::D2 { x: 1.0, y: 1.0 },
            Coord::D2 { x: 0.0, y: 1.0 },
            Coord::D2 { x: 2.0, y: 2.0 },
        ];
        let matrix = CostMatrix::build(&coords, crate::cost::CostFn::Euc2d);
        let index = NeighborIndex::build(&matrix, 4);
        let tour = Tour::new(coords).unwrap();
        let best = get_best_neighbors(&tour, &matrix, &index, NodeId(0), None);
        for w in best.windows(2) {
            assert!(w[0].1 >= w[1].1);
        }
    }
}
