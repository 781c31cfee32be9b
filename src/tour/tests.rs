//! Swap-primitive and restore tests against a fixed twelve-node hexagon
//! tour, the same fixture and node numbering used throughout this crate's
//! doctests and the original source's `test_tour.py`.

use super::*;
use crate::node::Coord;

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

fn hexagon() -> Tour {
    Tour::new(hexagon_coords()).unwrap()
}

fn n(i: usize) -> NodeId {
    NodeId(i)
}

/// Full succ/pred snapshot, used to check a swap + its restore round-trips
/// to an identical structure (not just an identical cost).
fn snapshot(tour: &Tour) -> Vec<(NodeId, NodeId, i64)> {
    (0..tour.size())
        .map(|i| {
            let id = n(i);
            (tour.pred(id), tour.succ(id), tour.pos(id))
        })
        .collect()
}

/// Walks `succ` starting at `start`, returning every node visited before
/// looping back. Used to check cycle sizes without trusting `pos`, which
/// isn't a consistent total order across a two-cycle intermediate state.
fn walk_cycle(tour: &Tour, start: NodeId) -> Vec<NodeId> {
    let mut visited = vec![start];
    let mut cur = tour.succ(start);
    while cur != start {
        visited.push(cur);
        cur = tour.succ(cur);
    }
    visited
}

#[test]
fn natural_order_feasibility_matches_definition() {
    let tour = hexagon();
    // succ(0) = 1, pred(3) = 2: feasible via the forward pairing.
    assert!(tour.is_swap_feasible(n(0), n(1), n(3), n(2)));
    // 0 and 2 are not adjacent to either 1 or 3 in the required way.
    assert!(!tour.is_swap_feasible(n(0), n(2), n(1), n(3)));
}

#[test]
fn unfeasible_predicate_requires_non_adjacency() {
    let tour = hexagon();
    // succ(1) = 2 and succ(5) = 6, and neither (2,5) nor (6,1) are tour edges.
    assert!(tour.is_swap_unfeasible(n(1), n(2), n(5), n(6)));
    // Adjacent pairs can't be split into two cycles this way.
    assert!(!tour.is_swap_unfeasible(n(0), n(1), n(1), n(2)));
}

#[test]
fn swap_feasible_keeps_a_single_cycle_and_restores() {
    let mut tour = hexagon();
    let before = snapshot(&tour);

    tour.swap_feasible(n(0), n(1), n(3), n(2), false, true);
    let cycle = walk_cycle(&tour, n(0));
    assert_eq!(cycle.len(), 12, "swap_feasible must not split the tour");

    tour.restore(1);
    assert_eq!(snapshot(&tour), before);
    assert_eq!(tour.swap_stack_len(), 0);
}

#[test]
fn swap_unfeasible_splits_into_two_cycles_that_restore_merges_back() {
    let mut tour = hexagon();
    let before = snapshot(&tour);

    tour.swap_unfeasible(n(1), n(2), n(5), n(6), false, true);
    let cycle_a = walk_cycle(&tour, n(1));
    let cycle_b = walk_cycle(&tour, n(2));
    assert_ne!(cycle_a.len(), 12, "an unfeasible swap must split the tour");
    assert_eq!(cycle_a.len() + cycle_b.len(), 12);
    assert!(cycle_a.iter().all(|id| !cycle_b.contains(id)));

    tour.restore(1);
    assert_eq!(snapshot(&tour), before);
}

#[test]
fn node_between_t2_t3_remerges_a_split_tour() {
    let mut tour = hexagon();
    let before = snapshot(&tour);

    // Split at (1,2)/(5,6), then splice the two-node sub-cycle [2..5] back
    // in by cutting its (3,4) edge.
    tour.swap_unfeasible(n(1), n(2), n(5), n(6), false, true);
    tour.swap_node_between_t2_t3(n(1), n(6), n(3), n(4), true);

    let cycle = walk_cycle(&tour, n(1));
    assert_eq!(cycle.len(), 12, "splicing must produce a single Hamiltonian cycle again");

    tour.restore(2);
    assert_eq!(snapshot(&tour), before);
}

#[test]
fn double_bridge_is_invariant_to_input_order_and_orientation() {
    // Four edges that partition the cycle into four non-empty arcs: the
    // minimum a double bridge needs.
    let edges_forward = [
        (n(0), n(1)),
        (n(3), n(4)),
        (n(6), n(7)),
        (n(9), n(10)),
    ];
    let orderings: Vec<[(NodeId, NodeId); 4]> = vec![
        edges_forward,
        [edges_forward[2], edges_forward[0], edges_forward[3], edges_forward[1]],
        [
            (edges_forward[0].1, edges_forward[0].0),
            edges_forward[1],
            (edges_forward[2].1, edges_forward[2].0),
            edges_forward[3],
        ],
        [edges_forward[3], edges_forward[2], edges_forward[1], edges_forward[0]],
    ];

    let mut reference: Option<Vec<(NodeId, NodeId, i64)>> = None;
    for pairs in orderings {
        let mut tour = hexagon();
        let classified = tour
            .is_swap_double_bridge(pairs)
            .expect("four alternating edges always classify as a double bridge");
        let applied = tour.swap_double_bridge(
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
        assert!(applied);
        let cycle = walk_cycle(&tour, n(0));
        assert_eq!(cycle.len(), 12);

        let snap = snapshot(&tour);
        match &reference {
            None => reference = Some(snap),
            Some(expected) => assert_eq!(&snap, expected, "double bridge result must not depend on input order/orientation"),
        }
    }
}

#[test]
fn double_bridge_matches_the_reference_fixture() {
    // test_swap_double_bridge_normal in the original source's test_tour.py.
    let mut tour = hexagon();
    tour.swap_double_bridge(n(5), n(6), n(11), n(0), n(2), n(3), n(9), n(10), false);

    let expected_succ = [1, 2, 10, 4, 5, 0, 7, 8, 9, 3, 11, 6];
    for (i, &succ) in expected_succ.iter().enumerate() {
        assert_eq!(tour.succ(n(i)), n(succ), "succ({}) mismatch", i);
    }
}

#[test]
fn double_bridge_restores() {
    let mut tour = hexagon();
    let before = snapshot(&tour);

    let pairs = [(n(0), n(1)), (n(3), n(4)), (n(6), n(7)), (n(9), n(10))];
    let classified = tour.is_swap_double_bridge(pairs).unwrap();
    tour.swap_double_bridge(
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

    tour.restore(1);
    assert_eq!(snapshot(&tour), before);
}
