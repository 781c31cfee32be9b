//! Node identity and coordinates.

/// Index of a node into `Tour`'s arena. Nodes are totally ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(v: usize) -> Self {
        NodeId(v)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The cartesian position of a node, either 2D or 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coord {
    D2 { x: f64, y: f64 },
    D3 { x: f64, y: f64, z: f64 },
}

impl Coord {
    pub fn x(&self) -> f64 {
        match *self {
            Coord::D2 { x, .. } => x,
            Coord::D3 { x, .. } => x,
        }
    }

    pub fn y(&self) -> f64 {
        match *self {
            Coord::D2 { y, .. } => y,
            Coord::D3 { y, .. } => y,
        }
    }

    pub fn z(&self) -> Option<f64> {
        match *self {
            Coord::D2 { .. } => None,
            Coord::D3 { z, .. } => Some(z),
        }
    }
}

/// A node in the doubly linked tour: its fixed coordinate plus the mutable
/// `pred`/`succ`/`pos` fields that describe where it currently sits in the
/// cycle. `pos` is signed because feasible-swap reversal can walk it below
/// zero; only its relative order, not its absolute value, is meaningful.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord,
    pub pred: NodeId,
    pub succ: NodeId,
    pub pos: i64,
}

impl Node {
    pub fn new(id: NodeId, coord: Coord) -> Self {
        Node {
            id,
            coord,
            pred: id,
            succ: id,
            pos: id.0 as i64,
        }
    }
}
