//! Error types returned by the crate's public, fallible constructors.
//!
//! Search control flow (no improvement found, repeated tour, exhausted
//! backtracking) is never an error — only malformed input is.

use thiserror::Error;

/// Errors produced while building the data model (`Tour`, `CostMatrix`,
/// `NeighborIndex`). Once a `Tour` is constructed, the search/improvement
/// methods are infallible: they report "no improvement" via `bool`/`Option`,
/// never `Result`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CyklError {
    #[error("tour requires at least 3 nodes, got {0}")]
    TooFewNodes(usize),

    #[error("duplicate node id {0} in input")]
    DuplicateNodeId(usize),
}

pub type Result<T> = std::result::Result<T, CyklError>;
