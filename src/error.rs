use std::{fmt, error, result};

/// Reasons why a game graph is rejected at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A move or the start position refers to a position that does not exist.
    PositionOutOfRange {
        position: u32,
        n_vertices: u32,
    },
    /// The list of owners does not have one entry per position.
    OwnerCount {
        expected: usize,
        found: usize,
    },
    /// The update of the move `from -> to` does not fit the energy configuration.
    InvalidUpdate {
        from: u32,
        to: u32,
    },
    /// Adjacency and update lists of a serialized graph disagree in shape.
    MalformedLists,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::PositionOutOfRange { position, n_vertices } =>
                write!(f, "position {position} is out of range for a graph with {n_vertices} positions"),
            Error::OwnerCount { expected, found } =>
                write!(f, "expected {expected} position owners, found {found}"),
            Error::InvalidUpdate { from, to } =>
                write!(f, "update of move {from} -> {to} does not match the energy configuration"),
            Error::MalformedLists =>
                write!(f, "out-degree in adjacency list doesn't match out-degree in weight list"),
        }
    }
}

impl error::Error for Error {}

/// Type alias for `Result<T, energyequiv::Error>`
pub type Result<T> = result::Result<T, Error>;
