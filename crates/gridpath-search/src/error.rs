use std::fmt;

use gridpath_core::{GridError, Point};

/// Errors reported by engine construction and search entry points.
///
/// "No path found" is deliberately absent: an exhausted open set is a normal
/// result and is surfaced as an empty path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Start or end addresses an obstacle cell. Checked before any search
    /// work happens.
    ObstacleEndpoint(Point),
    /// A position outside the grid extents was dereferenced.
    OutOfBounds(Point),
    /// A heuristic name did not match any known heuristic.
    UnknownHeuristic(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObstacleEndpoint(p) => {
                write!(f, "search endpoint {p} is an obstacle")
            }
            Self::OutOfBounds(p) => write!(f, "position {p} is outside the grid"),
            Self::UnknownHeuristic(name) => write!(f, "unknown heuristic \u{201c}{name}\u{201d}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<GridError> for SearchError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::OutOfBounds(p) => Self::OutOfBounds(p),
        }
    }
}
