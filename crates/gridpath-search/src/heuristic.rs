use std::fmt;
use std::str::FromStr;

use gridpath_core::Point;

use crate::error::SearchError;

/// Admissible distance estimate used to bias the search toward the goal.
///
/// Restricted to cardinally adjacent cells, both variants evaluate to exactly
/// 1, which is what lets the engine reuse the heuristic as the unit step cost
/// on an unweighted grid. A movement model with diagonal steps would need a
/// separate step-cost function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Heuristic {
    /// `|dx| + |dy|`.
    Manhattan,
    /// `sqrt(dx^2 + dy^2)`.
    Euclidean,
}

impl Heuristic {
    /// Estimated cost of travelling from `a` to `b`.
    pub fn distance(self, a: Point, b: Point) -> f64 {
        let dx = (a.x - b.x) as f64;
        let dy = (a.y - b.y) as f64;
        match self {
            Self::Manhattan => dx.abs() + dy.abs(),
            Self::Euclidean => (dx * dx + dy * dy).sqrt(),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manhattan => f.write_str("manhattan"),
            Self::Euclidean => f.write_str("euclidean"),
        }
    }
}

impl FromStr for Heuristic {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "manhattan" => Ok(Self::Manhattan),
            "euclidean" => Ok(Self::Euclidean),
            _ => Err(SearchError::UnknownHeuristic(s.to_string())),
        }
    }
}
