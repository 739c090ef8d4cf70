//! Grid A* search with step-wise inspection.
//!
//! This crate provides the search half of the *gridpath* workspace:
//!
//! - **A\*** shortest-path search over a [`gridpath_core::Grid`]
//!   ([`PathfindingEngine::find_path`])
//! - **Step-wise search** exposing the open set, closed set and current
//!   node after every expansion ([`PathfindingEngine::search`],
//!   [`SearchRun`], [`StepSnapshot`])
//! - **Indexed min-heap** with O(1) membership and O(log n) in-place
//!   priority updates ([`IndexedPriorityQueue`])
//! - **Heuristics**: Manhattan and Euclidean ([`Heuristic`])
//!
//! Searches are single-threaded and synchronous; a step-wise run is the
//! only suspension point and is driven entirely by caller demand.

mod engine;
mod error;
mod heuristic;
mod queue;
mod step;

pub use engine::PathfindingEngine;
pub use error::SearchError;
pub use heuristic::Heuristic;
pub use queue::IndexedPriorityQueue;
pub use step::{SearchRun, SearchStep, StepSnapshot};
