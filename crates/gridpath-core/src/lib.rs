//! **gridpath-core** — Grid and node model for 2D grid pathfinding.
//!
//! This crate provides the foundational types used across the *gridpath*
//! workspace: the [`Point`] geometry primitive and the shared-buffer
//! [`Grid`] of search [`Node`]s addressed by stable [`NodeId`] handles.

pub mod geom;
pub mod grid;

pub use geom::Point;
pub use grid::{Grid, GridError, Node, NodeId};
