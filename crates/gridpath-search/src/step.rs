//! Step-wise search execution.
//!
//! [`SearchRun`] replaces generator-style control flow with an explicit
//! state object: it owns the open queue, the closed set and the loop phase,
//! and advances one expansion per [`step`](SearchRun::step) call. Progress is
//! entirely pull-based; abandoning the run is the only cancellation needed.

use std::collections::HashSet;

use gridpath_core::{Grid, Node, NodeId, Point};

use crate::error::SearchError;
use crate::heuristic::Heuristic;
use crate::queue::IndexedPriorityQueue;

type OpenOrder = Box<dyn Fn(&NodeId, &NodeId) -> bool>;

/// Algorithm state after one expansion: the node just closed plus by-value
/// views of the frontier and the already-expanded set.
///
/// Views are copies taken at suspension time; holding them across further
/// steps or searches shows stale bookkeeping.
#[derive(Debug, Clone)]
pub struct StepSnapshot {
    /// The node extracted and closed by this expansion.
    pub current: Node,
    /// Open-set contents, in heap order.
    pub open: Vec<Node>,
    /// Closed-set contents, in expansion order (`current` is last).
    pub closed: Vec<Node>,
}

/// Outcome of advancing a [`SearchRun`] by one expansion.
#[derive(Debug, Clone)]
pub enum SearchStep {
    /// A node was expanded; the search is still in progress.
    Expanded(StepSnapshot),
    /// The search finished: the start-to-end path, or empty if the open set
    /// ran dry before the end node was reached.
    Done(Vec<Point>),
}

/// An in-progress A* search that advances one expansion at a time.
///
/// Produced by [`PathfindingEngine::search`](crate::PathfindingEngine::search).
/// Each expansion extracts the minimum-`f` open node, closes it, and suspends;
/// the node's neighbors are relaxed when the caller asks for the next step.
pub struct SearchRun {
    grid: Grid,
    heuristic: Heuristic,
    end: NodeId,
    end_pos: Point,
    open: IndexedPriorityQueue<NodeId, OpenOrder>,
    closed: HashSet<NodeId>,
    closed_order: Vec<NodeId>,
    /// Node closed by the previous step, neighbors not yet relaxed.
    pending: Option<NodeId>,
    result: Option<Vec<Point>>,
    nbuf: Vec<NodeId>,
}

impl SearchRun {
    pub(crate) fn new(
        grid: Grid,
        heuristic: Heuristic,
        start: Point,
        end: Point,
    ) -> Result<Self, SearchError> {
        let start_id = grid.id_at(start)?;
        let end_id = grid.id_at(end)?;
        if grid.node(start_id).obstacle {
            return Err(SearchError::ObstacleEndpoint(start));
        }
        if grid.node(end_id).obstacle {
            return Err(SearchError::ObstacleEndpoint(end));
        }

        // The open set orders node handles by the `f` field they point at,
        // through its own view of the shared grid storage.
        let order_grid = grid.clone();
        let order: OpenOrder =
            Box::new(move |a, b| order_grid.node(*a).f < order_grid.node(*b).f);
        let mut open = IndexedPriorityQueue::new(order);

        // Seed the start node. This overwrite is also what invalidates any
        // bookkeeping left behind by an earlier search.
        let mut node = grid.node(start_id);
        node.g = 0.0;
        node.h = heuristic.distance(start, end);
        node.f = node.g + node.h;
        node.parent = None;
        grid.set_node(start_id, node);
        open.insert(start_id);

        Ok(Self {
            grid,
            heuristic,
            end: end_id,
            end_pos: end,
            open,
            closed: HashSet::new(),
            closed_order: Vec::new(),
            pending: None,
            result: None,
            nbuf: Vec::with_capacity(4),
        })
    }

    /// Whether the search has produced its final result.
    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    /// Advance by one expansion.
    ///
    /// Returns [`SearchStep::Expanded`] with a state snapshot, or
    /// [`SearchStep::Done`] once the end node is extracted or the open set
    /// runs dry. After that, every further call returns the same `Done`.
    pub fn step(&mut self) -> SearchStep {
        if let Some(path) = &self.result {
            return SearchStep::Done(path.clone());
        }

        // Finish the expansion suspended at the previous step.
        if let Some(prev) = self.pending.take() {
            self.relax_neighbors(prev);
        }

        let Some(current_id) = self.open.extract_min() else {
            self.result = Some(Vec::new());
            return SearchStep::Done(Vec::new());
        };

        if current_id == self.end {
            let path = self.reconstruct(current_id);
            self.result = Some(path.clone());
            return SearchStep::Done(path);
        }

        self.closed.insert(current_id);
        self.closed_order.push(current_id);
        self.pending = Some(current_id);

        SearchStep::Expanded(StepSnapshot {
            current: self.grid.node(current_id),
            open: self.open.iter().map(|&id| self.grid.node(id)).collect(),
            closed: self
                .closed_order
                .iter()
                .map(|&id| self.grid.node(id))
                .collect(),
        })
    }

    /// Relax every passable, unclosed neighbor of `current_id`.
    fn relax_neighbors(&mut self, current_id: NodeId) {
        let current = self.grid.node(current_id);
        let mut nbuf = std::mem::take(&mut self.nbuf);
        self.grid.neighbors(current_id, &mut nbuf);

        for &nid in nbuf.iter() {
            let mut neighbor = self.grid.node(nid);
            if neighbor.obstacle || self.closed.contains(&nid) {
                continue;
            }
            // On an unweighted grid the heuristic restricted to adjacent
            // cells is the exact step cost.
            let tentative_g = current.g + self.heuristic.distance(current.pos, neighbor.pos);

            if self.open.contains(&nid) {
                if tentative_g < neighbor.g {
                    neighbor.g = tentative_g;
                    neighbor.f = tentative_g + neighbor.h;
                    neighbor.parent = Some(current_id);
                    self.grid.set_node(nid, neighbor);
                    self.open.update_priority(&nid);
                }
            } else {
                neighbor.g = tentative_g;
                neighbor.h = self.heuristic.distance(neighbor.pos, self.end_pos);
                neighbor.f = neighbor.g + neighbor.h;
                neighbor.parent = Some(current_id);
                self.grid.set_node(nid, neighbor);
                self.open.insert(nid);
            }
        }

        self.nbuf = nbuf;
    }

    /// Follow parent handles from `id` back to the start, then reverse.
    fn reconstruct(&self, id: NodeId) -> Vec<Point> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(cid) = cursor {
            let node = self.grid.node(cid);
            path.push(node.pos);
            cursor = node.parent;
        }
        path.reverse();
        path
    }
}

impl Iterator for SearchRun {
    type Item = SearchStep;

    /// Yields every `Expanded` snapshot, then the terminal `Done` exactly
    /// once.
    fn next(&mut self) -> Option<SearchStep> {
        if self.is_finished() {
            return None;
        }
        Some(self.step())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PathfindingEngine;

    fn engine(width: i32, height: i32) -> PathfindingEngine {
        PathfindingEngine::new(Grid::new(width, height), Heuristic::Manhattan)
    }

    #[test]
    fn first_snapshot_is_the_start_node() {
        let eng = engine(3, 3);
        let mut run = eng.search(Point::ZERO, Point::new(2, 2)).unwrap();
        match run.step() {
            SearchStep::Expanded(snap) => {
                assert_eq!(snap.current.pos, Point::ZERO);
                assert_eq!(snap.current.g, 0.0);
                assert_eq!(snap.closed.len(), 1);
                // Neighbors are relaxed on the next resume, so the frontier
                // is still empty here.
                assert!(snap.open.is_empty());
            }
            SearchStep::Done(_) => panic!("search finished prematurely"),
        }
    }

    #[test]
    fn closed_set_grows_by_one_per_step() {
        let eng = engine(4, 4);
        let mut run = eng.search(Point::ZERO, Point::new(3, 3)).unwrap();
        let mut expansions = 0;
        loop {
            match run.step() {
                SearchStep::Expanded(snap) => {
                    expansions += 1;
                    assert_eq!(snap.closed.len(), expansions);
                    assert_eq!(snap.closed.last().map(|n| n.pos), Some(snap.current.pos));
                }
                SearchStep::Done(path) => {
                    assert_eq!(path.first(), Some(&Point::ZERO));
                    assert_eq!(path.last(), Some(&Point::new(3, 3)));
                    break;
                }
            }
        }
        assert!(expansions >= 1);
    }

    #[test]
    fn step_after_done_repeats_the_result() {
        let eng = engine(2, 2);
        let mut run = eng.search(Point::ZERO, Point::new(1, 1)).unwrap();
        let path = loop {
            if let SearchStep::Done(path) = run.step() {
                break path;
            }
        };
        for _ in 0..3 {
            match run.step() {
                SearchStep::Done(again) => assert_eq!(again, path),
                SearchStep::Expanded(_) => panic!("expanded after completion"),
            }
        }
    }

    #[test]
    fn iterator_ends_with_a_single_done() {
        let eng = engine(3, 3);
        let run = eng.search(Point::ZERO, Point::new(2, 2)).unwrap();
        let steps: Vec<SearchStep> = run.collect();
        let done_count = steps
            .iter()
            .filter(|s| matches!(s, SearchStep::Done(_)))
            .count();
        assert_eq!(done_count, 1);
        assert!(matches!(steps.last(), Some(SearchStep::Done(_))));
    }

    #[test]
    fn blocked_search_never_reaches_the_end() {
        let grid = Grid::new(3, 3);
        for y in 0..3 {
            grid.set_obstacle(Point::new(1, y)).unwrap();
        }
        let eng = PathfindingEngine::new(grid, Heuristic::Manhattan);
        let run = eng.search(Point::ZERO, Point::new(2, 2)).unwrap();
        let end = Point::new(2, 2);
        let mut final_path = None;
        for step in run {
            match step {
                SearchStep::Expanded(snap) => assert_ne!(snap.current.pos, end),
                SearchStep::Done(path) => final_path = Some(path),
            }
        }
        assert_eq!(final_path, Some(Vec::new()));
    }
}
