//! The [`PathfindingEngine`] — A* over a [`Grid`], eager or step-wise.

use gridpath_core::{Grid, Point};

use crate::error::SearchError;
use crate::heuristic::Heuristic;
use crate::step::{SearchRun, SearchStep};

/// A* search bound to one grid and one heuristic.
///
/// Construction is infallible: the [`Heuristic`] enum cannot hold an
/// unrecognized value, so heuristic validation happens where names are
/// parsed (`str::parse::<Heuristic>()`), before an engine exists.
///
/// Searches mutate the per-node bookkeeping (`g`, `h`, `f`, `parent`) of
/// every visited cell and leave it dirty afterwards; a later search
/// overwrites what it touches before reading it, so reruns with an unchanged
/// obstacle layout return identical paths.
pub struct PathfindingEngine {
    grid: Grid,
    heuristic: Heuristic,
}

impl PathfindingEngine {
    /// Create an engine over `grid` using `heuristic`.
    pub fn new(grid: Grid, heuristic: Heuristic) -> Self {
        Self { grid, heuristic }
    }

    /// The grid this engine searches.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The heuristic this engine was built with.
    pub fn heuristic(&self) -> Heuristic {
        self.heuristic
    }

    /// Begin a step-wise search from `start` to `end`.
    ///
    /// Fails if either endpoint is out of bounds or an obstacle; the check
    /// happens here, before any queue work.
    pub fn search(&self, start: Point, end: Point) -> Result<SearchRun, SearchError> {
        SearchRun::new(self.grid.clone(), self.heuristic, start, end)
    }

    /// Compute the full path from `start` to `end`.
    ///
    /// Returns the sequence of positions including both endpoints, or an
    /// empty vector when no path exists (a normal outcome, not an error).
    /// Driven through the same [`SearchRun`] as the step-wise API, so the
    /// two entry points cannot diverge.
    pub fn find_path(&self, start: Point, end: Point) -> Result<Vec<Point>, SearchError> {
        let mut run = self.search(start, end)?;
        loop {
            if let SearchStep::Done(path) = run.step() {
                return Ok(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridpath_core::GridError;

    fn assert_cardinal_path(path: &[Point]) {
        for pair in path.windows(2) {
            let d = pair[1] - pair[0];
            assert_eq!(d.x.abs() + d.y.abs(), 1, "non-cardinal step {pair:?}");
        }
    }

    #[test]
    fn open_grid_shortest_path_length() {
        let (w, h) = (5, 4);
        let eng = PathfindingEngine::new(Grid::new(w, h), Heuristic::Manhattan);
        let path = eng
            .find_path(Point::ZERO, Point::new(w - 1, h - 1))
            .unwrap();
        assert_eq!(path.len() as i32, (w - 1) + (h - 1) + 1);
        assert_eq!(path.first(), Some(&Point::ZERO));
        assert_eq!(path.last(), Some(&Point::new(w - 1, h - 1)));
        assert_cardinal_path(&path);
    }

    #[test]
    fn start_equals_end() {
        let eng = PathfindingEngine::new(Grid::new(4, 4), Heuristic::Euclidean);
        let p = Point::new(2, 1);
        assert_eq!(eng.find_path(p, p).unwrap(), vec![p]);

        // The trivial search closes nothing: the very first step is final.
        let mut run = eng.search(p, p).unwrap();
        assert!(matches!(run.step(), SearchStep::Done(path) if path == vec![p]));
    }

    #[test]
    fn obstacle_endpoints_fail_fast() {
        let grid = Grid::new(4, 4);
        grid.set_obstacle(Point::new(0, 0)).unwrap();
        grid.set_obstacle(Point::new(3, 3)).unwrap();
        let eng = PathfindingEngine::new(grid.clone(), Heuristic::Manhattan);

        assert_eq!(
            eng.find_path(Point::ZERO, Point::new(2, 2)),
            Err(SearchError::ObstacleEndpoint(Point::ZERO))
        );
        assert_eq!(
            eng.find_path(Point::new(1, 1), Point::new(3, 3)),
            Err(SearchError::ObstacleEndpoint(Point::new(3, 3)))
        );

        // Failing the precondition touched no node's bookkeeping.
        for y in 0..4 {
            for x in 0..4 {
                let node = grid.node_at(Point::new(x, y)).unwrap();
                assert_eq!(node.g, 0.0);
                assert_eq!(node.f, 0.0);
                assert_eq!(node.parent, None);
            }
        }
    }

    #[test]
    fn out_of_bounds_endpoint_is_an_error() {
        let eng = PathfindingEngine::new(Grid::new(3, 3), Heuristic::Manhattan);
        assert_eq!(
            eng.find_path(Point::ZERO, Point::new(3, 0)),
            Err(SearchError::OutOfBounds(Point::new(3, 0)))
        );
        assert_eq!(
            SearchError::from(GridError::OutOfBounds(Point::new(-1, 0))),
            SearchError::OutOfBounds(Point::new(-1, 0))
        );
    }

    #[test]
    fn full_middle_column_means_no_path() {
        let grid = Grid::new(3, 3);
        for y in 0..3 {
            grid.set_obstacle(Point::new(1, y)).unwrap();
        }
        let eng = PathfindingEngine::new(grid, Heuristic::Manhattan);
        assert_eq!(eng.find_path(Point::ZERO, Point::new(2, 2)), Ok(Vec::new()));
    }

    #[test]
    fn detour_around_center_obstacle() {
        for heuristic in [Heuristic::Manhattan, Heuristic::Euclidean] {
            let grid = Grid::new(3, 3);
            grid.set_obstacle(Point::new(1, 1)).unwrap();
            let eng = PathfindingEngine::new(grid, heuristic);
            let path = eng.find_path(Point::ZERO, Point::new(2, 2)).unwrap();
            assert_eq!(path.len(), 5, "under {heuristic}");
            assert_eq!(path.first(), Some(&Point::ZERO));
            assert_eq!(path.last(), Some(&Point::new(2, 2)));
            assert!(!path.contains(&Point::new(1, 1)));
            assert_cardinal_path(&path);
        }
    }

    #[test]
    fn walls_force_the_optimal_detour() {
        // A vertical wall with a gap at the bottom; the only route goes
        // down column 1 and through (2, 4).
        let grid = Grid::new(5, 5);
        for y in 0..4 {
            grid.set_obstacle(Point::new(2, y)).unwrap();
        }
        grid.set_obstacle(Point::new(0, 2)).unwrap();
        let eng = PathfindingEngine::new(grid, Heuristic::Manhattan);
        let path = eng.find_path(Point::ZERO, Point::new(4, 4)).unwrap();
        assert_eq!(path.len(), 9);
        assert!(path.contains(&Point::new(2, 4)));
        assert_cardinal_path(&path);
    }

    #[test]
    fn rerun_on_dirty_grid_is_identical() {
        let grid = Grid::new(6, 6);
        for p in [
            Point::new(1, 1),
            Point::new(2, 1),
            Point::new(3, 1),
            Point::new(3, 2),
            Point::new(3, 3),
            Point::new(1, 4),
        ] {
            grid.set_obstacle(p).unwrap();
        }
        let eng = PathfindingEngine::new(grid, Heuristic::Manhattan);
        let first = eng.find_path(Point::ZERO, Point::new(5, 5)).unwrap();
        // Node bookkeeping is now dirty; the second run must not notice.
        let second = eng.find_path(Point::ZERO, Point::new(5, 5)).unwrap();
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }
}
