//! The [`Grid`] type — a 2D lattice of search [`Node`]s with shared storage.
//!
//! A `Grid` is a *view* into a shared backing buffer. Cloning a `Grid` yields
//! another view of the **same** storage, so a search engine, its priority
//! comparator and any snapshot readers can all address the same nodes without
//! handing out mutable aliases.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Stable handle for a grid cell: the row-major index `y * width + x`.
///
/// Handles are the identity keys used by search structures (open-set index
/// map, closed set). They stay valid for the lifetime of the grid and are
/// independent of the mutable search fields on [`Node`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(usize);

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Per-cell search bookkeeping.
///
/// `g`, `h`, `f` and `parent` are owned by whichever search is currently
/// running; a new search overwrites them on first visit, so values left over
/// from an earlier run are never read. Callers receive nodes by value as
/// read-only views and must not cache them across searches.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Cell position, fixed at grid construction.
    pub pos: Point,
    /// Whether the cell is impassable. Set before a search starts.
    pub obstacle: bool,
    /// Accumulated cost of the best known path from the start.
    pub g: f64,
    /// Heuristic estimate of the remaining cost to the goal.
    pub h: f64,
    /// Priority used for open-set ordering. Kept equal to `g + h`.
    pub f: f64,
    /// Predecessor on the best known path, or `None` for the start node.
    pub parent: Option<NodeId>,
}

impl Node {
    fn new(pos: Point) -> Self {
        Self {
            pos,
            obstacle: false,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct GridBuffer {
    nodes: Vec<Node>,
    width: usize,
    height: usize,
}

impl GridBuffer {
    fn new(width: usize, height: usize) -> Self {
        let mut nodes = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                nodes.push(Node::new(Point::new(x as i32, y as i32)));
            }
        }
        Self {
            nodes,
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            Some((y as usize) * self.width + (x as usize))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D grid of search [`Node`]s backed by shared storage.
///
/// Cloning produces another view into the same buffer.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<GridBuffer>>,
}

impl Grid {
    /// Create a new grid of the given dimensions, every cell passable.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0) as usize;
        let h = height.max(0) as usize;
        Self {
            buffer: Rc::new(RefCell::new(GridBuffer::new(w, h))),
        }
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.buffer.borrow().width as i32
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.buffer.borrow().height as i32
    }

    /// Whether `p` is inside the grid bounds.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.buffer.borrow().index(p.x, p.y).is_some()
    }

    /// Resolve a position to its cell handle.
    pub fn id_at(&self, p: Point) -> Result<NodeId, GridError> {
        self.buffer
            .borrow()
            .index(p.x, p.y)
            .map(NodeId)
            .ok_or(GridError::OutOfBounds(p))
    }

    /// Read the node at `p`.
    pub fn node_at(&self, p: Point) -> Result<Node, GridError> {
        let id = self.id_at(p)?;
        Ok(self.node(id))
    }

    /// Read the node behind a handle.
    #[inline]
    pub fn node(&self, id: NodeId) -> Node {
        self.buffer.borrow().nodes[id.0]
    }

    /// Overwrite the node behind a handle.
    #[inline]
    pub fn set_node(&self, id: NodeId, node: Node) {
        self.buffer.borrow_mut().nodes[id.0] = node;
    }

    /// Mark the cell at `p` impassable. Call before starting a search;
    /// in-flight searches do not observe obstacle changes consistently.
    pub fn set_obstacle(&self, p: Point) -> Result<(), GridError> {
        let id = self.id_at(p)?;
        self.buffer.borrow_mut().nodes[id.0].obstacle = true;
        Ok(())
    }

    /// Append the in-bounds cardinal neighbors of `id` to `buf`, clearing it
    /// first. Order is fixed: north, south, east, west. The order determines
    /// which of several equal-cost paths a search settles on, so it must not
    /// change.
    pub fn neighbors(&self, id: NodeId, buf: &mut Vec<NodeId>) {
        buf.clear();
        let buffer = self.buffer.borrow();
        let p = buffer.nodes[id.0].pos;
        const DIRS: [(i32, i32); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];
        for (dx, dy) in DIRS {
            if let Some(i) = buffer.index(p.x + dx, p.y + dy) {
                buf.push(NodeId(i));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors from grid addressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A position outside `[0, width) x [0, height)` was dereferenced.
    OutOfBounds(Point),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds(p) => write!(f, "position {p} is outside the grid"),
        }
    }
}

impl std::error::Error for GridError {}
