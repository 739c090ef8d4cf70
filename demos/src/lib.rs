//! Terminal A* visualizer model shared by the demo binaries.
//!
//! Drives the step-wise search API one expansion per frame and paints the
//! open set, closed set, current node and final path as colored terminal
//! cells. The search core never learns about any of this; the demo only
//! reads positions and obstacle flags off snapshot views.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, event,
    event::{Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{self, Color as CtColor, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use gridpath_core::{Grid, Point};
use gridpath_search::{
    Heuristic, PathfindingEngine, SearchError, SearchRun, SearchStep, StepSnapshot,
};

/// Smallest accepted grid side.
pub const MIN_SIZE: i32 = 5;
/// Largest accepted grid side.
pub const MAX_SIZE: i32 = 50;
/// Fraction of cells turned into obstacles when randomizing.
const OBSTACLE_RATIO: f64 = 0.5;
/// Steps-per-frame ceiling.
const MAX_SPEED: u32 = 20;

const FRAME: Duration = Duration::from_millis(16);

// Cell colours
const COL_EMPTY: CtColor = CtColor::Rgb {
    r: 230,
    g: 230,
    b: 230,
};
const COL_OBSTACLE: CtColor = CtColor::Rgb { r: 25, g: 25, b: 25 };
const COL_CLOSED: CtColor = CtColor::Rgb { r: 200, g: 70, b: 70 };
const COL_OPEN: CtColor = CtColor::Rgb { r: 70, g: 90, b: 220 };
const COL_CURRENT: CtColor = CtColor::Rgb {
    r: 240,
    g: 220,
    b: 60,
};
const COL_PATH: CtColor = CtColor::Rgb { r: 60, g: 200, b: 90 };
const COL_START: CtColor = CtColor::Rgb { r: 30, g: 160, b: 40 };
const COL_END: CtColor = CtColor::Rgb { r: 160, g: 50, b: 180 };

/// Demo configuration, filled from the command line.
#[derive(Copy, Clone, Debug)]
pub struct DemoConfig {
    /// Side length of the square grid.
    pub size: i32,
    /// Heuristic driving the search.
    pub heuristic: Heuristic,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            size: 20,
            heuristic: Heuristic::Manhattan,
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// One puzzle instance: a randomized grid plus the search being animated.
struct World {
    grid: Grid,
    engine: PathfindingEngine,
    run: SearchRun,
    snapshot: Option<StepSnapshot>,
    path: Option<Vec<Point>>,
    size: i32,
    start: Point,
    end: Point,
}

impl World {
    /// Build a random obstacle layout that provably admits a path, then
    /// bind a fresh search to it.
    fn generate(size: i32, heuristic: Heuristic, rng: &mut SmallRng) -> Result<Self, SearchError> {
        let start = Point::ZERO;
        let end = Point::new(size - 1, size - 1);

        let mut attempts = 0u32;
        let grid = loop {
            attempts += 1;
            let grid = Grid::new(size, size);
            let count = (size as f64 * size as f64 * OBSTACLE_RATIO) as i32;
            for _ in 0..count {
                let p = Point::new(rng.random_range(0..size), rng.random_range(0..size));
                if p == start || p == end {
                    continue;
                }
                grid.set_obstacle(p)?;
            }
            // Keep only layouts a search can actually solve.
            let probe = PathfindingEngine::new(grid.clone(), Heuristic::Manhattan);
            if !probe.find_path(start, end)?.is_empty() {
                break grid;
            }
        };
        log::debug!("obstacle layout found after {attempts} attempt(s)");

        let engine = PathfindingEngine::new(grid.clone(), heuristic);
        let run = engine.search(start, end)?;
        Ok(Self {
            grid,
            engine,
            run,
            snapshot: None,
            path: None,
            size,
            start,
            end,
        })
    }

    /// Restart the animated search on the current layout.
    fn reset_search(&mut self) -> Result<(), SearchError> {
        self.run = self.engine.search(self.start, self.end)?;
        self.snapshot = None;
        self.path = None;
        Ok(())
    }

    /// Advance the animated search by up to `steps` expansions.
    fn advance(&mut self, steps: u32) {
        for _ in 0..steps {
            if self.path.is_some() {
                return;
            }
            match self.run.step() {
                SearchStep::Expanded(snapshot) => self.snapshot = Some(snapshot),
                SearchStep::Done(path) => self.path = Some(path),
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.path.is_some()
    }

    /// Paint one colour per cell: obstacles, then search state layered on
    /// top, endpoints last.
    fn frame_colors(&self) -> Vec<CtColor> {
        let size = self.size as usize;
        let mut colors = vec![COL_EMPTY; size * size];
        let mut paint = |p: Point, color: CtColor| {
            colors[p.y as usize * size + p.x as usize] = color;
        };

        for y in 0..self.size {
            for x in 0..self.size {
                let p = Point::new(x, y);
                if self.grid.node_at(p).is_ok_and(|n| n.obstacle) {
                    paint(p, COL_OBSTACLE);
                }
            }
        }
        if let Some(snapshot) = &self.snapshot {
            for node in &snapshot.closed {
                paint(node.pos, COL_CLOSED);
            }
            for node in &snapshot.open {
                paint(node.pos, COL_OPEN);
            }
            paint(snapshot.current.pos, COL_CURRENT);
        }
        if let Some(path) = &self.path {
            for &p in path {
                paint(p, COL_PATH);
            }
        }
        paint(self.start, COL_START);
        paint(self.end, COL_END);
        colors
    }
}

// ---------------------------------------------------------------------------
// Rendering and event loop
// ---------------------------------------------------------------------------

fn draw(
    stdout: &mut impl Write,
    world: &World,
    speed: u32,
    running: bool,
) -> io::Result<()> {
    let colors = world.frame_colors();
    let size = world.size as usize;
    for y in 0..size {
        queue!(stdout, cursor::MoveTo(0, y as u16))?;
        for x in 0..size {
            queue!(
                stdout,
                SetBackgroundColor(colors[y * size + x]),
                Print("  ")
            )?;
        }
        queue!(stdout, style::ResetColor)?;
    }

    let state = if world.is_finished() {
        "done"
    } else if running {
        "running"
    } else {
        "paused"
    };
    let path_len = world.path.as_ref().map_or(0, Vec::len);
    queue!(
        stdout,
        cursor::MoveTo(0, size as u16),
        terminal::Clear(ClearType::CurrentLine),
        SetForegroundColor(CtColor::Reset),
        Print(format!(
            "{state} | speed {speed}x | path {path_len} | space run/pause  r randomize  +/- speed  q quit"
        ))
    )?;
    stdout.flush()
}

fn event_loop(
    stdout: &mut impl Write,
    config: DemoConfig,
    rng: &mut SmallRng,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut world = World::generate(config.size, config.heuristic, rng)?;
    let mut speed: u32 = 1;
    let mut running = false;

    loop {
        let frame_start = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            let Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) = event::read()?
            else {
                continue;
            };
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char(' ') => {
                    if world.is_finished() {
                        world.reset_search()?;
                        running = true;
                    } else {
                        running = !running;
                    }
                }
                KeyCode::Char('r') => {
                    if !running {
                        world = World::generate(config.size, config.heuristic, rng)?;
                    }
                }
                KeyCode::Char('+') | KeyCode::Char('=') => speed = (speed + 1).min(MAX_SPEED),
                KeyCode::Char('-') => speed = speed.saturating_sub(1).max(1),
                _ => {}
            }
        }

        if running {
            world.advance(speed);
            if world.is_finished() {
                running = false;
            }
        }

        draw(stdout, &world, speed, running)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

/// Run the visualizer until the user quits. Owns terminal setup/teardown.
pub fn run(config: DemoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = SmallRng::from_os_rng();

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        cursor::Hide,
        terminal::Clear(ClearType::All)
    )?;

    let result = event_loop(&mut stdout, config, &mut rng);

    // Restore the terminal even when the loop errored.
    execute!(
        stdout,
        style::ResetColor,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;
    result
}
