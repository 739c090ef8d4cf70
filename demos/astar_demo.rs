//! Terminal A* visualizer using crossterm.
//!
//! Run: cargo run --bin astar-demo -- [SIZE] [HEURISTIC]
//!
//! SIZE is the grid side length (5-50, default 20); HEURISTIC is
//! `manhattan` (default) or `euclidean`.

use gridpath_demos::{DemoConfig, MAX_SIZE, MIN_SIZE};
use gridpath_search::Heuristic;

fn main() {
    let mut config = DemoConfig::default();
    let mut args = std::env::args().skip(1);

    if let Some(arg) = args.next() {
        match arg.parse::<i32>() {
            Ok(size) => config.size = size.clamp(MIN_SIZE, MAX_SIZE),
            Err(_) => {
                eprintln!("Error: grid size must be a number, got \u{201c}{arg}\u{201d}");
                std::process::exit(1);
            }
        }
    }
    if let Some(arg) = args.next() {
        match arg.parse::<Heuristic>() {
            Ok(heuristic) => config.heuristic = heuristic,
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = gridpath_demos::run(config) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
