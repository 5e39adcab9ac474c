//! Water sort puzzle solver library.
//!
//! This crate models a set of capacity-4 tubes of colored liquid and finds
//! a sequence of pours that leaves every tube empty or full of one color,
//! using depth-first backtracking.

pub mod format;
pub mod prompt;
pub mod pruning;
pub mod puzzle;
pub mod replay;
pub mod solver;

// Re-export main types
pub use format::{parse_solution, render_solution, FormatError};
pub use puzzle::{Color, Move, PuzzleConfig, PuzzleError, PuzzleState, Tube, TUBE_CAPACITY};
pub use replay::{execute, verify_solution, ReplayMetrics, ReplayResult, ReplayStatus};
pub use solver::{solve, solve_with_config, SolverConfig, SolverResult};
