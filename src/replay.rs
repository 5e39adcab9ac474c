//! Replays a list of pours against a puzzle, tracking metrics.
//!
//! Used to check solution files before trusting them: every pour must be a
//! legal move of the state it is applied to.

use crate::puzzle::{Move, PuzzleState};

/// Result status of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayStatus {
    /// Every tube sorted after the last pour
    Solved,
    /// All pours were legal but the tubes are not sorted
    Unsolved,
    /// The pour at `step` (0-based) was not legal
    IllegalMove { step: usize, mv: Move },
}

/// Metrics collected during replay
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayMetrics {
    pub pours: usize,
    pub units_moved: usize,
}

/// Result of replaying a move list
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub status: ReplayStatus,
    pub metrics: ReplayMetrics,
    /// State after the last legal pour
    pub state: PuzzleState,
}

impl ReplayResult {
    pub fn solved(&self) -> bool {
        self.status == ReplayStatus::Solved
    }
}

/// Apply `moves` in order, stopping at the first illegal one
pub fn execute(initial: &PuzzleState, moves: &[Move]) -> ReplayResult {
    let mut state = initial.clone();
    let mut metrics = ReplayMetrics::default();

    for (step, &mv) in moves.iter().enumerate() {
        if !state.legal_moves().contains(&mv) {
            return ReplayResult {
                status: ReplayStatus::IllegalMove { step, mv },
                metrics,
                state,
            };
        }

        let before = state.tubes()[mv.dest].len();
        state = state.apply_move(mv);
        metrics.pours += 1;
        metrics.units_moved += state.tubes()[mv.dest].len() - before;
    }

    let status = if state.is_solved() {
        ReplayStatus::Solved
    } else {
        ReplayStatus::Unsolved
    };
    ReplayResult {
        status,
        metrics,
        state,
    }
}

/// Simple verification: do the moves solve the puzzle?
pub fn verify_solution(initial: &PuzzleState, moves: &[Move]) -> bool {
    execute(initial, moves).solved()
}
