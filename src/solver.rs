//! Depth-first backtracking solver.
//!
//! Legal moves are tried in enumeration order and the first solved state
//! reached is returned, so the answer is deterministic but not necessarily
//! the shortest. The search runs on an explicit stack of frames instead of
//! native recursion; the order states are visited in is identical.

use std::time::{Duration, Instant};

use log::{debug, info, trace};

use crate::pruning::{imbalanced_colors, PathGuard};
use crate::puzzle::{Color, Move, PuzzleState};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Skip derived states whose arrangement is already on the current path.
    /// Without this, pouring a lone unit between two empty tubes can loop
    /// forever.
    pub detect_cycles: bool,
    /// Maximum number of moves in a solution
    pub max_depth: Option<usize>,
    /// Maximum time to search
    pub timeout: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            detect_cycles: true,
            max_depth: None,
            timeout: None,
        }
    }
}

/// Result of the solver search
#[derive(Debug, Clone)]
pub struct SolverResult {
    /// The first solved state reached; its history is the answer
    pub solution: Option<PuzzleState>,
    /// Whether the search space was fully exhausted
    pub search_exhausted: bool,
    /// Number of derived states produced
    pub states_explored: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
    /// Why no solution was returned
    pub reason: Option<String>,
}

impl SolverResult {
    pub fn solved(&self) -> bool {
        self.solution.is_some()
    }

    /// Moves of the solution, if any
    pub fn moves(&self) -> Option<&[Move]> {
        self.solution.as_ref().map(|s| s.history())
    }
}

/// A frame in the search: a state and the moves from it not yet tried
#[derive(Debug)]
struct SearchFrame {
    state: PuzzleState,
    remaining: std::vec::IntoIter<Move>,
}

impl SearchFrame {
    fn new(state: PuzzleState) -> Self {
        let remaining = state.legal_moves().into_iter();
        Self { state, remaining }
    }
}

/// Find a solving sequence with the default configuration.
///
/// Returns the solved state (whose history holds the moves), or `None` when
/// no sequence of pours sorts the tubes.
pub fn solve(state: &PuzzleState) -> Option<PuzzleState> {
    solve_with_config(state, &SolverConfig::default()).solution
}

/// Find a solving sequence using depth-first backtracking.
pub fn solve_with_config(initial: &PuzzleState, config: &SolverConfig) -> SolverResult {
    let start_time = Instant::now();
    let deadline = config.timeout.map(|timeout| start_time + timeout);
    let base_depth = initial.history().len();

    info!(
        "solving {} tubes (cycle detection {})",
        initial.tube_count(),
        if config.detect_cycles { "on" } else { "off" }
    );

    if initial.is_solved() {
        info!("puzzle is already solved");
        return SolverResult {
            solution: Some(initial.clone()),
            search_exhausted: false,
            states_explored: 0,
            time_elapsed_ms: elapsed_ms(start_time),
            reason: None,
        };
    }

    // Pours never change color counts, so checking the root covers every
    // state below it.
    if !initial.is_solvable() {
        let imbalanced = imbalanced_colors(&initial.count_colors());
        debug!("pruned at root: {imbalanced:?}");
        return SolverResult {
            solution: None,
            search_exhausted: true,
            states_explored: 0,
            time_elapsed_ms: elapsed_ms(start_time),
            reason: Some(format_imbalance_reason(&imbalanced)),
        };
    }

    let mut states_explored: usize = 0;
    let mut depth_limited = false;
    let mut guard = PathGuard::new();
    if config.detect_cycles {
        guard.enter(initial.tubes());
    }

    let mut stack: Vec<SearchFrame> = vec![SearchFrame::new(initial.clone())];

    while let Some(frame) = stack.last_mut() {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            info!("timed out after {states_explored} states");
            return SolverResult {
                solution: None,
                search_exhausted: false,
                states_explored,
                time_elapsed_ms: elapsed_ms(start_time),
                reason: Some("timeout".to_string()),
            };
        }

        let Some(mv) = frame.remaining.next() else {
            // Branch exhausted, backtrack
            if let Some(done) = stack.pop() {
                if config.detect_cycles {
                    guard.leave(done.state.tubes());
                }
            }
            continue;
        };

        let next = frame.state.apply_move(mv);
        states_explored += 1;

        if next.is_solved() {
            info!(
                "solved in {} moves after {states_explored} states",
                next.history().len() - base_depth
            );
            return SolverResult {
                solution: Some(next),
                search_exhausted: false,
                states_explored,
                time_elapsed_ms: elapsed_ms(start_time),
                reason: None,
            };
        }

        if config.detect_cycles && guard.contains(next.tubes()) {
            trace!("skipping {mv:?}: arrangement already on path");
            continue;
        }

        if let Some(max_depth) = config.max_depth {
            if next.history().len() - base_depth >= max_depth {
                depth_limited = true;
                continue;
            }
        }

        trace!("depth {}: {mv:?}", next.history().len() - base_depth);
        if config.detect_cycles {
            guard.enter(next.tubes());
        }
        stack.push(SearchFrame::new(next));
    }

    info!("no solution after {states_explored} states");
    SolverResult {
        solution: None,
        search_exhausted: !depth_limited,
        states_explored,
        time_elapsed_ms: elapsed_ms(start_time),
        reason: Some(if depth_limited {
            "depth_limit".to_string()
        } else {
            "no_solution".to_string()
        }),
    }
}

fn elapsed_ms(start_time: Instant) -> u64 {
    start_time.elapsed().as_millis() as u64
}

/// Format a human-readable reason for an unbalanced puzzle
fn format_imbalance_reason(imbalanced: &[(Color, usize)]) -> String {
    let parts: Vec<String> = imbalanced
        .iter()
        .map(|(color, count)| format!("{color} x{count}"))
        .collect();
    format!("unbalanced colors: {}", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Color::{Green, Red};

    fn interleaved() -> PuzzleState {
        PuzzleState::new(vec![
            vec![Red, Green, Red, Green],
            vec![Green, Red, Green, Red],
            vec![],
            vec![],
        ])
        .unwrap()
    }

    #[test]
    fn test_already_solved_returns_initial() {
        let state = PuzzleState::new(vec![vec![Red, Red, Red, Red], vec![], vec![], vec![]]).unwrap();
        let solution = solve(&state).unwrap();
        assert_eq!(solution, state);
        assert!(solution.history().is_empty());
    }

    #[test]
    fn test_underfilled_colors_unsolvable() {
        let state = PuzzleState::new(vec![vec![Red, Green], vec![Green, Red], vec![], vec![]]).unwrap();
        assert!(solve(&state).is_none());
    }

    #[test]
    fn test_imbalance_pruned_without_exploring() {
        for count in [3, 5] {
            let mut tubes = vec![vec![Red; 4], vec![], vec![], vec![]];
            tubes[1] = vec![Green; count.min(4)];
            if count > 4 {
                tubes[2] = vec![Green];
            }
            let state = PuzzleState::new(tubes).unwrap();
            let result = solve_with_config(&state, &SolverConfig::default());
            assert!(!result.solved());
            assert!(result.search_exhausted);
            assert_eq!(result.states_explored, 0);
            assert_eq!(
                result.reason.as_deref(),
                Some(format!("unbalanced colors: green x{count}").as_str())
            );
        }
    }

    #[test]
    fn test_interleaved_tubes_first_solution() {
        let result = solve_with_config(&interleaved(), &SolverConfig::default());
        let expected: Vec<Move> = [
            (0, 2),
            (0, 3),
            (0, 2),
            (0, 3),
            (1, 0),
            (0, 3),
            (1, 0),
            (0, 2),
            (1, 0),
            (0, 3),
            (1, 0),
            (0, 2),
        ]
        .into_iter()
        .map(|(src, dest)| Move::new(src, dest))
        .collect();

        assert_eq!(result.moves(), Some(expected.as_slice()));
        assert_eq!(result.states_explored, 13);

        let solution = result.solution.unwrap();
        assert!(solution.is_solved());
        let full = solution.tubes().iter().filter(|t| t.len() == 4).count();
        let empty = solution.tubes().iter().filter(|t| t.is_empty()).count();
        assert_eq!((full, empty), (2, 2));
    }

    #[test]
    fn test_solve_is_deterministic() {
        let first = solve(&interleaved()).unwrap();
        let second = solve(&interleaved()).unwrap();
        assert_eq!(first.history(), second.history());
    }

    #[test]
    fn test_unguarded_search_cycles_until_limit() {
        let config = SolverConfig {
            detect_cycles: false,
            max_depth: Some(30),
            timeout: None,
        };
        let result = solve_with_config(&interleaved(), &config);
        let solution = result.solution.unwrap();
        assert!(solution.is_solved());
        // Ping-pong pours pad the answer out to the depth limit
        assert!(solution.history().len() > 12);
        assert!(solution.history().len() <= 30);
    }

    #[test]
    fn test_zero_timeout_stops_search() {
        let config = SolverConfig {
            detect_cycles: false,
            max_depth: None,
            timeout: Some(Duration::ZERO),
        };
        let result = solve_with_config(&interleaved(), &config);
        assert!(!result.solved());
        assert!(!result.search_exhausted);
        assert_eq!(result.reason.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_depth_limit_reports_unexhausted() {
        let config = SolverConfig {
            max_depth: Some(2),
            ..Default::default()
        };
        let result = solve_with_config(&interleaved(), &config);
        assert!(!result.solved());
        assert!(!result.search_exhausted);
        assert_eq!(result.reason.as_deref(), Some("depth_limit"));
    }
}
