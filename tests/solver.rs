use water_sort_solver::{
    parse_solution, render_solution, solve, solve_with_config, verify_solution,
    PuzzleConfig, PuzzleError, PuzzleState, SolverConfig,
};

use water_sort_solver::Color::{Green, Orange, Red};

fn load(json: &str) -> PuzzleState {
    let config: PuzzleConfig = serde_json::from_str(json).unwrap();
    config.to_state().unwrap()
}

#[test]
fn test_half_filled_colors_have_no_solution() {
    let state = load(r#"{"tubes": [["red", "green"], ["green", "red"], [], []]}"#);
    let result = solve_with_config(&state, &SolverConfig::default());
    assert!(result.solution.is_none());
    assert_eq!(result.states_explored, 0);
}

#[test]
fn test_already_solved_puzzle() {
    let state = load(r#"{"tubes": [["red", "red", "red", "red"], [], [], []]}"#);
    let solution = solve(&state).unwrap();
    assert!(solution.history().is_empty());
    assert_eq!(render_solution(solution.history()), "Solved!");
}

#[test]
fn test_interleaved_puzzle_round_trips_through_solution_file() {
    let state = load(
        r#"{"tubes": [["red", "green", "red", "green"], ["green", "red", "green", "red"], [], []]}"#,
    );
    let solution = solve(&state).unwrap();
    assert!(!solution.history().is_empty());

    let text = render_solution(solution.history());
    assert!(text.starts_with("Pour tube 1 into tube 3.\n"));
    assert!(text.ends_with("\nSolved!"));

    let moves = parse_solution(&text).unwrap();
    assert_eq!(moves, solution.history());
    assert!(verify_solution(&state, &moves));
}

#[test]
fn test_three_color_puzzle() {
    let state = PuzzleState::new(vec![
        vec![Red, Green, Orange, Red],
        vec![Green, Orange, Red, Green],
        vec![Orange, Red, Green, Orange],
        vec![],
        vec![],
    ])
    .unwrap();

    let solution = solve(&state).unwrap();
    assert!(solution.is_solved());
    assert!(verify_solution(&state, solution.history()));
    assert_eq!(solution.count_colors(), state.count_colors());
}

#[test]
fn test_five_unit_tube_rejected_before_search() {
    let config: PuzzleConfig =
        serde_json::from_str(r#"{"tubes": [["red", "red", "red", "red", "red"], []]}"#).unwrap();
    assert_eq!(
        config.to_state(),
        Err(PuzzleError::TubeOverflow { tube: 0, len: 5 })
    );
}

#[test]
fn test_unknown_color_rejected_by_json() {
    let parsed: Result<PuzzleConfig, _> = serde_json::from_str(r#"{"tubes": [["teal"]]}"#);
    assert!(parsed.is_err());
}
