//! CLI entry point for the water sort solver.
//!
//! Usage:
//!   water-sort solve <puzzle.json> [options]
//!   water-sort solve --stdin [options]
//!   water-sort interactive
//!   water-sort verify <puzzle.json> <solution.txt>
//!
//! Options for `solve`:
//!   --output <file>       Write the solution file here instead of stdout
//!   --json                Print a JSON report
//!   --no-cycle-guard      Allow the search to revisit states on its own path
//!   --max-depth <n>       Maximum number of moves in a solution
//!   --timeout <seconds>   Maximum search time

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::info;
use serde::{Deserialize, Serialize};

use water_sort_solver::format::{parse_solution, render_solution, FormatError};
use water_sort_solver::prompt::{PromptError, Prompter};
use water_sort_solver::pruning::check_color_counts;
use water_sort_solver::puzzle::{Move, PuzzleConfig, PuzzleError, PuzzleState};
use water_sort_solver::replay::{self, ReplayStatus};
use water_sort_solver::solver::{solve, solve_with_config, SolverConfig, SolverResult};

#[derive(Parser)]
#[command(name = "water-sort")]
#[command(about = "Backtracking solver for water sort tube puzzles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a puzzle given as JSON
    Solve {
        /// Path to puzzle JSON file (use --stdin to read from stdin)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read puzzle from stdin instead of file
        #[arg(long)]
        stdin: bool,

        /// Write the solution file to this path
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print a JSON report instead of the solution text
        #[arg(long)]
        json: bool,

        /// Do not skip states already on the current search path
        #[arg(long)]
        no_cycle_guard: bool,

        /// Maximum number of moves in a solution
        #[arg(long)]
        max_depth: Option<usize>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Enter the tubes interactively and save the solution to a file
    Interactive,
    /// Check that a solution file sorts a puzzle
    Verify {
        /// Path to puzzle JSON file
        puzzle: PathBuf,
        /// Path to solution file
        solution: PathBuf,
    },
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("error parsing puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid puzzle: {0}")]
    Puzzle(#[from] PuzzleError),
    #[error("invalid solution file: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error("must provide either a file path or --stdin")]
    MissingInput,
}

/// Output format for a solve result
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    solved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    search_exhausted: bool,
    states_explored: usize,
    time_elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    moves: Option<Vec<Move>>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(success) => process::exit(if success { 0 } else { 1 }),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<bool, CliError> {
    match cli.command {
        Commands::Solve {
            file,
            stdin,
            output,
            json,
            no_cycle_guard,
            max_depth,
            timeout,
        } => {
            let json_content = if stdin {
                let mut buffer = String::new();
                io::stdin().read_to_string(&mut buffer)?;
                buffer
            } else if let Some(path) = file {
                read_file(&path)?
            } else {
                return Err(CliError::MissingInput);
            };

            let state = load_puzzle(&json_content)?;
            let config = SolverConfig {
                detect_cycles: !no_cycle_guard,
                max_depth,
                timeout: timeout.map(Duration::from_secs),
            };
            let result = solve_with_config(&state, &config);

            // The solution file is only written when there is a solution
            let text = result.moves().map(render_solution);
            if let (Some(path), Some(text)) = (&output, &text) {
                write_file(path, text)?;
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&format_result(&result))?);
            } else {
                match (&output, &text) {
                    (_, None) => println!("No solution has been found."),
                    (None, Some(text)) => println!("{text}"),
                    (Some(_), Some(_)) => println!("A solution has been found!"),
                }
            }
            Ok(result.solved())
        }

        Commands::Interactive => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout());
            let state = prompter.read_puzzle()?;

            match solve(&state) {
                Some(solution) => {
                    prompter.say("A solution has been found!")?;
                    let filename = prompter.read_filename()?;
                    write_file(Path::new(&filename), &render_solution(solution.history()))?;
                    Ok(true)
                }
                None => {
                    prompter.say("No solution has been found.")?;
                    Ok(false)
                }
            }
        }

        Commands::Verify { puzzle, solution } => {
            let state = load_puzzle(&read_file(&puzzle)?)?;
            let moves = parse_solution(&read_file(&solution)?)?;
            let result = replay::execute(&state, &moves);

            match result.status {
                ReplayStatus::Solved => println!(
                    "Solved in {} pours ({} units moved).",
                    result.metrics.pours, result.metrics.units_moved
                ),
                ReplayStatus::Unsolved => {
                    println!("All pours are legal but the puzzle is not solved:");
                    print!("{}", result.state);
                }
                ReplayStatus::IllegalMove { step, mv } => {
                    println!("Pour #{} is illegal: {mv}", step + 1);
                }
            }
            Ok(result.solved())
        }
    }
}

/// Parse and validate a puzzle document
fn load_puzzle(json_content: &str) -> Result<PuzzleState, CliError> {
    let puzzle: PuzzleConfig = serde_json::from_str(json_content)?;
    check_color_counts(puzzle.tubes.iter().map(Vec::as_slice))?;
    let state = puzzle.to_state()?;
    info!("loaded puzzle with {} tubes", state.tube_count());
    Ok(state)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("wrote solution to {path:?}");
    Ok(())
}

fn format_result(result: &SolverResult) -> SolveOutput {
    SolveOutput {
        solved: result.solved(),
        reason: result.reason.clone(),
        search_exhausted: result.search_exhausted,
        states_explored: result.states_explored,
        time_elapsed_ms: result.time_elapsed_ms,
        moves: result.moves().map(<[Move]>::to_vec),
    }
}
