//! Solution file format.
//!
//! ```text
//! Pour tube 1 into tube 3.
//! Pour tube 2 into tube 1.
//! Solved!
//! ```
//!
//! Tube numbers are 1-based; the file ends with `Solved!` and no newline.

use crate::puzzle::Move;

const SOLVED_LINE: &str = "Solved!";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("line {line}: expected \"Pour tube N into tube M.\", got {text:?}")]
    BadLine { line: usize, text: String },
    #[error("line {line}: tube numbers start at 1")]
    ZeroTube { line: usize },
    #[error("missing final \"Solved!\" line")]
    MissingSolved,
    #[error("line {line}: unexpected text after \"Solved!\"")]
    TrailingText { line: usize },
}

/// Render moves as the solution file contents
pub fn render_solution(moves: &[Move]) -> String {
    let mut out = String::new();
    for mv in moves {
        out.push_str(&mv.to_string());
        out.push('\n');
    }
    out.push_str(SOLVED_LINE);
    out
}

/// Parse a solution file back into 0-based moves
pub fn parse_solution(text: &str) -> Result<Vec<Move>, FormatError> {
    let mut moves = Vec::new();
    let mut solved = false;

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        if solved {
            return Err(FormatError::TrailingText { line });
        }
        if trimmed == SOLVED_LINE {
            solved = true;
            continue;
        }
        moves.push(parse_move(trimmed, line)?);
    }

    if solved {
        Ok(moves)
    } else {
        Err(FormatError::MissingSolved)
    }
}

fn parse_move(text: &str, line: usize) -> Result<Move, FormatError> {
    let bad_line = || FormatError::BadLine {
        line,
        text: text.to_string(),
    };

    let rest = text.strip_prefix("Pour tube ").ok_or_else(bad_line)?;
    let rest = rest.strip_suffix('.').ok_or_else(bad_line)?;
    let (src, dest) = rest.split_once(" into tube ").ok_or_else(bad_line)?;
    let src: usize = src.trim().parse().map_err(|_| bad_line())?;
    let dest: usize = dest.trim().parse().map_err(|_| bad_line())?;

    if src == 0 || dest == 0 {
        return Err(FormatError::ZeroTube { line });
    }
    Ok(Move::new(src - 1, dest - 1))
}
