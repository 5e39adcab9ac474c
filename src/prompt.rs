//! Interactive entry of a puzzle.
//!
//! Invalid answers are reported and the question asked again; only I/O
//! failure or end of input aborts.

use std::io::{self, BufRead, Write};

use crate::pruning::check_color_counts;
use crate::puzzle::{Color, PuzzleError, PuzzleState, TUBE_CAPACITY};

#[derive(thiserror::Error, Debug)]
pub enum PromptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("input ended before the puzzle was complete")]
    UnexpectedEof,
    #[error(transparent)]
    Puzzle(#[from] PuzzleError),
}

/// Asks the user questions on `output` and reads answers from `input`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> Result<String, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::UnexpectedEof);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Ask for the number of tubes until an integer is given
    pub fn read_tube_count(&mut self) -> Result<usize, PromptError> {
        loop {
            let answer = self.ask("How many tubes are there: ")?;
            match answer.trim().parse() {
                Ok(count) => return Ok(count),
                Err(_) => writeln!(self.output, "You must type an integer.")?,
            }
        }
    }

    /// Ask for the contents of `count` tubes, bottom unit first
    pub fn read_tubes(&mut self, count: usize) -> Result<Vec<Vec<Color>>, PromptError> {
        let allowed: Vec<&str> = Color::ALL.iter().map(|c| c.name()).collect();
        writeln!(self.output)?;
        writeln!(
            self.output,
            "Enter the contents of each tube. Separate each color by spaces."
        )?;
        writeln!(
            self.output,
            "The following colors are allowed: {}",
            allowed.join(" ")
        )?;
        writeln!(
            self.output,
            "You can type nothing to indicate that the tube is empty."
        )?;
        writeln!(self.output)?;

        let mut tubes: Vec<Vec<Color>> = Vec::new();
        while tubes.len() < count {
            writeln!(self.output, "Tube #{}", tubes.len() + 1)?;
            let answer = self.ask("Enter the colors: ")?;

            let colors: Result<Vec<Color>, PuzzleError> =
                answer.split_whitespace().map(str::parse).collect();
            let colors = match colors {
                Ok(colors) => colors,
                Err(_) => {
                    writeln!(self.output, "An invalid color was entered.")?;
                    writeln!(self.output, "Try double checking your spelling.")?;
                    writeln!(self.output)?;
                    continue;
                }
            };

            if colors.len() > TUBE_CAPACITY {
                writeln!(
                    self.output,
                    "A tube holds at most {TUBE_CAPACITY} colors."
                )?;
                writeln!(self.output)?;
                continue;
            }

            let candidate = tubes
                .iter()
                .map(Vec::as_slice)
                .chain(std::iter::once(colors.as_slice()));
            if let Err(PuzzleError::TooManyUnits { color, .. }) = check_color_counts(candidate) {
                writeln!(
                    self.output,
                    "The following color has appeared more than {TUBE_CAPACITY} times: {color}"
                )?;
                writeln!(self.output)?;
                continue;
            }

            tubes.push(colors);
        }
        Ok(tubes)
    }

    /// Ask for the tube count and contents, then build the initial state
    pub fn read_puzzle(&mut self) -> Result<PuzzleState, PromptError> {
        let count = self.read_tube_count()?;
        let tubes = self.read_tubes(count)?;
        Ok(PuzzleState::new(tubes)?)
    }

    /// Ask for an output file name until a non-empty one is given
    pub fn read_filename(&mut self) -> Result<String, PromptError> {
        loop {
            let answer = self.ask("Choose a name for the file: ")?;
            if !answer.is_empty() {
                return Ok(answer);
            }
            writeln!(self.output, "The file name cannot be an empty string.")?;
        }
    }

    /// Print a line to the user
    pub fn say(&mut self, message: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Color::{Gray, LightGreen, Red};

    fn prompter(input: &str) -> Prompter<&[u8], Vec<u8>> {
        Prompter::new(input.as_bytes(), Vec::new())
    }

    fn transcript(p: &Prompter<&[u8], Vec<u8>>) -> String {
        String::from_utf8(p.output.clone()).unwrap()
    }

    #[test]
    fn test_tube_count_reprompts() {
        let mut p = prompter("three\n-1\n3\n");
        assert_eq!(p.read_tube_count().unwrap(), 3);
        assert_eq!(transcript(&p).matches("You must type an integer.").count(), 2);
    }

    #[test]
    fn test_read_tubes() {
        let mut p = prompter("red LIGHT-GREEN\n\ngray\n");
        let tubes = p.read_tubes(3).unwrap();
        assert_eq!(tubes, vec![vec![Red, LightGreen], vec![], vec![Gray]]);
        assert!(transcript(&p).contains("Tube #3"));
    }

    #[test]
    fn test_read_tubes_rejects_bad_input() {
        let mut p = prompter("red blu\nred red red red red\nred red red\nred red\nred\n");
        let tubes = p.read_tubes(2).unwrap();
        assert_eq!(tubes, vec![vec![Red, Red, Red], vec![Red]]);

        let out = transcript(&p);
        assert!(out.contains("An invalid color was entered."));
        assert!(out.contains("A tube holds at most 4 colors."));
        assert!(out.contains("The following color has appeared more than 4 times: red"));
    }

    #[test]
    fn test_huge_tube_count_does_not_preallocate() {
        let mut p = prompter("18446744073709551615\nred\n");
        assert!(matches!(p.read_puzzle(), Err(PromptError::UnexpectedEof)));
        assert!(transcript(&p).contains("Tube #2"));
    }

    #[test]
    fn test_eof_is_an_error() {
        let mut p = prompter("2\nred\n");
        assert!(matches!(p.read_puzzle(), Err(PromptError::UnexpectedEof)));
    }

    #[test]
    fn test_read_filename() {
        let mut p = prompter("\nsolution.txt\n");
        assert_eq!(p.read_filename().unwrap(), "solution.txt");
        assert!(transcript(&p).contains("The file name cannot be an empty string."));
    }
}
