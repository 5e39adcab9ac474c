//! Puzzle representation types: colors, tubes, moves and the search state.
//!
//! The input types deserialize directly from the JSON puzzle format
//! accepted by the CLI (`{ "tubes": [["red", "green"], []] }`).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Number of units a single tube can hold
pub const TUBE_CAPACITY: usize = 4;

/// Liquid color - the closed set of colors used by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Color {
    Red,
    Orange,
    Green,
    LightGreen,
    Periwinkle,
    Indigo,
    Purple,
    Pink,
    Gray,
}

impl Color {
    /// Every color, in declaration order
    pub const ALL: [Color; 9] = [
        Color::Red,
        Color::Orange,
        Color::Green,
        Color::LightGreen,
        Color::Periwinkle,
        Color::Indigo,
        Color::Purple,
        Color::Pink,
        Color::Gray,
    ];

    /// Name as typed by the user
    pub fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Orange => "orange",
            Color::Green => "green",
            Color::LightGreen => "light-green",
            Color::Periwinkle => "periwinkle",
            Color::Indigo => "indigo",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Gray => "gray",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Color {
    type Err = PuzzleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Color::ALL
            .into_iter()
            .find(|c| c.name() == lowered)
            .ok_or_else(|| PuzzleError::UnknownColor(s.to_string()))
    }
}

/// Errors raised while building a puzzle from user input
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("tube {} holds {len} units but capacity is {cap}", .tube + 1, cap = TUBE_CAPACITY)]
    TubeOverflow { tube: usize, len: usize },
    #[error("color {color} appears {count} times (at most {cap} allowed)", cap = TUBE_CAPACITY)]
    TooManyUnits { color: Color, count: usize },
    #[error("unknown color {0:?}")]
    UnknownColor(String),
}

/// A single tube. The last element is the top of the stack.
pub type Tube = SmallVec<[Color; TUBE_CAPACITY]>;

/// A pour from one tube into another (0-based indices)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub src: usize,
    pub dest: usize,
}

impl Move {
    pub fn new(src: usize, dest: usize) -> Self {
        Self { src, dest }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pour tube {} into tube {}.", self.src + 1, self.dest + 1)
    }
}

/// Puzzle input document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PuzzleConfig {
    pub tubes: Vec<Vec<Color>>,
}

impl PuzzleConfig {
    /// Build the initial search state
    pub fn to_state(&self) -> Result<PuzzleState, PuzzleError> {
        PuzzleState::new(self.tubes.iter().cloned())
    }
}

/// One point in the search space: the tubes plus the moves that led here.
///
/// Derived states are produced by [`PuzzleState::apply_move`]; the original
/// is never touched, so sibling branches of the search never observe each
/// other's pours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleState {
    tubes: Vec<Tube>,
    history: Vec<Move>,
}

impl PuzzleState {
    /// Create the initial state. Tubes longer than [`TUBE_CAPACITY`] are rejected.
    pub fn new<I, T>(tubes: I) -> Result<Self, PuzzleError>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = Color>,
    {
        let mut built = Vec::new();
        for (index, tube) in tubes.into_iter().enumerate() {
            let tube: Tube = tube.into_iter().collect();
            if tube.len() > TUBE_CAPACITY {
                return Err(PuzzleError::TubeOverflow {
                    tube: index,
                    len: tube.len(),
                });
            }
            built.push(tube);
        }
        Ok(Self {
            tubes: built,
            history: Vec::new(),
        })
    }

    pub fn tubes(&self) -> &[Tube] {
        &self.tubes
    }

    /// Moves applied since the initial state, oldest first
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn tube_count(&self) -> usize {
        self.tubes.len()
    }

    /// Count occurrences of every color present across all tubes
    pub fn count_colors(&self) -> BTreeMap<Color, usize> {
        let mut counts = BTreeMap::new();
        for tube in &self.tubes {
            for &color in tube {
                *counts.entry(color).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Necessary condition for a solution: every color present fills
    /// exactly one tube.
    pub fn is_solvable(&self) -> bool {
        self.count_colors()
            .values()
            .all(|&count| count == TUBE_CAPACITY)
    }

    /// Every tube is empty or holds a full tube of a single color.
    pub fn is_solved(&self) -> bool {
        self.tubes.iter().all(|tube| match tube.first() {
            None => true,
            Some(&first) => tube.len() == TUBE_CAPACITY && tube.iter().all(|&c| c == first),
        })
    }

    /// Enumerate legal pours, source-major then destination, both ascending
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (src, src_tube) in self.tubes.iter().enumerate() {
            let Some(&src_top) = src_tube.last() else {
                continue;
            };
            for (dest, dest_tube) in self.tubes.iter().enumerate() {
                if src == dest || dest_tube.len() >= TUBE_CAPACITY {
                    continue;
                }
                match dest_tube.last() {
                    None => moves.push(Move::new(src, dest)),
                    Some(&dest_top) if dest_top == src_top => moves.push(Move::new(src, dest)),
                    Some(_) => {}
                }
            }
        }
        moves
    }

    /// Clone with one pour applied.
    ///
    /// Units transfer one at a time while the source is non-empty, the
    /// destination has room, and the destination is empty or its top matches
    /// the source's current top. The move is recorded even if nothing pours,
    /// including when `src == dest` or either index is out of range.
    pub fn apply_move(&self, mv: Move) -> Self {
        let mut next = self.clone();
        next.pour(mv);
        next
    }

    fn pour(&mut self, mv: Move) {
        self.history.push(mv);
        if mv.src == mv.dest || mv.src >= self.tubes.len() || mv.dest >= self.tubes.len() {
            return;
        }
        loop {
            let Some(&top) = self.tubes[mv.src].last() else {
                break;
            };
            let dest_tube = &self.tubes[mv.dest];
            if dest_tube.len() >= TUBE_CAPACITY {
                break;
            }
            if dest_tube.last().is_some_and(|&dest_top| dest_top != top) {
                break;
            }
            self.tubes[mv.src].pop();
            self.tubes[mv.dest].push(top);
        }
    }
}

impl fmt::Display for PuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tube) in self.tubes.iter().enumerate() {
            let names: Vec<&str> = tube.iter().map(|c| c.name()).collect();
            writeln!(f, "Tube #{}: [{}]", i + 1, names.join(" "))?;
        }
        Ok(())
    }
}
