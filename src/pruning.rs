//! Search space pruning and input validation rules.
//!
//! The color-balance rule lets the solver reject a puzzle before exploring a
//! single move; the path guard keeps the depth-first search from pouring a
//! run back and forth between two tubes forever.

use std::collections::{BTreeMap, HashSet};

use crate::puzzle::{Color, PuzzleError, Tube, TUBE_CAPACITY};

/// Colors whose total count is not exactly one full tube
pub fn imbalanced_colors(counts: &BTreeMap<Color, usize>) -> Vec<(Color, usize)> {
    counts
        .iter()
        .filter(|&(_, &count)| count != TUBE_CAPACITY)
        .map(|(&color, &count)| (color, count))
        .collect()
}

/// Reject input where any color appears more often than a tube can hold.
///
/// Under-filled colors are accepted here since the user may still be
/// entering tubes; the solver's balance check catches them later.
pub fn check_color_counts<'a, I>(tubes: I) -> Result<(), PuzzleError>
where
    I: IntoIterator<Item = &'a [Color]>,
{
    let mut counts: BTreeMap<Color, usize> = BTreeMap::new();
    for tube in tubes {
        for &color in tube {
            *counts.entry(color).or_insert(0) += 1;
        }
    }
    match counts.into_iter().find(|&(_, count)| count > TUBE_CAPACITY) {
        Some((color, count)) => Err(PuzzleError::TooManyUnits { color, count }),
        None => Ok(()),
    }
}

/// Tube arrangements on the current depth-first path.
///
/// Only ancestors of the frame being expanded are held, so a state reachable
/// from two different branches is still explored in each of them.
#[derive(Debug, Default)]
pub struct PathGuard {
    on_path: HashSet<Vec<Tube>>,
}

impl PathGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an arrangement as on the path. Returns false if it already was.
    pub fn enter(&mut self, tubes: &[Tube]) -> bool {
        self.on_path.insert(tubes.to_vec())
    }

    pub fn leave(&mut self, tubes: &[Tube]) {
        self.on_path.remove(tubes);
    }

    pub fn contains(&self, tubes: &[Tube]) -> bool {
        self.on_path.contains(tubes)
    }

    pub fn len(&self) -> usize {
        self.on_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.on_path.is_empty()
    }
}
