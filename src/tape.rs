//! The machine's single tape: a growable row of cells with a read/write head.

use crate::types::{Direction, Symbol};
use std::fmt;

/// A tape that grows one blank cell at a time in either direction.
///
/// The head may step one cell past either end; [`Tape::fill`] brings it back
/// onto the tape by growing it, so `position` is a valid index after every fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    position: isize,
    blank: Symbol,
}

impl Tape {
    /// Creates a tape holding `input`, one cell per character, with the head on the first cell.
    /// An empty input starts as a single blank cell.
    pub fn new(input: &str, blank: Symbol) -> Self {
        let mut cells: Vec<Symbol> = input.chars().collect();
        if cells.is_empty() {
            cells.push(blank);
        }

        Self {
            cells,
            position: 0,
            blank,
        }
    }

    /// Returns the symbol under the head.
    ///
    /// Between a [`Tape::shift`] and the following [`Tape::fill`] the head may sit
    /// just outside the tape; that cell reads as blank.
    pub fn read(&self) -> Symbol {
        usize::try_from(self.position)
            .ok()
            .and_then(|i| self.cells.get(i))
            .copied()
            .unwrap_or(self.blank)
    }

    /// Replaces the symbol under the head.
    pub fn write(&mut self, symbol: Symbol) {
        self.fill();
        let index = self.position();
        self.cells[index] = symbol;
    }

    /// Moves the head one cell. Call [`Tape::fill`] before the next read.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.position -= 1,
            Direction::Right => self.position += 1,
        }
    }

    /// Grows the tape by one blank cell if the head has stepped off either end.
    pub fn fill(&mut self) {
        if self.position < 0 {
            self.cells.insert(0, self.blank);
            self.position = 0;
        } else if self.position as usize >= self.cells.len() {
            self.cells.push(self.blank);
        }
    }

    /// Removes leading and trailing blank cells. Interior blanks are kept.
    ///
    /// An all-blank tape trims to an empty one.
    pub fn trim(&mut self) {
        let blank = self.blank;
        let end = self
            .cells
            .iter()
            .rposition(|&c| c != blank)
            .map_or(0, |i| i + 1);
        self.cells.truncate(end);

        let start = self
            .cells
            .iter()
            .position(|&c| c != blank)
            .unwrap_or(self.cells.len());
        self.cells.drain(..start);
        self.position -= start as isize;
    }

    /// Returns the head position.
    ///
    /// Only meaningful after a [`Tape::fill`]; a head left of the tape reports `0`.
    pub fn position(&self) -> usize {
        usize::try_from(self.position).unwrap_or(0)
    }

    /// Returns the tape cells.
    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the tape has no cells, which only happens after trimming a blank tape.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the blank symbol used to grow this tape.
    pub fn blank(&self) -> Symbol {
        self.blank
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{}", c))
    }
}
