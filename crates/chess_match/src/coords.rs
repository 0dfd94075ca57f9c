//! Board coordinates.
//!
//! Two coordinate systems meet here:
//! - [`GridPos`] is the raw `(row, column)` cell index used by the grid.
//!   Row 0 is the top row as rendered, i.e. black's back rank.
//! - [`Square`] is algebraic notation (`a1`..`h8`). Rank 1 is white's back rank.
//!
//! Mapping: `row = BOARD_SIZE - rank`, `column = file - 'a'`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;

/// Side length of a chess board.
pub const BOARD_SIZE: usize = 8;

/// Raw grid coordinate. Signed so ray walks can step off the board and be
/// rejected by a bounds check instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    pub row: i8,
    pub column: i8,
}

impl GridPos {
    pub const fn new(row: i8, column: i8) -> Self {
        Self { row, column }
    }

    /// The cell `dr` rows and `dc` columns away. May lie off the board.
    pub const fn offset(self, dr: i8, dc: i8) -> Self {
        Self {
            row: self.row + dr,
            column: self.column + dc,
        }
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Algebraic square: file `'a'..='h'`, rank `1..=8`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Square {
    file: char,
    rank: u8,
}

impl Square {
    pub fn new(file: char, rank: u8) -> Result<Self, ChessError> {
        let last_file = (b'a' + BOARD_SIZE as u8 - 1) as char;
        if !('a'..=last_file).contains(&file) || !(1..=BOARD_SIZE as u8).contains(&rank) {
            return Err(ChessError::InvalidSquare(format!("{file}{rank}")));
        }
        Ok(Self { file, rank })
    }

    pub fn file(self) -> char {
        self.file
    }

    pub fn rank(self) -> u8 {
        self.rank
    }

    pub fn to_grid_pos(self) -> GridPos {
        GridPos {
            row: (BOARD_SIZE as u8 - self.rank) as i8,
            column: (self.file as u8 - b'a') as i8,
        }
    }

    /// Inverse of [`Square::to_grid_pos`]; fails for cells off the 8x8 board.
    pub fn from_grid_pos(pos: GridPos) -> Result<Self, ChessError> {
        let size = BOARD_SIZE as i8;
        if !(0..size).contains(&pos.row) || !(0..size).contains(&pos.column) {
            return Err(ChessError::InvalidSquare(pos.to_string()));
        }
        Ok(Self {
            file: (b'a' + pos.column as u8) as char,
            rank: BOARD_SIZE as u8 - pos.row as u8,
        })
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

impl FromStr for Square {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let mut chars = text.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ChessError::InvalidSquare(text.to_string()));
        };
        let rank = rank
            .to_digit(10)
            .ok_or_else(|| ChessError::InvalidSquare(text.to_string()))?;
        Square::new(file.to_ascii_lowercase(), rank as u8)
    }
}

impl TryFrom<String> for Square {
    type Error = ChessError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

#[cfg(test)]
#[path = "coords_tests.rs"]
mod coords_tests;
