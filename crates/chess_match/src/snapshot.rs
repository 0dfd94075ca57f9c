//! Read-only board view for renderers and network hosts.

use serde::{Deserialize, Serialize};

use crate::{
    board::{Board, MAX_DIMENSION},
    coords::GridPos,
    error::BoardError,
    types::Piece,
};

/// `rows x columns` grid of optional pieces, row 0 first (black's back rank).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSnapshot")]
pub struct BoardSnapshot {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Piece>>,
}

#[derive(Deserialize)]
struct RawSnapshot {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Piece>>,
}

impl TryFrom<RawSnapshot> for BoardSnapshot {
    type Error = BoardError;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let RawSnapshot {
            rows,
            columns,
            cells,
        } = raw;
        if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&columns) {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }
        if cells.len() != rows * columns {
            return Err(BoardError::CellCount {
                expected: rows * columns,
                found: cells.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            cells,
        })
    }
}

impl BoardSnapshot {
    pub fn of(board: &Board) -> Self {
        let mut cells = vec![None; board.rows() * board.columns()];
        for (pos, id) in board.occupants() {
            cells[pos.row as usize * board.columns() + pos.column as usize] =
                Some(board.piece(id).piece());
        }
        Self {
            rows: board.rows(),
            columns: board.columns(),
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Piece on `pos`; `None` for empty or off-board cells.
    pub fn get(&self, pos: GridPos) -> Option<Piece> {
        if pos.row < 0 || pos.column < 0 {
            return None;
        }
        let (r, c) = (pos.row as usize, pos.column as usize);
        if r >= self.rows || c >= self.columns {
            return None;
        }
        self.cells[r * self.columns + c]
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    pub fn to_matrix(&self) -> Vec<Vec<Option<Piece>>> {
        self.cells.chunks(self.columns).map(|row| row.to_vec()).collect()
    }

    /// One line per row, piece letters and `-` for empty cells.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.rows * (self.columns + 1));
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter().map(|cell| cell.map_or('-', |p| p.symbol())));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod snapshot_tests;
