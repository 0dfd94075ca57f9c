//! Occupancy grid.
//!
//! The board knows nothing about chess rules. It owns an arena of pieces and a
//! `rows x columns` matrix of cells, each holding at most one piece handle.
//! Placing and removing keep every piece's recorded position in sync with the
//! cell that holds it.

use crate::coords::GridPos;
use crate::error::BoardError;
use crate::types::{Piece, PieceId, TrackedPiece};

/// Largest supported side length.
pub const MAX_DIMENSION: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Option<PieceId>>,
    pieces: Vec<TrackedPiece>,
}

impl Board {
    pub fn new(rows: usize, columns: usize) -> Result<Self, BoardError> {
        if !(1..=MAX_DIMENSION).contains(&rows) || !(1..=MAX_DIMENSION).contains(&columns) {
            return Err(BoardError::InvalidDimensions { rows, columns });
        }
        Ok(Self {
            rows,
            columns,
            cells: vec![None; rows * columns],
            pieces: Vec::new(),
        })
    }

    /// Empty 8x8 chess board.
    pub fn standard() -> Self {
        Self {
            rows: MAX_DIMENSION,
            columns: MAX_DIMENSION,
            cells: vec![None; MAX_DIMENSION * MAX_DIMENSION],
            pieces: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Bounds check only.
    pub fn position_exists(&self, pos: GridPos) -> bool {
        pos.row >= 0
            && pos.column >= 0
            && (pos.row as usize) < self.rows
            && (pos.column as usize) < self.columns
    }

    fn index(&self, pos: GridPos) -> Result<usize, BoardError> {
        if !self.position_exists(pos) {
            return Err(BoardError::OutOfBounds {
                row: pos.row,
                column: pos.column,
            });
        }
        Ok(pos.row as usize * self.columns + pos.column as usize)
    }

    pub fn piece_at(&self, pos: GridPos) -> Result<Option<PieceId>, BoardError> {
        Ok(self.cells[self.index(pos)?])
    }

    pub fn has_piece(&self, pos: GridPos) -> Result<bool, BoardError> {
        Ok(self.piece_at(pos)?.is_some())
    }

    /// Occupant of `pos`, or `None` when the cell is empty or off the board.
    /// Move generation probes neighbours through this.
    pub fn occupant(&self, pos: GridPos) -> Option<&TrackedPiece> {
        let id = self.piece_at(pos).ok().flatten()?;
        Some(&self.pieces[id.0])
    }

    /// Add a piece to the arena, detached from any cell.
    pub fn spawn(&mut self, piece: Piece) -> PieceId {
        self.pieces.push(TrackedPiece::new(piece));
        PieceId(self.pieces.len() - 1)
    }

    /// Spawn and place in one step for initial setups, where every target
    /// cell is known to be on the board and empty.
    pub(crate) fn put(&mut self, piece: Piece, pos: GridPos) -> PieceId {
        debug_assert!(self.position_exists(pos));
        let id = self.spawn(piece);
        let idx = pos.row as usize * self.columns + pos.column as usize;
        debug_assert!(self.cells[idx].is_none());
        self.cells[idx] = Some(id);
        self.pieces[id.0].set_position(Some(pos));
        id
    }

    pub fn piece(&self, id: PieceId) -> &TrackedPiece {
        &self.pieces[id.0]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut TrackedPiece {
        &mut self.pieces[id.0]
    }

    pub fn place(&mut self, id: PieceId, pos: GridPos) -> Result<(), BoardError> {
        let idx = self.index(pos)?;
        if self.cells[idx].is_some() {
            return Err(BoardError::Occupied {
                row: pos.row,
                column: pos.column,
            });
        }
        if self.pieces[id.0].position().is_some() {
            return Err(BoardError::AlreadyPlaced);
        }
        self.cells[idx] = Some(id);
        self.pieces[id.0].set_position(Some(pos));
        Ok(())
    }

    /// Detach and return the occupant of `pos`, if any.
    pub fn remove(&mut self, pos: GridPos) -> Result<Option<PieceId>, BoardError> {
        let idx = self.index(pos)?;
        let taken = self.cells[idx].take();
        if let Some(id) = taken {
            self.pieces[id.0].set_position(None);
        }
        Ok(taken)
    }

    /// All occupied cells in row-major order.
    pub fn occupants(&self) -> impl Iterator<Item = (GridPos, PieceId)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|id| {
                (
                    GridPos::new((i / self.columns) as i8, (i % self.columns) as i8),
                    id,
                )
            })
        })
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
