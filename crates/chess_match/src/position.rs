use tracing::{error, trace};

use crate::{
    board::Board,
    coords::GridPos,
    error::{BoardError, ChessError, ChessResult},
    movegen::{MoveContext, is_square_attacked, possible_moves},
    square_set::SquareSet,
    types::*,
};

/// Board plus the bookkeeping of which pieces are in play and which were taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
    active: Vec<PieceId>,
    captured: Vec<PieceId>,
}

/// A piece taken by a move, with enough detail to put it back exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Capture {
    pub piece: PieceId,
    pub at: GridPos, // differs from the move's target for en-passant
    active_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RookMove {
    pub rook: PieceId,
    pub from: GridPos,
    pub to: GridPos,
}

/// Everything [`Position::unmake_move`] needs to invert a move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Undo {
    pub moved: PieceId,
    pub from: GridPos,
    pub to: GridPos,
    pub captured: Option<Capture>,
    pub rook_move: Option<RookMove>, // castling
}

fn corrupted(msg: String) -> ChessError {
    error!(reason = %msg, "match state corrupted");
    ChessError::InvariantViolation(msg)
}

impl Position {
    pub fn empty(rows: usize, columns: usize) -> Result<Self, BoardError> {
        Ok(Self {
            board: Board::new(rows, columns)?,
            active: Vec::new(),
            captured: Vec::new(),
        })
    }

    /// Standard initial position, white's back rank on rank 1.
    pub fn startpos() -> Self {
        let mut p = Position {
            board: Board::standard(),
            active: Vec::with_capacity(32),
            captured: Vec::new(),
        };

        let back = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        // row 7 = rank 1, row 0 = rank 8
        for (color, back_row, pawn_row) in [(Color::White, 7, 6), (Color::Black, 0, 1)] {
            for (f, &kind) in back.iter().enumerate() {
                let id = p
                    .board
                    .put(Piece::new(color, kind), GridPos::new(back_row, f as i8));
                p.active.push(id);
            }
            for f in 0..8 {
                let id = p
                    .board
                    .put(Piece::new(color, PieceKind::Pawn), GridPos::new(pawn_row, f));
                p.active.push(id);
            }
        }
        p
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Pieces currently on the board.
    pub fn active(&self) -> &[PieceId] {
        &self.active
    }

    /// Pieces removed by captures, oldest first.
    pub fn captured(&self) -> &[PieceId] {
        &self.captured
    }

    /// Put a new piece into play.
    pub fn add_piece(&mut self, piece: Piece, pos: GridPos) -> ChessResult<PieceId> {
        if self.board.has_piece(pos)? {
            return Err(BoardError::Occupied {
                row: pos.row,
                column: pos.column,
            }
            .into());
        }
        let id = self.board.spawn(piece);
        self.board.place(id, pos)?;
        self.active.push(id);
        Ok(id)
    }

    /// Take the piece on `pos` out of play without counting it as captured.
    pub(crate) fn retire(&mut self, pos: GridPos) -> ChessResult<PieceId> {
        let id = self
            .board
            .remove(pos)?
            .ok_or_else(|| corrupted(format!("no piece to retire on {pos}")))?;
        self.active.retain(|&a| a != id);
        Ok(id)
    }

    pub fn king(&self, color: Color) -> ChessResult<PieceId> {
        self.active
            .iter()
            .copied()
            .find(|&id| {
                let pc = self.board.piece(id);
                pc.kind() == PieceKind::King && pc.color() == color
            })
            .ok_or_else(|| corrupted(format!("there is no {color} king on the board")))
    }

    pub fn in_check(&self, color: Color) -> ChessResult<bool> {
        let king = self.king(color)?;
        let ksq = self
            .board
            .piece(king)
            .position()
            .ok_or_else(|| corrupted(format!("{color} king is in play but off the board")))?;
        Ok(is_square_attacked(&self.board, ksq, color.other()))
    }

    pub fn moves_for(&self, id: PieceId, ctx: MoveContext) -> SquareSet {
        possible_moves(&self.board, id, ctx)
    }

    fn capture_at(&mut self, pos: GridPos) -> ChessResult<Option<Capture>> {
        let Some(id) = self.board.remove(pos)? else {
            return Ok(None);
        };
        let active_index = self
            .active
            .iter()
            .position(|&a| a == id)
            .ok_or_else(|| corrupted(format!("piece on {pos} is not in play")))?;
        self.active.remove(active_index);
        self.captured.push(id);
        Ok(Some(Capture {
            piece: id,
            at: pos,
            active_index,
        }))
    }

    fn relocate(&mut self, from: GridPos, to: GridPos) -> ChessResult<PieceId> {
        let id = self
            .board
            .remove(from)?
            .ok_or_else(|| corrupted(format!("no piece to move on {from}")))?;
        self.board.place(id, to)?;
        Ok(id)
    }

    /// Execute a move without any legality check.
    ///
    /// Handles captures, the castling rook and en-passant removal, and bumps
    /// the move counters of every piece that moved.
    pub fn make_move(&mut self, from: GridPos, to: GridPos) -> ChessResult<Undo> {
        let moved = self
            .board
            .remove(from)?
            .ok_or_else(|| corrupted(format!("no piece to move on {from}")))?;
        let mut captured = self.capture_at(to)?;
        self.board.place(moved, to)?;
        self.board.piece_mut(moved).increase_move_count();

        let kind = self.board.piece(moved).kind();

        // Castling rook move
        let mut rook_move = None;
        if kind == PieceKind::King && (to.column - from.column).abs() == 2 {
            // King side rook sits three files away, queen side rook four.
            let (rf, rt) = if to.column > from.column {
                (from.offset(0, 3), from.offset(0, 1))
            } else {
                (from.offset(0, -4), from.offset(0, -1))
            };
            let rook = self.relocate(rf, rt)?;
            self.board.piece_mut(rook).increase_move_count();
            rook_move = Some(RookMove {
                rook,
                from: rf,
                to: rt,
            });
        }

        // En-passant: diagonal pawn move onto an empty square
        if kind == PieceKind::Pawn && from.column != to.column && captured.is_none() {
            captured = self.capture_at(GridPos::new(from.row, to.column))?;
        }

        Ok(Undo {
            moved,
            from,
            to,
            captured,
            rook_move,
        })
    }

    /// Exact inverse of [`Position::make_move`].
    pub fn unmake_move(&mut self, undo: Undo) -> ChessResult<()> {
        if let Some(rm) = undo.rook_move {
            let rook = self.relocate(rm.to, rm.from)?;
            self.board.piece_mut(rook).decrease_move_count();
        }

        let moved = self.relocate(undo.to, undo.from)?;
        if moved != undo.moved {
            return Err(corrupted(format!("unexpected piece on {}", undo.to)));
        }
        self.board.piece_mut(moved).decrease_move_count();

        if let Some(cap) = undo.captured {
            if self.captured.last() != Some(&cap.piece) {
                return Err(corrupted("capture log out of order".to_string()));
            }
            self.captured.pop();
            self.board.place(cap.piece, cap.at)?;
            self.active.insert(cap.active_index, cap.piece);
        }
        Ok(())
    }

    /// Whether moving `from -> to` keeps the mover's king out of attack.
    /// The position is restored before returning.
    pub fn is_safe_move(&mut self, from: GridPos, to: GridPos) -> ChessResult<bool> {
        let mover = self
            .board
            .occupant(from)
            .map(|pc| pc.color())
            .ok_or_else(|| corrupted(format!("no piece to move on {from}")))?;
        let undo = self.make_move(from, to)?;
        let exposed = self.in_check(mover);
        self.unmake_move(undo)?;
        Ok(!exposed?)
    }

    /// Whether `color` has any move that leaves its king unattacked.
    pub fn has_escape(&mut self, color: Color, ctx: MoveContext) -> ChessResult<bool> {
        // Snapshot the ids: trial moves shuffle the active list.
        let pieces: Vec<PieceId> = self
            .active
            .iter()
            .copied()
            .filter(|&id| self.board.piece(id).color() == color)
            .collect();

        let mut trials = 0u32;
        for id in pieces {
            let Some(from) = self.board.piece(id).position() else {
                continue;
            };
            for to in self.moves_for(id, ctx) {
                trials += 1;
                if self.is_safe_move(from, to)? {
                    trace!(%color, trials, "escape found");
                    return Ok(true);
                }
            }
        }
        trace!(%color, trials, "no escape");
        Ok(false)
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
