//! Per-piece move generation.
//!
//! Generated sets are "possible" moves: they respect occupancy, board edges and
//! the castling/en-passant preconditions, but never test whether the mover's
//! own king ends up attacked. That filter runs once, in the match engine.

use crate::{board::Board, coords::GridPos, square_set::SquareSet, types::*};

pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, 2),
    (-2, 1),
    (1, -2),
    (2, -1),
    (-1, -2),
    (-2, -1),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (1, 1),
    (1, 0),
    (1, -1),
    (0, 1),
    (0, -1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

pub const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Match state a piece may consult while generating moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveContext {
    /// The pawn that double-stepped on the previous half-move, if any.
    pub en_passant: Option<PieceId>,
}

/// Squares the piece `id` can move to. Empty for a piece not on the board.
pub fn possible_moves(board: &Board, id: PieceId, ctx: MoveContext) -> SquareSet {
    let pc = board.piece(id);
    let Some(from) = pc.position() else {
        return SquareSet::EMPTY;
    };
    let c = pc.color();
    match pc.kind() {
        PieceKind::Pawn => gen_pawn(board, from, c, pc.move_count(), ctx),
        PieceKind::Knight => gen_steps(board, from, c, &KNIGHT_DELTAS),
        PieceKind::Bishop => gen_slider(board, from, c, &DIAGONALS),
        PieceKind::Rook => gen_slider(board, from, c, &ORTHOGONALS),
        PieceKind::Queen => {
            gen_slider(board, from, c, &DIAGONALS) | gen_slider(board, from, c, &ORTHOGONALS)
        }
        PieceKind::King => gen_steps(board, from, c, &KING_DELTAS) | gen_castle(board, from, pc),
    }
}

/// Squares the piece `id` attacks.
///
/// Same as its possible moves except for pawns, which threaten both forward
/// diagonals whatever stands there and never their push squares, and kings,
/// which threaten only their neighbours (castling is not an attack).
pub fn threatened_squares(board: &Board, id: PieceId) -> SquareSet {
    let pc = board.piece(id);
    let Some(from) = pc.position() else {
        return SquareSet::EMPTY;
    };
    match pc.kind() {
        PieceKind::Pawn => {
            let dir = pc.color().forward();
            [from.offset(dir, -1), from.offset(dir, 1)]
                .into_iter()
                .filter(|&to| board.position_exists(to))
                .collect()
        }
        PieceKind::King => gen_steps(board, from, pc.color(), &KING_DELTAS),
        _ => possible_moves(board, id, MoveContext::default()),
    }
}

/// Whether any piece of color `by` attacks `target`.
pub fn is_square_attacked(board: &Board, target: GridPos, by: Color) -> bool {
    board
        .occupants()
        .any(|(_, id)| board.piece(id).color() == by && threatened_squares(board, id).contains(target))
}

fn is_empty(board: &Board, pos: GridPos) -> bool {
    matches!(board.piece_at(pos), Ok(None))
}

fn gen_pawn(board: &Board, from: GridPos, c: Color, move_count: u32, ctx: MoveContext) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    let dir = c.forward();

    // forward 1, then forward 2 on the pawn's first move
    let one = from.offset(dir, 0);
    if is_empty(board, one) {
        out.insert(one);
        let two = from.offset(2 * dir, 0);
        if move_count == 0 && is_empty(board, two) {
            out.insert(two);
        }
    }

    // captures + en-passant
    for dc in [-1, 1] {
        let to = from.offset(dir, dc);
        if let Some(pc) = board.occupant(to)
            && pc.color() != c
        {
            out.insert(to);
        }

        let beside = from.offset(0, dc);
        if let Some(victim) = ctx.en_passant
            && matches!(board.piece_at(beside), Ok(Some(id)) if id == victim)
            && board.piece(victim).color() != c
            && is_empty(board, to)
        {
            out.insert(to);
        }
    }
    out
}

fn gen_steps(board: &Board, from: GridPos, c: Color, deltas: &[(i8, i8)]) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    for &(dr, dc) in deltas {
        let to = from.offset(dr, dc);
        if !board.position_exists(to) {
            continue;
        }
        match board.occupant(to) {
            None => out.insert(to),
            Some(pc) if pc.color() != c => out.insert(to),
            _ => {}
        }
    }
    out
}

fn gen_slider(board: &Board, from: GridPos, c: Color, dirs: &[(i8, i8)]) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    for &(dr, dc) in dirs {
        let mut to = from.offset(dr, dc);
        while board.position_exists(to) {
            match board.occupant(to) {
                None => out.insert(to),
                Some(pc) if pc.color() != c => {
                    out.insert(to);
                    break;
                }
                _ => break,
            }
            to = to.offset(dr, dc);
        }
    }
    out
}

/// Castling destinations: two files toward a never-moved rook standing three
/// (king side) or four (queen side) files away.
fn gen_castle(board: &Board, from: GridPos, king: &TrackedPiece) -> SquareSet {
    let mut out = SquareSet::EMPTY;
    if king.has_moved() {
        return out;
    }

    // Can't castle out of check.
    let enemy = king.color().other();
    if is_square_attacked(board, from, enemy) {
        return out;
    }

    for (rook_dc, step) in [(3i8, 1i8), (-4, -1)] {
        let Some(rook) = board.occupant(from.offset(0, rook_dc)) else {
            continue;
        };
        if rook.kind() != PieceKind::Rook || rook.color() != king.color() || rook.has_moved() {
            continue;
        }
        let path_clear = (1..rook_dc.abs()).all(|i| is_empty(board, from.offset(0, step * i)));
        // The king crosses one square and lands on the next; neither may be attacked.
        let path_safe =
            (1..=2).all(|i| !is_square_attacked(board, from.offset(0, step * i), enemy));
        if path_clear && path_safe {
            out.insert(from.offset(0, 2 * step));
        }
    }
    out
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
