//! Position setup from FEN.
//!
//! FEN does not record move counters, so they are derived: pawns on their
//! starting rank, and kings or rooks on their home squares with the matching
//! castling right, count as unmoved; every other pawn, king or rook has moved
//! once.

use crate::{
    coords::{GridPos, Square},
    error::{ChessError, ChessResult},
    position::Position,
    types::*,
};

pub const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// A parsed FEN record.
#[derive(Clone, Debug)]
pub struct FenSetup {
    pub position: Position,
    pub side_to_move: Color,
    /// Half-move number, starting at 1 for white's first move.
    pub turn: u32,
    /// The pawn that just double-stepped.
    pub en_passant: Option<PieceId>,
}

fn invalid(msg: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(msg.into())
}

fn piece_from_char(c: char) -> Option<Piece> {
    let color = if c.is_ascii_uppercase() {
        Color::White
    } else {
        Color::Black
    };
    let kind = match c.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };
    Some(Piece::new(color, kind))
}

/// Parse a FEN string. Only the placement field is required; the others
/// default to `w - - 0 1`.
pub fn parse(fen: &str) -> ChessResult<FenSetup> {
    let mut parts = fen.split_whitespace();
    let placement = parts.next().ok_or_else(|| invalid("empty FEN"))?;
    let side = parts.next().unwrap_or("w");
    let castling = parts.next().unwrap_or("-");
    let ep = parts.next().unwrap_or("-");
    let _halfmove: u32 = parts
        .next()
        .unwrap_or("0")
        .parse()
        .map_err(|_| invalid("bad half-move clock"))?;
    let fullmove: u32 = parts
        .next()
        .unwrap_or("1")
        .parse()
        .map_err(|_| invalid("bad full-move number"))?;
    if fullmove == 0 {
        return Err(invalid("full-move number starts at 1"));
    }

    let side_to_move = match side {
        "w" => Color::White,
        "b" => Color::Black,
        _ => return Err(invalid(format!("bad side to move {side:?}"))),
    };

    let mut position = Position::empty(8, 8)?;
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid(format!("expected 8 ranks, found {}", ranks.len())));
    }
    for (row, rank) in ranks.iter().enumerate() {
        let mut column = 0i8;
        for c in rank.chars() {
            if let Some(skip) = c.to_digit(10) {
                if skip == 0 || column as u32 + skip > 8 {
                    return Err(invalid(format!("bad empty-square count in rank {}", 8 - row)));
                }
                column += skip as i8;
            } else {
                let piece = piece_from_char(c).ok_or_else(|| invalid(format!("bad piece {c:?}")))?;
                if column >= 8 {
                    return Err(invalid(format!("rank {} is too long", 8 - row)));
                }
                position.add_piece(piece, GridPos::new(row as i8, column))?;
                column += 1;
            }
        }
        if column != 8 {
            return Err(invalid(format!("rank {} does not span 8 files", 8 - row)));
        }
    }

    for color in [Color::White, Color::Black] {
        let kings = position
            .active()
            .iter()
            .filter(|&&id| position.board().piece(id).piece() == Piece::new(color, PieceKind::King))
            .count();
        if kings != 1 {
            return Err(invalid(format!("expected one {color} king, found {kings}")));
        }
    }

    if castling != "-" && !castling.chars().all(|c| "KQkq".contains(c)) {
        return Err(invalid(format!("bad castling field {castling:?}")));
    }
    derive_move_counts(&mut position, castling);

    let en_passant = if ep == "-" {
        None
    } else {
        let square: Square = ep.parse().map_err(|_| invalid(format!("bad en-passant square {ep:?}")))?;
        let owner = side_to_move.other();
        let expected_rank = match side_to_move {
            Color::White => 6,
            Color::Black => 3,
        };
        if square.rank() != expected_rank {
            return Err(invalid(format!("en-passant square {square} is not on rank {expected_rank}")));
        }
        let skipped = square.to_grid_pos();
        let pawn_at = skipped.offset(owner.forward(), 0);
        let board = position.board();
        let pawn = board
            .piece_at(pawn_at)
            .ok()
            .flatten()
            .filter(|&id| board.piece(id).piece() == Piece::new(owner, PieceKind::Pawn));
        if pawn.is_none() || board.has_piece(skipped)? {
            return Err(invalid(format!("no pawn can be taken en passant on {square}")));
        }
        pawn
    };

    let turn = (fullmove - 1)
        .checked_mul(2)
        .and_then(|t| t.checked_add(1 + u32::from(side_to_move == Color::Black)))
        .ok_or_else(|| invalid(format!("full-move number {fullmove} is too large")))?;

    Ok(FenSetup {
        position,
        side_to_move,
        turn,
        en_passant,
    })
}

fn derive_move_counts(position: &mut Position, castling: &str) {
    let rights = |c: char| castling.contains(c);
    let ids: Vec<PieceId> = position.active().to_vec();
    for id in ids {
        let pc = position.board().piece(id);
        let Some(at) = pc.position() else {
            continue;
        };
        let (home_row, pawn_row, kingside, queenside) = match pc.color() {
            Color::White => (7, 6, 'K', 'Q'),
            Color::Black => (0, 1, 'k', 'q'),
        };
        let unmoved = match pc.kind() {
            PieceKind::Pawn => at.row == pawn_row,
            PieceKind::King => at == GridPos::new(home_row, 4) && (rights(kingside) || rights(queenside)),
            PieceKind::Rook => {
                (at == GridPos::new(home_row, 7) && rights(kingside))
                    || (at == GridPos::new(home_row, 0) && rights(queenside))
            }
            _ => continue,
        };
        if !unmoved {
            position.board_mut().piece_mut(id).set_move_count(1);
        }
    }
}

#[cfg(test)]
#[path = "fen_tests.rs"]
mod fen_tests;
