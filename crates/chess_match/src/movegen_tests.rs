use super::*;
use crate::coords::Square;

fn pos(s: &str) -> GridPos {
    s.parse::<Square>().unwrap().to_grid_pos()
}

fn set(squares: &[&str]) -> SquareSet {
    squares.iter().map(|s| pos(s)).collect()
}

/// Empty 8x8 board with the given pieces placed.
fn setup(pieces: &[(&str, Color, PieceKind)]) -> (Board, Vec<PieceId>) {
    let mut board = Board::new(8, 8).unwrap();
    let ids = pieces
        .iter()
        .map(|&(sq, color, kind)| {
            let id = board.spawn(Piece::new(color, kind));
            board.place(id, pos(sq)).unwrap();
            id
        })
        .collect();
    (board, ids)
}

use Color::{Black, White};
use PieceKind::*;

#[test]
fn test_knight_moves() {
    let (board, ids) = setup(&[("e4", White, Knight)]);
    assert_eq!(possible_moves(&board, ids[0], MoveContext::default()).len(), 8);

    let (board, ids) = setup(&[("a1", White, Knight)]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["b3", "c2"])
    );
}

#[test]
fn test_knight_blocked_by_own_piece_only() {
    let (board, ids) = setup(&[
        ("b1", White, Knight),
        ("c3", White, Pawn),
        ("a3", Black, Pawn),
    ]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["a3", "d2"])
    );
}

#[test]
fn test_rook_and_bishop_on_empty_board() {
    let (board, ids) = setup(&[("e4", White, Rook), ("a8", White, Bishop)]);
    assert_eq!(possible_moves(&board, ids[0], MoveContext::default()).len(), 14);
    // a8 bishop sees the long diagonal down to h1 (e4 is the rook, own piece)
    assert_eq!(
        possible_moves(&board, ids[1], MoveContext::default()),
        set(&["b7", "c6", "d5"])
    );
}

#[test]
fn test_slider_captures_then_stops() {
    let (board, ids) = setup(&[
        ("a1", White, Rook),
        ("a4", Black, Knight),
        ("c1", White, Bishop),
    ]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["a2", "a3", "a4", "b1"])
    );
}

#[test]
fn test_queen_is_union_of_rook_and_bishop() {
    let (board, ids) = setup(&[("d4", White, Queen)]);
    assert_eq!(possible_moves(&board, ids[0], MoveContext::default()).len(), 27);
}

#[test]
fn test_pawn_pushes() {
    let (mut board, ids) = setup(&[("e2", White, Pawn), ("d7", Black, Pawn)]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["e3", "e4"])
    );
    assert_eq!(
        possible_moves(&board, ids[1], MoveContext::default()),
        set(&["d6", "d5"])
    );

    board.piece_mut(ids[0]).increase_move_count();
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["e3"])
    );
}

#[test]
fn test_pawn_double_step_needs_both_squares_empty() {
    let (board, ids) = setup(&[("e2", White, Pawn), ("e3", Black, Knight)]);
    assert!(possible_moves(&board, ids[0], MoveContext::default()).is_empty());

    let (board, ids) = setup(&[("e2", White, Pawn), ("e4", Black, Knight)]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["e3"])
    );
}

#[test]
fn test_pawn_captures_diagonally() {
    let (board, ids) = setup(&[
        ("e4", White, Pawn),
        ("d5", Black, Pawn),
        ("f5", White, Knight),
        ("e5", Black, Rook),
    ]);
    assert_eq!(
        possible_moves(&board, ids[0], MoveContext::default()),
        set(&["d5"])
    );
}

#[test]
fn test_en_passant_needs_context() {
    let (board, ids) = setup(&[("e5", White, Pawn), ("d5", Black, Pawn)]);
    let white = ids[0];
    let black = ids[1];
    // e5 pawn has moved before reaching e5
    let mut board = board;
    board.piece_mut(white).set_move_count(2);

    assert_eq!(
        possible_moves(&board, white, MoveContext::default()),
        set(&["e6"])
    );
    let ctx = MoveContext {
        en_passant: Some(black),
    };
    assert_eq!(possible_moves(&board, white, ctx), set(&["e6", "d6"]));
}

#[test]
fn test_black_en_passant() {
    let (mut board, ids) = setup(&[("d4", Black, Pawn), ("e4", White, Pawn)]);
    board.piece_mut(ids[0]).set_move_count(2);
    let ctx = MoveContext {
        en_passant: Some(ids[1]),
    };
    assert_eq!(possible_moves(&board, ids[0], ctx), set(&["d3", "e3"]));
}

#[test]
fn test_king_steps_without_self_check_filter() {
    // f2 is covered by the black rook, yet still listed
    let (board, ids) = setup(&[("e1", White, King), ("f8", Black, Rook)]);
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(moves.contains(pos("f2")));
    assert_eq!(moves.len(), 5);
}

#[test]
fn test_castling_both_sides() {
    let (board, ids) = setup(&[
        ("e1", White, King),
        ("a1", White, Rook),
        ("h1", White, Rook),
    ]);
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(moves.contains(pos("g1")));
    assert!(moves.contains(pos("c1")));
}

#[test]
fn test_castling_blocked_by_piece_between() {
    let (board, ids) = setup(&[
        ("e1", White, King),
        ("a1", White, Rook),
        ("b1", White, Knight),
        ("h1", White, Rook),
    ]);
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(moves.contains(pos("g1")));
    assert!(!moves.contains(pos("c1")));
}

#[test]
fn test_castling_refused_through_attacked_square() {
    let (board, ids) = setup(&[
        ("e1", White, King),
        ("a1", White, Rook),
        ("h1", White, Rook),
        ("f8", Black, Rook),
    ]);
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(!moves.contains(pos("g1")));
    assert!(moves.contains(pos("c1")));
}

#[test]
fn test_castling_refused_in_check_or_after_moving() {
    let (board, ids) = setup(&[
        ("e8", Black, King),
        ("h8", Black, Rook),
        ("e1", White, Rook),
    ]);
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(!moves.contains(pos("g8")));

    let (mut board, ids) = setup(&[("e8", Black, King), ("h8", Black, Rook)]);
    board.piece_mut(ids[1]).increase_move_count();
    let moves = possible_moves(&board, ids[0], MoveContext::default());
    assert!(!moves.contains(pos("g8")));

    board.piece_mut(ids[1]).decrease_move_count();
    assert!(possible_moves(&board, ids[0], MoveContext::default()).contains(pos("g8")));
    board.piece_mut(ids[0]).increase_move_count();
    assert!(!possible_moves(&board, ids[0], MoveContext::default()).contains(pos("g8")));
}

#[test]
fn test_queen_side_b_file_may_be_attacked() {
    // Only the squares the king crosses matter; b1 under attack is fine.
    let (board, ids) = setup(&[
        ("e1", White, King),
        ("a1", White, Rook),
        ("b8", Black, Rook),
    ]);
    assert!(possible_moves(&board, ids[0], MoveContext::default()).contains(pos("c1")));
}

#[test]
fn test_pawn_threats() {
    let (board, ids) = setup(&[("e2", White, Pawn), ("a7", Black, Pawn)]);
    assert_eq!(threatened_squares(&board, ids[0]), set(&["d3", "f3"]));
    assert_eq!(threatened_squares(&board, ids[1]), set(&["b6"]));
}

#[test]
fn test_square_attacked() {
    let (board, _) = setup(&[
        ("e1", White, King),
        ("d8", Black, Rook),
        ("d5", Black, Pawn),
    ]);
    assert!(is_square_attacked(&board, pos("d6"), Black));
    assert!(!is_square_attacked(&board, pos("d1"), Black));
    assert!(is_square_attacked(&board, pos("e4"), Black));
    assert!(!is_square_attacked(&board, pos("d4"), Black)); // pawn push, rook blocked by own pawn
    assert!(is_square_attacked(&board, pos("e2"), White));
    assert!(!is_square_attacked(&board, pos("g1"), White));
}
