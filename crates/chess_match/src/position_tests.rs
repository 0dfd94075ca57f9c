use super::*;
use crate::coords::Square;

fn pos(s: &str) -> GridPos {
    s.parse::<Square>().unwrap().to_grid_pos()
}

fn with_pieces(pieces: &[(&str, Color, PieceKind)]) -> Position {
    let mut p = Position::empty(8, 8).unwrap();
    for &(sq, color, kind) in pieces {
        p.add_piece(Piece::new(color, kind), pos(sq)).unwrap();
    }
    p
}

use Color::{Black, White};
use PieceKind::*;

#[test]
fn test_startpos_layout() {
    let p = Position::startpos();
    assert_eq!(p.active().len(), 32);
    assert!(p.captured().is_empty());

    let e1 = p.board().occupant(pos("e1")).unwrap();
    assert_eq!(e1.piece(), Piece::new(White, King));
    let d8 = p.board().occupant(pos("d8")).unwrap();
    assert_eq!(d8.piece(), Piece::new(Black, Queen));
    for row in 2..6 {
        for column in 0..8 {
            assert!(!p.board().has_piece(GridPos::new(row, column)).unwrap());
        }
    }
}

#[test]
fn test_make_unmake_quiet_move() {
    let mut p = Position::startpos();
    let before = p.clone();

    let undo = p.make_move(pos("g1"), pos("f3")).unwrap();
    let knight = p.board().occupant(pos("f3")).unwrap();
    assert_eq!(knight.move_count(), 1);
    assert!(undo.captured.is_none());

    p.unmake_move(undo).unwrap();
    assert_eq!(p, before);
}

#[test]
fn test_make_unmake_capture_restores_active_order() {
    let mut p = with_pieces(&[
        ("e1", White, King),
        ("e8", Black, King),
        ("a1", White, Rook),
        ("a7", Black, Pawn),
        ("h7", Black, Pawn),
    ]);
    let before = p.clone();

    let undo = p.make_move(pos("a1"), pos("a7")).unwrap();
    assert_eq!(p.active().len(), 4);
    assert_eq!(p.captured().len(), 1);
    let cap = undo.captured.clone().unwrap();
    assert_eq!(cap.at, pos("a7"));

    p.unmake_move(undo).unwrap();
    assert_eq!(p, before);
}

#[test]
fn test_castling_moves_rook_and_undoes() {
    let mut p = with_pieces(&[
        ("e1", White, King),
        ("h1", White, Rook),
        ("a1", White, Rook),
        ("e8", Black, King),
    ]);
    let before = p.clone();

    let undo = p.make_move(pos("e1"), pos("g1")).unwrap();
    let rook = p.board().occupant(pos("f1")).unwrap();
    assert_eq!(rook.kind(), Rook);
    assert_eq!(rook.move_count(), 1);
    assert!(p.board().occupant(pos("h1")).is_none());
    p.unmake_move(undo).unwrap();
    assert_eq!(p, before);

    let undo = p.make_move(pos("e1"), pos("c1")).unwrap();
    assert_eq!(p.board().occupant(pos("d1")).unwrap().kind(), Rook);
    assert!(p.board().occupant(pos("a1")).is_none());
    p.unmake_move(undo).unwrap();
    assert_eq!(p, before);
}

#[test]
fn test_en_passant_capture_removes_passed_pawn() {
    let mut p = with_pieces(&[
        ("e1", White, King),
        ("e8", Black, King),
        ("e5", White, Pawn),
        ("d5", Black, Pawn),
    ]);
    let before = p.clone();

    let undo = p.make_move(pos("e5"), pos("d6")).unwrap();
    assert!(p.board().occupant(pos("d5")).is_none());
    assert_eq!(undo.captured.as_ref().unwrap().at, pos("d5"));
    assert_eq!(p.active().len(), 3);

    p.unmake_move(undo).unwrap();
    assert_eq!(p, before);
}

#[test]
fn test_in_check() {
    let p = with_pieces(&[
        ("e1", White, King),
        ("e8", Black, King),
        ("e4", Black, Rook),
    ]);
    assert!(p.in_check(White).unwrap());
    assert!(!p.in_check(Black).unwrap());
}

#[test]
fn test_missing_king_is_fatal() {
    let p = with_pieces(&[("e1", White, King)]);
    let err = p.in_check(Black).unwrap_err();
    assert!(err.is_fatal());
    assert!(!ChessError::SelfCheck.is_fatal());
}

#[test]
fn test_safe_move_trial_restores_position() {
    let mut p = with_pieces(&[
        ("e1", White, King),
        ("e2", White, Bishop),
        ("e8", Black, Rook),
        ("a8", Black, King),
    ]);
    let before = p.clone();
    // pinned bishop
    assert!(!p.is_safe_move(pos("e2"), pos("d3")).unwrap());
    assert!(p.is_safe_move(pos("e1"), pos("d1")).unwrap());
    assert_eq!(p, before);
}

#[test]
fn test_has_escape() {
    // Back-rank mate: no escape for black
    let mut mated = with_pieces(&[
        ("g8", Black, King),
        ("f7", Black, Pawn),
        ("g7", Black, Pawn),
        ("h7", Black, Pawn),
        ("a8", White, Rook),
        ("e1", White, King),
    ]);
    assert!(mated.in_check(Black).unwrap());
    assert!(!mated.has_escape(Black, MoveContext::default()).unwrap());

    // Same, but the h-pawn has stepped forward: the king can run
    let mut loose = with_pieces(&[
        ("g8", Black, King),
        ("f7", Black, Pawn),
        ("g7", Black, Pawn),
        ("h6", Black, Pawn),
        ("a8", White, Rook),
        ("e1", White, King),
    ]);
    assert!(loose.has_escape(Black, MoveContext::default()).unwrap());
}
