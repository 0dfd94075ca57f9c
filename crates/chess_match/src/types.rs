use serde::{Deserialize, Serialize};

use crate::coords::GridPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
    /// Row delta of a pawn advance. White starts on the high rows and walks toward row 0.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Uppercase letter used by boards and promotion prompts.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }

    /// Kinds a pawn may turn into on the last rank.
    pub fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Parses a promotion code (`B`, `N`, `R`, `Q`, either case).
    pub fn from_promotion_code(code: &str) -> Option<PieceKind> {
        match code.trim() {
            "q" | "Q" => Some(PieceKind::Queen),
            "r" | "R" => Some(PieceKind::Rook),
            "b" | "B" => Some(PieceKind::Bishop),
            "n" | "N" => Some(PieceKind::Knight),
            _ => None,
        }
    }
}

/// A piece as a value: what it is and who owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Board letter, uppercase for white and lowercase for black.
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => self.kind.letter(),
            Color::Black => self.kind.letter().to_ascii_lowercase(),
        }
    }
}

/// Handle of a piece inside a [`Board`](crate::Board) arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub(crate) usize);

/// A piece with identity: where it stands and how often it has moved.
///
/// The position is written only by the board when the piece is placed or
/// removed; the move counter only by move execution and its undo.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackedPiece {
    piece: Piece,
    position: Option<GridPos>,
    move_count: u32,
}

impl TrackedPiece {
    pub(crate) fn new(piece: Piece) -> Self {
        Self {
            piece,
            position: None,
            move_count: 0,
        }
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }
    pub fn color(&self) -> Color {
        self.piece.color
    }
    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }
    pub fn position(&self) -> Option<GridPos> {
        self.position
    }
    pub fn move_count(&self) -> u32 {
        self.move_count
    }
    pub fn has_moved(&self) -> bool {
        self.move_count > 0
    }

    pub(crate) fn set_position(&mut self, position: Option<GridPos>) {
        self.position = position;
    }
    pub(crate) fn set_move_count(&mut self, count: u32) {
        self.move_count = count;
    }
    pub(crate) fn increase_move_count(&mut self) {
        self.move_count += 1;
    }
    pub(crate) fn decrease_move_count(&mut self) {
        self.move_count = self.move_count.saturating_sub(1);
    }
}
