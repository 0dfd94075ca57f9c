//! Error types for the rules engine.
//!
//! Every variant except [`ChessError::InvariantViolation`] is a recoverable
//! rule error: the rejected operation leaves the match untouched.

use thiserror::Error;

use crate::coords::Square;
use crate::types::PieceKind;

/// Failures of the raw occupancy grid.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("position ({row}, {column}) is not on the board")]
    OutOfBounds { row: i8, column: i8 },

    #[error("there is already a piece on position ({row}, {column})")]
    Occupied { row: i8, column: i8 },

    #[error("invalid board size {rows}x{columns}: each side must be between 1 and 8")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("piece is already placed on the board")]
    AlreadyPlaced,

    #[error("expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },
}

/// Errors raised by match operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("invalid square {0:?}: valid values are a1 to h8")]
    InvalidSquare(String),

    #[error("there is no piece on source square {0}")]
    EmptySource(Square),

    #[error("the piece on {0} belongs to the other player")]
    WrongOwner(Square),

    #[error("the piece on {0} has no possible moves")]
    NoLegalMoves(Square),

    #[error("the piece on {from} can't move to {to}")]
    IllegalTarget { from: Square, to: Square },

    #[error("the move would leave your own king in check")]
    SelfCheck,

    #[error("the match is over")]
    GameOver,

    #[error("there is no piece awaiting promotion")]
    NoPendingPromotion,

    #[error("invalid promotion type {0:?}: expected B, N, R or Q")]
    InvalidPromotionType(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// The match is corrupted (e.g. a king vanished). Not a rule error.
    #[error("match invariant violated: {0}")]
    InvariantViolation(String),
}

impl ChessError {
    /// True when the error signals a corrupted match rather than a rejected move.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ChessError::InvariantViolation(_))
    }
}

/// Result type alias for match operations
pub type ChessResult<T> = Result<T, ChessError>;

/// Errors loading a [`MatchConfig`](crate::MatchConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0:?} is not a valid promotion piece")]
    InvalidPromotion(PieceKind),
}
