//! Chess rules engine: board, move generation, and a match state machine
//! that validates and executes moves and detects check and checkmate.
//!
//! ```no_run
//! use chess_match::{ChessMatch, Square};
//!
//! let mut game = ChessMatch::new();
//! let e2: Square = "e2".parse().unwrap();
//! let e4: Square = "e4".parse().unwrap();
//! game.perform_move(e2, e4).unwrap();
//! assert_eq!(game.turn(), 2);
//! ```

pub mod board;
pub mod config;
pub mod coords;
pub mod error;
pub mod fen;
pub mod game;
pub mod movegen;
pub mod position;
pub mod snapshot;
pub mod square_set;
pub mod types;

pub use board::*;
pub use config::MatchConfig;
pub use coords::*;
pub use error::*;
pub use fen::{FenSetup, STARTPOS};
pub use game::*;
pub use movegen::{MoveContext, is_square_attacked, possible_moves, threatened_squares};
pub use position::*;
pub use snapshot::BoardSnapshot;
pub use square_set::SquareSet;
pub use types::*;
