//! The match state machine: turn order, move validation, special moves,
//! check and checkmate.

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{
    config::MatchConfig,
    coords::{GridPos, Square},
    error::{ChessError, ChessResult},
    fen,
    movegen::MoveContext,
    position::Position,
    snapshot::BoardSnapshot,
    square_set::SquareSet,
    types::*,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum MatchStatus {
    InProgress,
    Checkmate { winner: Color },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChessMatch {
    position: Position,
    turn: u32,
    current_player: Color,
    check: bool,
    status: MatchStatus,
    en_passant: Option<PieceId>,
    promoted: Option<PieceId>,
    config: MatchConfig,
}

impl Default for ChessMatch {
    fn default() -> Self {
        Self::new()
    }
}

fn check_config(config: &MatchConfig) -> ChessResult<()> {
    config
        .validate()
        .map_err(|_| ChessError::InvalidPromotionType(config.default_promotion.letter().to_string()))
}

impl ChessMatch {
    /// Standard initial position, white to move.
    pub fn new() -> Self {
        Self {
            position: Position::startpos(),
            turn: 1,
            current_player: Color::White,
            check: false,
            status: MatchStatus::InProgress,
            en_passant: None,
            promoted: None,
            config: MatchConfig::default(),
        }
    }

    pub fn with_config(config: MatchConfig) -> ChessResult<Self> {
        check_config(&config)?;
        Ok(Self {
            config,
            ..Self::new()
        })
    }

    /// Set up a match from a FEN record.
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        Self::from_fen_with_config(fen, MatchConfig::default())
    }

    pub fn from_fen_with_config(fen: &str, config: MatchConfig) -> ChessResult<Self> {
        check_config(&config)?;
        let setup = fen::parse(fen)?;
        let side = setup.side_to_move;

        let mut m = Self {
            position: setup.position,
            turn: setup.turn,
            current_player: side,
            check: false,
            status: MatchStatus::InProgress,
            en_passant: setup.en_passant,
            promoted: None,
            config,
        };

        if m.position.in_check(side.other())? {
            return Err(ChessError::InvalidFen(format!(
                "{} is in check but it is {side}'s move",
                side.other()
            )));
        }
        m.check = m.position.in_check(side)?;
        let ctx = m.ctx();
        if m.check && !m.position.has_escape(side, ctx)? {
            m.status = MatchStatus::Checkmate {
                winner: side.other(),
            };
        }
        Ok(m)
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn is_check(&self) -> bool {
        self.check
    }

    pub fn is_checkmate(&self) -> bool {
        matches!(self.status, MatchStatus::Checkmate { .. })
    }

    pub fn status(&self) -> MatchStatus {
        self.status
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The pawn that may be captured en passant on this half-move.
    pub fn en_passant_vulnerable(&self) -> Option<&TrackedPiece> {
        self.en_passant.map(|id| self.position.board().piece(id))
    }

    /// The piece produced by the last move's promotion, if any.
    pub fn promoted(&self) -> Option<&TrackedPiece> {
        self.promoted.map(|id| self.position.board().piece(id))
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position
            .board()
            .occupant(square.to_grid_pos())
            .map(TrackedPiece::piece)
    }

    pub fn board_snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::of(self.position.board())
    }

    /// Pieces taken so far, oldest first.
    pub fn captured_pieces(&self) -> Vec<Piece> {
        let board = self.position.board();
        self.position
            .captured()
            .iter()
            .map(|&id| board.piece(id).piece())
            .collect()
    }

    pub fn pieces_on_board(&self) -> Vec<Piece> {
        let board = self.position.board();
        self.position
            .active()
            .iter()
            .map(|&id| board.piece(id).piece())
            .collect()
    }

    /// Squares the piece on `source` can reach.
    ///
    /// Moves that would leave the mover's king attacked are included unless
    /// `filter_self_check` is set; [`ChessMatch::perform_move`] rejects them
    /// either way.
    pub fn possible_moves(&self, source: Square) -> ChessResult<SquareSet> {
        let (from, moves) = self.validate_source(source)?;
        if self.config.filter_self_check {
            self.safe_subset(from, moves)
        } else {
            Ok(moves)
        }
    }

    /// Squares the piece on `source` can reach without exposing its king.
    pub fn legal_moves(&self, source: Square) -> ChessResult<SquareSet> {
        let (from, moves) = self.validate_source(source)?;
        self.safe_subset(from, moves)
    }

    /// Every legal `(source, target)` pair for the side to move. Empty once
    /// the match is over.
    pub fn legal_move_list(&self) -> ChessResult<Vec<(Square, Square)>> {
        if self.status != MatchStatus::InProgress {
            return Ok(Vec::new());
        }
        let board = self.position.board();
        let mut out = Vec::new();
        for &id in self.position.active() {
            let pc = board.piece(id);
            if pc.color() != self.current_player {
                continue;
            }
            let Some(from) = pc.position() else {
                continue;
            };
            let moves = self.position.moves_for(id, self.ctx());
            let source = Square::from_grid_pos(from)?;
            for to in self.safe_subset(from, moves)? {
                out.push((source, Square::from_grid_pos(to)?));
            }
        }
        Ok(out)
    }

    /// Move the piece on `source` to `target`, returning the piece captured,
    /// if any. A rejected move leaves the match unchanged.
    pub fn perform_move(&mut self, source: Square, target: Square) -> ChessResult<Option<Piece>> {
        let result = self.try_move(source, target);
        match &result {
            Ok(captured) => debug!(%source, %target, ?captured, turn = self.turn, "move accepted"),
            Err(err) if err.is_fatal() => {}
            Err(err) => debug!(%source, %target, reason = %err, "move rejected"),
        }
        result
    }

    fn try_move(&mut self, source: Square, target: Square) -> ChessResult<Option<Piece>> {
        if self.status != MatchStatus::InProgress {
            return Err(ChessError::GameOver);
        }
        let (from, moves) = self.validate_source(source)?;
        let to = target.to_grid_pos();
        if !moves.contains(to) {
            return Err(ChessError::IllegalTarget {
                from: source,
                to: target,
            });
        }

        let mover = self.current_player;
        let undo = self.position.make_move(from, to)?;
        if self.position.in_check(mover)? {
            self.position.unmake_move(undo)?;
            return Err(ChessError::SelfCheck);
        }

        let board = self.position.board();
        let captured = undo.captured.as_ref().map(|c| board.piece(c.piece).piece());
        let moved = board.piece(undo.moved);
        let is_pawn = moved.kind() == PieceKind::Pawn;

        self.promoted = None;
        if is_pawn && to.row == self.last_row(mover) {
            self.promoted = Some(undo.moved);
            let kind = self.config.default_promotion;
            self.swap_promoted(kind)?;
            info!(%target, kind = ?kind, "pawn promoted");
        }

        self.en_passant = (is_pawn && (to.row - from.row).abs() == 2).then_some(undo.moved);

        self.settle(mover)?;
        Ok(captured)
    }

    /// Replace the piece from the last promotion with one of `B`, `N`, `R`
    /// or `Q` (either case).
    pub fn replace_promoted_piece(&mut self, code: &str) -> ChessResult<Piece> {
        if self.promoted.is_none() {
            return Err(ChessError::NoPendingPromotion);
        }
        let kind = PieceKind::from_promotion_code(code)
            .ok_or_else(|| ChessError::InvalidPromotionType(code.to_string()))?;
        self.promote_to(kind)
    }

    pub fn promote_to(&mut self, kind: PieceKind) -> ChessResult<Piece> {
        let Some(id) = self.promoted else {
            return Err(ChessError::NoPendingPromotion);
        };
        if !kind.is_promotion_target() {
            return Err(ChessError::InvalidPromotionType(kind.letter().to_string()));
        }
        let mover = self.position.board().piece(id).color();

        // Undo the previous settlement, then settle again with the new piece.
        match self.status {
            MatchStatus::InProgress => self.prev_turn(),
            MatchStatus::Checkmate { .. } => self.status = MatchStatus::InProgress,
        }
        let piece = self.swap_promoted(kind)?;
        info!(kind = ?kind, %mover, "promotion replaced");
        self.settle(mover)?;
        Ok(piece)
    }

    fn ctx(&self) -> MoveContext {
        MoveContext {
            en_passant: self.en_passant,
        }
    }

    /// Resolve `source` to a piece of the side to move with at least one
    /// possible move.
    fn validate_source(&self, source: Square) -> ChessResult<(GridPos, SquareSet)> {
        let from = source.to_grid_pos();
        let board = self.position.board();
        let id = board.piece_at(from)?.ok_or(ChessError::EmptySource(source))?;
        if board.piece(id).color() != self.current_player {
            return Err(ChessError::WrongOwner(source));
        }
        let moves = self.position.moves_for(id, self.ctx());
        if moves.is_empty() {
            return Err(ChessError::NoLegalMoves(source));
        }
        Ok((from, moves))
    }

    /// The members of `moves` that keep the mover's king safe, tried on a
    /// scratch copy of the position.
    fn safe_subset(&self, from: GridPos, moves: SquareSet) -> ChessResult<SquareSet> {
        let mut scratch = self.position.clone();
        let mut safe = SquareSet::EMPTY;
        for to in moves {
            if scratch.is_safe_move(from, to)? {
                safe.insert(to);
            }
        }
        Ok(safe)
    }

    /// Swap the pending promoted piece for a fresh `kind` on the same square.
    fn swap_promoted(&mut self, kind: PieceKind) -> ChessResult<Piece> {
        let id = self.promoted.ok_or(ChessError::NoPendingPromotion)?;
        let old = self.position.board().piece(id);
        let color = old.color();
        let Some(at) = old.position() else {
            error!(%color, "promoted piece is off the board");
            return Err(ChessError::InvariantViolation(
                "promoted piece is off the board".to_string(),
            ));
        };
        self.position.retire(at)?;
        let piece = Piece::new(color, kind);
        self.promoted = Some(self.position.add_piece(piece, at)?);
        Ok(piece)
    }

    /// Check and checkmate detection after `mover` has moved; passes the turn
    /// unless the opponent is mated.
    fn settle(&mut self, mover: Color) -> ChessResult<()> {
        let opponent = mover.other();
        self.check = self.position.in_check(opponent)?;
        if self.check {
            info!(%opponent, turn = self.turn, "check");
            let ctx = self.ctx();
            if !self.position.has_escape(opponent, ctx)? {
                self.status = MatchStatus::Checkmate { winner: mover };
                info!(winner = %mover, turn = self.turn, "checkmate");
                return Ok(());
            }
        }
        self.next_turn();
        Ok(())
    }

    fn next_turn(&mut self) {
        self.turn += 1;
        self.current_player = self.current_player.other();
    }

    fn prev_turn(&mut self) {
        self.turn -= 1;
        self.current_player = self.current_player.other();
    }

    fn last_row(&self, color: Color) -> i8 {
        match color {
            Color::White => 0,
            Color::Black => self.position.board().rows() as i8 - 1,
        }
    }
}

#[cfg(test)]
#[path = "game_tests.rs"]
mod game_tests;
