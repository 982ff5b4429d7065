//! One game between two players: square input, promotion, clocks, game end,
//! rewind and checkpoints.
//!
//! Input is driven one square at a time through [`GameSession::submit_move`],
//! exactly as a board UI or a remote peer would produce it. Anything that is
//! not a legal continuation is answered with [`Submission::Ignored`] and leaves
//! the session untouched.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};
use uuid::Uuid;

use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::clock::{Clock, timeout_outcome};
use crate::config::{GameMode, SessionConfig};
use crate::endgame::{EndReason, checked_king, evaluate};
use crate::error::{BoardError, SnapshotError};
use crate::history::TurnHistory;
use crate::movegen::{build_turn, legal_destinations, legal_moves};
use crate::player::{GameRole, Player, PlayerProfile};
use crate::rating::{MIN_RATED_TURNS, RatingChange};
use crate::snapshot::{SessionSnapshot, SquarePayload};
use crate::turn::{ClockSnapshot, Turn};
use crate::types::{Color, Piece, PieceKind, rank_of, sq_to_coord};

/// Source of turn timestamps.
pub type TimeSource = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// What the board input is waiting for.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SelectionState {
    #[default]
    Idle,
    /// A piece is picked up; `destinations` are its legal squares.
    OneSelected { square: u8, destinations: Bitboard },
    /// A pawn reached the last rank. The turn is on the board but not yet
    /// recorded until a piece is chosen.
    AwaitingPromotion { pending: Turn },
}

/// Answer to one square of input.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Ignored,
    /// A piece was picked up; these are its legal destinations.
    Selected(Bitboard),
    Deselected,
    Moved(Turn),
    AwaitingPromotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    /// None for a draw.
    pub winner: Option<Color>,
    pub reason: EndReason,
    pub rating: Option<RatingChange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    #[default]
    InProgress,
    Ended(GameOutcome),
}

#[derive(Debug, Clone)]
struct Checkpoint {
    board: Board,
    players: [Player; 2],
    history: TurnHistory,
    status: GameStatus,
    pending: Option<Turn>,
}

pub struct GameSession {
    id: Uuid,
    config: SessionConfig,
    board: Board,
    players: [Player; 2],
    history: TurnHistory,
    clock: Clock,
    selection: SelectionState,
    status: GameStatus,
    first_mover: Color,
    started_at: DateTime<Utc>,
    checkpoint: Option<Checkpoint>,
    now: TimeSource,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("status", &self.status)
            .field("turns", &self.history.len())
            .field("current", &self.history.current())
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// New game from the standard layout. `first` takes the color the config
    /// assigns, `second` the other one.
    pub fn new(config: SessionConfig, first: PlayerProfile, second: PlayerProfile) -> Self {
        Self::with_rng(config, first, second, &mut rand::thread_rng())
    }

    /// As [`GameSession::new`], drawing a random color assignment from `rng`.
    pub fn with_rng<R: Rng>(
        config: SessionConfig,
        first: PlayerProfile,
        second: PlayerProfile,
        rng: &mut R,
    ) -> Self {
        let first_color = config.starting_color.resolve(rng);
        let (first_role, second_role) = match config.mode {
            GameMode::SingleDevice => (GameRole::Local, GameRole::Local),
            GameMode::Networked => (GameRole::Host, GameRole::Guest),
        };
        let secs = config.clock_secs;
        let a = Player::new(first, first_color, first_role, secs);
        let b = Player::new(second, first_color.other(), second_role, secs);
        let players = match first_color {
            Color::White => [a, b],
            Color::Black => [b, a],
        };

        let id = Uuid::new_v4();
        info!(game = %id, first = %first_color, tc = %config.time_control(), "new game");
        Self {
            id,
            clock: Clock::new(config.time_control()),
            config,
            board: Board::startpos(),
            players,
            history: TurnHistory::new(),
            selection: SelectionState::Idle,
            status: GameStatus::InProgress,
            first_mover: Color::White,
            started_at: Utc::now(),
            checkpoint: None,
            now: Box::new(Utc::now),
        }
    }

    /// Start from a custom layout instead. Ignored once a turn is recorded.
    pub fn with_board(mut self, board: Board) -> Self {
        if self.history.is_empty() {
            self.board = board;
        }
        self
    }

    /// Which color plays the first turn. Ignored once a turn is recorded.
    pub fn with_first_mover(mut self, color: Color) -> Self {
        if self.history.is_empty() {
            self.first_mover = color;
        }
        self
    }

    /// Replace the clock used for turn timestamps and the start time.
    pub fn with_time_source(
        mut self,
        now: impl Fn() -> DateTime<Utc> + Send + Sync + 'static,
    ) -> Self {
        self.started_at = now();
        self.now = Box::new(now);
        self
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn player(&self, c: Color) -> &Player {
        &self.players[c.idx()]
    }

    pub fn history(&self) -> &TurnHistory {
        &self.history
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn status(&self) -> &GameStatus {
        &self.status
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        match &self.status {
            GameStatus::Ended(outcome) => Some(outcome),
            GameStatus::InProgress => None,
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.status, GameStatus::Ended(_))
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Color to play at the current pointer. While a promotion is pending it
    /// is still the promoting side.
    pub fn side_to_move(&self) -> Color {
        if let Some(pending) = self.pending_promotion() {
            return pending.color();
        }
        if self.history.played().len() % 2 == 0 {
            self.first_mover
        } else {
            self.first_mover.other()
        }
    }

    /// The pawn move waiting for its promotion piece, if any.
    pub fn pending_promotion(&self) -> Option<&Turn> {
        match &self.selection {
            SelectionState::AwaitingPromotion { pending } => Some(pending),
            _ => None,
        }
    }

    /// Every legal (from, to) pair for the side to move.
    pub fn legal_moves(&self) -> Vec<(u8, u8)> {
        if self.is_ended() {
            return Vec::new();
        }
        legal_moves(&self.board, self.history.played(), self.side_to_move())
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    /// Feed one square of input: pick up a piece, put it down, or drop the
    /// selection.
    pub fn submit_move(&mut self, square: u8) -> Submission {
        if self.is_ended() || square >= 64 {
            trace!(square, "input ignored");
            return Submission::Ignored;
        }
        match self.selection.clone() {
            SelectionState::Idle => self.select(square),
            SelectionState::OneSelected {
                square: from,
                destinations,
            } => {
                if from == square {
                    debug!(square = %sq_to_coord(square), "deselected");
                    self.selection = SelectionState::Idle;
                    Submission::Deselected
                } else if destinations.contains(square) {
                    self.play(from, square)
                } else {
                    // Another own piece switches the selection; anything
                    // else keeps it
                    match self.select(square) {
                        Submission::Ignored => {
                            self.selection = SelectionState::OneSelected {
                                square: from,
                                destinations,
                            };
                            Submission::Ignored
                        }
                        selected => selected,
                    }
                }
            }
            SelectionState::AwaitingPromotion { .. } => {
                trace!(square, "input ignored while awaiting promotion");
                Submission::Ignored
            }
        }
    }

    /// Choose the piece for a pending promotion.
    pub fn promote(&mut self, kind: PieceKind) -> Submission {
        if self.is_ended() || !kind.is_promotion_target() {
            trace!(?kind, "promotion ignored");
            return Submission::Ignored;
        }
        let SelectionState::AwaitingPromotion { pending } = &self.selection else {
            trace!(?kind, "no promotion pending");
            return Submission::Ignored;
        };
        let mut turn = pending.clone();
        let piece = Piece::new(turn.color(), kind, turn.destination.index);
        turn.promotion = Some(piece);
        self.board.set_occupant(turn.destination.index, Some(piece));
        debug!(square = %turn.destination.coord(), ?kind, "promoted");
        Submission::Moved(self.finalize(turn))
    }

    /// Apply a turn played on the other device, then take over its clocks.
    /// Refused while a local promotion is pending.
    pub fn replay_turn(&mut self, remote: &Turn) -> Submission {
        if self.pending_promotion().is_some() {
            trace!(from = %remote.source.coord(), "remote turn during pending promotion");
            return Submission::Ignored;
        }
        self.selection = SelectionState::Idle;
        if !matches!(
            self.submit_move(remote.source.index),
            Submission::Selected(_)
        ) {
            trace!(from = %remote.source.coord(), "remote turn does not fit");
            return Submission::Ignored;
        }
        let mut result = self.submit_move(remote.destination.index);
        if result == Submission::AwaitingPromotion
            && let Some(piece) = remote.promotion
        {
            result = self.promote(piece.kind);
        }
        match result {
            Submission::Moved(mut turn) => {
                turn.clocks = remote.clocks;
                turn.duration = remote.duration;
                turn.timestamp = remote.timestamp;
                if let Some(current) = self.history.current_turn_mut() {
                    current.clocks = remote.clocks;
                    current.duration = remote.duration;
                    current.timestamp = remote.timestamp;
                }
                self.set_clocks(remote.clocks);
                Submission::Moved(turn)
            }
            Submission::Selected(_) | Submission::Deselected | Submission::Ignored => {
                trace!(to = %remote.destination.coord(), "remote turn does not fit");
                self.selection = SelectionState::Idle;
                Submission::Ignored
            }
            other => other,
        }
    }

    /// One second passes for the side to move. Returns true if that ended the game.
    pub fn tick(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        let c = self.side_to_move();
        if self.clock.tick(&mut self.players[c.idx()]) {
            let (winner, reason) = timeout_outcome(&self.board, c);
            self.end(winner, reason);
            return true;
        }
        false
    }

    /// `color` resigns.
    pub fn surrender(&mut self, color: Color) -> bool {
        if self.is_ended() {
            return false;
        }
        self.end(Some(color.other()), EndReason::Surrender);
        true
    }

    /// Both players agree to a draw.
    pub fn force_draw(&mut self) -> bool {
        if self.is_ended() {
            return false;
        }
        self.end(None, EndReason::DrawAgreed);
        true
    }

    /// The promotion square of the latest turn with its new piece, for
    /// sending to the other device.
    pub fn promotion_payload(&self) -> Option<SquarePayload> {
        let turn = self.history.current_turn()?;
        let piece = turn.promotion?;
        Some(SquarePayload {
            game_id: self.id,
            square: *self.board.square(turn.destination.index),
            remaining_secs: self.player(piece.color).remaining_secs,
        })
    }

    fn select(&mut self, square: u8) -> Submission {
        let to_move = self.side_to_move();
        match self.board.piece_at(square) {
            Some(p) if p.color == to_move => {
                let destinations = legal_destinations(&self.board, self.history.played(), square);
                debug!(
                    square = %sq_to_coord(square),
                    count = destinations.popcount(),
                    "selected"
                );
                self.selection = SelectionState::OneSelected {
                    square,
                    destinations,
                };
                Submission::Selected(destinations)
            }
            _ => {
                trace!(square, "input ignored");
                Submission::Ignored
            }
        }
    }

    fn play(&mut self, from: u8, to: u8) -> Submission {
        let turn = build_turn(&self.board, self.history.played(), from, to);
        turn.apply(&mut self.board);
        let mover = turn.mover();
        if let Some(captured) = turn.captured() {
            self.players[mover.color.idx()].record_capture(captured);
        }

        if mover.kind == PieceKind::Pawn && rank_of(to) == mover.color.promotion_rank() {
            debug!(square = %sq_to_coord(to), "awaiting promotion");
            self.selection = SelectionState::AwaitingPromotion { pending: turn };
            return Submission::AwaitingPromotion;
        }
        Submission::Moved(self.finalize(turn))
    }

    /// Close the clock, record the turn, flag check and mate on it, and see
    /// whether the game is over.
    fn finalize(&mut self, mut turn: Turn) -> Turn {
        let mover = turn.color();
        turn.duration = self.clock.complete_turn(&mut self.players[mover.idx()]);
        turn.timestamp = (self.now)();
        turn.clocks = self.clock_snapshot();
        self.history.record(turn.clone());
        self.selection = SelectionState::Idle;

        let opponent = mover.other();
        let checked = checked_king(&self.board, opponent);
        let reason = evaluate(&self.board, self.history.played(), opponent);
        if let Some(current) = self.history.current_turn_mut() {
            current.check = checked.is_some();
            current.checked_king = checked;
            current.check_mate = reason == Some(EndReason::Checkmate);
            turn = current.clone();
        }
        debug!(
            from = %turn.source.coord(),
            to = %turn.destination.coord(),
            check = turn.check,
            secs = turn.duration,
            "turn played"
        );

        if let Some(reason) = reason {
            let winner = (reason == EndReason::Checkmate).then_some(mover);
            self.end(winner, reason);
        }
        turn
    }

    fn end(&mut self, winner: Option<Color>, reason: EndReason) {
        let played = self.history.played().len();
        let rating = (played >= MIN_RATED_TURNS).then(|| {
            RatingChange::for_result(
                self.player(Color::White).profile.rating,
                self.player(Color::Black).profile.rating,
                winner,
            )
        });
        info!(game = %self.id, ?reason, ?winner, turns = played, "game over");
        self.status = GameStatus::Ended(GameOutcome {
            winner,
            reason,
            rating,
        });
        self.selection = SelectionState::Idle;
    }

    fn clock_snapshot(&self) -> ClockSnapshot {
        ClockSnapshot {
            white: self.player(Color::White).remaining_secs,
            black: self.player(Color::Black).remaining_secs,
        }
    }

    fn set_clocks(&mut self, clocks: ClockSnapshot) {
        for player in &mut self.players {
            player.remaining_secs = clocks.get(player.color);
        }
    }

    // ---------------------------------------------------------------------
    // Rewind
    // ---------------------------------------------------------------------

    fn can_rewind(&self) -> bool {
        self.config.rewind_enabled && self.pending_promotion().is_none()
    }

    /// Take back the current turn. Returns the backward motion.
    pub fn step_backward(&mut self) -> Option<Turn> {
        if !self.can_rewind() {
            return None;
        }
        let turn = self.history.step_backward(&mut self.board)?;
        self.after_navigation();
        Some(turn)
    }

    /// Replay the next recorded turn.
    pub fn step_forward(&mut self) -> Option<Turn> {
        if !self.can_rewind() {
            return None;
        }
        let turn = self.history.step_forward(&mut self.board)?;
        self.after_navigation();
        Some(turn)
    }

    /// Step to the position after turn `target`, or the start for None.
    pub fn jump_to(&mut self, target: Option<usize>) -> Vec<Turn> {
        if !self.can_rewind() {
            return Vec::new();
        }
        let steps = self.history.jump_to(&mut self.board, target);
        if !steps.is_empty() {
            self.after_navigation();
        }
        steps
    }

    /// Step forward to the last recorded turn.
    pub fn fast_forward(&mut self) -> Vec<Turn> {
        match self.history.len() {
            0 => Vec::new(),
            len => self.jump_to(Some(len - 1)),
        }
    }

    fn after_navigation(&mut self) {
        let clocks = match self.history.current_turn() {
            Some(turn) => turn.clocks,
            None => ClockSnapshot {
                white: self.config.clock_secs,
                black: self.config.clock_secs,
            },
        };
        self.set_clocks(clocks);
        for player in &mut self.players {
            player.recount_captures(self.history.played());
        }
        self.clock.reset_turn();
        self.selection = SelectionState::Idle;
    }

    // ---------------------------------------------------------------------
    // Checkpoints
    // ---------------------------------------------------------------------

    /// Remember the current state. A pending promotion is kept and is
    /// pending again after a restore.
    pub fn save_checkpoint(&mut self) {
        info!(game = %self.id, turns = self.history.len(), "checkpoint saved");
        self.checkpoint = Some(Checkpoint {
            board: self.board.clone(),
            players: self.players.clone(),
            history: self.history.clone(),
            status: self.status,
            pending: self.pending_promotion().cloned(),
        });
    }

    pub fn has_checkpoint(&self) -> bool {
        self.checkpoint.is_some()
    }

    /// Return to the saved checkpoint, discarding everything since. Returns
    /// false when there is none.
    pub fn restore_checkpoint(&mut self) -> bool {
        let Some(cp) = self.checkpoint.take() else {
            return false;
        };
        info!(
            game = %self.id,
            dropped = self.history.len().saturating_sub(cp.history.len()),
            "checkpoint restored"
        );
        self.board = cp.board;
        self.players = cp.players;
        self.history = cp.history;
        self.status = cp.status;
        self.clock.reset_turn();
        self.selection = match cp.pending {
            Some(pending) => SelectionState::AwaitingPromotion { pending },
            None => SelectionState::Idle,
        };
        true
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            game_id: self.id,
            board: self.board.clone(),
            players: self.players.to_vec(),
            turns: self.history.turns().to_vec(),
            config: self.config.clone(),
            started_at: self.started_at,
            current_turn: self.history.current(),
            is_first_turn: self.history.is_first_turn(),
            is_last_turn: self.history.is_last_turn(),
            status: self.status,
            pending_promotion: self.pending_promotion().cloned(),
        }
    }

    /// Resume a game from a snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Result<Self, SnapshotError> {
        snapshot.config.validate()?;
        for c in [Color::White, Color::Black] {
            if snapshot.board.count(c, PieceKind::King) > 1 {
                return Err(BoardError::DuplicateKing(c).into());
            }
        }

        let mut white = None;
        let mut black = None;
        for player in snapshot.players {
            let slot = match player.color {
                Color::White => &mut white,
                Color::Black => &mut black,
            };
            if slot.replace(player).is_some() {
                return Err(SnapshotError::PlayerColors);
            }
        }
        let (Some(white), Some(black)) = (white, black) else {
            return Err(SnapshotError::PlayerColors);
        };

        let len = snapshot.turns.len();
        if let Some(i) = snapshot.turns.iter().position(|t| t.source.piece.is_none()) {
            return Err(SnapshotError::InvalidTurn(i));
        }
        if snapshot
            .pending_promotion
            .as_ref()
            .is_some_and(|t| t.source.piece.is_none())
        {
            return Err(SnapshotError::InvalidTurn(len));
        }
        let first_mover = snapshot
            .turns
            .first()
            .map_or(Color::White, |t| t.color());
        let history = TurnHistory::from_parts(snapshot.turns, snapshot.current_turn).ok_or(
            SnapshotError::CurrentTurnOutOfRange {
                current: snapshot.current_turn.unwrap_or_default(),
                len,
            },
        )?;

        Ok(Self {
            id: snapshot.game_id,
            clock: Clock::new(snapshot.config.time_control()),
            config: snapshot.config,
            board: snapshot.board,
            players: [white, black],
            history,
            selection: match snapshot.pending_promotion {
                Some(pending) => SelectionState::AwaitingPromotion { pending },
                None => SelectionState::Idle,
            },
            status: snapshot.status,
            first_mover,
            started_at: snapshot.started_at,
            checkpoint: None,
            now: Box::new(Utc::now),
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
