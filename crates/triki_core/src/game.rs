//! Game state and turn logic for a single triki session.
//!
//! The low-level operations mirror how a turn is played by hand: place a
//! mark, look for a completed line, check for a full board, pass the turn.
//! [`GameState::play`] runs them in that order.

use crate::rules;
use crate::{Board, Player, Position, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Where a session stands, derived from the state fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GameStatus {
    /// No marks placed yet.
    #[display("not started")]
    NotStarted,
    /// At least one mark placed, no result yet.
    #[display("in progress")]
    InProgress,
    /// A line was completed by the given player.
    #[display("player {_0} won")]
    Won(Player),
    /// The board filled up without a completed line.
    #[display("draw")]
    Drawn,
}

impl GameStatus {
    /// Whether play is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won(_) | GameStatus::Drawn)
    }
}

/// Error that can occur when placing a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MoveError {
    /// Row or column outside `0..=2`.
    #[display("Position ({row}, {col}) is off the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target square already holds a mark.
    #[display("Square {_0} is already occupied")]
    Occupied(#[error(not(source))] Position),

    /// The game has already been won or drawn.
    #[display("Game is already over")]
    GameOver,
}

/// Complete game state: board, whose turn it is, and the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    /// The board.
    board: Board,
    /// Current player to move.
    current_player: Player,
    /// Set once a line is completed or the board fills.
    ended: bool,
    /// Owner of the completed line; `None` while playing and on a draw.
    winner: Option<Player>,
}

impl GameState {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            ended: false,
            winner: None,
        }
    }

    /// Reassembles a state from its stored fields.
    pub(crate) fn from_parts(
        board: Board,
        current_player: Player,
        ended: bool,
        winner: Option<Player>,
    ) -> Self {
        Self {
            board,
            current_player,
            ended,
            winner,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the current player.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Whether the game has been won or drawn.
    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Returns the winner, if a line was completed.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    /// Returns the square at the given row and column, if on the board.
    pub fn cell(&self, row: usize, col: usize) -> Option<Square> {
        Position::from_row_col(row, col).map(|pos| self.board.get(pos))
    }

    /// Current position in the session state machine.
    pub fn status(&self) -> GameStatus {
        match (self.ended, self.winner) {
            (true, Some(player)) => GameStatus::Won(player),
            (true, None) => GameStatus::Drawn,
            (false, _) if self.board.moves_played() == 0 => GameStatus::NotStarted,
            (false, _) => GameStatus::InProgress,
        }
    }

    /// Writes the current player's mark at (row, col).
    ///
    /// Does not pass the turn or look for a winner; call
    /// [`check_winner`](Self::check_winner) and then
    /// [`switch_player`](Self::switch_player) afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::OutOfBounds`] or [`MoveError::Occupied`] and
    /// leaves the board untouched.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn make_move(&mut self, row: usize, col: usize) -> Result<Position, MoveError> {
        let pos = Position::from_row_col(row, col).ok_or(MoveError::OutOfBounds { row, col })?;

        if !self.board.is_empty(pos) {
            debug!(%pos, "Square already occupied");
            return Err(MoveError::Occupied(pos));
        }

        self.board.set(pos, Square::Occupied(self.current_player));
        debug!(%pos, "Mark placed");
        Ok(pos)
    }

    /// Scans the eight lines in priority order and records the first win.
    ///
    /// Sets the ended flag and the winner when a line is found.
    #[instrument(skip(self))]
    pub fn check_winner(&mut self) -> bool {
        match rules::check_winner(&self.board) {
            Some(player) => {
                self.ended = true;
                self.winner = Some(player);
                info!(winner = %player, "Line completed");
                true
            }
            None => false,
        }
    }

    /// True iff no empty square remains.
    pub fn is_board_full(&self) -> bool {
        rules::is_full(&self.board)
    }

    /// Passes the turn to the other player.
    pub fn switch_player(&mut self) {
        self.current_player = self.current_player.opponent();
    }

    /// Clears the board and starts over with X to move.
    #[instrument(skip(self))]
    pub fn reset_game(&mut self) {
        *self = Self::new();
    }

    /// Plays one full turn at (row, col).
    ///
    /// The win check runs before the full-board check, so a last move that
    /// completes a line is a win rather than a draw.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::GameOver`] once the game is decided, otherwise
    /// whatever [`make_move`](Self::make_move) reports.
    #[instrument(skip(self), fields(player = %self.current_player))]
    pub fn play(&mut self, row: usize, col: usize) -> Result<GameStatus, MoveError> {
        if self.status().is_terminal() {
            return Err(MoveError::GameOver);
        }

        self.make_move(row, col)?;

        if self.check_winner() {
            return Ok(self.status());
        }

        if self.is_board_full() {
            self.ended = true;
            info!("Board full, game drawn");
            return Ok(GameStatus::Drawn);
        }

        self.switch_player();
        Ok(GameStatus::InProgress)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
