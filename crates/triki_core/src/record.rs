//! The on-disk save record.
//!
//! ## File layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ bytes 0-8  cells, row-major                  │
//! │            ' ' empty | 'X' | 'O'             │
//! ├──────────────────────────────────────────────┤
//! │ byte 9     current player   'X' | 'O'        │
//! │ byte 10    ended flag       0 | 1            │
//! │ byte 11    winner           ' ' | 'X' | 'O'  │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! The field order is fixed and carries no version tag. A draw is stored as
//! ended = 1 with a blank winner.
//!
//! Decoding also checks the record against the board: the mark counts, the
//! player to move, and the result must be reachable by play.

use crate::rules;
use crate::{Board, GameState, Player, Square};
use tracing::instrument;

/// Size of a save record in bytes.
pub const RECORD_LEN: usize = 12;

const EMPTY: u8 = b' ';
const MARK_X: u8 = b'X';
const MARK_O: u8 = b'O';

const PLAYER_OFFSET: usize = 9;
const ENDED_OFFSET: usize = 10;
const WINNER_OFFSET: usize = 11;

/// A save record that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RecordError {
    /// Fewer than [`RECORD_LEN`] bytes were available.
    #[display("save record truncated: {len} of {} bytes", RECORD_LEN)]
    Truncated {
        /// Bytes actually present.
        len: usize,
    },

    /// A cell byte is not blank, `X` or `O`.
    #[display("invalid cell byte {byte:#04x} at index {index}")]
    InvalidCell {
        /// Cell index (0-8).
        index: usize,
        /// Offending byte.
        byte: u8,
    },

    /// The current player byte is not `X` or `O`.
    #[display("invalid current player byte {_0:#04x}")]
    InvalidPlayer(#[error(not(source))] u8),

    /// The ended flag is neither 0 nor 1.
    #[display("invalid ended flag {_0:#04x}")]
    InvalidEndedFlag(#[error(not(source))] u8),

    /// The winner byte is not blank, `X` or `O`.
    #[display("invalid winner byte {_0:#04x}")]
    InvalidWinner(#[error(not(source))] u8),

    /// A winner is recorded for a game that has not ended.
    #[display("winner recorded for an unfinished game")]
    WinnerWithoutEnd,

    /// The fields are well formed but describe a state play cannot reach.
    #[display("inconsistent save record: {reason}")]
    Inconsistent {
        /// Which rule the record breaks.
        reason: &'static str,
    },
}

/// Decoded form of the 12-byte save layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRecord {
    cells: [Square; 9],
    current_player: Player,
    ended: bool,
    winner: Option<Player>,
}

impl SaveRecord {
    /// Encodes the record into its fixed byte layout.
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let mut bytes = [EMPTY; RECORD_LEN];
        for (byte, square) in bytes.iter_mut().zip(self.cells) {
            *byte = square.player().map_or(EMPTY, player_byte);
        }
        bytes[PLAYER_OFFSET] = player_byte(self.current_player);
        bytes[ENDED_OFFSET] = u8::from(self.ended);
        bytes[WINNER_OFFSET] = self.winner.map_or(EMPTY, player_byte);
        bytes
    }

    /// Decodes the first [`RECORD_LEN`] bytes. Trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] when the input is short or any field holds a
    /// value outside the layout.
    #[instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        if bytes.len() < RECORD_LEN {
            return Err(RecordError::Truncated { len: bytes.len() });
        }

        let mut cells = [Square::Empty; 9];
        for (index, (cell, &byte)) in cells.iter_mut().zip(&bytes[..9]).enumerate() {
            *cell = match byte {
                EMPTY => Square::Empty,
                other => Square::Occupied(
                    byte_player(other).ok_or(RecordError::InvalidCell { index, byte })?,
                ),
            };
        }

        let player = bytes[PLAYER_OFFSET];
        let current_player = byte_player(player).ok_or(RecordError::InvalidPlayer(player))?;

        let ended = match bytes[ENDED_OFFSET] {
            0 => false,
            1 => true,
            other => return Err(RecordError::InvalidEndedFlag(other)),
        };

        let winner = match bytes[WINNER_OFFSET] {
            EMPTY => None,
            other => Some(byte_player(other).ok_or(RecordError::InvalidWinner(other))?),
        };

        if winner.is_some() && !ended {
            return Err(RecordError::WinnerWithoutEnd);
        }

        let record = Self {
            cells,
            current_player,
            ended,
            winner,
        };
        record.check_consistency()?;
        Ok(record)
    }

    /// Rejects records whose result or turn contradicts the board.
    fn check_consistency(&self) -> Result<(), RecordError> {
        let inconsistent = |reason: &'static str| -> Result<(), RecordError> {
            Err(RecordError::Inconsistent { reason })
        };
        let board = Board::from_squares(self.cells);

        let x = board.count(Player::X);
        let o = board.count(Player::O);
        let x_moved_last = match x.checked_sub(o) {
            Some(0) => false,
            Some(1) => true,
            _ => return inconsistent("mark counts are unbalanced"),
        };

        let line_owner = rules::check_winner(&board);
        let full = rules::is_full(&board);

        // A finished game keeps the last mover's turn.
        let last_mover = if x_moved_last { Player::X } else { Player::O };
        let expected_player = if self.ended {
            last_mover
        } else {
            last_mover.opponent()
        };
        if self.current_player != expected_player {
            return inconsistent("wrong player to move");
        }

        match (self.ended, self.winner) {
            (false, _) if line_owner.is_some() => {
                inconsistent("unfinished game has a completed line")
            }
            (false, _) if full => inconsistent("unfinished game has a full board"),
            (true, None) if line_owner.is_some() => {
                inconsistent("draw recorded over a completed line")
            }
            (true, None) if !full => inconsistent("draw recorded on an open board"),
            (true, Some(winner)) if line_owner != Some(winner) => {
                inconsistent("winner does not own the completed line")
            }
            (true, Some(winner)) if winner != last_mover => {
                inconsistent("winner did not make the last move")
            }
            _ => Ok(()),
        }
    }
}

impl From<&GameState> for SaveRecord {
    fn from(state: &GameState) -> Self {
        Self {
            cells: *state.board().squares(),
            current_player: state.current_player(),
            ended: state.is_ended(),
            winner: state.winner(),
        }
    }
}

impl From<SaveRecord> for GameState {
    fn from(record: SaveRecord) -> Self {
        GameState::from_parts(
            Board::from_squares(record.cells),
            record.current_player,
            record.ended,
            record.winner,
        )
    }
}

fn player_byte(player: Player) -> u8 {
    match player {
        Player::X => MARK_X,
        Player::O => MARK_O,
    }
}

fn byte_player(byte: u8) -> Option<Player> {
    match byte {
        MARK_X => Some(Player::X),
        MARK_O => Some(Player::O),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameStatus;

    #[test]
    fn test_new_game_bytes() {
        let bytes = SaveRecord::from(&GameState::new()).to_bytes();
        assert_eq!(&bytes, b"         X\x00 ");
    }

    #[test]
    fn test_won_game_bytes() {
        let mut game = GameState::new();
        for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
            game.play(row, col).unwrap();
        }
        let bytes = SaveRecord::from(&game).to_bytes();
        assert_eq!(&bytes, b"XXX O   OX\x01X");
    }

    #[test]
    fn test_truncated_input() {
        assert_eq!(
            SaveRecord::from_bytes(b"XO "),
            Err(RecordError::Truncated { len: 3 })
        );
    }

    #[test]
    fn test_invalid_cell() {
        assert_eq!(
            SaveRecord::from_bytes(b"   Z     X\x00 "),
            Err(RecordError::InvalidCell {
                index: 3,
                byte: b'Z'
            })
        );
    }

    #[test]
    fn test_invalid_ended_flag() {
        assert_eq!(
            SaveRecord::from_bytes(b"         X\x07 "),
            Err(RecordError::InvalidEndedFlag(7))
        );
    }

    #[test]
    fn test_winner_requires_ended() {
        assert_eq!(
            SaveRecord::from_bytes(b"XXX O    O\x00X"),
            Err(RecordError::WinnerWithoutEnd)
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let record = SaveRecord::from_bytes(b"X        O\x00 extra").unwrap();
        assert_eq!(GameState::from(record).current_player(), Player::O);
    }

    fn assert_inconsistent(bytes: &[u8; RECORD_LEN], reason: &str) {
        match SaveRecord::from_bytes(bytes) {
            Err(RecordError::Inconsistent { reason: got }) => assert_eq!(got, reason),
            other => panic!("expected inconsistent record ({reason}), got {other:?}"),
        }
    }

    #[test]
    fn test_draw_on_open_board_rejected() {
        assert_inconsistent(b"X        X\x01 ", "draw recorded on an open board");
    }

    #[test]
    fn test_draw_over_completed_line_rejected() {
        assert_inconsistent(b"XXXOOXOXOX\x01 ", "draw recorded over a completed line");
    }

    #[test]
    fn test_winner_must_own_the_line() {
        assert_inconsistent(b"XXXOO    X\x01O", "winner does not own the completed line");
    }

    #[test]
    fn test_unbalanced_marks_rejected() {
        assert_inconsistent(b"XXX      O\x00 ", "mark counts are unbalanced");
        assert_inconsistent(b"OO       X\x00 ", "mark counts are unbalanced");
    }

    #[test]
    fn test_wrong_player_to_move_rejected() {
        assert_inconsistent(b"X        X\x00 ", "wrong player to move");
        assert_inconsistent(b"XXX O   OO\x01X", "wrong player to move");
    }

    #[test]
    fn test_unfinished_game_with_line_rejected() {
        assert_inconsistent(b"XXXOO    O\x00 ", "unfinished game has a completed line");
    }

    #[test]
    fn test_unfinished_game_with_full_board_rejected() {
        assert_inconsistent(b"XOXXOOOXXO\x00 ", "unfinished game has a full board");
    }

    #[test]
    fn test_finished_games_accepted() {
        let won = SaveRecord::from_bytes(b"XXX O   OX\x01X").unwrap();
        assert_eq!(GameState::from(won).status(), GameStatus::Won(Player::X));

        let drawn = SaveRecord::from_bytes(b"XOXXOOOXXX\x01 ").unwrap();
        assert_eq!(GameState::from(drawn).status(), GameStatus::Drawn);
    }
}
