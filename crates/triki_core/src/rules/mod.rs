//! Game rules for tic-tac-toe.
//!
//! Pure functions for evaluating a board. Rules are kept apart from
//! [`GameState`](crate::GameState) so they can be checked on any board,
//! including one just read back from a save file.

mod draw;
mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner, winning_line};
