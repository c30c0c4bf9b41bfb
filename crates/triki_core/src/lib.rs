//! Triki core - tic-tac-toe game state and its save files.
//!
//! This crate holds everything the console front end drives but never
//! talks to the console itself.
//!
//! # Architecture
//!
//! - **Game**: 3x3 board, turn order, win and draw detection
//! - **Rules**: pure functions over a board (lines, full board)
//! - **Record**: the fixed 12-byte save layout
//! - **Store**: a save directory with listing, pruning, save and load
//!
//! # Example
//!
//! ```no_run
//! use triki_core::{GameState, SaveStore, StoreConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SaveStore::new(StoreConfig::default());
//! let mut game = GameState::new();
//! game.play(1, 1)?;
//! store.save("opening", &game)?;
//! let resumed = store.load("opening")?;
//! assert_eq!(resumed, game);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game;
mod position;
mod record;
mod store;
mod types;

pub mod rules;

// Crate-level exports - Board types
pub use position::Position;
pub use types::{Board, Player, Square};

// Crate-level exports - Game state
pub use game::{GameState, GameStatus, MoveError};

// Crate-level exports - Save format
pub use record::{RECORD_LEN, RecordError, SaveRecord};

// Crate-level exports - Save directory
pub use store::{
    DEFAULT_MAX_SAVED_FILES, DEFAULT_SAVE_DIR, DirectoryInfo, MAX_FILENAME_LEN, SAVE_EXTENSION,
    SaveStore, SavedGameInfo, StoreConfig, StoreError, StoreErrorKind, is_valid_filename,
    timestamped_name,
};
