//! Triki console front end.
//!
//! Owns everything that talks to the user: the argument parser, the
//! configuration file, the menu loop and the game prompts. Game state and
//! save files live in [`triki_core`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod console;
mod menu;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Configuration
pub use config::{ConfigError, TrikiConfig};

// Crate-level exports - Console and menu
pub use console::{Console, MoveInput, parse_move, parse_yes};
pub use menu::{App, MenuChoice, PlayOutcome};
