//! Command-line interface for triki.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Triki - tic-tac-toe on the console with saved games
#[derive(Parser, Debug)]
#[command(name = "triki")]
#[command(about = "Two-player console tic-tac-toe with saved games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "triki.toml")]
    pub config: PathBuf,

    /// Directory holding saved games (overrides the config file)
    #[arg(long)]
    pub save_dir: Option<PathBuf>,

    /// Maximum saved games kept before the oldest are pruned
    #[arg(long)]
    pub max_saves: Option<usize>,

    /// Subcommand to run (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive menu
    Play,

    /// List saved games
    List,

    /// Delete a saved game
    Delete {
        /// File name of the save, with or without the .triki extension
        name: String,
    },

    /// Show the save directory and its files
    Info,

    /// Prune saved games beyond the retention limit
    Clean,
}
