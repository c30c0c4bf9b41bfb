//! Triki - console tic-tac-toe with saved games.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use triki::{App, Cli, Command, TrikiConfig};
use triki_core::SaveStore;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = TrikiConfig::load_or_default(&cli.config)?
        .with_overrides(cli.save_dir.clone(), cli.max_saves);
    let store = SaveStore::new(config.store().clone());

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => run_menu(store),
        Command::List => list(&store),
        Command::Delete { name } => delete(&store, &name),
        Command::Info => show_info(&store),
        Command::Clean => clean(&store),
    }
}

/// Logs go to stderr so they never interleave with the game board.
fn initialize_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// Run the interactive menu on stdin/stdout
#[instrument(skip(store))]
fn run_menu(store: SaveStore) -> Result<()> {
    info!(save_dir = %store.save_directory().display(), "Starting menu");
    let stdin = io::stdin();
    let mut app = App::new(stdin.lock(), io::stdout(), store);
    app.run()?;
    Ok(())
}

#[instrument(skip(store))]
fn list(store: &SaveStore) -> Result<()> {
    let mut out = io::stdout().lock();
    for game in store.list_saved_games() {
        writeln!(out, "{game}")?;
    }
    Ok(())
}

#[instrument(skip(store))]
fn delete(store: &SaveStore, name: &str) -> Result<()> {
    let file_name = if name.ends_with(triki_core::SAVE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{}", triki_core::SAVE_EXTENSION)
    };
    store.delete_game(&file_name)?;
    println!("Deleted {file_name}");
    Ok(())
}

#[instrument(skip(store))]
fn show_info(store: &SaveStore) -> Result<()> {
    println!("{}", store.directory_info());
    Ok(())
}

#[instrument(skip(store))]
fn clean(store: &SaveStore) -> Result<()> {
    let deleted = store.clean_old_saves();
    println!(
        "Removed {deleted} old saved game(s), limit {}",
        store.max_saved_files()
    );
    Ok(())
}
