//! The interactive menu and the game loop it drives.

use crate::console::{Console, MoveInput, parse_move};
use std::io::{self, BufRead, Write};
use tracing::{debug, info, instrument, warn};
use triki_core::{GameState, GameStatus, SAVE_EXTENSION, SaveStore, timestamped_name};

/// Entries of the main menu, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumIter, derive_more::Display)]
pub enum MenuChoice {
    /// Start a fresh game.
    #[display("New game")]
    NewGame,
    /// Resume or inspect a saved game.
    #[display("Load saved game")]
    LoadGame,
    /// Show the saved games.
    #[display("List saved games")]
    ListGames,
    /// Remove a saved game.
    #[display("Delete saved game")]
    DeleteGame,
    /// Show the save directory summary.
    #[display("System information")]
    SystemInfo,
    /// Leave the program.
    #[display("Exit")]
    Exit,
}

impl MenuChoice {
    /// Menu number shown to the user.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    /// Looks up a choice by its menu number.
    pub fn from_number(number: usize) -> Option<Self> {
        <Self as strum::IntoEnumIterator>::iter().find(|c| c.number() == number)
    }
}

/// How a game loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The game was won or drawn.
    Finished(GameStatus),
    /// The player typed `q`.
    Quit,
    /// Input ran out mid-game.
    InputClosed,
}

/// The menu-driven application: one console, one save store.
#[derive(Debug)]
pub struct App<R, W> {
    console: Console<R, W>,
    store: SaveStore,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Creates the application over the given streams and store.
    pub fn new(input: R, output: W, store: SaveStore) -> Self {
        Self {
            console: Console::new(input, output),
            store,
        }
    }

    /// Returns the save store.
    pub fn store(&self) -> &SaveStore {
        &self.store
    }

    /// Gives back the wrapped streams.
    pub fn into_inner(self) -> (R, W) {
        self.console.into_inner()
    }

    /// Runs the main menu until the user exits or input ends.
    #[instrument(skip(self))]
    pub fn run(&mut self) -> io::Result<()> {
        self.console.say("=== TRIKI ===")?;
        loop {
            self.show_menu()?;
            let choice = match self.console.prompt_number("Select an option: ")? {
                None => break,
                Some(number) => number.and_then(MenuChoice::from_number),
            };

            let Some(choice) = choice else {
                self.console.say("Invalid option. Try again.")?;
                continue;
            };

            debug!(%choice, "Menu choice");
            match choice {
                MenuChoice::NewGame => self.new_game()?,
                MenuChoice::LoadGame => self.load_game()?,
                MenuChoice::ListGames => self.list_games()?,
                MenuChoice::DeleteGame => self.delete_game()?,
                MenuChoice::SystemInfo => self.system_info()?,
                MenuChoice::Exit => break,
            }
        }
        self.console.say("Goodbye!")?;
        info!("Menu closed");
        Ok(())
    }

    fn show_menu(&mut self) -> io::Result<()> {
        self.console.say("")?;
        for choice in <MenuChoice as strum::IntoEnumIterator>::iter() {
            self.console.say(format!("{}. {}", choice.number(), choice))?;
        }
        Ok(())
    }

    /// Plays a fresh game, then offers to save it.
    #[instrument(skip(self))]
    pub fn new_game(&mut self) -> io::Result<()> {
        self.console.say("\n=== NEW GAME ===")?;
        let mut game = GameState::new();
        if self.play(&mut game)? == PlayOutcome::InputClosed {
            return Ok(());
        }
        self.offer_save(&game, None)
    }

    /// Picks a save, then resumes it or reports its result.
    #[instrument(skip(self))]
    pub fn load_game(&mut self) -> io::Result<()> {
        let Some(file_name) = self.select_saved_game()? else {
            return Ok(());
        };

        let mut game = match self.store.load(&file_name) {
            Ok(game) => game,
            Err(e) => {
                warn!(error = %e, "Load failed");
                return self.console.say(format!("Could not load the game: {}", e.kind));
            }
        };

        if game.is_ended() {
            self.console.say(game.board().render())?;
            self.console.say("That game has already finished.")?;
            let result = match game.winner() {
                Some(player) => format!("Winner: {player}"),
                None => "Result: draw".to_string(),
            };
            return self.console.say(result);
        }

        self.console.say("\nGame loaded. Resuming...")?;
        if self.play(&mut game)? == PlayOutcome::InputClosed {
            return Ok(());
        }
        let name = file_name.strip_suffix(SAVE_EXTENSION).unwrap_or(&file_name);
        self.offer_save(&game, Some(name))
    }

    /// Prints the saved games.
    #[instrument(skip(self))]
    pub fn list_games(&mut self) -> io::Result<()> {
        let games = self.store.list_saved_games();
        self.show_games(&games)
    }

    fn show_games(&mut self, games: &[String]) -> io::Result<()> {
        self.console.say("\n=== SAVED GAMES ===")?;
        if games.is_empty() {
            return self.console.say("No saved games.");
        }
        for (i, game) in games.iter().enumerate() {
            self.console.say(format!("{}. {}", i + 1, game))?;
        }
        Ok(())
    }

    /// Picks a save and deletes it after confirmation.
    #[instrument(skip(self))]
    pub fn delete_game(&mut self) -> io::Result<()> {
        let Some(file_name) = self.select_saved_game()? else {
            return Ok(());
        };

        if !self
            .console
            .confirm(&format!("Delete '{file_name}'? This cannot be undone."))?
        {
            return self.console.say("Deletion cancelled.");
        }

        match self.store.delete_game(&file_name) {
            Ok(()) => self.console.say("Saved game deleted."),
            Err(e) => {
                warn!(error = %e, "Delete failed");
                self.console.say(format!("Could not delete: {}", e.kind))
            }
        }
    }

    /// Prints the save directory summary.
    #[instrument(skip(self))]
    pub fn system_info(&mut self) -> io::Result<()> {
        self.console.say("\n=== SYSTEM INFORMATION ===")?;
        let info = self.store.directory_info();
        self.console.say(info)
    }

    /// Lists the saves and asks for one by number. `0` cancels.
    fn select_saved_game(&mut self) -> io::Result<Option<String>> {
        let games = self.store.list_saved_games();
        if games.is_empty() {
            self.console.say("No saved games.")?;
            return Ok(None);
        }

        self.show_games(&games)?;
        let Some(number) = self
            .console
            .prompt_number("Select a game by number (0 to cancel): ")?
        else {
            return Ok(None);
        };

        match number {
            Some(0) => Ok(None),
            Some(n) if n <= games.len() => Ok(Some(games[n - 1].clone())),
            _ => {
                self.console.say("Invalid selection.")?;
                Ok(None)
            }
        }
    }

    /// Runs turns until the game ends, the player quits, or input runs out.
    #[instrument(skip(self, game))]
    pub fn play(&mut self, game: &mut GameState) -> io::Result<PlayOutcome> {
        self.console
            .say("Enter row and column (0-2) separated by a space, or q to leave.")?;

        loop {
            self.console.say("")?;
            self.console.say(game.board().render())?;

            let prompt = format!("Player {}, your move: ", game.current_player());
            let Some(line) = self.console.prompt(&prompt)? else {
                return Ok(PlayOutcome::InputClosed);
            };

            let (row, col) = match parse_move(&line) {
                Some(MoveInput::Cell { row, col }) => (row, col),
                Some(MoveInput::Quit) => {
                    info!(status = %game.status(), "Game left early");
                    return Ok(PlayOutcome::Quit);
                }
                None => {
                    self.console.say("Invalid input. Type two numbers, e.g. 1 2.")?;
                    continue;
                }
            };

            match game.play(row, col) {
                Ok(GameStatus::Won(player)) => {
                    self.console.say(game.board().render())?;
                    self.console.say(format!("Player {player} wins!"))?;
                    return Ok(PlayOutcome::Finished(GameStatus::Won(player)));
                }
                Ok(GameStatus::Drawn) => {
                    self.console.say(game.board().render())?;
                    self.console.say("It's a draw!")?;
                    return Ok(PlayOutcome::Finished(GameStatus::Drawn));
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(error = %e, "Move rejected");
                    self.console.say(format!("Invalid move: {e}. Try again."))?;
                }
            }
        }
    }

    /// Asks whether to save and under which name, then prunes old saves.
    ///
    /// With `suggested` the user may press enter to keep that name;
    /// otherwise an empty answer uses a timestamped name.
    #[instrument(skip(self, game))]
    pub fn offer_save(&mut self, game: &GameState, suggested: Option<&str>) -> io::Result<()> {
        if !self.console.confirm("\nSave this game?")? {
            return Ok(());
        }

        let fallback = suggested.map_or_else(timestamped_name, str::to_string);
        let prompt = format!("File name without extension [{fallback}]: ");
        let Some(answer) = self.console.prompt(&prompt)? else {
            return Ok(());
        };
        let answer = answer.trim();
        let name = if answer.is_empty() { fallback.as_str() } else { answer };

        match self.store.save(name, game) {
            Ok(file_name) => {
                self.console.say(format!("Game saved as {file_name}."))?;
                let pruned = self.store.clean_old_saves();
                if pruned > 0 {
                    self.console
                        .say(format!("Removed {pruned} old saved game(s)."))?;
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Save failed");
                self.console
                    .say(format!("Could not save the game: {}", e.kind))
            }
        }
    }
}
