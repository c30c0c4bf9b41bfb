//! Line-oriented console I/O for the menu and the game loop.

use std::io::{self, BufRead, Write};
use tracing::{debug, instrument};

/// What the player typed during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveInput {
    /// A 0-indexed row and column.
    Cell {
        /// Row (0-2 when valid).
        row: usize,
        /// Column (0-2 when valid).
        col: usize,
    },
    /// Leave the game and go back to the menu.
    Quit,
}

/// Parses a turn: `q` to quit, or two whitespace-separated integers.
///
/// Anything else is `None`. Range checking is left to the game.
pub fn parse_move(line: &str) -> Option<MoveInput> {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return Some(MoveInput::Quit);
    }

    let mut parts = line.split_whitespace();
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(MoveInput::Cell { row, col })
}

/// Parses a yes/no answer. Accepts `y`/`yes` and `s`/`si` as yes.
pub fn parse_yes(line: &str) -> bool {
    matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "s" | "si"
    )
}

/// Reads lines from `R` and writes prompts and messages to `W`.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Wraps an input and an output stream.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Gives back the wrapped streams.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }

    /// Writes a line of text.
    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Writes a prompt without a newline and reads one line of input.
    ///
    /// Returns `None` at end of input.
    #[instrument(skip(self))]
    pub fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("Input closed");
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Asks a yes/no question. End of input counts as no.
    pub fn confirm(&mut self, text: &str) -> io::Result<bool> {
        Ok(self
            .prompt(&format!("{text} (y/n): "))?
            .is_some_and(|answer| parse_yes(&answer)))
    }

    /// Reads a positive number. Returns `Some(None)` for unparsable input
    /// and `None` at end of input.
    pub fn prompt_number(&mut self, text: &str) -> io::Result<Option<Option<usize>>> {
        Ok(self
            .prompt(text)?
            .map(|line| line.trim().parse::<usize>().ok()))
    }
}
