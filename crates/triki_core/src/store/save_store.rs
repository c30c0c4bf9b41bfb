//! Save directory management: listing, pruning, save and load.

use super::{StoreConfig, StoreError, StoreErrorKind};
use crate::{GameState, RECORD_LEN, SaveRecord};
use derive_getters::Getters;
use derive_new::new;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, error, info, instrument, warn};

/// Suffix identifying a saved game.
pub const SAVE_EXTENSION: &str = ".triki";

/// Longest accepted save name, in characters.
pub const MAX_FILENAME_LEN: usize = 100;

const RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Checks a save name before it touches the filesystem.
///
/// Rejects empty names, names over [`MAX_FILENAME_LEN`] characters, and
/// names containing any of `\ / : * ? " < > |`.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && name.chars().count() <= MAX_FILENAME_LEN
        && !name.contains(RESERVED_CHARS)
}

/// A save name built from the local clock, e.g. `triki_2024-05-01_18-30-07`.
#[instrument]
pub fn timestamped_name() -> String {
    format!("triki_{}", chrono::Local::now().format("%Y-%m-%d_%H-%M-%S"))
}

/// Appends the save extension unless the name already carries it.
fn with_extension(name: &str) -> String {
    if name.ends_with(SAVE_EXTENSION) {
        name.to_string()
    } else {
        format!("{name}{SAVE_EXTENSION}")
    }
}

/// One save file as shown in the directory summary.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct SavedGameInfo {
    /// File name including the extension.
    name: String,
    /// Size on disk in bytes.
    size: u64,
}

/// Snapshot of the save directory.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new)]
pub struct DirectoryInfo {
    /// Save directory path.
    directory: PathBuf,
    /// Configured retention limit.
    max_saved_files: usize,
    /// Save files in name order.
    files: Vec<SavedGameInfo>,
}

impl std::fmt::Display for DirectoryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Save directory: {}", self.directory.display())?;
        writeln!(f, "Maximum saved games: {}", self.max_saved_files)?;
        writeln!(f, "Record size: {RECORD_LEN} bytes")?;
        write!(f, "Saved games found: {}", self.files.len())?;
        for file in &self.files {
            write!(f, "\n  - {} ({} bytes)", file.name, file.size)?;
        }
        Ok(())
    }
}

/// A directory of `.triki` save files with a retention limit.
#[derive(Debug, Clone)]
pub struct SaveStore {
    config: StoreConfig,
}

impl SaveStore {
    /// Opens the store, creating the save directory if needed.
    ///
    /// A directory that cannot be created is logged; creation is retried
    /// on the next save.
    #[instrument(skip(config), fields(save_dir = %config.save_dir().display()))]
    pub fn new(config: StoreConfig) -> Self {
        let max = *config.max_saved_files();
        let store = Self {
            config: config.with_max_saved_files(max),
        };
        store.ensure_directory();
        store
    }

    /// Returns the save directory.
    pub fn save_directory(&self) -> &Path {
        self.config.save_dir()
    }

    /// Points the store at another directory, creating it if needed.
    #[instrument(skip(self, save_dir), fields(save_dir = %save_dir.display()))]
    pub fn set_save_directory(&mut self, save_dir: PathBuf) -> bool {
        self.config = self.config.clone().with_save_dir(save_dir);
        self.ensure_directory()
    }

    /// Returns the retention limit.
    pub fn max_saved_files(&self) -> usize {
        *self.config.max_saved_files()
    }

    /// Changes the retention limit, clamped to at least one file.
    pub fn set_max_saved_files(&mut self, max_saved_files: usize) {
        self.config = self.config.clone().with_max_saved_files(max_saved_files);
    }

    fn path_for(&self, file_name: &str) -> PathBuf {
        self.config.save_dir().join(file_name)
    }

    /// Creates the save directory if it does not exist yet.
    #[instrument(skip(self))]
    fn ensure_directory(&self) -> bool {
        let dir = self.config.save_dir();
        if dir.is_dir() {
            return true;
        }
        match fs::create_dir_all(dir) {
            Ok(()) => {
                info!(dir = %dir.display(), "Save directory created");
                true
            }
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Failed to create save directory");
                false
            }
        }
    }

    /// Lists save file names in ascending order.
    ///
    /// Only regular files ending in the save extension are returned. A
    /// directory that cannot be read yields an empty list.
    #[instrument(skip(self))]
    pub fn list_saved_games(&self) -> Vec<String> {
        let dir = self.config.save_dir();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                error!(dir = %dir.display(), error = %e, "Failed to read save directory");
                return Vec::new();
            }
        };

        let mut games: Vec<String> = entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "Skipping unreadable directory entry");
                    None
                }
            })
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.len() > SAVE_EXTENSION.len() && name.ends_with(SAVE_EXTENSION))
            .collect();

        games.sort();
        debug!(count = games.len(), "Saved games listed");
        games
    }

    /// Whether `<directory>/<name>` exists. No extension is appended.
    pub fn file_exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Removes a save file. No extension is appended.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::InvalidFilename`],
    /// [`StoreErrorKind::NotFound`], or [`StoreErrorKind::Io`].
    #[instrument(skip(self))]
    pub fn delete_game(&self, name: &str) -> Result<(), StoreError> {
        if !is_valid_filename(name) {
            warn!("Refusing to delete invalid filename");
            return Err(StoreErrorKind::InvalidFilename(name.to_string()).into());
        }

        let path = self.path_for(name);
        if !path.exists() {
            warn!(path = %path.display(), "Save file does not exist");
            return Err(StoreErrorKind::NotFound(path).into());
        }

        fs::remove_file(&path).map_err(|source| {
            error!(path = %path.display(), error = %source, "Failed to delete save file");
            StoreError::new(StoreErrorKind::Io {
                path: path.clone(),
                source,
            })
        })?;

        info!(path = %path.display(), "Save file deleted");
        Ok(())
    }

    /// Deletes the oldest saves until at most the retention limit remain.
    ///
    /// Files are ranked by modification time, oldest first; equal times are
    /// ordered by name. Returns the number of files removed. Files whose
    /// metadata cannot be read are left alone.
    #[instrument(skip(self), fields(max = self.max_saved_files()))]
    pub fn clean_old_saves(&self) -> usize {
        let games = self.list_saved_games();
        let max = self.max_saved_files();

        if games.len() <= max {
            debug!(count = games.len(), max, "Nothing to prune");
            return 0;
        }

        let mut ranked: Vec<(SystemTime, String)> = games
            .iter()
            .filter_map(|name| {
                match fs::metadata(self.path_for(name)).and_then(|m| m.modified()) {
                    Ok(modified) => Some((modified, name.clone())),
                    Err(e) => {
                        warn!(file = %name, error = %e, "Cannot read modification time");
                        None
                    }
                }
            })
            .collect();
        ranked.sort();

        let excess = games.len() - max;
        let mut deleted = 0;
        for (_, name) in ranked.iter().take(excess) {
            if self.delete_game(name).is_ok() {
                deleted += 1;
            }
        }

        info!(deleted, excess, "Old saves pruned");
        deleted
    }

    /// Writes the game as a 12-byte record to `<directory>/<name>.triki`.
    ///
    /// The extension is appended when missing. Returns the file name used.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::InvalidFilename`] or [`StoreErrorKind::Io`].
    #[instrument(skip(self, state), fields(status = %state.status()))]
    pub fn save(&self, name: &str, state: &GameState) -> Result<String, StoreError> {
        if !is_valid_filename(name) {
            warn!("Refusing to save under invalid filename");
            return Err(StoreErrorKind::InvalidFilename(name.to_string()).into());
        }

        self.ensure_directory();
        let file_name = with_extension(name);
        let path = self.path_for(&file_name);
        let bytes = SaveRecord::from(state).to_bytes();

        let io_error = |source: std::io::Error| {
            error!(path = %path.display(), error = %source, "Failed to write save file");
            StoreError::new(StoreErrorKind::Io {
                path: path.clone(),
                source,
            })
        };

        let mut file = File::create(&path).map_err(io_error)?;
        file.write_all(&bytes).map_err(io_error)?;
        file.flush().map_err(io_error)?;

        info!(path = %path.display(), "Game saved");
        Ok(file_name)
    }

    /// Reads a game back from `<directory>/<name>.triki`.
    ///
    /// The extension is appended when missing. Only the first 12 bytes are
    /// read; a shorter or malformed file is rejected as a whole.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::InvalidFilename`],
    /// [`StoreErrorKind::NotFound`], [`StoreErrorKind::Io`], or
    /// [`StoreErrorKind::Corrupt`].
    #[instrument(skip(self))]
    pub fn load(&self, name: &str) -> Result<GameState, StoreError> {
        if !is_valid_filename(name) {
            warn!("Refusing to load invalid filename");
            return Err(StoreErrorKind::InvalidFilename(name.to_string()).into());
        }

        let path = self.path_for(&with_extension(name));
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %path.display(), "Save file does not exist");
                return Err(StoreErrorKind::NotFound(path).into());
            }
            Err(source) => {
                error!(path = %path.display(), error = %source, "Failed to open save file");
                return Err(StoreErrorKind::Io { path, source }.into());
            }
        };

        let mut bytes = Vec::with_capacity(RECORD_LEN);
        let mut record_bytes = file.take(RECORD_LEN as u64);
        if let Err(source) = record_bytes.read_to_end(&mut bytes) {
            error!(path = %path.display(), error = %source, "Failed to read save file");
            return Err(StoreErrorKind::Io { path, source }.into());
        }

        let record = SaveRecord::from_bytes(&bytes).map_err(|source| {
            warn!(path = %path.display(), error = %source, "Save file is corrupt");
            StoreError::new(StoreErrorKind::Corrupt {
                path: path.clone(),
                source,
            })
        })?;

        let state = GameState::from(record);
        info!(path = %path.display(), status = %state.status(), "Game loaded");
        Ok(state)
    }

    /// Summarizes the directory: location, limit, and every save with its size.
    #[instrument(skip(self))]
    pub fn directory_info(&self) -> DirectoryInfo {
        let files = self
            .list_saved_games()
            .into_iter()
            .map(|name| {
                let size = fs::metadata(self.path_for(&name))
                    .map(|m| m.len())
                    .unwrap_or_else(|e| {
                        warn!(file = %name, error = %e, "Cannot read file size");
                        0
                    });
                SavedGameInfo::new(name, size)
            })
            .collect();

        DirectoryInfo::new(
            self.config.save_dir().clone(),
            self.max_saved_files(),
            files,
        )
    }
}
