//! Save store configuration.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::instrument;

/// Directory used when none is configured.
pub const DEFAULT_SAVE_DIR: &str = "saves";

/// Retention limit used when none is configured.
pub const DEFAULT_MAX_SAVED_FILES: usize = 10;

/// Where saves live and how many are kept.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `.triki` files.
    #[serde(default = "default_save_dir")]
    save_dir: PathBuf,

    /// Maximum save files kept before the oldest are pruned.
    #[serde(default = "default_max_saved_files")]
    max_saved_files: usize,
}

#[instrument]
fn default_save_dir() -> PathBuf {
    PathBuf::from(DEFAULT_SAVE_DIR)
}

#[instrument]
fn default_max_saved_files() -> usize {
    DEFAULT_MAX_SAVED_FILES
}

impl StoreConfig {
    /// Creates a configuration; the limit is clamped to at least one file.
    #[instrument(skip(save_dir), fields(save_dir = %save_dir.display()))]
    pub fn new(save_dir: PathBuf, max_saved_files: usize) -> Self {
        Self {
            save_dir,
            max_saved_files: max_saved_files.max(1),
        }
    }

    /// Replaces the save directory.
    pub fn with_save_dir(mut self, save_dir: PathBuf) -> Self {
        self.save_dir = save_dir;
        self
    }

    /// Replaces the retention limit, clamped to at least one file.
    pub fn with_max_saved_files(mut self, max_saved_files: usize) -> Self {
        self.max_saved_files = max_saved_files.max(1);
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(default_save_dir(), default_max_saved_files())
    }
}
