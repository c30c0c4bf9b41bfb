//! Persistence for saved games.

mod config;
mod error;
mod save_store;

pub use config::{DEFAULT_MAX_SAVED_FILES, DEFAULT_SAVE_DIR, StoreConfig};
pub use error::{StoreError, StoreErrorKind};
pub use save_store::{
    DirectoryInfo, MAX_FILENAME_LEN, SAVE_EXTENSION, SaveStore, SavedGameInfo, is_valid_filename,
    timestamped_name,
};
