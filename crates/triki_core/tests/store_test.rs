//! Tests for the save directory store.

use std::fs::{self, File};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

use triki_core::{
    GameState, GameStatus, Player, RecordError, SaveStore, StoreConfig, StoreErrorKind,
};

/// Creates a store over a fresh temporary directory; the `TempDir` must stay
/// in scope to keep the directory alive.
fn setup_store(max_saved_files: usize) -> (TempDir, SaveStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = StoreConfig::new(dir.path().join("saves"), max_saved_files);
    (dir, SaveStore::new(config))
}

fn won_game() -> GameState {
    let mut game = GameState::new();
    for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
        game.play(row, col).unwrap();
    }
    game
}

/// Writes an empty save file with the given age in seconds.
fn touch_with_age(store: &SaveStore, name: &str, age_secs: u64) {
    let file = File::create(store.save_directory().join(name)).expect("Create failed");
    let modified = SystemTime::now() - Duration::from_secs(age_secs);
    file.set_modified(modified).expect("Set mtime failed");
}

#[test]
fn test_new_creates_directory() {
    let (_dir, store) = setup_store(10);
    assert!(store.save_directory().is_dir());
}

#[test]
fn test_save_appends_extension_and_writes_twelve_bytes() {
    let (_dir, store) = setup_store(10);
    let file_name = store.save("game1", &won_game()).expect("Save failed");

    assert_eq!(file_name, "game1.triki");
    let bytes = fs::read(store.save_directory().join("game1.triki")).expect("Read failed");
    assert_eq!(bytes, b"XXX O   OX\x01X");
}

#[test]
fn test_save_keeps_existing_extension() {
    let (_dir, store) = setup_store(10);
    let file_name = store.save("game1.triki", &GameState::new()).expect("Save failed");
    assert_eq!(file_name, "game1.triki");
    assert!(!store.file_exists("game1.triki.triki"));
}

#[test]
fn test_round_trip_won_game() {
    let (_dir, store) = setup_store(10);
    let game = won_game();
    store.save("won", &game).expect("Save failed");

    let loaded = store.load("won").expect("Load failed");
    assert_eq!(loaded, game);
    assert_eq!(loaded.status(), GameStatus::Won(Player::X));
}

#[test]
fn test_round_trip_in_progress_game() {
    let (_dir, store) = setup_store(10);
    let mut game = GameState::new();
    game.play(1, 1).unwrap();
    game.play(0, 2).unwrap();
    game.play(2, 0).unwrap();
    store.save("midgame", &game).expect("Save failed");

    let loaded = store.load("midgame.triki").expect("Load failed");
    assert_eq!(loaded, game);
    assert_eq!(loaded.current_player(), Player::O);
    assert!(!loaded.is_ended());
}

#[test]
fn test_save_rejects_invalid_name() {
    let (_dir, store) = setup_store(10);
    let err = store.save("a/b", &GameState::new()).unwrap_err();
    assert!(matches!(&err.kind, StoreErrorKind::InvalidFilename(_)));

    let err = store.save("", &GameState::new()).unwrap_err();
    assert!(matches!(&err.kind, StoreErrorKind::InvalidFilename(_)));
}

#[test]
fn test_save_recreates_missing_directory() {
    let (_dir, store) = setup_store(10);
    fs::remove_dir(store.save_directory()).expect("Remove failed");

    store.save("again", &GameState::new()).expect("Save failed");
    assert!(store.file_exists("again.triki"));
}

#[test]
fn test_load_missing_file() {
    let (_dir, store) = setup_store(10);
    let err = store.load("nothing").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_load_rejects_short_file() {
    let (_dir, store) = setup_store(10);
    fs::write(store.save_directory().join("short.triki"), b"XO").expect("Write failed");

    let err = store.load("short").unwrap_err();
    assert!(matches!(&err.kind, StoreErrorKind::Corrupt { .. }));
}

#[test]
fn test_load_reads_only_the_record() {
    let (_dir, store) = setup_store(10);
    fs::write(
        store.save_directory().join("padded.triki"),
        b"XXX O   OX\x01Xtrailing notes",
    )
    .expect("Write failed");

    let game = store.load("padded").expect("Load failed");
    assert_eq!(game.status(), GameStatus::Won(Player::X));
}

#[test]
fn test_load_rejects_hand_edited_result() {
    let (_dir, store) = setup_store(10);
    // Ended with a blank winner on a nearly empty board.
    fs::write(store.save_directory().join("edited.triki"), b"X        X\x01 ")
        .expect("Write failed");

    let err = store.load("edited").unwrap_err();
    assert!(matches!(
        err.kind,
        StoreErrorKind::Corrupt {
            source: RecordError::Inconsistent { .. },
            ..
        }
    ));
}

#[test]
fn test_list_filters_and_sorts() {
    let (_dir, store) = setup_store(10);
    for name in ["zeta", "alpha", "mid"] {
        store.save(name, &GameState::new()).expect("Save failed");
    }
    fs::write(store.save_directory().join("notes.txt"), b"hi").expect("Write failed");
    fs::write(store.save_directory().join(".triki"), b"").expect("Write failed");
    fs::create_dir(store.save_directory().join("folder.triki")).expect("Mkdir failed");

    assert_eq!(
        store.list_saved_games(),
        vec!["alpha.triki", "mid.triki", "zeta.triki"]
    );
}

#[test]
fn test_list_unreadable_directory_is_empty() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let blocker = dir.path().join("not_a_dir");
    fs::write(&blocker, b"").expect("Write failed");

    let store = SaveStore::new(StoreConfig::new(blocker, 10));
    assert!(store.list_saved_games().is_empty());
}

#[test]
fn test_delete_game() {
    let (_dir, store) = setup_store(10);
    store.save("gone", &GameState::new()).expect("Save failed");
    assert!(store.file_exists("gone.triki"));

    store.delete_game("gone.triki").expect("Delete failed");
    assert!(!store.file_exists("gone.triki"));

    let err = store.delete_game("gone.triki").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_clean_old_saves_noop_under_limit() {
    let (_dir, store) = setup_store(10);
    for i in 0..10 {
        touch_with_age(&store, &format!("game{i:02}.triki"), 100 - i);
    }
    assert_eq!(store.clean_old_saves(), 0);
    assert_eq!(store.list_saved_games().len(), 10);
}

#[test]
fn test_clean_old_saves_removes_oldest() {
    let (_dir, store) = setup_store(10);
    // Names run opposite to age so name order cannot stand in for time order.
    for i in 0..12u64 {
        touch_with_age(&store, &format!("game{i:02}.triki"), 100 + i * 10);
    }

    assert_eq!(store.clean_old_saves(), 2);

    let remaining = store.list_saved_games();
    assert_eq!(remaining.len(), 10);
    assert!(!remaining.contains(&"game11.triki".to_string()));
    assert!(!remaining.contains(&"game10.triki".to_string()));
    assert!(remaining.contains(&"game00.triki".to_string()));
}

#[test]
fn test_clean_old_saves_breaks_ties_by_name() {
    let (_dir, store) = setup_store(1);
    let modified = SystemTime::now() - Duration::from_secs(60);
    for name in ["b.triki", "a.triki", "c.triki"] {
        let file = File::create(store.save_directory().join(name)).expect("Create failed");
        file.set_modified(modified).expect("Set mtime failed");
    }

    assert_eq!(store.clean_old_saves(), 2);
    assert_eq!(store.list_saved_games(), vec!["c.triki"]);
}

#[test]
fn test_retention_limit_is_at_least_one() {
    let (_dir, mut store) = setup_store(0);
    assert_eq!(store.max_saved_files(), 1);
    store.set_max_saved_files(0);
    assert_eq!(store.max_saved_files(), 1);
    store.set_max_saved_files(3);
    assert_eq!(store.max_saved_files(), 3);
}

#[test]
fn test_set_save_directory_creates_it() {
    let (dir, mut store) = setup_store(10);
    let other = dir.path().join("elsewhere");
    assert!(store.set_save_directory(other.clone()));
    assert!(other.is_dir());
    assert_eq!(store.save_directory(), other.as_path());
}

#[test]
fn test_directory_info() {
    let (_dir, store) = setup_store(7);
    store.save("one", &GameState::new()).expect("Save failed");
    store.save("two", &won_game()).expect("Save failed");

    let info = store.directory_info();
    assert_eq!(*info.max_saved_files(), 7);
    assert_eq!(info.files().len(), 2);
    assert!(info.files().iter().all(|f| *f.size() == 12));

    let text = info.to_string();
    assert!(text.contains("Saved games found: 2"));
    assert!(text.contains("one.triki (12 bytes)"));
}
