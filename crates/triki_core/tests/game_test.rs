//! Tests for the triki game state machine.

use triki_core::{GameState, GameStatus, MoveError, Player, Position, Square};

fn play_all(game: &mut GameState, moves: &[(usize, usize)]) -> GameStatus {
    let mut status = game.status();
    for &(row, col) in moves {
        status = game.play(row, col).expect("move should be legal");
    }
    status
}

#[test]
fn test_every_cell_accepts_exactly_one_move() {
    for row in 0..3 {
        for col in 0..3 {
            let mut game = GameState::new();
            assert!(game.make_move(row, col).is_ok());
            let before = *game.board();

            let result = game.make_move(row, col);
            let pos = Position::from_row_col(row, col).unwrap();
            assert_eq!(result, Err(MoveError::Occupied(pos)));
            assert_eq!(*game.board(), before, "failed move changed the board");
        }
    }
}

#[test]
fn test_manual_turn_sequence() {
    let mut game = GameState::new();

    game.make_move(0, 0).unwrap();
    assert!(!game.check_winner());
    assert!(!game.is_board_full());
    game.switch_player();

    assert_eq!(game.current_player(), Player::O);
    game.make_move(1, 1).unwrap();
    assert_eq!(game.cell(1, 1), Some(Square::Occupied(Player::O)));
}

#[test]
fn test_top_row_win() {
    let mut game = GameState::new();
    let status = play_all(&mut game, &[(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)]);

    assert_eq!(status, GameStatus::Won(Player::X));
    assert!(game.is_ended());
    assert_eq!(game.winner(), Some(Player::X));
}

#[test]
fn test_check_winner_sets_result() {
    let mut game = GameState::new();
    for (row, col) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
        game.make_move(row, col).unwrap();
        if game.check_winner() {
            break;
        }
        game.switch_player();
    }

    assert!(game.is_ended());
    assert_eq!(game.winner(), Some(Player::X));
}

#[test]
fn test_draw() {
    // X O X
    // X O O
    // O X X
    let mut game = GameState::new();
    let status = play_all(
        &mut game,
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 1),
            (1, 0),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    );

    assert_eq!(status, GameStatus::Drawn);
    assert!(game.is_board_full());
    assert!(!game.check_winner());
    assert!(game.is_ended());
    assert_eq!(game.winner(), None);
}

#[test]
fn test_win_on_last_move_is_not_a_draw() {
    // X O X
    // O X O
    // O X X  <- X completes the main diagonal filling the board
    let mut game = GameState::new();
    let status = play_all(
        &mut game,
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (1, 0),
            (1, 1),
            (1, 2),
            (2, 1),
            (2, 0),
            (2, 2),
        ],
    );

    assert!(game.is_board_full());
    assert_eq!(status, GameStatus::Won(Player::X));
    assert_eq!(game.winner(), Some(Player::X));
}

#[test]
fn test_status_transitions() {
    let mut game = GameState::new();
    assert_eq!(game.status(), GameStatus::NotStarted);

    assert_eq!(game.play(1, 1), Ok(GameStatus::InProgress));
    assert_eq!(game.status(), GameStatus::InProgress);
    assert_eq!(game.current_player(), Player::O);

    game.reset_game();
    assert_eq!(game.status(), GameStatus::NotStarted);
    assert_eq!(game.current_player(), Player::X);
}

#[test]
fn test_terminal_game_rejects_moves() {
    let mut game = GameState::new();
    play_all(&mut game, &[(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);

    let board = *game.board();
    assert_eq!(game.play(2, 2), Err(MoveError::GameOver));
    assert_eq!(*game.board(), board);
}

#[test]
fn test_out_of_bounds_error_message() {
    let mut game = GameState::new();
    let err = game.play(5, 1).unwrap_err();
    assert!(err.to_string().contains("off the board"));
}
