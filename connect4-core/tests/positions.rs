//! Known-position checks
//!
//! Loads hand-verified positions from `tests/data/positions.json` and checks
//! for each one:
//! - Player to move
//! - Winner detection
//! - Legal moves
//! - Bottom row of the rendered grid
//! - Serde round trip through the move notation

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use connect4_core::{Player, Position, HEIGHT, WIDTH};
use serde::Deserialize;

/// JSON structure of the fixture file
#[derive(Debug, Deserialize)]
struct TestData {
    version: String,
    positions: Vec<Fixture>,
}

#[derive(Debug, Deserialize)]
struct Fixture {
    description: String,
    moves: String,
    current_player: u8,
    winner: Option<u8>,
    legal_moves: Vec<usize>,
    bottom_row: String,
}

fn load_fixtures() -> TestData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/positions.json");
    let file = File::open(&path).expect("Failed to open positions fixture");
    serde_json::from_reader(BufReader::new(file)).expect("Failed to parse JSON")
}

#[test]
fn test_known_positions() {
    let data = load_fixtures();
    assert_eq!(data.version, "1");
    assert!(!data.positions.is_empty());

    let mut failures: Vec<String> = Vec::new();

    for fixture in &data.positions {
        let mut errors: Vec<String> = Vec::new();
        let position: Position = match fixture.moves.parse() {
            Ok(position) => position,
            Err(e) => {
                failures.push(format!("{}: replay failed: {}", fixture.description, e));
                continue;
            }
        };

        if position.current_player() as u8 != fixture.current_player {
            errors.push(format!(
                "player: expected {}, got {:?}",
                fixture.current_player,
                position.current_player()
            ));
        }

        let winner = position.winner().map(|p| p as u8);
        if winner != fixture.winner {
            errors.push(format!("winner: expected {:?}, got {:?}", fixture.winner, winner));
        }

        if position.list_moves() != fixture.legal_moves {
            errors.push(format!(
                "moves: expected {:?}, got {:?}",
                fixture.legal_moves,
                position.list_moves()
            ));
        }

        let bottom_row: String = (0..WIDTH)
            .map(|x| position.token(x, HEIGHT - 1).symbol())
            .collect();
        if bottom_row != fixture.bottom_row {
            errors.push(format!(
                "bottom row: expected {}, got {}",
                fixture.bottom_row, bottom_row
            ));
        }

        if !errors.is_empty() {
            failures.push(format!("{}: {}", fixture.description, errors.join(", ")));
        }
    }

    assert!(failures.is_empty(), "Fixture failures:\n{}", failures.join("\n"));
}

#[test]
fn test_winner_is_last_mover() {
    for fixture in load_fixtures().positions {
        let position: Position = fixture.moves.parse().unwrap();
        if position.winner().is_some() {
            assert!(position.has_won(), "{}", fixture.description);
            assert_eq!(
                position.winner(),
                Some(position.current_player().opponent()),
                "{}",
                fixture.description
            );
        }
    }
}

#[test]
fn test_serde_round_trip() {
    for fixture in load_fixtures().positions {
        let position: Position = fixture.moves.parse().unwrap();

        let json = serde_json::to_string(&position).unwrap();
        assert_eq!(json, format!("\"{}\"", fixture.moves));

        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, position, "{}", fixture.description);
    }
}

#[test]
fn test_serde_rejects_illegal_games() {
    // Seventh token in column 0.
    assert!(serde_json::from_str::<Position>("\"0000000\"").is_err());
    // Not a column.
    assert!(serde_json::from_str::<Position>("\"12x\"").is_err());
    // Keeps playing after the first player has won.
    assert!(serde_json::from_str::<Position>("\"01010102\"").is_err());
}

#[test]
fn test_player_serializes_by_name() {
    assert_eq!(serde_json::to_string(&Player::One).unwrap(), "\"One\"");
    let player: Player = serde_json::from_str("\"Two\"").unwrap();
    assert_eq!(player, Player::Two);
}
