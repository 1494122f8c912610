//! Integration tests for the HEXHIVE rules engine
//!
//! Drives full games through the public API: placement, movement, throws,
//! passing, win detection and snapshots.

use hexhive_core::{
    board::Hex,
    game::{Action, GameResult, GameState, MoveError, Phase, PlacementError},
    hive::Hive,
    movement::validate_move,
    pieces::{Insect, Piece, PieceId, Player},
    MovementType, RuleSet,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Route engine logs to the test harness; RUST_LOG=hexhive_core=debug shows them
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Place for the player on turn and return the new piece's id
fn place(game: &mut GameState, insect: Insect, q: i32, r: i32) -> anyhow::Result<PieceId> {
    let hex = Hex::new(q, r);
    game.submit_placement(game.current_player(), insect, hex)?;
    let piece = game
        .hive()
        .top_piece(hex)
        .ok_or_else(|| anyhow::anyhow!("nothing at {}", hex))?;
    Ok(piece.id)
}

fn board(pieces: &[(i32, i32, Player, Insect)]) -> Hive {
    let mut hive = Hive::new();
    for (i, &(q, r, owner, insect)) in pieces.iter().enumerate() {
        hive.place(Hex::new(q, r), Piece { id: PieceId(i as u16), owner, insect });
    }
    hive
}

// ============================================================================
// PLACEMENT
// ============================================================================

#[test]
fn test_second_placement_must_touch_own_colour() -> anyhow::Result<()> {
    init_tracing();
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    place(&mut game, Insect::Ant, 1, 0)?;

    let err = game
        .submit_placement(Player::White, Insect::Ant, Hex::new(5, 5))
        .unwrap_err();
    assert_eq!(err, PlacementError::InvalidAdjacency(Hex::new(5, 5)));
    assert_eq!(game.current_player(), Player::White);
    assert_eq!(game.hive().piece_count(), 2);
    Ok(())
}

#[test]
fn test_occupied_hex_rejected() -> anyhow::Result<()> {
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    place(&mut game, Insect::Queen, 1, 0)?;
    assert_eq!(
        game.submit_placement(Player::White, Insect::Ant, Hex::new(1, 0)),
        Err(PlacementError::OccupiedHex(Hex::new(1, 0)))
    );
    Ok(())
}

// ============================================================================
// MOVEMENT
// ============================================================================

#[test]
fn test_ant_cannot_cross_gate() {
    // (2,0) is walled in on five sides; its open side (1,0) is gated by
    // (2,-1) and (1,1)
    let hive = board(&[
        (0, 0, Player::White, Insect::Ant),
        (0, 1, Player::White, Insect::Queen),
        (1, 1, Player::Black, Insect::Queen),
        (2, 1, Player::Black, Insect::Spider),
        (3, 0, Player::Black, Insect::Spider),
        (3, -1, Player::Black, Insect::Beetle),
        (2, -1, Player::Black, Insect::Beetle),
    ]);
    assert_eq!(Hex::ORIGIN.distance_to(Hex::new(2, 0)), 2);

    let v = validate_move(&hive, Hex::ORIGIN, Hex::new(2, 0));
    assert!(!v.legal);
    assert_eq!(v.path.first(), Some(&Hex::ORIGIN));
    assert_eq!(v.path.last(), Some(&Hex::new(1, 0)));

    // The mouth of the pocket itself is fine
    assert!(validate_move(&hive, Hex::ORIGIN, Hex::new(1, 0)).legal);
}

#[test]
fn test_grasshopper_destinations() -> anyhow::Result<()> {
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    place(&mut game, Insect::Queen, 1, 0)?;
    let hopper = place(&mut game, Insect::Grasshopper, -1, 0)?;
    place(&mut game, Insect::Ant, 2, 0)?;

    let expected: BTreeSet<Hex> = [Hex::new(3, 0)].into_iter().collect();
    assert_eq!(game.legal_destinations(hopper), expected);
    Ok(())
}

#[test]
fn test_pillbug_throws_enemy_queen() -> anyhow::Result<()> {
    init_tracing();
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    let black_queen = place(&mut game, Insect::Queen, 1, 0)?;
    let pillbug = place(&mut game, Insect::Pillbug, 0, -1)?;
    place(&mut game, Insect::Ant, 2, -1)?;
    game.submit_move(Player::White, pillbug, Hex::new(1, -1))?;
    place(&mut game, Insect::Ant, 3, -1)?;

    let expected: BTreeSet<Hex> = [Hex::new(0, -1), Hex::new(1, -2), Hex::new(2, -2)]
        .into_iter()
        .collect();
    assert_eq!(game.legal_destinations(black_queen), expected);

    game.submit_move(Player::White, black_queen, Hex::new(0, -1))?;
    let record = game.last_move().ok_or_else(|| anyhow::anyhow!("no move recorded"))?;
    assert_eq!(record.via, MovementType::ThrownByPillbug { pillbug: Hex::new(1, -1) });
    assert_eq!(record.path, vec![Hex::new(1, 0), Hex::new(1, -1), Hex::new(0, -1)]);
    assert!(game.hive().is_connected());
    assert_eq!(game.current_player(), Player::Black);
    Ok(())
}

#[test]
fn test_enemy_piece_without_thrower() -> anyhow::Result<()> {
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    let black_queen = place(&mut game, Insect::Queen, 1, 0)?;
    assert_eq!(
        game.submit_move(Player::White, black_queen, Hex::new(1, -1)),
        Err(MoveError::NotYourPiece(black_queen))
    );
    assert!(game.legal_destinations(black_queen).is_empty());
    Ok(())
}

// ============================================================================
// GAME END
// ============================================================================

#[test]
fn test_double_surround_is_draw() -> anyhow::Result<()> {
    init_tracing();
    let mut game = GameState::new(RuleSet::base());
    place(&mut game, Insect::Queen, 0, 0)?;
    place(&mut game, Insect::Queen, 1, 0)?;
    place(&mut game, Insect::Ant, -1, 0)?;
    place(&mut game, Insect::Ant, 2, 0)?;
    place(&mut game, Insect::Ant, 0, -1)?;
    place(&mut game, Insect::Ant, 2, -1)?;
    place(&mut game, Insect::Ant, -1, 1)?;
    place(&mut game, Insect::Ant, 1, 1)?;
    let white_beetle = place(&mut game, Insect::Beetle, -1, 2)?;
    let black_beetle = place(&mut game, Insect::Beetle, 2, -2)?;
    place(&mut game, Insect::Grasshopper, -2, 0)?;

    game.submit_move(Player::Black, black_beetle, Hex::new(1, -1))?;
    assert_eq!(game.phase(), Phase::Playing);

    // (0,1) is the last gap next to both queens
    game.submit_move(Player::White, white_beetle, Hex::new(0, 1))?;
    assert_eq!(game.result(), Some(GameResult::Draw));
    assert!(game.legal_actions().is_empty());
    Ok(())
}

// ============================================================================
// SNAPSHOTS AND DETERMINISM
// ============================================================================

#[test]
fn test_snapshot_serializes() -> anyhow::Result<()> {
    let mut game = GameState::default();
    place(&mut game, Insect::Queen, 0, 0)?;
    place(&mut game, Insect::Beetle, 1, 0)?;

    let snap = game.snapshot();
    assert_eq!(snap.stacks.len(), 2);
    assert_eq!(snap.stacks[0].0, Hex::new(0, 0));
    assert_eq!(snap.current_player, Player::White);
    assert_eq!(snap.white_hand.count(Insect::Queen), 0);
    assert_eq!(snap.black_hand.count(Insect::Beetle), 1);

    let json = serde_json::to_string(&snap)?;
    let back: hexhive_core::Snapshot = serde_json::from_str(&json)?;
    assert_eq!(back, snap);
    Ok(())
}

#[test]
fn test_legal_actions_deterministic() -> anyhow::Result<()> {
    let build = || -> anyhow::Result<GameState> {
        let mut game = GameState::default();
        place(&mut game, Insect::Queen, 0, 0)?;
        place(&mut game, Insect::Queen, 1, 0)?;
        place(&mut game, Insect::Ant, -1, 0)?;
        place(&mut game, Insect::Spider, 2, 0)?;
        Ok(game)
    };
    let a = build()?.legal_actions();
    let b = build()?.legal_actions();
    assert!(!a.is_empty());
    assert_eq!(a, b);
    // Placements come before moves
    let first_move = a.iter().position(|x| matches!(x, Action::Move { .. }));
    let last_place = a.iter().rposition(|x| matches!(x, Action::Place { .. }));
    if let (Some(m), Some(p)) = (first_move, last_place) {
        assert!(p < m);
    }
    Ok(())
}

#[test]
fn test_random_playouts_keep_one_hive() {
    init_tracing();
    for seed in [7u64, 42] {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut game = GameState::default();
        let start_total = game.hand(Player::White).total() + game.hand(Player::Black).total();

        for _ in 0..40 {
            if game.result().is_some() {
                break;
            }
            let actions = game.legal_actions();
            match actions.choose(&mut rng) {
                Some(&action) => {
                    let player = game.current_player();
                    game.apply(action)
                        .unwrap_or_else(|e| panic!("seed {} {:?}: {}", seed, action, e));
                    if game.result().is_none() {
                        assert_eq!(game.current_player(), player.opponent());
                    }
                }
                None => {
                    if game.end_turn().is_err() {
                        break;
                    }
                }
            }

            assert!(game.hive().is_connected(), "seed {} split the hive", seed);
            let in_hand = game.hand(Player::White).total() + game.hand(Player::Black).total();
            assert_eq!(in_hand as usize + game.hive().piece_count(), start_total as usize);
        }
    }
}
