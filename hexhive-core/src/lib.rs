//! HEXHIVE Core - Rules engine for the hexagonal tile game
//!
//! This crate decides what is legal on a hive board:
//! - Board geometry (hex grid with axial coordinates)
//! - Piece stacks and the one-hive connectivity check
//! - Per-insect movement validators with path reconstruction
//! - Pillbug throws and the movement-type dispatcher
//! - Game state: placement, movement, passing and win detection

pub mod board;
pub mod pieces;
pub mod hive;
pub mod movement;
pub mod abilities;
pub mod ruleset;
pub mod game;

// Re-exports for convenient access
pub use board::{Hex, DIRECTIONS};
pub use pieces::{Insect, Piece, PieceId, Player};
pub use hive::Hive;
pub use movement::{validate_move, Validation};
pub use abilities::{movement_types, resolve, MovementType, Resolution};
pub use ruleset::{Hand, RuleSet};
pub use game::{
    Action, ActionError, GameResult, GameState, MoveError, MoveRecord, PassError, Phase,
    PlacementError, Snapshot,
};
