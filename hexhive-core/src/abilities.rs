//! Pillbug throws and the movement-type dispatcher
//!
//! A piece can reach a hex through its own movement, or by being picked up
//! and set down by an adjacent pillbug (or a mosquito standing next to a
//! pillbug and borrowing that ability). The dispatcher tries these in a
//! fixed order and keeps the first that works.

use crate::board::Hex;
use crate::hive::Hive;
use crate::movement::{validate_move, Validation};
use crate::pieces::{Insect, Player};
use serde::{Deserialize, Serialize};

/// How a piece gets from its hex to the target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementType {
    /// The piece's own movement
    Normal,
    /// Thrown by the pillbug standing on `pillbug`
    ThrownByPillbug { pillbug: Hex },
    /// Thrown by the mosquito on `mosquito`, copying an adjacent pillbug
    ThrownByMosquito { mosquito: Hex },
}

impl MovementType {
    pub fn actor(&self) -> Option<Hex> {
        match *self {
            MovementType::Normal => None,
            MovementType::ThrownByPillbug { pillbug } => Some(pillbug),
            MovementType::ThrownByMosquito { mosquito } => Some(mosquito),
        }
    }
}

/// Result of trying every movement type for one target
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The movement type that succeeded, if any
    pub via: Option<MovementType>,
    pub validation: Validation,
}

impl Resolution {
    pub fn is_legal(&self) -> bool {
        self.via.is_some()
    }
}

/// A pillbug or mosquito can only throw while nothing is beneath it
fn can_throw_from(hive: &Hive, actor: Hex) -> bool {
    hive.height(actor) == 1
}

fn owned_top(hive: &Hive, hex: Hex, owner: Player, insect: Insect) -> bool {
    hive.top_piece(hex)
        .is_some_and(|p| p.owner == owner && p.insect == insect)
}

/// Movement types available to `mover` for the active piece at `origin`,
/// in precedence order: own movement, then each friendly pillbug, then
/// each friendly mosquito standing next to a friendly pillbug.
pub fn movement_types(hive: &Hive, mover: Player, origin: Hex) -> Vec<MovementType> {
    let mut types = Vec::new();
    let piece = match hive.top_piece(origin) {
        Some(p) => *p,
        None => return types,
    };

    if piece.owner == mover {
        types.push(MovementType::Normal);
    }

    // Only an unstacked piece can be picked up
    if hive.height(origin) != 1 {
        return types;
    }

    let neighbors = origin.neighbors();
    for &n in &neighbors {
        if owned_top(hive, n, mover, Insect::Pillbug) && can_throw_from(hive, n) {
            types.push(MovementType::ThrownByPillbug { pillbug: n });
        }
    }
    for &n in &neighbors {
        if owned_top(hive, n, mover, Insect::Mosquito)
            && can_throw_from(hive, n)
            && n.neighbors()
                .iter()
                .any(|&m| owned_top(hive, m, mover, Insect::Pillbug))
        {
            types.push(MovementType::ThrownByMosquito { mosquito: n });
        }
    }
    types
}

/// Can the piece at `actor` pick up the piece at `origin` and set it down
/// on `target`?
///
/// The thrown piece must be alone on its hex, lifting it must not split
/// the hive, and the target must be a vacant hex next to the actor that
/// still touches the hive.
pub fn validate_throw(hive: &Hive, actor: Hex, origin: Hex, target: Hex) -> Validation {
    let fail = || Validation { legal: false, path: vec![origin], copied: None };

    if !actor.is_adjacent(origin) || !actor.is_adjacent(target) {
        return fail();
    }
    if target == origin || hive.is_occupied(target) {
        return fail();
    }
    if hive.height(origin) != 1 || hive.would_split_hive(origin) {
        return fail();
    }

    let mut lifted = hive.clone();
    lifted.remove_top(origin);
    if !lifted.touches_hive(target, None) {
        return fail();
    }

    Validation { legal: true, path: vec![origin, actor, target], copied: None }
}

/// Try each movement type in order, stopping at the first success
pub fn resolve(hive: &Hive, mover: Player, origin: Hex, target: Hex) -> Resolution {
    let mut first_failure: Option<Validation> = None;

    for via in movement_types(hive, mover, origin) {
        let validation = match via {
            MovementType::Normal => validate_move(hive, origin, target),
            MovementType::ThrownByPillbug { pillbug: actor }
            | MovementType::ThrownByMosquito { mosquito: actor } => {
                validate_throw(hive, actor, origin, target)
            }
        };
        if validation.legal {
            return Resolution { via: Some(via), validation };
        }
        first_failure.get_or_insert(validation);
    }

    Resolution {
        via: None,
        validation: first_failure.unwrap_or(Validation {
            legal: false,
            path: vec![origin],
            copied: None,
        }),
    }
}
