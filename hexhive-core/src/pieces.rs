//! Piece definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Player colour. White places first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

/// Insect kind
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Insect {
    Queen,
    Ant,
    Beetle,
    Grasshopper,
    Spider,
    Mosquito,
    Ladybug,
    Pillbug,
}

impl Insect {
    /// Every kind, in the order the mosquito tries them
    pub const ALL: [Insect; 8] = [
        Insect::Queen,
        Insect::Ant,
        Insect::Beetle,
        Insect::Grasshopper,
        Insect::Spider,
        Insect::Mosquito,
        Insect::Ladybug,
        Insect::Pillbug,
    ];

    /// Copies of this kind in a full hand
    pub fn standard_count(self) -> u8 {
        match self {
            Insect::Queen => 1,
            Insect::Ant => 3,
            Insect::Beetle => 2,
            Insect::Grasshopper => 3,
            Insect::Spider => 2,
            Insect::Mosquito | Insect::Ladybug | Insect::Pillbug => 1,
        }
    }

    /// Expansion kinds can be switched off by the ruleset
    pub fn is_expansion(self) -> bool {
        matches!(self, Insect::Mosquito | Insect::Ladybug | Insect::Pillbug)
    }

    pub fn letter(self) -> char {
        match self {
            Insect::Queen => 'Q',
            Insect::Ant => 'A',
            Insect::Beetle => 'B',
            Insect::Grasshopper => 'G',
            Insect::Spider => 'S',
            Insect::Mosquito => 'M',
            Insect::Ladybug => 'L',
            Insect::Pillbug => 'P',
        }
    }
}

impl fmt::Display for Insect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Identity of one physical piece, assigned when it is placed
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u16);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece on the board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub owner: Player,
    pub insect: Insect,
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colour = match self.owner {
            Player::White => 'w',
            Player::Black => 'b',
        };
        write!(f, "{}{}{}", colour, self.insect.letter(), self.id)
    }
}
