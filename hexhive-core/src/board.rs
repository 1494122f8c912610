//! Hex grid geometry with axial coordinates
//!
//! The hive has no fixed edge, so coordinates are unbounded and a hex is
//! only meaningful relative to the pieces around it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> u32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        ((dq + dr + ds) / 2) as u32
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in `DIRECTIONS` order.
    ///
    /// Path searches iterate this array, so the order decides which of
    /// several equally short paths gets reported.
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (dir, hex) in out.iter_mut().enumerate() {
            *hex = self.neighbor(dir as u8);
        }
        out
    }

    /// Direction index from `self` to an adjacent hex
    pub fn direction_to(&self, other: Hex) -> Option<u8> {
        let delta = (other.q - self.q, other.r - self.r);
        DIRECTIONS.iter().position(|&d| d == delta).map(|d| d as u8)
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.direction_to(other).is_some()
    }

    /// The two hexes touching both `self` and the adjacent hex `other`.
    ///
    /// These are the gate cells: a ground piece sliding from `self` to
    /// `other` squeezes between them.
    pub fn common_neighbors(&self, other: Hex) -> Option<[Hex; 2]> {
        let dir = self.direction_to(other)?;
        Some([self.neighbor(dir + 5), self.neighbor(dir + 1)])
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.q, self.r)
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];
