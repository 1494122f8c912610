//! Board occupancy: hex -> stack of pieces, plus the one-hive check

use crate::board::Hex;
use crate::pieces::{Insect, Piece, PieceId};
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BTreeSet;

/// Sparse board. A hex with no pieces is never stored.
#[derive(Clone, Debug, Default)]
pub struct Hive {
    /// Bottom-to-top stacks
    stacks: FxHashMap<Hex, Vec<Piece>>,
}

impl Hive {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Number of occupied hexes (not pieces)
    pub fn occupied_count(&self) -> usize {
        self.stacks.len()
    }

    pub fn piece_count(&self) -> usize {
        self.stacks.values().map(Vec::len).sum()
    }

    pub fn is_occupied(&self, hex: Hex) -> bool {
        self.stacks.contains_key(&hex)
    }

    /// The active piece at a hex
    pub fn top_piece(&self, hex: Hex) -> Option<&Piece> {
        self.stacks.get(&hex).and_then(|s| s.last())
    }

    /// Bottom-to-top stack, empty slice for a vacant hex
    pub fn stack_at(&self, hex: Hex) -> &[Piece] {
        self.stacks.get(&hex).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn height(&self, hex: Hex) -> usize {
        self.stacks.get(&hex).map_or(0, Vec::len)
    }

    /// Occupied hexes in coordinate order
    pub fn occupied(&self) -> Vec<Hex> {
        let mut hexes: Vec<Hex> = self.stacks.keys().copied().collect();
        hexes.sort_unstable();
        hexes
    }

    /// Stacks in coordinate order
    pub fn stacks(&self) -> Vec<(Hex, &[Piece])> {
        let mut out: Vec<(Hex, &[Piece])> = self
            .stacks
            .iter()
            .map(|(&hex, stack)| (hex, stack.as_slice()))
            .collect();
        out.sort_unstable_by_key(|&(hex, _)| hex);
        out
    }

    /// Find a piece anywhere on the board: its hex and level (0 = ground)
    pub fn locate(&self, id: PieceId) -> Option<(Hex, usize)> {
        self.stacks.iter().find_map(|(&hex, stack)| {
            stack.iter().position(|p| p.id == id).map(|level| (hex, level))
        })
    }

    /// Every queen on the board, buried or not
    pub fn queens(&self) -> Vec<(Hex, Piece)> {
        let mut out: Vec<(Hex, Piece)> = self
            .stacks
            .iter()
            .flat_map(|(&hex, stack)| {
                stack
                    .iter()
                    .filter(|p| p.insect == Insect::Queen)
                    .map(move |&p| (hex, p))
            })
            .collect();
        out.sort_unstable_by_key(|&(hex, p)| (hex, p.id));
        out
    }

    /// Top pieces of the occupied neighbors, in direction order
    pub fn neighbor_pieces(&self, hex: Hex) -> impl Iterator<Item = (Hex, &Piece)> + '_ {
        hex.neighbors()
            .into_iter()
            .filter_map(move |n| self.top_piece(n).map(|p| (n, p)))
    }

    pub fn occupied_neighbor_count(&self, hex: Hex) -> usize {
        hex.neighbors().iter().filter(|&&n| self.is_occupied(n)).count()
    }

    /// True if some neighbor of `hex` other than `exclude` is occupied
    pub fn touches_hive(&self, hex: Hex, exclude: Option<Hex>) -> bool {
        hex.neighbors()
            .iter()
            .any(|&n| Some(n) != exclude && self.is_occupied(n))
    }

    /// Vacant hexes bordering the hive, in coordinate order
    pub fn frontier(&self) -> Vec<Hex> {
        let set: BTreeSet<Hex> = self
            .stacks
            .keys()
            .flat_map(|h| h.neighbors())
            .filter(|n| !self.is_occupied(*n))
            .collect();
        set.into_iter().collect()
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Put a piece on top of whatever is at `hex`
    pub fn place(&mut self, hex: Hex, piece: Piece) {
        self.stacks.entry(hex).or_default().push(piece);
    }

    /// Lift the top piece. An emptied stack is dropped from the map.
    pub fn remove_top(&mut self, hex: Hex) -> Option<Piece> {
        let stack = self.stacks.get_mut(&hex)?;
        let piece = stack.pop();
        if stack.is_empty() {
            self.stacks.remove(&hex);
        }
        piece
    }

    /// Move the top piece of `from` onto `to`, returning it
    pub fn move_top(&mut self, from: Hex, to: Hex) -> Option<Piece> {
        let piece = self.remove_top(from)?;
        self.place(to, piece);
        Some(piece)
    }

    // ========================================================================
    // CONNECTIVITY
    // ========================================================================

    /// Would lifting the top piece at `candidate` break the hive in two?
    ///
    /// The hex only becomes vacant if it held a single piece. With at most
    /// one occupied hex left nothing can be split.
    pub fn would_split_hive(&self, candidate: Hex) -> bool {
        let vacated = self.height(candidate) == 1;
        let remaining = self.stacks.len() - usize::from(vacated);
        if remaining <= 1 {
            return false;
        }
        let is_gone = |h: Hex| vacated && h == candidate;

        let start = match self.stacks.keys().copied().find(|&h| !is_gone(h)) {
            Some(h) => h,
            None => return false,
        };

        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut frontier = vec![start];
        while let Some(cur) = frontier.pop() {
            for n in cur.neighbors() {
                if self.is_occupied(n) && !is_gone(n) && visited.insert(n) {
                    frontier.push(n);
                }
            }
        }

        visited.len() < remaining
    }

    /// One connected group (trivially true for an empty board)
    pub fn is_connected(&self) -> bool {
        let start = match self.stacks.keys().next() {
            Some(&h) => h,
            None => return true,
        };
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut frontier = vec![start];
        while let Some(cur) = frontier.pop() {
            for n in cur.neighbors() {
                if self.is_occupied(n) && visited.insert(n) {
                    frontier.push(n);
                }
            }
        }
        visited.len() == self.stacks.len()
    }
}
