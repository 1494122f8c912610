//! Per-insect movement validators
//!
//! Every validator answers one question: can the active piece at `origin`
//! reach `target` this turn? They run on a board with the moving piece
//! already lifted off, so the piece never blocks or supports itself.
//! A failed validation still carries the best partial path found, which a
//! renderer can use to show how close the attempt got.

use crate::board::Hex;
use crate::hive::Hive;
use crate::pieces::{Insect, Piece};
use rustc_hash::FxHashSet;
use std::cmp::Reverse;
use std::collections::VecDeque;

/// Spider and ladybug both take exactly this many steps
const THREE_STEPS: usize = 3;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Outcome of a single validator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub legal: bool,
    /// On success the route taken, origin first. On failure the partial
    /// route that ended closest to the target.
    pub path: Vec<Hex>,
    /// Set when a mosquito borrowed another kind's movement
    pub copied: Option<Insect>,
}

impl Validation {
    fn success(path: Vec<Hex>) -> Self {
        Self { legal: true, path, copied: None }
    }

    fn failure(path: Vec<Hex>) -> Self {
        Self { legal: false, path, copied: None }
    }

    fn copied_from(mut self, insect: Insect) -> Self {
        self.copied = Some(insect);
        self
    }
}

/// A grasshopper jump in one direction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Jump {
    pub direction: u8,
    pub landing: Hex,
    /// Occupied hexes passed over, always at least one
    pub jumped: u32,
}

impl Jump {
    fn path(&self, origin: Hex) -> Vec<Hex> {
        let mut path = vec![origin];
        let mut cur = origin;
        for _ in 0..=self.jumped {
            cur = cur.neighbor(self.direction);
            path.push(cur);
        }
        path
    }
}

// ============================================================================
// PATH ARENA
// ============================================================================

#[derive(Clone, Copy, Debug)]
struct Node {
    hex: Hex,
    parent: Option<usize>,
    depth: usize,
}

/// BFS nodes with back-pointers, so paths are only built for the answer
#[derive(Debug)]
struct PathArena {
    nodes: Vec<Node>,
}

impl PathArena {
    fn rooted_at(origin: Hex) -> Self {
        Self { nodes: vec![Node { hex: origin, parent: None, depth: 0 }] }
    }

    fn push(&mut self, hex: Hex, parent: usize) -> usize {
        let depth = self.nodes[parent].depth + 1;
        self.nodes.push(Node { hex, parent: Some(parent), depth });
        self.nodes.len() - 1
    }

    fn node(&self, idx: usize) -> Node {
        self.nodes[idx]
    }

    fn path(&self, idx: usize) -> Vec<Hex> {
        let mut path = Vec::with_capacity(self.nodes[idx].depth + 1);
        let mut cur = Some(idx);
        while let Some(i) = cur {
            path.push(self.nodes[i].hex);
            cur = self.nodes[i].parent;
        }
        path.reverse();
        path
    }

    fn path_contains(&self, idx: usize, hex: Hex) -> bool {
        let mut cur = Some(idx);
        while let Some(i) = cur {
            if self.nodes[i].hex == hex {
                return true;
            }
            cur = self.nodes[i].parent;
        }
        false
    }

    /// Node nearest the target; ties go to the longer path, then to the
    /// earlier discovery
    fn closest_to(&self, target: Hex) -> Vec<Hex> {
        let best = self
            .nodes
            .iter()
            .enumerate()
            .min_by_key(|(_, n)| (n.hex.distance_to(target), Reverse(n.depth)))
            .map_or(0, |(i, _)| i);
        self.path(best)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

// ============================================================================
// SHARED PRIMITIVES
// ============================================================================

/// Take the active piece off `origin`, returning the lifted board, the
/// piece, and the stack height it was standing on top of (including itself)
pub fn lift(hive: &Hive, origin: Hex) -> Option<(Hive, Piece, usize)> {
    let height = hive.height(origin);
    let mut lifted = hive.clone();
    let piece = lifted.remove_top(origin)?;
    Some((lifted, piece, height))
}

/// Can a ground piece slide from `from` to the adjacent hex `to`?
///
/// `board` must not contain the moving piece. The destination must be
/// vacant, must touch some piece other than through `from`, and the two
/// gate cells between `from` and `to` must not both be occupied. A piece
/// alone on the board only needs the destination to be vacant.
pub fn can_walk(board: &Hive, from: Hex, to: Hex) -> bool {
    let gate = match from.common_neighbors(to) {
        Some(gate) => gate,
        None => return false,
    };
    if board.is_occupied(to) {
        return false;
    }
    if board.is_empty() {
        return true;
    }
    if !board.touches_hive(to, Some(from)) {
        return false;
    }
    !(board.is_occupied(gate[0]) && board.is_occupied(gate[1]))
}

/// Every slide out of `from` that passes `can_walk`
pub fn walking_steps(board: &Hive, from: Hex) -> impl Iterator<Item = Hex> + '_ {
    from.neighbors()
        .into_iter()
        .filter(move |&n| can_walk(board, from, n))
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Validate a move for whatever piece is on top of `origin`
pub fn validate_move(hive: &Hive, origin: Hex, target: Hex) -> Validation {
    match lift(hive, origin) {
        Some((board, piece, height)) => validate_as(piece.insect, &board, origin, target, height),
        None => Validation::failure(Vec::new()),
    }
}

/// Run the validator for `insect` on a lifted board
pub fn validate_as(
    insect: Insect,
    board: &Hive,
    origin: Hex,
    target: Hex,
    height: usize,
) -> Validation {
    match insect {
        Insect::Queen | Insect::Pillbug => single_step(board, origin, target),
        Insect::Ant => ant(board, origin, target),
        Insect::Beetle => beetle(board, origin, target, height),
        Insect::Grasshopper => grasshopper(board, origin, target),
        Insect::Spider => spider(board, origin, target),
        Insect::Ladybug => ladybug(board, origin, target),
        Insect::Mosquito => mosquito(board, origin, target, height),
    }
}

// ============================================================================
// VALIDATORS
// ============================================================================

/// Queen and pillbug: one slide
fn single_step(board: &Hive, origin: Hex, target: Hex) -> Validation {
    if can_walk(board, origin, target) {
        Validation::success(vec![origin, target])
    } else {
        Validation::failure(vec![origin])
    }
}

/// Any number of slides, shortest route first
fn ant(board: &Hive, origin: Hex, target: Hex) -> Validation {
    let mut arena = PathArena::rooted_at(origin);
    let mut visited = FxHashSet::default();
    visited.insert(origin);
    let mut queue = VecDeque::from([0usize]);

    while let Some(idx) = queue.pop_front() {
        let hex = arena.node(idx).hex;
        for next in walking_steps(board, hex) {
            if !visited.insert(next) {
                continue;
            }
            let child = arena.push(next, idx);
            if next == target {
                return Validation::success(arena.path(child));
            }
            queue.push_back(child);
        }
    }

    tracing::trace!(explored = arena.len(), %origin, %target, "ant search exhausted");
    Validation::failure(arena.closest_to(target))
}

/// One step in any direction, climbing allowed
fn beetle(board: &Hive, origin: Hex, target: Hex, height: usize) -> Validation {
    let gate = match origin.common_neighbors(target) {
        Some(gate) => gate,
        None => return Validation::failure(vec![origin]),
    };

    let legal = if height > 1 {
        // Moving across the top of the hive: no gate, but the step has to
        // run along at least one occupied side.
        gate.iter().any(|&g| board.is_occupied(g))
    } else {
        board.is_occupied(target) || can_walk(board, origin, target)
    };

    if legal {
        Validation::success(vec![origin, target])
    } else {
        Validation::failure(vec![origin])
    }
}

/// Jump in a straight line over at least one piece
pub fn grasshopper_jump(board: &Hive, origin: Hex, direction: u8) -> Option<Jump> {
    let mut cur = origin.neighbor(direction);
    let mut jumped = 0;
    while board.is_occupied(cur) {
        jumped += 1;
        cur = cur.neighbor(direction);
    }
    if jumped == 0 {
        return None;
    }
    Some(Jump { direction, landing: cur, jumped })
}

fn grasshopper(board: &Hive, origin: Hex, target: Hex) -> Validation {
    let jumps: Vec<Jump> = (0..6u8)
        .filter_map(|d| grasshopper_jump(board, origin, d))
        .collect();

    if let Some(jump) = jumps.iter().find(|j| j.landing == target) {
        return Validation::success(jump.path(origin));
    }

    let partial = jumps
        .iter()
        .min_by_key(|j| j.landing.distance_to(target))
        .map_or_else(|| vec![origin], |j| j.path(origin));
    Validation::failure(partial)
}

/// Exactly three slides, never revisiting a hex
fn spider(board: &Hive, origin: Hex, target: Hex) -> Validation {
    let mut arena = PathArena::rooted_at(origin);
    let mut queue = VecDeque::from([0usize]);

    while let Some(idx) = queue.pop_front() {
        let node = arena.node(idx);
        if node.depth == THREE_STEPS {
            continue;
        }
        for next in walking_steps(board, node.hex) {
            if arena.path_contains(idx, next) {
                continue;
            }
            let child = arena.push(next, idx);
            if node.depth + 1 == THREE_STEPS && next == target {
                return Validation::success(arena.path(child));
            }
            queue.push_back(child);
        }
    }

    tracing::trace!(explored = arena.len(), %origin, %target, "spider search exhausted");
    Validation::failure(arena.closest_to(target))
}

/// Up onto the hive, across it, and down into a vacant hex
fn ladybug(board: &Hive, origin: Hex, target: Hex) -> Validation {
    let mut arena = PathArena::rooted_at(origin);
    let mut queue = VecDeque::from([0usize]);

    while let Some(idx) = queue.pop_front() {
        let node = arena.node(idx);
        if node.depth == THREE_STEPS {
            continue;
        }
        for next in node.hex.neighbors() {
            let allowed = match node.depth {
                // climb on
                0 => board.is_occupied(next),
                // crawl across; the path check keeps it off the start hex
                1 => board.is_occupied(next),
                // climb down next to the hive
                _ => !board.is_occupied(next) && board.touches_hive(next, None),
            };
            if !allowed || (node.depth < 2 && arena.path_contains(idx, next)) {
                continue;
            }
            let child = arena.push(next, idx);
            if node.depth + 1 == THREE_STEPS && next == target {
                return Validation::success(arena.path(child));
            }
            queue.push_back(child);
        }
    }

    Validation::failure(arena.closest_to(target))
}

/// Distinct kinds a mosquito at `origin` can copy, in `Insect::ALL` order
pub fn mirrored_kinds(board: &Hive, origin: Hex) -> Vec<Insect> {
    let adjacent: FxHashSet<Insect> = board
        .neighbor_pieces(origin)
        .map(|(_, p)| p.insect)
        .collect();
    Insect::ALL
        .into_iter()
        .filter(|&k| k != Insect::Mosquito && adjacent.contains(&k))
        .collect()
}

/// Borrow the movement of a neighbor. On top of the hive only the beetle
/// movement is available.
fn mosquito(board: &Hive, origin: Hex, target: Hex, height: usize) -> Validation {
    if height > 1 {
        return beetle(board, origin, target, height).copied_from(Insect::Beetle);
    }

    let mut best: Option<Validation> = None;
    for kind in mirrored_kinds(board, origin) {
        let attempt = validate_as(kind, board, origin, target, height);
        if attempt.legal {
            return attempt.copied_from(kind);
        }
        let closer = match &best {
            None => true,
            Some(b) => partial_rank(&attempt.path, target) < partial_rank(&b.path, target),
        };
        if closer {
            best = Some(attempt);
        }
    }

    best.map(|v| Validation { copied: None, ..v })
        .unwrap_or_else(|| Validation::failure(vec![origin]))
}

fn partial_rank(path: &[Hex], target: Hex) -> (u32, Reverse<usize>) {
    let end = path.last().map_or(u32::MAX, |h| h.distance_to(target));
    (end, Reverse(path.len()))
}

// ============================================================================
// TESTS
// ============================================================================
