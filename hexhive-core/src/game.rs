//! Game state: placement, movement, turn order and win detection
//!
//! Every request is checked in full against the current position before
//! anything changes. A rejected request leaves the state untouched.

use crate::abilities::{movement_types, resolve, MovementType};
use crate::board::Hex;
use crate::hive::Hive;
use crate::pieces::{Insect, Piece, PieceId, Player};
use crate::ruleset::{Hand, RuleSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The queen must be down by this placement (1-based)
const QUEEN_DEADLINE: u32 = 4;

/// Placements needed before a stuck player may pass without a queen
const MIN_PLACEMENTS_TO_PASS: u32 = 2;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Game result
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    /// Both queens surrounded by the same action
    Draw,
}

/// Where the game is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Nothing committed yet
    Setup,
    Playing,
    GameOver(GameResult),
}

/// A turn a player can take
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Place { insect: Insect, hex: Hex },
    Move { piece: PieceId, to: Hex },
}

/// What the last committed move did, for move feedback
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub piece: Piece,
    pub from: Hex,
    pub to: Hex,
    pub via: MovementType,
    /// Set when a mosquito moved by copying a neighbor
    pub copied: Option<Insect>,
    pub path: Vec<Hex>,
}

/// Read-only view for rendering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Bottom-to-top stacks in coordinate order
    pub stacks: Vec<(Hex, Vec<Piece>)>,
    pub white_hand: Hand,
    pub black_hand: Hand,
    pub current_player: Player,
    pub phase: Phase,
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("the game is over")]
    GameOver,

    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Player),

    #[error("{0} is not in play under these rules")]
    KindNotInPlay(Insect),

    #[error("no {0} left in hand")]
    HandExhausted(Insect),

    #[error("hex {0} is already occupied")]
    OccupiedHex(Hex),

    #[error("hex {0} must touch a friendly piece and no opposing piece")]
    InvalidAdjacency(Hex),

    #[error("the queen must be placed by the fourth placement")]
    QueenDeadlineMissed,

    #[error("the queen may not be placed on the first placement")]
    TournamentFirstTurnQueenBan,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("the game is over")]
    GameOver,

    #[error("it is not {0:?}'s turn")]
    NotYourTurn(Player),

    #[error("piece {0} is not on the board")]
    UnknownPiece(PieceId),

    #[error("piece {0} is covered")]
    PiecePinned(PieceId),

    #[error("pieces cannot move before their queen is placed")]
    QueenNotPlacedYet,

    #[error("the queen may not move on the first turn")]
    TournamentFirstTurnQueenMoveBan,

    #[error("piece {0} belongs to the opponent and nothing can throw it")]
    NotYourPiece(PieceId),

    #[error("no movement reaches {0}")]
    NoLegalMovementType(Hex),

    #[error("moving the piece would split the hive")]
    WouldSplitHive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PassError {
    #[error("the game is over")]
    GameOver,

    #[error("passing is only allowed with the queen placed or with no legal action")]
    PassNotAllowed,
}

/// Any rejected action
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Move(#[from] MoveError),
}

// ============================================================================
// GAME STATE
// ============================================================================

/// Game state
#[derive(Clone, Debug)]
pub struct GameState {
    rules: RuleSet,

    /// Board: hex -> stack (sparse representation)
    hive: Hive,

    /// Indexed by `Player::index`
    hands: [Hand; 2],
    queen_placed: [bool; 2],
    placements: [u32; 2],
    turns_taken: [u32; 2],

    current_player: Player,
    phase: Phase,
    next_id: u16,
    last_move: Option<MoveRecord>,
}

impl GameState {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Empty board, full hands, white to play
    pub fn new(rules: RuleSet) -> Self {
        let hand = rules.starting_hand();
        Self {
            rules,
            hive: Hive::new(),
            hands: [hand, hand],
            queen_placed: [false; 2],
            placements: [0; 2],
            turns_taken: [0; 2],
            current_player: Player::White,
            phase: Phase::Setup,
            next_id: 0,
            last_move: None,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn hive(&self) -> &Hive {
        &self.hive
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Game result, once there is one
    pub fn result(&self) -> Option<GameResult> {
        match self.phase {
            Phase::GameOver(result) => Some(result),
            Phase::Setup | Phase::Playing => None,
        }
    }

    pub fn hand(&self, player: Player) -> &Hand {
        &self.hands[player.index()]
    }

    pub fn queen_placed(&self, player: Player) -> bool {
        self.queen_placed[player.index()]
    }

    /// Placement turns taken so far
    pub fn placements(&self, player: Player) -> u32 {
        self.placements[player.index()]
    }

    /// Completed turns of any kind, passes included
    pub fn turns_taken(&self, player: Player) -> u32 {
        self.turns_taken[player.index()]
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.last_move.as_ref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stacks: self
                .hive
                .stacks()
                .into_iter()
                .map(|(hex, stack)| (hex, stack.to_vec()))
                .collect(),
            white_hand: self.hands[Player::White.index()],
            black_hand: self.hands[Player::Black.index()],
            current_player: self.current_player,
            phase: self.phase,
        }
    }

    // ========================================================================
    // PLACEMENT
    // ========================================================================

    /// Check a placement without committing it
    pub fn check_placement(
        &self,
        player: Player,
        insect: Insect,
        hex: Hex,
    ) -> Result<(), PlacementError> {
        if matches!(self.phase, Phase::GameOver(_)) {
            return Err(PlacementError::GameOver);
        }
        if player != self.current_player {
            return Err(PlacementError::NotYourTurn(player));
        }
        if !self.rules.is_enabled(insect) {
            return Err(PlacementError::KindNotInPlay(insect));
        }
        if self.hand(player).count(insect) == 0 {
            return Err(PlacementError::HandExhausted(insect));
        }
        if self.hive.is_occupied(hex) {
            return Err(PlacementError::OccupiedHex(hex));
        }
        if !self.placement_touches_correctly(player, hex) {
            return Err(PlacementError::InvalidAdjacency(hex));
        }

        let placed = self.placements(player);
        if self.rules.tournament_rules && placed == 0 && insect == Insect::Queen {
            return Err(PlacementError::TournamentFirstTurnQueenBan);
        }
        if !self.queen_placed(player) && placed + 1 >= QUEEN_DEADLINE && insect != Insect::Queen {
            return Err(PlacementError::QueenDeadlineMissed);
        }
        Ok(())
    }

    /// First piece anywhere; second piece touching it; after that,
    /// touching only friendly pieces
    fn placement_touches_correctly(&self, player: Player, hex: Hex) -> bool {
        if self.hive.is_empty() {
            return true;
        }
        let total_placed: u32 = self.placements.iter().sum();
        if total_placed == 1 {
            return self.hive.touches_hive(hex, None);
        }

        let mut friendly = false;
        for (_, piece) in self.hive.neighbor_pieces(hex) {
            if piece.owner != player {
                return false;
            }
            friendly = true;
        }
        friendly
    }

    /// Place a piece from `player`'s hand
    #[doc(alias = "place_piece")]
    pub fn submit_placement(
        &mut self,
        player: Player,
        insect: Insect,
        hex: Hex,
    ) -> Result<(), PlacementError> {
        if let Err(e) = self.check_placement(player, insect, hex) {
            tracing::debug!(?player, %insect, %hex, error = %e, "placement rejected");
            return Err(e);
        }

        let idx = player.index();
        self.hands[idx].take(insect);
        let piece = Piece { id: PieceId(self.next_id), owner: player, insect };
        self.next_id += 1;
        self.hive.place(hex, piece);
        if insect == Insect::Queen {
            self.queen_placed[idx] = true;
        }
        self.placements[idx] += 1;

        tracing::debug!(%piece, %hex, "placed");
        self.finish_turn(player);
        Ok(())
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// Check a move without committing it. On success returns the record
    /// the move would produce.
    pub fn check_move(
        &self,
        player: Player,
        id: PieceId,
        to: Hex,
    ) -> Result<MoveRecord, MoveError> {
        if matches!(self.phase, Phase::GameOver(_)) {
            return Err(MoveError::GameOver);
        }
        if player != self.current_player {
            return Err(MoveError::NotYourTurn(player));
        }
        let (from, level) = self.hive.locate(id).ok_or(MoveError::UnknownPiece(id))?;
        if level + 1 != self.hive.height(from) {
            return Err(MoveError::PiecePinned(id));
        }
        let piece = self.hive.stack_at(from)[level];

        if !self.queen_placed(player) {
            return Err(MoveError::QueenNotPlacedYet);
        }
        if self.rules.tournament_rules
            && piece.owner == player
            && piece.insect == Insect::Queen
            && self.turns_taken(player) == 0
        {
            return Err(MoveError::TournamentFirstTurnQueenMoveBan);
        }

        if piece.owner != player && movement_types(&self.hive, player, from).is_empty() {
            return Err(MoveError::NotYourPiece(id));
        }
        if to == from {
            return Err(MoveError::NoLegalMovementType(to));
        }
        let resolution = resolve(&self.hive, player, from, to);
        let via = resolution.via.ok_or(MoveError::NoLegalMovementType(to))?;

        if self.hive.would_split_hive(from) {
            return Err(MoveError::WouldSplitHive);
        }

        Ok(MoveRecord {
            piece,
            from,
            to,
            via,
            copied: resolution.validation.copied,
            path: resolution.validation.path,
        })
    }

    /// Move the piece `id` to `to`, by its own movement or by a throw
    #[doc(alias = "move_piece")]
    pub fn submit_move(&mut self, player: Player, id: PieceId, to: Hex) -> Result<(), MoveError> {
        let record = match self.check_move(player, id, to) {
            Ok(record) => record,
            Err(e) => {
                tracing::debug!(?player, piece = %id, %to, error = %e, "move rejected");
                return Err(e);
            }
        };

        self.hive.move_top(record.from, record.to);
        tracing::debug!(
            piece = %record.piece,
            from = %record.from,
            to = %record.to,
            via = ?record.via,
            thrower = ?record.via.actor(),
            "moved"
        );
        self.last_move = Some(record);
        self.finish_turn(player);
        Ok(())
    }

    /// Every hex `id` could legally move to for the player on turn
    pub fn legal_destinations(&self, id: PieceId) -> BTreeSet<Hex> {
        let from = match self.hive.locate(id) {
            Some((hex, _)) => hex,
            None => return BTreeSet::new(),
        };
        self.candidate_targets()
            .into_iter()
            .filter(|&to| to != from && self.check_move(self.current_player, id, to).is_ok())
            .collect()
    }

    /// Occupied hexes plus the vacant rim around them
    fn candidate_targets(&self) -> BTreeSet<Hex> {
        let mut targets: BTreeSet<Hex> = self.hive.occupied().into_iter().collect();
        targets.extend(self.hive.frontier());
        targets
    }

    // ========================================================================
    // TURNS
    // ========================================================================

    /// Every action the player on turn could take, in a stable order:
    /// placements by kind then hex, then moves by piece position then hex
    pub fn legal_actions(&self) -> Vec<Action> {
        if matches!(self.phase, Phase::GameOver(_)) {
            return Vec::new();
        }
        let player = self.current_player;
        let mut actions = Vec::new();

        let hand = self.hand(player);
        let spots = if hand.is_empty() {
            Vec::new()
        } else if self.hive.is_empty() {
            vec![Hex::ORIGIN]
        } else {
            self.hive.frontier()
        };
        for insect in hand.available() {
            for &hex in &spots {
                if self.check_placement(player, insect, hex).is_ok() {
                    actions.push(Action::Place { insect, hex });
                }
            }
        }

        if self.queen_placed(player) {
            for (_, stack) in self.hive.stacks() {
                let Some(piece) = stack.last() else { continue };
                for to in self.legal_destinations(piece.id) {
                    actions.push(Action::Move { piece: piece.id, to });
                }
            }
        }

        actions
    }

    /// Apply either kind of action
    pub fn apply(&mut self, action: Action) -> Result<(), ActionError> {
        let player = self.current_player;
        match action {
            Action::Place { insect, hex } => self.submit_placement(player, insect, hex)?,
            Action::Move { piece, to } => self.submit_move(player, piece, to)?,
        }
        Ok(())
    }

    /// Pass the turn
    pub fn end_turn(&mut self) -> Result<(), PassError> {
        if matches!(self.phase, Phase::GameOver(_)) {
            return Err(PassError::GameOver);
        }
        let player = self.current_player;
        let stuck = self.placements(player) >= MIN_PLACEMENTS_TO_PASS
            && self.legal_actions().is_empty();
        if !self.queen_placed(player) && !stuck {
            tracing::debug!(?player, "pass rejected");
            return Err(PassError::PassNotAllowed);
        }

        tracing::debug!(?player, "passed");
        self.turns_taken[player.index()] += 1;
        self.current_player = player.opponent();
        Ok(())
    }

    fn finish_turn(&mut self, player: Player) {
        self.turns_taken[player.index()] += 1;
        self.phase = Phase::Playing;
        self.check_surrounded_queens();
        if self.phase == Phase::Playing {
            self.current_player = player.opponent();
        }
    }

    /// A queen with all six neighbors filled loses the game for its owner
    fn check_surrounded_queens(&mut self) {
        let mut lost = [false; 2];
        for (hex, queen) in self.hive.queens() {
            if self.hive.occupied_neighbor_count(hex) == 6 {
                lost[queen.owner.index()] = true;
            }
        }

        let result = match (lost[Player::White.index()], lost[Player::Black.index()]) {
            (true, true) => GameResult::Draw,
            (true, false) => GameResult::BlackWins,
            (false, true) => GameResult::WhiteWins,
            (false, false) => return,
        };
        tracing::info!(?result, "game over");
        self.phase = Phase::GameOver(result);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(RuleSet::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
