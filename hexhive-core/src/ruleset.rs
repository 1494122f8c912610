//! RuleSet - which insects are in play and which variant rules apply

use crate::game::GameState;
use crate::pieces::Insect;
use serde::{Deserialize, Serialize};

/// Game configuration, fixed at setup
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub enable_mosquito: bool,
    pub enable_ladybug: bool,
    pub enable_pillbug: bool,
    /// No queen on a player's first placement
    pub tournament_rules: bool,
}

impl RuleSet {
    /// Start a game under these rules
    pub fn to_game_state(&self) -> GameState {
        GameState::new(*self)
    }

    /// The five base-game insects only
    pub fn base() -> Self {
        Self {
            enable_mosquito: false,
            enable_ladybug: false,
            enable_pillbug: false,
            tournament_rules: false,
        }
    }

    /// All expansions with the tournament opening
    pub fn tournament() -> Self {
        Self {
            tournament_rules: true,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self, insect: Insect) -> bool {
        match insect {
            Insect::Mosquito => self.enable_mosquito,
            Insect::Ladybug => self.enable_ladybug,
            Insect::Pillbug => self.enable_pillbug,
            Insect::Queen
            | Insect::Ant
            | Insect::Beetle
            | Insect::Grasshopper
            | Insect::Spider => true,
        }
    }

    /// A fresh hand under these rules
    pub fn starting_hand(&self) -> Hand {
        let mut hand = Hand::default();
        for insect in Insect::ALL {
            if self.is_enabled(insect) {
                hand.counts[insect as usize] = insect.standard_count();
            }
        }
        hand
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            enable_mosquito: true,
            enable_ladybug: true,
            enable_pillbug: true,
            tournament_rules: false,
        }
    }
}

/// Unplaced pieces per insect kind. Counts only ever go down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    counts: [u8; 8],
}

impl Hand {
    pub fn count(&self, insect: Insect) -> u8 {
        self.counts[insect as usize]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().map(|&c| c as u32).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Kinds with at least one piece left, in `Insect::ALL` order
    pub fn available(&self) -> impl Iterator<Item = Insect> + '_ {
        Insect::ALL.into_iter().filter(|&i| self.count(i) > 0)
    }

    /// Take one piece of a kind out of the hand
    pub(crate) fn take(&mut self, insect: Insect) -> bool {
        let slot = &mut self.counts[insect as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }
}
