//! Pairing model — one round's assignments between two rosters.

use serde::{Deserialize, Serialize};

use super::PlayerName;

/// The format a pairing is played in, once both players' modes are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Core,
    Movie,
    Any,
    /// No opponent this round.
    Bye,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Core => write!(f, "core"),
            MatchMode::Movie => write!(f, "movie"),
            MatchMode::Any => write!(f, "any"),
            MatchMode::Bye => write!(f, "bye"),
        }
    }
}

/// A single assignment: two players from opposite teams, or a bye.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub game_mode: MatchMode,

    /// Always present. For regular pairings this is the first team's player.
    pub player_1: PlayerName,

    /// `None` when this is a bye for `player_1`.
    pub player_2: Option<PlayerName>,
}

impl Pairing {
    pub fn game(game_mode: MatchMode, player_1: PlayerName, player_2: PlayerName) -> Self {
        Self {
            game_mode,
            player_1,
            player_2: Some(player_2),
        }
    }

    pub fn bye(player: PlayerName) -> Self {
        Self {
            game_mode: MatchMode::Bye,
            player_1: player,
            player_2: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_2.is_none()
    }

    /// Returns true if `name` plays in this pairing.
    pub fn involves(&self, name: &PlayerName) -> bool {
        &self.player_1 == name || self.player_2.as_ref() == Some(name)
    }
}

impl std::fmt::Display for Pairing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.player_2 {
            Some(opponent) => write!(f, "{} vs {} ({})", self.player_1, opponent, self.game_mode),
            None => write!(f, "{} has a bye", self.player_1),
        }
    }
}

/// The complete set of pairings for one round. Never modified once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingResult {
    pairings: Vec<Pairing>,
}

impl PairingResult {
    pub(crate) fn new(pairings: Vec<Pairing>) -> Self {
        Self { pairings }
    }

    pub fn pairings(&self) -> &[Pairing] {
        &self.pairings
    }

    pub fn bye_count(&self) -> usize {
        self.pairings.iter().filter(|p| p.is_bye()).count()
    }

    pub fn len(&self) -> usize {
        self.pairings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pairing> {
        self.pairings.iter()
    }

    /// The pairing a player is part of, if any.
    pub fn find(&self, name: &PlayerName) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.involves(name))
    }
}

impl<'a> IntoIterator for &'a PairingResult {
    type Item = &'a Pairing;
    type IntoIter = std::slice::Iter<'a, Pairing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairings.iter()
    }
}
