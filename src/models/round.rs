//! Persisted records: roster entries and round results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameMode, MatchMode, Pairing, PlayerName, RecordId};

/// One line of a roster file: who plays and in which mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: PlayerName,
    pub game_mode: GameMode,
}

/// One line of a round file: a pairing and, once played, its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEntry {
    /// Unique identifier
    pub id: RecordId,

    pub player_1: PlayerName,

    /// `None` for a bye
    pub player_2: Option<PlayerName>,

    pub game_mode: MatchMode,

    /// Games won by player 1 in this match
    #[serde(default)]
    pub player_1_wins: u32,

    /// Games won by player 2 in this match
    #[serde(default)]
    pub player_2_wins: u32,

    /// When the pairing was written
    pub created_at: DateTime<Utc>,
}

impl RoundEntry {
    /// Create an unplayed entry for a pairing in the given round.
    ///
    /// Byes start with `bye_wins` credited to the player; games start at 0-0.
    pub fn from_pairing(round: u32, pairing: &Pairing, bye_wins: u32) -> Self {
        let round_str = round.to_string();
        let opponent = pairing.player_2.as_ref().map(|p| p.key()).unwrap_or("");
        let id = RecordId::generate(&[&round_str, pairing.player_1.key(), opponent]);

        Self {
            id,
            player_1: pairing.player_1.clone(),
            player_2: pairing.player_2.clone(),
            game_mode: pairing.game_mode,
            player_1_wins: if pairing.is_bye() { bye_wins } else { 0 },
            player_2_wins: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.player_2.is_none()
    }

    pub fn involves(&self, name: &PlayerName) -> bool {
        &self.player_1 == name || self.player_2.as_ref() == Some(name)
    }

    /// Set the recorded wins for `name` if they play in this entry.
    /// Returns false if the player is not part of it.
    pub fn set_wins(&mut self, name: &PlayerName, wins: u32) -> bool {
        if &self.player_1 == name {
            self.player_1_wins = wins;
            true
        } else if self.player_2.as_ref() == Some(name) {
            self.player_2_wins = wins;
            true
        } else {
            false
        }
    }
}
