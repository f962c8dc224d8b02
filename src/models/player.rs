//! Player, player names and declared game modes.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ModelError;

/// A player's name.
///
/// Keeps the casing it was entered with for display and persistence, but
/// compares and hashes on the lowercased form so that `Alice` and `alice`
/// are the same player everywhere (identity, history, lookups).
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName {
    display: String,
    key: String,
}

impl PlayerName {
    /// Parse a name, trimming whitespace. Empty names are rejected.
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(ModelError::EmptyName);
        }
        Ok(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    /// The name as originally entered.
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// The normalized (lowercased) form used for comparisons.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PlayerName {}

impl Hash for PlayerName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

impl fmt::Debug for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerName({})", self.display)
    }
}

impl FromStr for PlayerName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.display
    }
}

/// Game mode a player has declared for the coming round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// Fixed primary format; only meets `Core` or `Any`.
    Core,
    /// Fixed secondary format; only meets `Movie` or `Any`.
    Movie,
    /// Plays whichever format the opponent needs.
    Any,
    /// Left the league. Never paired, never considered for a bye.
    Drop,
}

impl GameMode {
    /// Returns true unless the player has dropped.
    pub fn is_active(&self) -> bool {
        !matches!(self, GameMode::Drop)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Core => write!(f, "core"),
            GameMode::Movie => write!(f, "movie"),
            GameMode::Any => write!(f, "any"),
            GameMode::Drop => write!(f, "drop"),
        }
    }
}

impl FromStr for GameMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "core" => Ok(GameMode::Core),
            "movie" => Ok(GameMode::Movie),
            "any" => Ok(GameMode::Any),
            "drop" => Ok(GameMode::Drop),
            _ => Err(ModelError::UnknownGameMode(s.to_string())),
        }
    }
}

/// A league player and everything known about them from earlier rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,

    pub game_mode: GameMode,

    /// Cumulative match wins (not round wins).
    #[serde(default)]
    pub wins: u32,

    /// Opponents faced in earlier rounds, oldest first.
    #[serde(default)]
    pub history: Vec<PlayerName>,

    /// Whether the player has ever received a bye.
    #[serde(default)]
    pub had_bye: bool,
}

impl Player {
    /// Create a player with no wins, no history and no bye.
    pub fn new(name: PlayerName, game_mode: GameMode) -> Self {
        Self {
            name,
            game_mode,
            wins: 0,
            history: Vec::new(),
            had_bye: false,
        }
    }

    /// Builder method to set the win count.
    pub fn with_wins(mut self, wins: u32) -> Self {
        self.wins = wins;
        self
    }

    /// Builder method to set the opponent history.
    pub fn with_history(mut self, history: Vec<PlayerName>) -> Self {
        self.history = history;
        self
    }

    /// Builder method to mark the player as having had a bye.
    pub fn with_bye(mut self) -> Self {
        self.had_bye = true;
        self
    }

    pub fn is_active(&self) -> bool {
        self.game_mode.is_active()
    }

    /// Record a finished game against `opponent`.
    pub fn record_game(&mut self, opponent: PlayerName, wins: u32) {
        self.history.push(opponent);
        self.wins = self.wins.saturating_add(wins);
    }

    /// Record a bye, crediting any wins it carries.
    pub fn record_bye(&mut self, wins: u32) {
        self.had_bye = true;
        self.wins = self.wins.saturating_add(wins);
    }
}
