//! Team rosters.

use std::collections::HashMap;

use super::{ModelError, Player, PlayerName};

/// A team and its players, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    name: String,
    players: Vec<Player>,
    /// Normalized player name -> index into `players`.
    index: HashMap<String, usize>,
}

impl Roster {
    /// Create an empty roster. The team name must not be blank.
    pub fn new(name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(ModelError::EmptyTeamName);
        }
        Ok(Self {
            name: name.to_string(),
            players: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Build a roster from players, rejecting duplicate names.
    pub fn with_players(
        name: impl Into<String>,
        players: impl IntoIterator<Item = Player>,
    ) -> Result<Self, ModelError> {
        let mut roster = Self::new(name)?;
        for player in players {
            roster.add_player(player)?;
        }
        Ok(roster)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a player. Names are unique per roster (case-insensitive).
    pub fn add_player(&mut self, player: Player) -> Result<(), ModelError> {
        let key = player.name.key().to_string();
        if self.index.contains_key(&key) {
            return Err(ModelError::DuplicatePlayer {
                team: self.name.clone(),
                name: player.name.to_string(),
            });
        }
        self.index.insert(key, self.players.len());
        self.players.push(player);
        Ok(())
    }

    /// Look up a player (including dropped ones) by name.
    pub fn get(&self, name: &PlayerName) -> Option<&Player> {
        self.index.get(name.key()).map(|&i| &self.players[i])
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &PlayerName) -> Option<&mut Player> {
        match self.index.get(name.key()) {
            Some(&i) => self.players.get_mut(i),
            None => None,
        }
    }

    /// Every player, dropped ones included, in roster order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Players that have not dropped, in roster order.
    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_active())
    }

    /// Total wins of the active players.
    pub fn score(&self) -> u32 {
        self.active_players().fold(0u32, |total, p| total.saturating_add(p.wins))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
