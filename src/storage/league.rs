//! League store: rosters and round sheets under one data directory.

use std::collections::HashMap;
use std::fs;

use tracing::{info, warn};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError, ROUND_FILE_PREFIX};
use crate::ingest;
use crate::models::{GameMode, PairingResult, Player, PlayerName, Roster, RosterEntry, RoundEntry};

/// Reads and writes league state for the pairing commands.
#[derive(Debug, Clone)]
pub struct LeagueStore {
    config: StorageConfig,
}

impl LeagueStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn roster_entries(&self, team: &str) -> Result<Vec<RosterEntry>, StorageError> {
        JsonlReader::new(self.config.roster_path(team)).read_all()
    }

    /// Load one team's roster as registered, without any results applied.
    pub fn load_roster(&self, team: &str) -> Result<Roster, StorageError> {
        let reader = JsonlReader::<RosterEntry>::new(self.config.roster_path(team));
        if !reader.exists() {
            return Err(StorageError::PathNotFound(reader.path().to_path_buf()));
        }

        let players = reader
            .read_all()?
            .into_iter()
            .map(|e| Player::new(e.name, e.game_mode));
        Ok(Roster::with_players(team, players)?)
    }

    /// Load several teams. A player name may only appear on one of them.
    pub fn load_rosters(&self, teams: &[String]) -> Result<Vec<Roster>, StorageError> {
        let rosters = teams
            .iter()
            .map(|team| self.load_roster(team))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen: HashMap<&PlayerName, &str> = HashMap::new();
        for roster in &rosters {
            for player in roster.players() {
                if let Some(first) = seen.insert(&player.name, roster.name()) {
                    return Err(StorageError::DuplicatePlayer {
                        name: player.name.to_string(),
                        first: first.to_string(),
                        second: roster.name().to_string(),
                    });
                }
            }
        }

        Ok(rosters)
    }

    /// Highest round number with a sheet, or 0 before the first round.
    pub fn last_round_number(&self) -> Result<u32, StorageError> {
        let dir = self.config.rounds_dir();
        if !dir.exists() {
            return Ok(0);
        }

        let mut last = 0;
        for entry in fs::read_dir(&dir)? {
            let file_name = entry?.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            let Some(rest) = file_name.strip_prefix(ROUND_FILE_PREFIX) else {
                continue;
            };

            let round: u32 = rest
                .strip_suffix(".jsonl")
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| StorageError::InvalidPath(file_name.to_string()))?;
            last = last.max(round);
        }

        Ok(last)
    }

    pub fn read_round(&self, round: u32) -> Result<Vec<RoundEntry>, StorageError> {
        let reader = JsonlReader::<RoundEntry>::new(self.config.round_path(round));
        if !reader.exists() {
            return Err(StorageError::MissingRound(round));
        }
        reader.read_all()
    }

    /// Load rosters and fold in every recorded round, oldest first.
    pub fn load_league(&self, teams: &[String]) -> Result<Vec<Roster>, StorageError> {
        let mut rosters = self.load_rosters(teams)?;
        let last = self.last_round_number()?;

        let rounds = (1..=last)
            .map(|round| self.read_round(round).map(|entries| (round, entries)))
            .collect::<Result<Vec<_>, _>>()?;
        ingest::apply_rounds(&mut rosters, rounds)?;

        info!("Loaded {} teams with {} recorded rounds", rosters.len(), last);
        Ok(rosters)
    }

    /// Write a new round sheet after the last one. Returns its number.
    pub fn write_next_round(
        &self,
        result: &PairingResult,
        bye_wins: u32,
    ) -> Result<u32, StorageError> {
        let round = self.last_round_number()? + 1;
        let entries: Vec<RoundEntry> = result
            .iter()
            .map(|p| RoundEntry::from_pairing(round, p, bye_wins))
            .collect();

        JsonlWriter::new(self.config.round_path(round)).write_all(&entries)?;
        info!("Wrote round {} with {} pairings", round, entries.len());
        Ok(round)
    }

    /// Register a player with a team, creating the roster if needed.
    pub fn add_player(&self, team: &str, entry: RosterEntry) -> Result<(), StorageError> {
        let mut existing: Vec<Player> = self
            .roster_entries(team)?
            .into_iter()
            .map(|e| Player::new(e.name, e.game_mode))
            .collect();
        existing.push(Player::new(entry.name.clone(), entry.game_mode));
        Roster::with_players(team, existing)?;

        JsonlWriter::new(self.config.roster_path(team)).append(&entry)?;
        info!("Added {} ({}) to {}", entry.name, entry.game_mode, team);
        Ok(())
    }

    /// Change a player's declared mode. Returns the team they play for.
    pub fn set_mode(
        &self,
        teams: &[String],
        name: &PlayerName,
        game_mode: GameMode,
    ) -> Result<String, StorageError> {
        for team in teams {
            let mut entries = self.roster_entries(team)?;
            if let Some(entry) = entries.iter_mut().find(|e| &e.name == name) {
                let previous = entry.game_mode;
                entry.game_mode = game_mode;
                JsonlWriter::new(self.config.roster_path(team)).write_all(&entries)?;
                info!("{} ({}): {} -> {}", name, team, previous, game_mode);
                return Ok(team.clone());
            }
        }

        Err(StorageError::UnknownPlayer(name.to_string()))
    }

    /// Record how many games a player won in a round (the latest by default).
    /// Returns the round that was updated. A bye keeps the credit it was
    /// written with.
    pub fn record_wins(
        &self,
        round: Option<u32>,
        name: &PlayerName,
        wins: u32,
    ) -> Result<u32, StorageError> {
        let round = match round {
            Some(round) => round,
            None => match self.last_round_number()? {
                0 => return Err(StorageError::NoRounds),
                last => last,
            },
        };

        let mut entries = self.read_round(round)?;
        let Some(entry) = entries.iter_mut().find(|e| e.involves(name)) else {
            return Err(StorageError::UnknownPlayer(name.to_string()));
        };

        if entry.is_bye() {
            warn!("{} had a bye in round {}; not recording {} wins", name, round, wins);
            return Err(StorageError::ByeResult {
                round,
                name: name.to_string(),
            });
        }
        entry.set_wins(name, wins);

        JsonlWriter::new(self.config.round_path(round)).write_all(&entries)?;
        Ok(round)
    }
}
