//! Filesystem league store.
//!
//! Handles reading and writing the league data directory:
//! - Team rosters (one JSONL file per team)
//! - Round sheets (`round_<n>.jsonl`, one pairing per line)

mod jsonl;
mod league;

pub use jsonl::*;
pub use league::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::models::ModelError;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at {path:?} line {line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Round {0} has no sheet")]
    MissingRound(u32),

    #[error("No rounds have been written yet")]
    NoRounds,

    #[error("Player {0:?} not found")]
    UnknownPlayer(String),

    #[error("Player {name:?} had a bye in round {round}; byes carry no result")]
    ByeResult { round: u32, name: String },

    #[error("Player {name:?} is on both {first:?} and {second:?}")]
    DuplicatePlayer {
        name: String,
        first: String,
        second: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

/// File name prefix of round sheets.
pub const ROUND_FILE_PREFIX: &str = "round_";

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn rosters_dir(&self) -> PathBuf {
        self.data_dir.join("rosters")
    }

    pub fn rounds_dir(&self) -> PathBuf {
        self.data_dir.join("rounds")
    }

    pub fn roster_path(&self, team: &str) -> PathBuf {
        self.rosters_dir().join(format!("{}.jsonl", team_slug(team)))
    }

    pub fn round_path(&self, round: u32) -> PathBuf {
        self.rounds_dir()
            .join(format!("{}{}.jsonl", ROUND_FILE_PREFIX, round))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// File-system friendly form of a team name: lowercase, `_` for anything
/// that is not alphanumeric.
pub fn team_slug(team: &str) -> String {
    team.trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
