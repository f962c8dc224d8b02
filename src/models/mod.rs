//! Core data models: players, rosters, pairings and persisted round records.

mod ids;
mod pairing;
mod player;
mod roster;
mod round;

pub use ids::*;
pub use pairing::*;
pub use player::*;
pub use roster::*;
pub use round::*;

use thiserror::Error;

/// Errors raised while constructing model values.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Player name must not be empty")]
    EmptyName,

    #[error("Team name must not be empty")]
    EmptyTeamName,

    #[error("Unknown game mode: {0:?} (expected core, movie, any or drop)")]
    UnknownGameMode(String),

    #[error("Duplicate player {name:?} in team {team:?}")]
    DuplicatePlayer { team: String, name: String },
}
