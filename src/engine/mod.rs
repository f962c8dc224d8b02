//! Round pairing engine.
//!
//! Turns two rosters into one round of pairings:
//! - **compat**: which game modes can meet, and in which format
//! - **history**: whether two players have already met
//! - **search**: the candidate graph and the matching search over it
//!
//! The engine only reads the rosters it is given and performs no I/O.

mod compat;
mod history;
mod search;

pub use compat::resolve;
pub use history::already_faced;

use std::collections::HashSet;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::models::{PairingResult, Player, PlayerName, Roster};

/// Errors that stop the engine before it reaches a verdict.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Team {team:?} has no active players")]
    EmptySide { team: String },

    #[error("Player {name:?} is listed in both teams")]
    DuplicatePlayer { name: String },

    #[error("Search stopped after {steps} steps before feasibility was decided")]
    Timeout { steps: u64 },
}

/// Limits for a single pairing search.
#[derive(Debug, Clone)]
pub struct PairingOptions {
    /// Upper bound on candidate checks during the search.
    pub max_steps: u64,
    /// Optional wall-clock limit.
    pub timeout: Option<Duration>,
}

impl Default for PairingOptions {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            timeout: None,
        }
    }
}

/// What the engine concluded for a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PairingOutcome {
    /// Every active player is paired or has a bye.
    Paired(PairingResult),
    /// No valid assignment exists. `unplaced` are players on the smaller
    /// side that the best matching could not give an opponent.
    Infeasible { unplaced: Vec<PlayerName> },
}

impl PairingOutcome {
    pub fn result(&self) -> Option<&PairingResult> {
        match self {
            PairingOutcome::Paired(result) => Some(result),
            PairingOutcome::Infeasible { .. } => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, PairingOutcome::Paired(_))
    }
}

/// Pair the active players of two teams for the next round.
pub fn pair_rosters(
    team_a: &Roster,
    team_b: &Roster,
    options: &PairingOptions,
) -> Result<PairingOutcome, EngineError> {
    validate_rosters(team_a, team_b)?;

    let side_a: Vec<&Player> = team_a.active_players().collect();
    let side_b: Vec<&Player> = team_b.active_players().collect();
    info!(
        "Pairing {} ({} active) against {} ({} active)",
        team_a.name(),
        side_a.len(),
        team_b.name(),
        side_b.len()
    );

    let outcome = search::find_pairings(&side_a, &side_b, options)?;
    match &outcome {
        PairingOutcome::Paired(result) => info!(
            "Found {} pairings ({} byes)",
            result.len(),
            result.bye_count()
        ),
        PairingOutcome::Infeasible { unplaced } => warn!(
            "No valid assignment; could not place: {}",
            unplaced
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }

    Ok(outcome)
}

fn validate_rosters(team_a: &Roster, team_b: &Roster) -> Result<(), EngineError> {
    for team in [team_a, team_b] {
        if team.active_players().next().is_none() {
            return Err(EngineError::EmptySide {
                team: team.name().to_string(),
            });
        }
    }

    let names: HashSet<&PlayerName> = team_a.players().iter().map(|p| &p.name).collect();
    if let Some(dup) = team_b.players().iter().find(|p| names.contains(&p.name)) {
        return Err(EngineError::DuplicatePlayer {
            name: dup.name.to_string(),
        });
    }

    Ok(())
}
