//! # Team Pairing
//!
//! Pairs the players of two teams for each round of a league, respecting the
//! game mode each player declared, who they have already played, and who has
//! already had a bye.
//!
//! ## Architecture
//!
//! - **models**: Players, rosters, pairings and persisted round records
//! - **engine**: Mode compatibility, rematch checks and the matching search
//! - **ingest**: Folds recorded results into rosters before pairing
//! - **storage**: JSONL league store (rosters and round sheets)
//! - **config**: Configuration loading and validation

pub mod config;
pub mod engine;
pub mod ingest;
pub mod models;
pub mod storage;

pub use engine::{pair_rosters, EngineError, PairingOptions, PairingOutcome};
pub use models::*;

use std::time::Duration;

/// Parse a human-friendly duration string (e.g., "2m", "30s", "500ms").
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(n) = s.strip_suffix("ms") {
        return n.parse().ok().map(Duration::from_millis);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else {
        // Default to seconds
        (s, 1)
    };

    let num: u64 = num_str.parse().ok()?;
    num.checked_mul(multiplier).map(Duration::from_secs)
}
