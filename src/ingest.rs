//! Result ingestion.
//!
//! Folds recorded rounds into the rosters so that wins, opponent history and
//! byes are up to date before the next round is paired.

use thiserror::Error;
use tracing::debug;

use crate::models::{Player, PlayerName, Roster, RoundEntry};

/// Errors raised while applying recorded results.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Round {round}: player {name:?} is not on any roster")]
    UnknownPlayer { round: u32, name: String },
}

fn find<'a>(rosters: &'a [Roster], name: &PlayerName) -> Option<&'a Player> {
    rosters.iter().find_map(|r| r.get(name))
}

fn find_mut<'a>(rosters: &'a mut [Roster], name: &PlayerName) -> Option<&'a mut Player> {
    rosters.iter_mut().find_map(|r| r.get_mut(name))
}

/// The roster's spelling of `name`, so history keeps the casing players were registered with.
fn registered_name(
    rosters: &[Roster],
    round: u32,
    name: &PlayerName,
) -> Result<PlayerName, IngestError> {
    find(rosters, name)
        .map(|p| p.name.clone())
        .ok_or_else(|| IngestError::UnknownPlayer {
            round,
            name: name.to_string(),
        })
}

/// Apply one round's results. Dropped players are still found and updated.
///
/// Nothing is changed if any entry names an unknown player.
pub fn apply_round(
    rosters: &mut [Roster],
    round: u32,
    entries: &[RoundEntry],
) -> Result<(), IngestError> {
    let mut resolved = Vec::with_capacity(entries.len());
    for entry in entries {
        let first = registered_name(rosters, round, &entry.player_1)?;
        let second = match &entry.player_2 {
            Some(n) => Some(registered_name(rosters, round, n)?),
            None => None,
        };
        resolved.push((entry, first, second));
    }

    for (entry, first, second) in resolved {
        match second {
            None => {
                if let Some(p) = find_mut(rosters, &first) {
                    p.record_bye(entry.player_1_wins);
                }
            }
            Some(second) => {
                if let Some(p) = find_mut(rosters, &first) {
                    p.record_game(second.clone(), entry.player_1_wins);
                }
                if let Some(p) = find_mut(rosters, &second) {
                    p.record_game(first, entry.player_2_wins);
                }
            }
        }
    }

    debug!("Applied {} results from round {}", entries.len(), round);
    Ok(())
}

/// Apply several rounds in the order given.
pub fn apply_rounds<I>(rosters: &mut [Roster], rounds: I) -> Result<(), IngestError>
where
    I: IntoIterator<Item = (u32, Vec<RoundEntry>)>,
{
    for (round, entries) in rounds {
        apply_round(rosters, round, &entries)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameMode, MatchMode, Pairing};

    fn name(s: &str) -> PlayerName {
        PlayerName::parse(s).unwrap()
    }

    fn rosters() -> Vec<Roster> {
        vec![
            Roster::with_players(
                "MK",
                vec![
                    Player::new(name("Alice"), GameMode::Core),
                    Player::new(name("Ann"), GameMode::Any),
                ],
            )
            .unwrap(),
            Roster::with_players(
                "Bedford",
                vec![
                    Player::new(name("Bob"), GameMode::Core),
                    Player::new(name("Bea"), GameMode::Drop),
                ],
            )
            .unwrap(),
        ]
    }

    fn game(round: u32, a: &str, b: &str, wa: u32, wb: u32) -> RoundEntry {
        let mut entry =
            RoundEntry::from_pairing(round, &Pairing::game(MatchMode::Core, name(a), name(b)), 0);
        entry.player_1_wins = wa;
        entry.player_2_wins = wb;
        entry
    }

    #[test]
    fn test_game_updates_both_players() {
        let mut rosters = rosters();
        apply_round(&mut rosters, 1, &[game(1, "alice", "BOB", 2, 1)]).unwrap();

        let alice = rosters[0].get(&name("Alice")).unwrap();
        let bob = rosters[1].get(&name("Bob")).unwrap();
        assert_eq!(alice.wins, 2);
        assert_eq!(bob.wins, 1);
        assert_eq!(alice.history[0].as_str(), "Bob");
        assert_eq!(bob.history[0].as_str(), "Alice");
    }

    #[test]
    fn test_bye_sets_flag_and_credits_wins() {
        let mut rosters = rosters();
        let bye = RoundEntry::from_pairing(1, &Pairing::bye(name("Ann")), 1);
        apply_round(&mut rosters, 1, &[bye]).unwrap();

        let ann = rosters[0].get(&name("Ann")).unwrap();
        assert!(ann.had_bye);
        assert_eq!(ann.wins, 1);
        assert!(ann.history.is_empty());
    }

    #[test]
    fn test_dropped_players_still_receive_results() {
        let mut rosters = rosters();
        apply_round(&mut rosters, 1, &[game(1, "Ann", "Bea", 0, 2)]).unwrap();

        assert_eq!(rosters[1].get(&name("Bea")).unwrap().wins, 2);
        assert_eq!(rosters[1].score(), 0);
    }

    #[test]
    fn test_unknown_player_leaves_rosters_untouched() {
        let mut rosters = rosters();
        let before = rosters.clone();

        let err = apply_round(
            &mut rosters,
            3,
            &[game(3, "Alice", "Bob", 2, 0), game(3, "Ann", "Zed", 1, 1)],
        )
        .unwrap_err();

        assert!(matches!(err, IngestError::UnknownPlayer { round: 3, .. }));
        assert_eq!(rosters, before);
    }

    #[test]
    fn test_apply_rounds_accumulates() {
        let mut rosters = rosters();
        apply_rounds(
            &mut rosters,
            vec![
                (1, vec![game(1, "Alice", "Bob", 2, 1)]),
                (2, vec![game(2, "Ann", "Bob", 1, 2)]),
            ],
        )
        .unwrap();

        let bob = rosters[1].get(&name("Bob")).unwrap();
        assert_eq!(bob.wins, 3);
        assert_eq!(bob.history, vec![name("alice"), name("ann")]);
        assert_eq!(rosters[0].score(), 3);
    }
}
