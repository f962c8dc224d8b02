//! Candidate graph and maximum bipartite matching.
//!
//! The larger side (the first side when sizes are equal) is matched one
//! player at a time with augmenting paths, so a player stays matched once
//! placed. Players are placed in reverse bye preference: those who already
//! had a bye first, then the rest from the bottom of the roster up. Whoever
//! is left when the smaller side is full gets a bye, which makes the byes go
//! to players without one whenever any valid matching allows it.

use std::time::{Duration, Instant};

use tracing::debug;

use super::compat::resolve;
use super::history::already_faced;
use super::{EngineError, PairingOptions, PairingOutcome};
use crate::models::{MatchMode, Pairing, PairingResult, Player};

/// Legal opponents for each player on the larger side.
struct CandidateGraph {
    /// `edges[u]` lists `(v, mode)` in the smaller side's roster order.
    edges: Vec<Vec<(usize, MatchMode)>>,
}

impl CandidateGraph {
    fn build(left: &[&Player], right: &[&Player]) -> Self {
        let edges = left
            .iter()
            .map(|p| {
                right
                    .iter()
                    .enumerate()
                    .filter(|(_, q)| !already_faced(p, q))
                    .filter_map(|(v, q)| {
                        resolve(p.game_mode, q.game_mode).map(|mode| (v, mode))
                    })
                    .collect()
            })
            .collect();
        Self { edges }
    }

    fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }
}

/// Step and wall-clock limits for one search.
struct Budget {
    steps: u64,
    max_steps: u64,
    deadline: Option<Instant>,
}

impl Budget {
    fn new(max_steps: u64, timeout: Option<Duration>) -> Self {
        Self {
            steps: 0,
            max_steps,
            deadline: timeout.and_then(|t| Instant::now().checked_add(t)),
        }
    }

    fn tick(&mut self) -> Result<(), EngineError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(EngineError::Timeout { steps: self.steps });
        }
        Ok(())
    }

    fn check_deadline(&self) -> Result<(), EngineError> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(EngineError::Timeout { steps: self.steps })
            }
            _ => Ok(()),
        }
    }
}

struct Matcher<'g> {
    graph: &'g CandidateGraph,
    /// Larger side -> (smaller side, mode).
    partner: Vec<Option<(usize, MatchMode)>>,
    /// Smaller side -> larger side.
    owner: Vec<Option<usize>>,
    /// Smaller-side players already tried in the current augmentation.
    visited: Vec<bool>,
    budget: Budget,
}

impl<'g> Matcher<'g> {
    fn new(graph: &'g CandidateGraph, right_len: usize, budget: Budget) -> Self {
        Self {
            graph,
            partner: vec![None; graph.edges.len()],
            owner: vec![None; right_len],
            visited: vec![false; right_len],
            budget,
        }
    }

    /// Try to place `u`, re-routing already placed players if needed.
    /// Free opponents are taken before any re-routing is attempted.
    fn augment(&mut self, u: usize) -> Result<bool, EngineError> {
        let graph = self.graph;

        for &(v, mode) in &graph.edges[u] {
            self.budget.tick()?;
            if self.owner[v].is_none() {
                self.link(u, v, mode);
                return Ok(true);
            }
        }

        for &(v, mode) in &graph.edges[u] {
            if self.visited[v] {
                continue;
            }
            self.visited[v] = true;
            self.budget.tick()?;

            if let Some(w) = self.owner[v] {
                if self.augment(w)? {
                    self.link(u, v, mode);
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    fn link(&mut self, u: usize, v: usize, mode: MatchMode) {
        self.partner[u] = Some((v, mode));
        self.owner[v] = Some(u);
    }
}

/// Indexes of `players` in bye order: no earlier bye first, then roster order.
fn bye_preference(players: &[&Player]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..players.len()).collect();
    order.sort_by_key(|&i| players[i].had_bye);
    order
}

/// Pair two sides of active players.
///
/// Pairings come out in placement order with the first side's player as
/// `player_1`, followed by byes in bye order.
pub(crate) fn find_pairings(
    side_a: &[&Player],
    side_b: &[&Player],
    options: &PairingOptions,
) -> Result<PairingOutcome, EngineError> {
    let swapped = side_b.len() > side_a.len();
    let (left, right) = if swapped {
        (side_b, side_a)
    } else {
        (side_a, side_b)
    };

    let graph = CandidateGraph::build(left, right);
    debug!(
        "Candidate graph: {} x {} players, {} legal pairings",
        left.len(),
        right.len(),
        graph.edge_count()
    );

    let bye_order = bye_preference(left);
    let required = right.len();
    let mut matcher = Matcher::new(
        &graph,
        right.len(),
        Budget::new(options.max_steps, options.timeout),
    );
    let mut placed = 0;

    for &u in bye_order.iter().rev() {
        if placed == required {
            break;
        }
        matcher.budget.check_deadline()?;
        matcher.visited.fill(false);

        if matcher.augment(u)? {
            placed += 1;
        } else {
            debug!("{} cannot be placed", left[u].name);
        }
    }

    debug!(
        "Matched {} of {} required in {} steps",
        placed, required, matcher.budget.steps
    );

    if placed < required {
        let unplaced = matcher
            .owner
            .iter()
            .enumerate()
            .filter(|(_, owner)| owner.is_none())
            .map(|(v, _)| right[v].name.clone())
            .collect();
        return Ok(PairingOutcome::Infeasible { unplaced });
    }

    let mut pairings = Vec::with_capacity(left.len());
    for &u in bye_order.iter().rev() {
        if let Some((v, mode)) = matcher.partner[u] {
            let (first, second) = if swapped {
                (right[v], left[u])
            } else {
                (left[u], right[v])
            };
            pairings.push(Pairing::game(mode, first.name.clone(), second.name.clone()));
        }
    }
    for &u in &bye_order {
        if matcher.partner[u].is_none() {
            pairings.push(Pairing::bye(left[u].name.clone()));
        }
    }

    Ok(PairingOutcome::Paired(PairingResult::new(pairings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GameMode, PlayerName};
    use pretty_assertions::assert_eq;

    fn name(s: &str) -> PlayerName {
        PlayerName::parse(s).unwrap()
    }

    fn player(n: &str, mode: GameMode, history: &[&str]) -> Player {
        Player::new(name(n), mode).with_history(history.iter().map(|h| name(h)).collect())
    }

    fn run(a: &[Player], b: &[Player]) -> PairingOutcome {
        let a: Vec<&Player> = a.iter().collect();
        let b: Vec<&Player> = b.iter().collect();
        find_pairings(&a, &b, &PairingOptions::default()).unwrap()
    }

    fn paired(outcome: PairingOutcome) -> Vec<Pairing> {
        match outcome {
            PairingOutcome::Paired(result) => result.pairings().to_vec(),
            PairingOutcome::Infeasible { unplaced } => panic!("infeasible: {:?}", unplaced),
        }
    }

    #[test]
    fn test_candidate_graph_edges() {
        let a = [
            player("a1", GameMode::Core, &["b1"]),
            player("a2", GameMode::Movie, &[]),
        ];
        let b = [
            player("b1", GameMode::Core, &[]),
            player("b2", GameMode::Any, &[]),
        ];
        let left: Vec<&Player> = a.iter().collect();
        let right: Vec<&Player> = b.iter().collect();

        let graph = CandidateGraph::build(&left, &right);
        assert_eq!(graph.edges[0], vec![(1, MatchMode::Core)]);
        assert_eq!(graph.edges[1], vec![(1, MatchMode::Movie)]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_bye_preference_order() {
        let players = [
            player("p1", GameMode::Any, &[]).with_bye(),
            player("p2", GameMode::Any, &[]),
            player("p3", GameMode::Any, &[]).with_bye(),
            player("p4", GameMode::Any, &[]),
        ];
        let refs: Vec<&Player> = players.iter().collect();
        assert_eq!(bye_preference(&refs), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_reroutes_placed_player() {
        // a2 grabs b1 first, then has to move to b2 so that a1 can play.
        let a = [
            player("a1", GameMode::Core, &[]),
            player("a2", GameMode::Any, &[]),
        ];
        let b = [
            player("b1", GameMode::Any, &[]),
            player("b2", GameMode::Movie, &[]),
        ];

        assert_eq!(
            paired(run(&a, &b)),
            vec![
                Pairing::game(MatchMode::Movie, name("a2"), name("b2")),
                Pairing::game(MatchMode::Core, name("a1"), name("b1")),
            ]
        );
    }

    #[test]
    fn test_byes_go_to_players_without_one() {
        let a = [
            player("x1", GameMode::Any, &[]).with_bye(),
            player("x2", GameMode::Any, &[]),
            player("x3", GameMode::Any, &[]),
        ];
        let b = [player("y1", GameMode::Any, &[])];

        assert_eq!(
            paired(run(&a, &b)),
            vec![
                Pairing::game(MatchMode::Any, name("x1"), name("y1")),
                Pairing::bye(name("x2")),
                Pairing::bye(name("x3")),
            ]
        );
    }

    #[test]
    fn test_forced_bye_overrides_preference() {
        // p1 already had a bye but cannot play anyone on the other side.
        let a = [
            player("p1", GameMode::Core, &[]).with_bye(),
            player("p2", GameMode::Movie, &[]),
        ];
        let b = [player("q1", GameMode::Movie, &[])];

        assert_eq!(
            paired(run(&a, &b)),
            vec![
                Pairing::game(MatchMode::Movie, name("p2"), name("q1")),
                Pairing::bye(name("p1")),
            ]
        );
    }

    #[test]
    fn test_larger_second_side_keeps_first_side_as_player_1() {
        let a = [player("a1", GameMode::Any, &[])];
        let b = [
            player("b1", GameMode::Any, &[]),
            player("b2", GameMode::Core, &[]),
        ];

        assert_eq!(
            paired(run(&a, &b)),
            vec![
                Pairing::game(MatchMode::Core, name("a1"), name("b2")),
                Pairing::bye(name("b1")),
            ]
        );
    }

    #[test]
    fn test_infeasible_reports_unplaced() {
        let a = [
            player("a1", GameMode::Any, &[]),
            player("a2", GameMode::Any, &[]),
        ];
        let b = [player("b1", GameMode::Movie, &["a1", "a2"])];

        assert_eq!(
            run(&a, &b),
            PairingOutcome::Infeasible {
                unplaced: vec![name("b1")]
            }
        );
    }

    #[test]
    fn test_step_cap_times_out() {
        let a = [
            player("a1", GameMode::Any, &[]),
            player("a2", GameMode::Any, &[]),
        ];
        let b = [
            player("b1", GameMode::Any, &[]),
            player("b2", GameMode::Any, &[]),
        ];
        let left: Vec<&Player> = a.iter().collect();
        let right: Vec<&Player> = b.iter().collect();
        let options = PairingOptions {
            max_steps: 1,
            timeout: None,
        };

        let err = find_pairings(&left, &right, &options).unwrap_err();
        assert!(matches!(err, EngineError::Timeout { steps: 2 }));
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let a = [player("a1", GameMode::Any, &[])];
        let b = [player("b1", GameMode::Any, &[])];
        let left: Vec<&Player> = a.iter().collect();
        let right: Vec<&Player> = b.iter().collect();
        let options = PairingOptions {
            timeout: Some(Duration::ZERO),
            ..PairingOptions::default()
        };

        let err = find_pairings(&left, &right, &options).unwrap_err();
        assert!(matches!(err, EngineError::Timeout { steps: 0 }));
    }
}
