//! Game-mode compatibility.

use crate::models::{GameMode, MatchMode};

/// Resolve the format two players would play in, or `None` if they cannot meet.
///
/// Fixed modes only meet themselves or `Any`; two `Any` players play `Any`.
/// Dropped players never meet anyone.
pub fn resolve(a: GameMode, b: GameMode) -> Option<MatchMode> {
    use GameMode::*;

    match (a, b) {
        (Drop, _) | (_, Drop) => None,
        (Any, Any) => Some(MatchMode::Any),
        (Core, Core) | (Core, Any) | (Any, Core) => Some(MatchMode::Core),
        (Movie, Movie) | (Movie, Any) | (Any, Movie) => Some(MatchMode::Movie),
        (Core, Movie) | (Movie, Core) => None,
    }
}
