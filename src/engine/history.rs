//! Rematch detection.

use crate::models::Player;

/// Returns true if `p` and `q` have met in an earlier round.
///
/// Both histories are checked, so a one-sided record still blocks the rematch.
pub fn already_faced(p: &Player, q: &Player) -> bool {
    p.history.contains(&q.name) || q.history.contains(&p.name)
}
