//! Terminal-condition policy
//!
//! Both rules are asymmetric on purpose and must not be turned into draws:
//! a timeout is a challenger loss, and a simultaneous knockout is a
//! challenger win.

use serde::{Deserialize, Serialize};

use crate::core::types::{ArenaResult, CombatantId, Side};

/// Why a match stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Timeout,
    Death,
}

/// Result of a timed-out match
pub fn timeout_result() -> ArenaResult {
    ArenaResult::Lose
}

/// Pick the combatant to report as dead and the result
///
/// `dead` lists every dead combatant in match order. With several dead, the
/// first opponent-side one is reported and the challenger wins.
pub fn resolve_deaths(dead: &[(CombatantId, Side)]) -> Option<(CombatantId, ArenaResult)> {
    match dead {
        [] => None,
        [(id, side)] => {
            let result = if side.is_opponent() {
                ArenaResult::Win
            } else {
                ArenaResult::Lose
            };
            Some((*id, result))
        }
        [(first, _), ..] => match dead.iter().find(|(_, side)| side.is_opponent()) {
            Some((id, _)) => Some((*id, ArenaResult::Win)),
            // Only reachable with several challenger-side combatants
            None => Some((*first, ArenaResult::Lose)),
        },
    }
}
