//! Battle log - append-only record of a finished match

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantSnapshot;
use crate::core::error::{ArenaError, Result};
use crate::core::types::ArenaResult;

/// One recorded event; every variant owns a snapshot taken when it was logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleEvent {
    Spawn {
        combatant: CombatantSnapshot,
    },
    TurnEnd {
        combatant: CombatantSnapshot,
        turn: u32,
    },
    Dead {
        combatant: CombatantSnapshot,
    },
}

impl BattleEvent {
    pub fn combatant(&self) -> &CombatantSnapshot {
        match self {
            BattleEvent::Spawn { combatant }
            | BattleEvent::TurnEnd { combatant, .. }
            | BattleEvent::Dead { combatant } => combatant,
        }
    }

    pub fn turn(&self) -> Option<u32> {
        match self {
            BattleEvent::TurnEnd { turn, .. } => Some(*turn),
            _ => None,
        }
    }
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::Spawn { combatant } => write!(
                f,
                "spawn    {:?} {} (hp {}, spd {})",
                combatant.side, combatant.name, combatant.health, combatant.speed
            ),
            BattleEvent::TurnEnd { combatant, turn } => write!(
                f,
                "turn {:>3} {:?} {} (hp {}/{}) {:?}",
                turn,
                combatant.side,
                combatant.name,
                combatant.health,
                combatant.max_health,
                combatant.used_skills
            ),
            BattleEvent::Dead { combatant } => {
                write!(f, "dead     {:?} {}", combatant.side, combatant.name)
            }
        }
    }
}

/// Ordered events plus the result, as handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaLog {
    pub events: Vec<BattleEvent>,
    pub result: ArenaResult,
}

impl ArenaLog {
    /// Number of the last recorded turn, 0 if none ended
    pub fn turn_count(&self) -> u32 {
        self.events
            .iter()
            .rev()
            .find_map(BattleEvent::turn)
            .unwrap_or(0)
    }

    /// The combatant whose death ended the match, if any
    pub fn dead(&self) -> Option<&CombatantSnapshot> {
        self.events.iter().find_map(|e| match e {
            BattleEvent::Dead { combatant } => Some(combatant),
            _ => None,
        })
    }

    pub fn spawns(&self) -> impl Iterator<Item = &CombatantSnapshot> {
        self.events.iter().filter_map(|e| match e {
            BattleEvent::Spawn { combatant } => Some(combatant),
            _ => None,
        })
    }

    pub fn is_timeout(&self) -> bool {
        self.dead().is_none()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Log under construction; only becomes an [`ArenaLog`] once a result is set
#[derive(Debug, Clone, Default)]
pub(crate) struct LogBuilder {
    events: Vec<BattleEvent>,
    result: Option<ArenaResult>,
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn set_result(&mut self, result: ArenaResult) {
        self.result = Some(result);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    pub fn finish(self, turn: u32) -> Result<ArenaLog> {
        let result = self.result.ok_or(ArenaError::Unresolved { turn })?;
        Ok(ArenaLog {
            events: self.events,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Side;
    use rust_decimal::Decimal;

    fn snap(side: Side, health: i64) -> CombatantSnapshot {
        CombatantSnapshot {
            side,
            name: format!("{:?}", side),
            level: 1,
            health,
            max_health: 10,
            speed: Decimal::ONE,
            used_skills: Vec::new(),
        }
    }

    #[test]
    fn test_unfinished_log_is_unresolved() {
        let mut builder = LogBuilder::new();
        builder.push(BattleEvent::Spawn {
            combatant: snap(Side::Challenger, 10),
        });
        assert!(matches!(
            builder.finish(4),
            Err(ArenaError::Unresolved { turn: 4 })
        ));
    }

    #[test]
    fn test_log_helpers() {
        let mut builder = LogBuilder::new();
        builder.push(BattleEvent::Spawn {
            combatant: snap(Side::Challenger, 10),
        });
        builder.push(BattleEvent::Spawn {
            combatant: snap(Side::Opponent, 10),
        });
        builder.push(BattleEvent::TurnEnd {
            combatant: snap(Side::Challenger, 10),
            turn: 1,
        });
        builder.push(BattleEvent::Dead {
            combatant: snap(Side::Opponent, 0),
        });
        builder.push(BattleEvent::TurnEnd {
            combatant: snap(Side::Challenger, 10),
            turn: 2,
        });
        builder.set_result(ArenaResult::Win);

        let log = builder.finish(2).unwrap();
        assert_eq!(log.len(), 5);
        assert_eq!(log.turn_count(), 2);
        assert_eq!(log.spawns().count(), 2);
        assert_eq!(log.dead().map(|c| c.side), Some(Side::Opponent));
        assert!(!log.is_timeout());
        assert_eq!(log.result, ArenaResult::Win);
    }

    #[test]
    fn test_display() {
        let event = BattleEvent::TurnEnd {
            combatant: snap(Side::Challenger, 7),
            turn: 12,
        };
        let line = event.to_string();
        assert!(line.starts_with("turn  12 Challenger"));
        assert!(line.contains("hp 7/10"));
    }
}
