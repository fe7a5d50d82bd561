//! Match state machine
//!
//! Each step: timeout check -> pop actor -> tick -> death check ->
//! turn accounting -> readiness decay -> re-insert actor

use rand::RngCore;
use rust_decimal::Decimal;

use super::log::{ArenaLog, BattleEvent, LogBuilder};
use super::outcome::{resolve_deaths, timeout_result, EndReason};
use crate::combatant::{Combatant, CombatantSnapshot};
use crate::core::config::MatchConfig;
use crate::core::error::{ArenaError, ConfigError, Result, SchedulerError, TickError};
use crate::core::types::{ArenaResult, CombatantId, Side};
use crate::scheduler::{PairQueue, ReadinessQueue};
use crate::tables::SkillSheet;

/// Lifecycle of a match
///
/// Initialization happens inside [`ArenaMatch::new`], so a constructed match
/// is already running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Running,
    Finished(ArenaResult),
}

/// One arena match between a challenger and an opponent
///
/// Owns its combatants, scheduler and log; nothing is shared across matches.
pub struct ArenaMatch<'a, C, Q = PairQueue> {
    config: &'a MatchConfig,
    skills: &'a SkillSheet,
    combatants: Vec<C>,
    queue: Q,
    log: LogBuilder,
    turn: u32,
    phase: MatchPhase,
    end_reason: Option<EndReason>,
    last_actor: Option<CombatantId>,
}

impl<'a, C: Combatant, Q: ReadinessQueue> ArenaMatch<'a, C, Q> {
    /// Validate inputs, log both spawns and seed the scheduler
    ///
    /// The challenger is always spawned and queued first.
    pub fn new(
        config: &'a MatchConfig,
        skills: &'a SkillSheet,
        challenger: C,
        opponent: C,
        mut queue: Q,
    ) -> Result<Self> {
        config.validate()?;

        for (combatant, expected) in [(&challenger, Side::Challenger), (&opponent, Side::Opponent)] {
            if combatant.side() != expected {
                return Err(ConfigError::InvalidMatchConfig(format!(
                    "expected a {:?}-side combatant, got {:?}",
                    expected,
                    combatant.side()
                ))
                .into());
            }
            if combatant.speed() <= Decimal::ZERO {
                return Err(ConfigError::NonPositiveSpeed {
                    side: expected,
                    speed: combatant.speed(),
                }
                .into());
            }
            if config.readiness_for(combatant.speed()).is_none() {
                return Err(ConfigError::SpeedOutOfRange {
                    side: expected,
                    speed: combatant.speed(),
                }
                .into());
            }
            if combatant.is_dead() {
                return Err(ConfigError::NonPositiveHealth {
                    side: expected,
                    health: combatant.health(),
                }
                .into());
            }
        }

        let mut log = LogBuilder::new();
        log.push(BattleEvent::Spawn {
            combatant: challenger.snapshot(),
        });
        log.push(BattleEvent::Spawn {
            combatant: opponent.snapshot(),
        });

        let combatants = vec![challenger, opponent];
        for (idx, combatant) in combatants.iter().enumerate() {
            let priority = config
                .readiness_for(combatant.speed())
                .ok_or(ConfigError::SpeedOutOfRange {
                    side: combatant.side(),
                    speed: combatant.speed(),
                })?;
            queue.insert(CombatantId(idx), priority)?;
        }

        tracing::debug!(
            "Match initialized: challenger spd {}, opponent spd {}",
            combatants[0].speed(),
            combatants[1].speed()
        );

        Ok(Self {
            config,
            skills,
            combatants,
            queue,
            log,
            turn: 1,
            phase: MatchPhase::Running,
            end_reason: None,
            last_actor: None,
        })
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MatchPhase::Finished(_))
    }

    /// Current turn counter; advanced only by challenger actions
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn last_actor(&self) -> Option<CombatantId> {
        self.last_actor
    }

    pub fn priority_of(&self, id: CombatantId) -> Option<Decimal> {
        self.queue.priority_of(id)
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&C> {
        self.combatants.get(id.index())
    }

    pub fn events(&self) -> &[BattleEvent] {
        self.log.events()
    }

    /// Execute one loop iteration
    ///
    /// Returns the result once the match has finished; further calls keep
    /// returning it without doing anything.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Result<Option<ArenaResult>> {
        if let MatchPhase::Finished(result) = self.phase {
            return Ok(Some(result));
        }

        if self.turn > self.config.turn_cap {
            return Ok(Some(self.finish(timeout_result(), EndReason::Timeout)));
        }

        let actor = match self.queue.pop_min() {
            Some(actor) => actor,
            None => {
                tracing::warn!("Scheduler drained at turn {} without a result", self.turn);
                return Err(ArenaError::Unresolved { turn: self.turn });
            }
        };
        self.last_actor = Some(actor);

        self.tick_actor(actor, rng)?;

        let actor_side = self.side_of(actor)?;
        tracing::debug!(
            "Turn {}: {:?} acted, health {:?}",
            self.turn,
            actor_side,
            self.combatants.iter().map(|c| c.health()).collect::<Vec<_>>()
        );

        let dead: Vec<(CombatantId, Side)> = self
            .combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_dead())
            .map(|(idx, c)| (CombatantId(idx), c.side()))
            .collect();

        if let Some((dead_id, result)) = resolve_deaths(&dead) {
            let dead_snapshot = self.snapshot_of(dead_id)?;
            let actor_snapshot = self.snapshot_of(actor)?;
            self.log.push(BattleEvent::Dead {
                combatant: dead_snapshot,
            });
            self.log.push(BattleEvent::TurnEnd {
                combatant: actor_snapshot,
                turn: self.turn,
            });
            return Ok(Some(self.finish(result, EndReason::Death)));
        }

        if actor_side == Side::Challenger {
            let actor_snapshot = self.snapshot_of(actor)?;
            self.log.push(BattleEvent::TurnEnd {
                combatant: actor_snapshot,
                turn: self.turn,
            });
            self.turn += 1;
        }

        self.decay_waiting()?;

        let speed = self.combatants[actor.index()].speed();
        let priority = self
            .config
            .readiness_for(speed)
            .ok_or(TickError::InvalidSpeed(speed))?;
        self.queue.insert(actor, priority)?;

        Ok(None)
    }

    /// Step until a terminal condition and hand back the finished log
    pub fn run(mut self, rng: &mut dyn RngCore) -> Result<ArenaLog> {
        while self.step(rng)?.is_none() {}
        self.into_log()
    }

    /// Finished log; fails if the match has not produced a result
    pub fn into_log(self) -> Result<ArenaLog> {
        self.log.finish(self.turn)
    }

    fn tick_actor(&mut self, actor: CombatantId, rng: &mut dyn RngCore) -> Result<()> {
        let (head, rest) = self.combatants.split_at_mut(actor.index());
        let (current, tail) = rest
            .split_first_mut()
            .ok_or(SchedulerError::NotQueued(actor))?;

        let side = current.side();
        let mut foes: Vec<&mut C> = head
            .iter_mut()
            .chain(tail.iter_mut())
            .filter(|c| c.side() == side.other() && !c.is_dead())
            .collect();

        current.tick(&mut foes, rng)?;
        Ok(())
    }

    /// Shrink every waiting combatant's priority
    fn decay_waiting(&mut self) -> Result<()> {
        let config = self.config;
        let skills = self.skills;
        let combatants = &self.combatants;

        self.queue.for_each_remaining(|id, priority| {
            let notable = combatants
                .get(id.index())
                .map(|c| skills.uses_notable_skill(c.used_skill_categories()))
                .unwrap_or(false);
            let multiplier = config.decay_multiplier(notable);
            let decayed = priority * multiplier;
            tracing::trace!("Decay {}: {} -> {} (x{})", id, priority, decayed, multiplier);
            decayed
        })?;
        Ok(())
    }

    fn side_of(&self, id: CombatantId) -> Result<Side> {
        self.combatant(id)
            .map(|c| c.side())
            .ok_or_else(|| SchedulerError::NotQueued(id).into())
    }

    fn snapshot_of(&self, id: CombatantId) -> Result<CombatantSnapshot> {
        self.combatant(id)
            .map(|c| c.snapshot())
            .ok_or_else(|| SchedulerError::NotQueued(id).into())
    }

    fn finish(&mut self, result: ArenaResult, reason: EndReason) -> ArenaResult {
        self.phase = MatchPhase::Finished(result);
        self.end_reason = Some(reason);
        self.log.set_result(result);
        tracing::info!(
            "Match finished: {:?} by {:?} at turn {} ({} events)",
            result,
            reason,
            self.turn,
            self.log.events().len()
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{ArenaCharacter, PlayerDigest, ScriptedFighter, StatBlock};
    use crate::core::types::SkillCategory;
    use crate::scheduler::ReadinessHeap;
    use crate::tables::{ArenaSheets, RuneOptionSheet, SkillRow};
    use rand::rngs::mock::StepRng;

    fn skills() -> SkillSheet {
        SkillSheet::from_rows(vec![
            SkillRow {
                id: 1,
                name: "Normal Attack".into(),
                category: SkillCategory::NormalAttack,
                power: 100,
                cooldown: 0,
                duration: 0,
            },
            SkillRow {
                id: 2,
                name: "Blow".into(),
                category: SkillCategory::BlowAttack,
                power: 150,
                cooldown: 0,
                duration: 0,
            },
        ])
        .unwrap()
    }

    fn fighter(side: Side, speed: i64, health: i64) -> ScriptedFighter {
        ScriptedFighter::new(side, Decimal::from(speed), health)
    }

    #[test]
    fn test_initial_priorities_and_spawn_order() {
        let config = MatchConfig::default();
        let skills = skills();
        let m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        assert_eq!(m.priority_of(CombatantId(0)), Some(Decimal::from(10)));
        assert_eq!(m.priority_of(CombatantId(1)), Some(Decimal::from(20)));
        assert_eq!(m.turn(), 1);
        assert_eq!(m.phase(), MatchPhase::Running);

        let sides: Vec<Side> = m.events().iter().map(|e| e.combatant().side).collect();
        assert_eq!(sides, vec![Side::Challenger, Side::Opponent]);
    }

    #[test]
    fn test_decay_after_first_action() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        let mut m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        assert_eq!(m.step(&mut rng).unwrap(), None);
        assert_eq!(m.last_actor(), Some(CombatantId(0)));
        assert_eq!(m.priority_of(CombatantId(1)), Some(Decimal::from(12)));
        assert_eq!(m.priority_of(CombatantId(0)), Some(Decimal::from(10)));
        assert_eq!(m.turn(), 2);
    }

    #[test]
    fn test_notable_skill_slows_decay() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        // Opponent acts first and uses a blow; afterwards it waits while the
        // challenger acts, decaying at 0.9 instead of 0.6
        let mut m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 5, 100),
            fighter(Side::Opponent, 10, 100).with_script(vec![SkillCategory::BlowAttack]),
            ReadinessHeap::new(),
        )
        .unwrap();

        m.step(&mut rng).unwrap();
        assert_eq!(m.last_actor(), Some(CombatantId(1)));
        // Challenger waited: 20 * 0.6
        assert_eq!(m.priority_of(CombatantId(0)), Some(Decimal::from(12)));
        // Opponent acts again (10 < 12)
        m.step(&mut rng).unwrap();
        assert_eq!(m.last_actor(), Some(CombatantId(1)));
        assert_eq!(m.priority_of(CombatantId(0)), Some(Decimal::new(72, 1)));
        // Challenger acts; opponent decays at 0.9 after its blow
        m.step(&mut rng).unwrap();
        assert_eq!(m.last_actor(), Some(CombatantId(0)));
        assert_eq!(m.priority_of(CombatantId(1)), Some(Decimal::from(9)));
    }

    #[test]
    fn test_step_after_finish_is_idempotent() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        let mut m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100).with_damage(100),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        assert_eq!(m.step(&mut rng).unwrap(), Some(ArenaResult::Win));
        let events = m.events().len();
        assert_eq!(m.step(&mut rng).unwrap(), Some(ArenaResult::Win));
        assert_eq!(m.events().len(), events);
        assert_eq!(m.end_reason(), Some(EndReason::Death));
    }

    #[test]
    fn test_rejects_swapped_sides() {
        let config = MatchConfig::default();
        let skills = skills();
        let result = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Opponent, 10, 100),
            fighter(Side::Challenger, 5, 100),
            PairQueue::new(),
        );
        assert!(matches!(
            result,
            Err(ArenaError::Config(ConfigError::InvalidMatchConfig(_)))
        ));
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let config = MatchConfig::default();
        let skills = skills();
        let result = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100),
            fighter(Side::Opponent, 0, 100),
            PairQueue::new(),
        );
        assert!(matches!(
            result,
            Err(ArenaError::Config(ConfigError::NonPositiveSpeed {
                side: Side::Opponent,
                ..
            }))
        ));
    }

    #[test]
    fn test_speed_collapse_is_fatal() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        let m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100).with_speed_change(1, Decimal::ZERO),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        assert!(matches!(
            m.run(&mut rng),
            Err(ArenaError::Tick(TickError::InvalidSpeed(_)))
        ));
    }

    #[test]
    fn test_tiny_speed_is_rejected() {
        let config = MatchConfig::default();
        let skills = skills();
        let result = ArenaMatch::new(
            &config,
            &skills,
            ScriptedFighter::new(Side::Challenger, Decimal::new(1, 28), 100),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        );
        assert!(matches!(
            result,
            Err(ArenaError::Config(ConfigError::SpeedOutOfRange {
                side: Side::Challenger,
                ..
            }))
        ));
    }

    #[test]
    fn test_speed_too_small_to_requeue_is_fatal() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        let m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100).with_speed_change(1, Decimal::new(1, 28)),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        assert!(matches!(
            m.run(&mut rng),
            Err(ArenaError::Tick(TickError::InvalidSpeed(_)))
        ));
    }

    #[test]
    fn test_requeue_uses_changed_speed() {
        let config = MatchConfig::default();
        let skills = skills();
        let mut rng = StepRng::new(0, 1);
        let mut m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100).with_speed_change(1, Decimal::from(20)),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();

        m.step(&mut rng).unwrap();
        assert_eq!(m.priority_of(CombatantId(0)), Some(Decimal::from(5)));
    }

    #[test]
    fn test_requeue_uses_buffed_speed() {
        let config = MatchConfig::default();
        let sheets = ArenaSheets::new(
            SkillSheet::from_rows(vec![
                SkillRow {
                    id: 1,
                    name: "Normal Attack".into(),
                    category: SkillCategory::NormalAttack,
                    power: 100,
                    cooldown: 0,
                    duration: 0,
                },
                SkillRow {
                    id: 5,
                    name: "Haste".into(),
                    category: SkillCategory::SpeedBuff,
                    power: 50,
                    cooldown: 3,
                    duration: 2,
                },
            ])
            .unwrap(),
            RuneOptionSheet::new(),
        );
        let stats = |speed: i64| StatBlock {
            hp: 100,
            attack: 20,
            defense: 5,
            speed: Decimal::from(speed),
            crit: 0,
        };
        let challenger = ArenaCharacter::from_digest(
            &PlayerDigest::new("fast", stats(10)).with_skill(5, 100),
            Side::Challenger,
            &sheets,
            &config,
        )
        .unwrap();
        let opponent = ArenaCharacter::from_digest(
            &PlayerDigest::new("slow", stats(5)),
            Side::Opponent,
            &sheets,
            &config,
        )
        .unwrap();

        let mut rng = StepRng::new(0, 1);
        let mut m =
            ArenaMatch::new(&config, &sheets.skills, challenger, opponent, PairQueue::new())
                .unwrap();
        m.step(&mut rng).unwrap();

        let buffed = m.combatant(CombatantId(0)).unwrap().speed();
        assert_eq!(buffed, Decimal::from(15));
        assert_eq!(
            m.priority_of(CombatantId(0)),
            Some(Decimal::ONE_HUNDRED / buffed)
        );
    }

    #[test]
    fn test_unfinished_match_has_no_log() {
        let config = MatchConfig::default();
        let skills = skills();
        let m = ArenaMatch::new(
            &config,
            &skills,
            fighter(Side::Challenger, 10, 100),
            fighter(Side::Opponent, 5, 100),
            PairQueue::new(),
        )
        .unwrap();
        assert!(matches!(
            m.into_log(),
            Err(ArenaError::Unresolved { turn: 1 })
        ));
    }
}
