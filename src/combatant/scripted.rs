//! Fixed-behaviour combatant
//!
//! Deals the same damage on every attack and never touches the random source.
//! Useful for drills and for reasoning about schedules by hand.

use rand::RngCore;
use rust_decimal::Decimal;

use super::snapshot::CombatantSnapshot;
use super::Combatant;
use crate::core::error::TickError;
use crate::core::types::{Side, SkillCategory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedFighter {
    side: Side,
    name: String,
    speed: Decimal,
    max_health: i64,
    health: i64,
    damage: i64,
    /// Damage taken by the fighter itself on every action
    recoil: i64,
    /// Categories reported per action, cycled; empty means basic attacks
    script: Vec<SkillCategory>,
    /// Speed to switch to after the given number of actions
    speed_change: Option<(usize, Decimal)>,
    fail_on_action: Option<usize>,
    actions: usize,
    used: Vec<SkillCategory>,
}

impl ScriptedFighter {
    pub fn new(side: Side, speed: Decimal, health: i64) -> Self {
        let name = match side {
            Side::Challenger => "challenger",
            Side::Opponent => "opponent",
        };
        Self {
            side,
            name: name.to_string(),
            speed,
            max_health: health,
            health,
            damage: 0,
            recoil: 0,
            script: Vec::new(),
            speed_change: None,
            fail_on_action: None,
            actions: 0,
            used: Vec::new(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_recoil(mut self, recoil: i64) -> Self {
        self.recoil = recoil;
        self
    }

    pub fn with_script(mut self, script: Vec<SkillCategory>) -> Self {
        self.script = script;
        self
    }

    /// Switch to `speed` once `after_actions` actions have been taken
    pub fn with_speed_change(mut self, after_actions: usize, speed: Decimal) -> Self {
        self.speed_change = Some((after_actions, speed));
        self
    }

    /// Fail the action with this zero-based index
    pub fn failing_on(mut self, action: usize) -> Self {
        self.fail_on_action = Some(action);
        self
    }

    pub fn actions(&self) -> usize {
        self.actions
    }

    fn next_category(&self) -> SkillCategory {
        if self.script.is_empty() {
            SkillCategory::NormalAttack
        } else {
            self.script[self.actions % self.script.len()]
        }
    }
}

impl Combatant for ScriptedFighter {
    fn side(&self) -> Side {
        self.side
    }

    fn speed(&self) -> Decimal {
        self.speed
    }

    fn health(&self) -> i64 {
        self.health
    }

    fn used_skill_categories(&self) -> &[SkillCategory] {
        &self.used
    }

    fn tick(&mut self, foes: &mut [&mut Self], _rng: &mut dyn RngCore) -> Result<(), TickError> {
        if self.fail_on_action == Some(self.actions) {
            return Err(TickError::Script(format!(
                "{} failed on action {}",
                self.name, self.actions
            )));
        }

        let category = self.next_category();
        if self.damage > 0 && category.is_attack() {
            let target = foes
                .iter_mut()
                .find(|foe| !foe.is_dead())
                .ok_or(TickError::NoTarget)?;
            target.health -= self.damage;
        }
        self.health -= self.recoil;

        self.actions += 1;
        if let Some((after, speed)) = self.speed_change {
            if self.actions >= after {
                self.speed = speed;
            }
        }

        self.used.clear();
        self.used.push(category);
        Ok(())
    }

    fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            side: self.side,
            name: self.name.clone(),
            level: 1,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            used_skills: self.used.clone(),
        }
    }
}
