//! Digest-built arena character
//!
//! Per-turn math is intentionally small: attacks, one heal, one speed buff.
//! What matters to the match engine is that every random draw happens in a
//! fixed order, so a replay with the same seed is identical.

use rand::{Rng, RngCore};
use rust_decimal::Decimal;

use super::digest::PlayerDigest;
use super::snapshot::CombatantSnapshot;
use super::Combatant;
use crate::core::config::MatchConfig;
use crate::core::error::{ConfigError, TickError};
use crate::core::types::{Side, SkillCategory};
use crate::tables::{ArenaSheets, SkillRow};

/// Skill in a character's loadout
#[derive(Debug, Clone, PartialEq, Eq)]
struct EquippedSkill {
    row: SkillRow,
    /// Activation chance in percent
    chance: u32,
    /// Own actions until the skill may fire again
    cooldown_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SpeedBuff {
    percent: i64,
    remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArenaCharacter {
    side: Side,
    name: String,
    level: u32,
    max_health: i64,
    health: i64,
    attack: i64,
    defense: i64,
    crit: u32,
    base_speed: Decimal,
    speed: Decimal,
    basic: SkillRow,
    skills: Vec<EquippedSkill>,
    buffs: Vec<SpeedBuff>,
    /// Rune bonus to speed buffs, in percent
    buff_extra: i64,
    extra_buff_before_get_buffs: bool,
    used: Vec<SkillCategory>,
}

impl ArenaCharacter {
    /// Build a character from a digest, applying rune modifiers
    ///
    /// Health is scaled by `config.health_modifier` before runes are added.
    pub fn from_digest(
        digest: &PlayerDigest,
        side: Side,
        sheets: &ArenaSheets,
        config: &MatchConfig,
    ) -> Result<Self, ConfigError> {
        let basic = sheets
            .skills
            .basic_attack()
            .cloned()
            .ok_or(ConfigError::MissingBasicAttack)?;

        let invalid = |stat: &'static str, value: i64| ConfigError::InvalidStat { side, stat, value };
        let overflow = |stat: &'static str| ConfigError::StatOverflow { side, stat };

        if digest.stats.crit > 100 {
            return Err(invalid("crit", i64::from(digest.stats.crit)));
        }

        let mut skills = digest
            .skills
            .iter()
            .map(|slot| {
                if slot.chance > 100 {
                    return Err(invalid("skill chance", i64::from(slot.chance)));
                }
                Ok(EquippedSkill {
                    row: sheets.skills.try_get(slot.skill_id)?.clone(),
                    chance: slot.chance,
                    cooldown_left: 0,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut max_health = digest
            .stats
            .hp
            .checked_mul(config.health_modifier)
            .ok_or_else(|| overflow("hp"))?;
        let mut attack = digest.stats.attack;
        let mut defense = digest.stats.defense;
        let mut speed = digest.stats.speed;
        let mut buff_extra: i64 = 0;

        for slot in &digest.runes {
            let rune = sheets.runes.try_get(slot.rune_id, slot.level)?;
            max_health = max_health
                .checked_add(rune.hp)
                .ok_or_else(|| overflow("hp"))?;
            attack = attack
                .checked_add(rune.attack)
                .ok_or_else(|| overflow("attack"))?;
            defense = defense
                .checked_add(rune.defense)
                .ok_or_else(|| overflow("defense"))?;
            speed = speed
                .checked_add(rune.speed)
                .ok_or_else(|| overflow("speed"))?;
            buff_extra = buff_extra
                .checked_add(rune.buff_extra)
                .ok_or_else(|| overflow("buff extra"))?;

            if let Some(skill_id) = rune.skill_id {
                if rune.skill_chance > 100 {
                    return Err(invalid("skill chance", i64::from(rune.skill_chance)));
                }
                skills.push(EquippedSkill {
                    row: sheets.skills.try_get(skill_id)?.clone(),
                    chance: rune.skill_chance,
                    cooldown_left: 0,
                });
            }
        }

        if speed <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveSpeed { side, speed });
        }
        if config.readiness_for(speed).is_none() {
            return Err(ConfigError::SpeedOutOfRange { side, speed });
        }
        if max_health <= 0 {
            return Err(ConfigError::NonPositiveHealth {
                side,
                health: max_health,
            });
        }
        if attack <= 0 {
            return Err(invalid("attack", attack));
        }
        if defense < 0 {
            return Err(invalid("defense", defense));
        }

        Ok(Self {
            side,
            name: digest.name.clone(),
            level: digest.level,
            max_health,
            health: max_health,
            attack,
            defense,
            crit: digest.stats.crit,
            base_speed: speed,
            speed,
            basic,
            skills,
            buffs: Vec::new(),
            buff_extra,
            extra_buff_before_get_buffs: config.extra_buff_before_get_buffs,
            used: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_health(&self) -> i64 {
        self.max_health
    }

    pub fn attack(&self) -> i64 {
        self.attack
    }

    pub fn defense(&self) -> i64 {
        self.defense
    }

    pub fn base_speed(&self) -> Decimal {
        self.base_speed
    }

    pub fn take_damage(&mut self, amount: i64) {
        self.health = self.health.saturating_sub(amount).max(0);
    }

    fn heal(&mut self, amount: i64) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Count down buffs and cooldowns at the start of an action
    fn advance_timers(&mut self) -> Result<(), TickError> {
        for buff in &mut self.buffs {
            buff.remaining = buff.remaining.saturating_sub(1);
        }
        self.buffs.retain(|b| b.remaining > 0);
        self.recompute_speed()?;

        for skill in &mut self.skills {
            skill.cooldown_left = skill.cooldown_left.saturating_sub(1);
        }
        Ok(())
    }

    fn recompute_speed(&mut self) -> Result<(), TickError> {
        let percent = self
            .buffs
            .iter()
            .fold(0i64, |acc, b| acc.saturating_add(b.percent));
        let factor = Decimal::from(100i64.saturating_add(percent).max(1));
        self.speed = self
            .base_speed
            .checked_mul(factor)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(TickError::Overflow("speed buff"))?;
        Ok(())
    }

    /// First off-cooldown skill whose chance roll succeeds
    ///
    /// One draw per eligible skill, in loadout order.
    fn select_skill(&self, rng: &mut dyn RngCore) -> Option<usize> {
        for (idx, skill) in self.skills.iter().enumerate() {
            if skill.cooldown_left > 0 {
                continue;
            }
            if rng.gen_range(0..100u32) < skill.chance {
                return Some(idx);
            }
        }
        None
    }

    /// Damage dealt by one hit; draws one crit roll
    fn roll_hit(
        &self,
        target: &ArenaCharacter,
        power: i64,
        pierce: bool,
        rng: &mut dyn RngCore,
    ) -> i64 {
        let raw = self.attack.saturating_mul(power) / 100;
        let mut damage = if pierce {
            raw
        } else {
            raw.saturating_sub(target.defense)
        };
        damage = damage.max(1);
        if rng.gen_range(0..100u32) < self.crit {
            damage = damage.saturating_mul(2);
        }
        damage
    }

    fn strike(
        &self,
        foes: &mut [&mut ArenaCharacter],
        row: &SkillRow,
        rng: &mut dyn RngCore,
    ) -> Result<(), TickError> {
        let hits = match row.category {
            SkillCategory::DoubleAttack => 2,
            _ => 1,
        };
        let pierce = row.category == SkillCategory::BlowAttack;

        let target = foes
            .iter_mut()
            .find(|foe| !foe.is_dead())
            .ok_or(TickError::NoTarget)?;

        for _ in 0..hits {
            let damage = self.roll_hit(target, row.power, pierce, rng);
            target.take_damage(damage);
            tracing::trace!(
                "{:?} {} hits {:?} for {} ({} left)",
                self.side,
                row.name,
                target.side,
                damage,
                target.health
            );
        }
        Ok(())
    }

    fn apply_speed_buff(&mut self, row: &SkillRow) -> Result<(), TickError> {
        let percent = if self.extra_buff_before_get_buffs {
            row.power.saturating_add(self.buff_extra)
        } else {
            row.power
        };
        self.buffs.push(SpeedBuff {
            percent,
            remaining: row.duration.max(1),
        });
        self.recompute_speed()
    }
}

impl Combatant for ArenaCharacter {
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

    fn tick(&mut self, foes: &mut [&mut Self], rng: &mut dyn RngCore) -> Result<(), TickError> {
        self.used.clear();
        self.advance_timers()?;

        let selected = self.select_skill(rng);
        let row = match selected {
            Some(idx) => self.skills[idx].row.clone(),
            None => self.basic.clone(),
        };

        match row.category {
            category if category.is_attack() => self.strike(foes, &row, rng)?,
            SkillCategory::SpeedBuff => self.apply_speed_buff(&row)?,
            // Heal
            _ => {
                let amount = (self.attack.saturating_mul(row.power) / 100).max(0);
                self.heal(amount);
            }
        }

        if let Some(idx) = selected {
            if let Some(skill) = self.skills.get_mut(idx) {
                skill.cooldown_left = row.cooldown;
            }
        }
        self.used.push(row.category);
        Ok(())
    }

    fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            side: self.side,
            name: self.name.clone(),
            level: self.level,
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            used_skills: self.used.clone(),
        }
    }
}
