//! Entry point used by the surrounding ledger layer

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::engine::ArenaMatch;
use super::log::ArenaLog;
use crate::combatant::{ArenaCharacter, Combatant, PlayerDigest};
use crate::core::config::MatchConfig;
use crate::core::error::Result;
use crate::core::types::Side;
use crate::scheduler::{PairQueue, ReadinessQueue};
use crate::tables::{ArenaSheets, SkillSheet};

/// Resolves arena matches with an injected random source
///
/// A match is a pure function of (digests, sheets, config, random source):
/// running it again with the same seed yields the same log.
pub struct ArenaSimulator<R> {
    rng: R,
    config: MatchConfig,
}

impl ArenaSimulator<ChaCha8Rng> {
    /// Simulator driven by ChaCha8 seeded with `seed`
    pub fn seeded(seed: u64, config: MatchConfig) -> Result<Self> {
        Self::new(ChaCha8Rng::seed_from_u64(seed), config)
    }
}

impl<R: RngCore> ArenaSimulator<R> {
    pub fn new(rng: R, config: MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { rng, config })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Build both characters from their digests and resolve the match
    pub fn simulate(
        &mut self,
        challenger: &PlayerDigest,
        opponent: &PlayerDigest,
        sheets: &ArenaSheets,
    ) -> Result<ArenaLog> {
        let challenger =
            ArenaCharacter::from_digest(challenger, Side::Challenger, sheets, &self.config)?;
        let opponent = ArenaCharacter::from_digest(opponent, Side::Opponent, sheets, &self.config)?;

        tracing::debug!(
            "Simulating {} vs {}",
            challenger.name(),
            opponent.name()
        );
        self.run(challenger, opponent, &sheets.skills)
    }

    /// Resolve a match between two ready-made combatants
    pub fn run<C: Combatant>(
        &mut self,
        challenger: C,
        opponent: C,
        skills: &SkillSheet,
    ) -> Result<ArenaLog> {
        self.run_with_queue(challenger, opponent, skills, PairQueue::new())
    }

    /// Resolve a match with a caller-chosen scheduler
    pub fn run_with_queue<C: Combatant, Q: ReadinessQueue>(
        &mut self,
        challenger: C,
        opponent: C,
        skills: &SkillSheet,
        queue: Q,
    ) -> Result<ArenaLog> {
        let arena = ArenaMatch::new(&self.config, skills, challenger, opponent, queue)?;
        arena.run(&mut self.rng)
    }
}
