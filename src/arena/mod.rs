//! Arena match engine - one-on-one, turn-based, deterministic
//!
//! Whoever has the lowest readiness priority acts next. After every action
//! the waiting combatants become more ready (their priority shrinks), and
//! the actor is re-queued at `base_readiness / speed`.
//!
//! Termination is exactly one of:
//! - timeout: the turn counter passes the cap (challenger loses)
//! - death: one or both combatants reach zero health

pub mod engine;
pub mod log;
pub mod outcome;
pub mod simulator;

pub use engine::{ArenaMatch, MatchPhase};
pub use log::{ArenaLog, BattleEvent};
pub use outcome::{resolve_deaths, timeout_result, EndReason};
pub use simulator::ArenaSimulator;
