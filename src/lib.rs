//! Arena Duel - deterministic one-on-one arena match engine
//!
//! Two combatants take turns in readiness order until one falls or the turn
//! cap runs out. Every match is reproducible from its inputs and seed.

pub mod arena;
pub mod combatant;
pub mod core;
pub mod scheduler;
pub mod tables;
