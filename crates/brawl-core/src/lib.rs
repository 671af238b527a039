//! # Brawl Core
//!
//! Match runtime for Brawl, a round-based PVP minigame.
//!
//! This crate provides the deterministic match engine: the phase state
//! machine, the tick scheduler, class kits with cooldowns, resource unlocks,
//! and evolution tracks, and win-condition evaluation. It owns no I/O; the
//! embedding host drives it one tick at a time and acts on the directives it
//! emits.
//!
//! ## Architecture
//!
//! - **Engine**: [`engine::MatchEngine`] owns all per-match state and the
//!   phase machine.
//! - **Registries**: cooldowns, resources, and evolution tracks are
//!   entity-indexed collaborators the engine orchestrates.
//! - **Directives**: outbound work (teleports, effects, announcements) is
//!   emitted as values and drained by the host.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brawl_core::{MatchConfig, MatchEngine};
//!
//! let mut engine = MatchEngine::new(MatchConfig::default())?;
//! loop {
//!     engine.tick();
//!     for directive in engine.drain_directives() {
//!         host.perform(directive);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod classes;
pub mod combatant;
pub mod config;
pub mod cooldown;
pub mod directive;
pub mod effect;
pub mod engine;
pub mod error;
pub mod evolution;
pub mod phase;
pub mod resource;
pub mod roster;
pub mod schedule;
pub mod win;

pub use combatant::{ClassKind, Combatant, CombatantFlags, CombatantId, TeamId};
pub use config::{MatchConfig, SiteId};
pub use cooldown::AbilityId;
pub use directive::{Directive, MatchOutcome, PhaseEffect};
pub use effect::CombatEffect;
pub use engine::{AbilityGate, MatchEngine};
pub use error::EngineError;
pub use phase::MatchPhase;

#[cfg(test)]
mod tests;
