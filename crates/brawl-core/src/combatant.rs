//! Combatant types for the match runtime.
//!
//! This module provides the participant-level types tracked by the core:
//! - [`CombatantId`]: Unique identifier for combatants
//! - [`TeamId`]: Team assignment handle
//! - [`ClassKind`]: Closed set of playable classes
//! - [`CombatantFlags`]: Status flags mutated by phase and ability effects
//! - [`Combatant`]: The complete per-participant state record
//!
//! # Architecture
//!
//! Combatants carry no ability logic themselves. Class behavior is dispatched
//! on [`ClassKind`] (see [`crate::classes`]), and all transient combat state
//! (cooldowns, resources, timers) lives in the dedicated registries so that
//! match-end cleanup is a registry-wide operation rather than a per-object
//! walk.
//!
//! # Example
//!
//! ```
//! use brawl_core::combatant::{Combatant, CombatantId, ClassKind};
//!
//! let mut c = Combatant::new(CombatantId::new(7));
//! c.set_class(Some(ClassKind::Vanguard));
//!
//! assert!(c.is_alive());
//! assert_eq!(c.class(), Some(ClassKind::Vanguard));
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum health for a combatant at baseline.
pub const BASELINE_MAX_HEALTH: u32 = 20;

/// Unique identifier for a combatant.
///
/// `CombatantId` is a newtype wrapper around `u64`. Ids are assigned
/// monotonically by the [`Roster`](crate::roster::Roster) and are never
/// reused within a roster's lifetime.
///
/// # Ordering
///
/// Ids order by their numeric value, which all registries rely on for
/// deterministic iteration.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u64);

impl CombatantId {
    /// Creates a new `CombatantId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CombatantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<CombatantId> for u64 {
    fn from(id: CombatantId) -> Self {
        id.0
    }
}

/// Team assignment handle.
///
/// Teams are opaque to the core: the selection layer decides membership and
/// the win evaluator only compares ids. Solo matches leave the assignment as
/// `None` on every combatant.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(u32);

impl TeamId {
    /// Creates a new `TeamId` from a raw `u32` value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.0)
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of playable classes.
///
/// Each class owns an ability kit, a timer-spec list, and optionally a
/// resource kind and an evolution track (see [`crate::classes`]). Dispatch is
/// a match on this tag, resolved at compile time.
///
/// # Variants
///
/// - `Vanguard`: Melee bruiser building fury toward a rampage unlock
/// - `Shade`: Assassin collecting shards toward a burst unlock
/// - `Warden`: Defender granted a ward item periodically, one outstanding
/// - `Brood`: Evolving class advancing through stages over match time
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassKind {
    /// Melee bruiser; fury resource unlocks a rampage follow-up.
    Vanguard,
    /// Assassin; shard resource unlocks a burst follow-up.
    Shade,
    /// Defender; receives a ward item on a slow repeating timer.
    Warden,
    /// Evolving class; stages advance on elapsed match time.
    Brood,
}

impl ClassKind {
    /// All playable classes, in stable order.
    pub const ALL: [Self; 4] = [Self::Vanguard, Self::Shade, Self::Warden, Self::Brood];
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vanguard => write!(f, "Vanguard"),
            Self::Shade => write!(f, "Shade"),
            Self::Warden => write!(f, "Warden"),
            Self::Brood => write!(f, "Brood"),
        }
    }
}

bitflags! {
    /// Status flags mutated by phase transitions and ability effects.
    ///
    /// Flags are cleared wholesale by the baseline restore at match end, so
    /// no flag may encode state that must survive across matches.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CombatantFlags: u32 {
        /// Rooted in place during the freeze sub-phase.
        const FROZEN = 1 << 0;
        /// Riding a mount; clearing this triggers the dismount heal.
        const MOUNTED = 1 << 1;
        /// Holding an outstanding ward item (Warden grant, max one).
        const WARD_HELD = 1 << 2;
    }
}

/// A participant entity tracked by the core during a match.
///
/// # Lifecycle
///
/// Created on join, class/team mutated by the external selection flow,
/// eliminated by elimination events, and purged (all per-combatant state
/// cleared from every registry) on leave or match end.
///
/// # Invariants
///
/// - A combatant with no class assigned has no active timers or cooldowns;
///   the engine enforces this by cancelling and clearing on class change.
/// - `alive == false` implies the combatant is skipped by every timer
///   condition until the baseline restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    class: Option<ClassKind>,
    team: Option<TeamId>,
    alive: bool,
    health: u32,
    max_health: u32,
    flags: CombatantFlags,
}

impl Combatant {
    /// Creates a new combatant at full baseline health with no class or team.
    #[must_use]
    pub fn new(id: CombatantId) -> Self {
        Self {
            id,
            class: None,
            team: None,
            alive: true,
            health: BASELINE_MAX_HEALTH,
            max_health: BASELINE_MAX_HEALTH,
            flags: CombatantFlags::empty(),
        }
    }

    /// Returns the combatant's unique identifier.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Returns the current class assignment, if any.
    #[must_use]
    pub const fn class(&self) -> Option<ClassKind> {
        self.class
    }

    /// Sets or clears the class assignment.
    pub fn set_class(&mut self, class: Option<ClassKind>) {
        self.class = class;
    }

    /// Returns the current team assignment, if any.
    #[must_use]
    pub const fn team(&self) -> Option<TeamId> {
        self.team
    }

    /// Sets or clears the team assignment.
    pub fn set_team(&mut self, team: Option<TeamId>) {
        self.team = team;
    }

    /// Returns `true` if the combatant has not been eliminated.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Marks the combatant as eliminated.
    ///
    /// Idempotent: eliminating an already-eliminated combatant is a no-op.
    pub fn eliminate(&mut self) {
        self.alive = false;
    }

    /// Returns the current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Returns the maximum health.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Applies raw damage, saturating at zero.
    ///
    /// Returns `true` if this call reduced health to zero on a previously
    /// alive combatant (an elimination). The alive flag is updated here so
    /// that two damage effects in the same tick cannot both observe a live
    /// target at zero health.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Applies healing, capped at maximum health.
    ///
    /// Healing an eliminated combatant is a no-op.
    pub fn apply_heal(&mut self, amount: u32) {
        if !self.alive {
            return;
        }
        self.health = self.max_health.min(self.health.saturating_add(amount));
    }

    /// Returns the current status flags.
    #[must_use]
    pub const fn flags(&self) -> CombatantFlags {
        self.flags
    }

    /// Returns a mutable reference to the status flags.
    pub fn flags_mut(&mut self) -> &mut CombatantFlags {
        &mut self.flags
    }

    /// Restores the combatant to its baseline state.
    ///
    /// Health returns to maximum, the alive flag is set, and all status
    /// flags are cleared. Class and team assignments are *not* touched here;
    /// the engine clears those separately as part of the fixed cleanup order.
    pub fn restore_baseline(&mut self) {
        self.alive = true;
        self.health = self.max_health;
        self.flags = CombatantFlags::empty();
    }
}
