//! Shared combat-effect primitives.
//!
//! Every ability and phase hook applies its state changes through the small
//! set of effects defined here, so damage/heal/flag semantics live in exactly
//! one place.
//!
//! # Reentrancy guard
//!
//! Two independently scheduled timers can each believe they are the sole
//! actor granting a bonus for the same action (the classic case: an explicit
//! dismount handler and an automatic-exit handler both healing for one
//! dismount). Compound effects therefore go through [`apply_guarded`] with an
//! [`ActionInstance`]: the first caller claims the instance and applies the
//! effect, every later caller for the same instance is a structural no-op.
//! Call-site discipline is not relied on.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantFlags};

/// Identifies one occurrence of a compound action (one mount session, one
/// triggered bonus). Allocated by the engine; never reused within a match.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActionInstance(u64);

impl ActionInstance {
    /// Creates an action instance from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ActionInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActionInstance({})", self.0)
    }
}

/// A primitive state change applied to one combatant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEffect {
    /// Reduce health, saturating at zero.
    Damage {
        /// Damage amount in health units.
        amount: u32,
    },
    /// Restore health, capped at maximum.
    Heal {
        /// Heal amount in health units.
        amount: u32,
    },
    /// Set status flags.
    SetFlags {
        /// Flags to insert.
        flags: CombatantFlags,
    },
    /// Clear status flags.
    ClearFlags {
        /// Flags to remove.
        flags: CombatantFlags,
    },
}

/// Result of applying an effect.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EffectOutcome {
    /// The effect applied without eliminating the target.
    Applied,
    /// The effect reduced a live target to zero health.
    Eliminated,
}

/// Applies a primitive effect to a combatant.
///
/// Effects on an eliminated combatant degrade silently (damage and heal are
/// no-ops; flags still apply so cleanup can clear them).
pub fn apply(combatant: &mut Combatant, effect: CombatEffect) -> EffectOutcome {
    match effect {
        CombatEffect::Damage { amount } => {
            if combatant.apply_damage(amount) {
                return EffectOutcome::Eliminated;
            }
        }
        CombatEffect::Heal { amount } => combatant.apply_heal(amount),
        CombatEffect::SetFlags { flags } => combatant.flags_mut().insert(flags),
        CombatEffect::ClearFlags { flags } => combatant.flags_mut().remove(flags),
    }
    EffectOutcome::Applied
}

/// Idempotence guard over compound action instances.
///
/// Cleared wholesale at match end as part of the fixed cleanup order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectGuard {
    claimed: BTreeSet<ActionInstance>,
}

impl EffectGuard {
    /// Creates an empty guard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            claimed: BTreeSet::new(),
        }
    }

    /// Claims an action instance.
    ///
    /// Returns `true` exactly once per instance; every later claim for the
    /// same instance returns `false`.
    pub fn try_claim(&mut self, instance: ActionInstance) -> bool {
        self.claimed.insert(instance)
    }

    /// Returns `true` if the instance has already been claimed.
    #[must_use]
    pub fn is_claimed(&self, instance: ActionInstance) -> bool {
        self.claimed.contains(&instance)
    }

    /// Forgets every claim. Used on match end.
    pub fn clear(&mut self) {
        self.claimed.clear();
    }
}

/// Applies a compound effect at most once per action instance.
///
/// Returns `None` if the instance was already claimed (the effect did not
/// run), otherwise the outcome of the application.
pub fn apply_guarded(
    guard: &mut EffectGuard,
    combatant: &mut Combatant,
    instance: ActionInstance,
    effect: CombatEffect,
) -> Option<EffectOutcome> {
    if !guard.try_claim(instance) {
        return None;
    }
    Some(apply(combatant, effect))
}
