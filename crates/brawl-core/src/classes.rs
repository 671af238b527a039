//! Class kits: abilities, timer specs, resources, and evolution tables.
//!
//! Every class behavior is declared here as data and dispatched by matching
//! on [`ClassKind`]. The engine interprets the declarations: it schedules
//! [`TimerSpec`]s when a match goes active, gates ability use through the
//! cooldown table, and routes resource unlocks to the follow-up ability.
//!
//! Timer conditions are *not* stored with the specs. The engine re-validates
//! (combatant alive, still this class, match still active) at each firing, so
//! a spec that fails its condition skips that firing without cancelling
//! itself.
//!
//! All tick constants assume the host's fixed 20 ticks/second rate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combatant::ClassKind;
use crate::cooldown::AbilityId;
use crate::resource::{ResourceKind, ResourceSpec, UnlockPolicy};

/// Health restored by a passive regeneration firing.
pub const PASSIVE_REGEN_HEAL: u32 = 1;

/// Health restored on every evolution stage advance.
pub const STAGE_ADVANCE_HEAL: u32 = 6;

/// Health restored by the dismount bonus.
pub const DISMOUNT_HEAL: u32 = 4;

/// What a recurring class timer does when it fires.
///
/// The purpose is the dispatch key: the engine looks up current state fresh
/// on each firing instead of capturing it at schedule time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimerPurpose {
    /// Slow health trickle.
    PassiveRegen,
    /// Grant a ward item, at most one outstanding.
    ItemGrant,
    /// Check the combatant's evolution track against elapsed match time.
    Evolution,
}

/// One recurring generation/evolution timer owned by a class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSpec {
    /// Dispatch key for the firing.
    pub purpose: TimerPurpose,
    /// Firing period in ticks.
    pub period_ticks: u64,
}

const VANGUARD_TIMERS: &[TimerSpec] = &[];

const SHADE_TIMERS: &[TimerSpec] = &[];

const WARDEN_TIMERS: &[TimerSpec] = &[
    // Grant a ward every 60s; the firing condition enforces max 1 outstanding.
    TimerSpec {
        purpose: TimerPurpose::ItemGrant,
        period_ticks: 1200,
    },
];

const BROOD_TIMERS: &[TimerSpec] = &[
    TimerSpec {
        purpose: TimerPurpose::PassiveRegen,
        period_ticks: 100,
    },
    TimerSpec {
        purpose: TimerPurpose::Evolution,
        period_ticks: 20,
    },
];

/// Brood stage boundaries in elapsed match ticks (1, 3 and 6 minutes).
const BROOD_EVOLUTION: &[u64] = &[1_200, 3_600, 7_200];

impl ClassKind {
    /// The class's base abilities as `(id, cooldown_ticks)` pairs.
    ///
    /// Base abilities are usable from the moment combat legally begins.
    #[must_use]
    pub const fn base_abilities(self) -> &'static [(&'static str, u64)] {
        match self {
            Self::Vanguard => &[("vanguard.charge", 160)],
            Self::Shade => &[("shade.blink", 100)],
            Self::Warden => &[("warden.bulwark", 240)],
            Self::Brood => &[("brood.lunge", 60)],
        }
    }

    /// The follow-up ability granted by this class's resource unlock, if any.
    #[must_use]
    pub const fn unlock_ability(self) -> Option<(&'static str, u64)> {
        match self {
            Self::Vanguard => Some(("vanguard.rampage", 400)),
            Self::Shade => Some(("shade.shadowstorm", 600)),
            Self::Warden | Self::Brood => None,
        }
    }

    /// The resource kind this class accumulates, if any.
    #[must_use]
    pub const fn resource_kind(self) -> Option<ResourceKind> {
        match self {
            Self::Vanguard => Some(ResourceKind::Fury),
            Self::Shade => Some(ResourceKind::Shard),
            Self::Warden | Self::Brood => None,
        }
    }

    /// The class's recurring timer specs.
    #[must_use]
    pub const fn timer_specs(self) -> &'static [TimerSpec] {
        match self {
            Self::Vanguard => VANGUARD_TIMERS,
            Self::Shade => SHADE_TIMERS,
            Self::Warden => WARDEN_TIMERS,
            Self::Brood => BROOD_TIMERS,
        }
    }

    /// Evolution stage boundaries in elapsed match ticks, if this class
    /// evolves.
    #[must_use]
    pub const fn evolution_thresholds(self) -> Option<&'static [u64]> {
        match self {
            Self::Brood => Some(BROOD_EVOLUTION),
            _ => None,
        }
    }

    /// Returns `true` if this ability belongs to the class (base or unlock).
    #[must_use]
    pub fn owns_ability(self, ability: &AbilityId) -> bool {
        self.cooldown_of(ability).is_some()
    }

    /// Returns the base cooldown for one of this class's abilities.
    #[must_use]
    pub fn cooldown_of(self, ability: &AbilityId) -> Option<u64> {
        self.base_abilities()
            .iter()
            .chain(self.unlock_ability().iter())
            .find(|(id, _)| *id == ability.as_str())
            .map(|&(_, cd)| cd)
    }

    /// Returns `true` if the ability is usable without a resource unlock.
    #[must_use]
    pub fn is_base_ability(self, ability: &AbilityId) -> bool {
        self.base_abilities()
            .iter()
            .any(|(id, _)| *id == ability.as_str())
    }
}

/// Default resource catalog for the class roster.
///
/// - Fury (Vanguard): cap 10, unlock at 5, pays the threshold on unlock.
/// - Shard (Shade): cap 3, unlock at 3, resets fully on unlock.
#[must_use]
pub fn default_resource_catalog() -> BTreeMap<ResourceKind, ResourceSpec> {
    let mut catalog = BTreeMap::new();
    catalog.insert(
        ResourceKind::Fury,
        ResourceSpec {
            cap: 10,
            threshold: 5,
            policy: UnlockPolicy::DeductThreshold,
        },
    );
    catalog.insert(
        ResourceKind::Shard,
        ResourceSpec {
            cap: 3,
            threshold: 3,
            policy: UnlockPolicy::ResetToZero,
        },
    );
    catalog
}
