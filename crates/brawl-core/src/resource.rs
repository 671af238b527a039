//! Per-combatant resource counters with threshold unlocks.
//!
//! A resource kind is a named accumulator (fury, shards) that unlocks a
//! follow-up ability when it first reaches its threshold. Unlocks are
//! reported as plain [`Unlock`] values returned from [`ResourceRegistry::add`]
//! rather than invoked through callbacks, so the registry stays free of
//! domain knowledge and nothing here can capture state that goes stale after
//! cleanup. The engine maps unlocks to ability grants.
//!
//! # Post-unlock policy
//!
//! Each kind chooses what happens to its counter after the unlock fires:
//! some classes reset fully, others only pay the threshold. See
//! [`UnlockPolicy`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// Closed set of resource kinds used by the class roster.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Vanguard rage meter; deducts the threshold on unlock.
    Fury,
    /// Shade collection counter; resets to zero on unlock.
    Shard,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fury => write!(f, "Fury"),
            Self::Shard => write!(f, "Shard"),
        }
    }
}

/// What happens to a counter after its unlock fires.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockPolicy {
    /// Counter resets to zero; the next threshold crossing unlocks again.
    ResetToZero,
    /// Counter pays the threshold and keeps the remainder.
    DeductThreshold,
}

/// Static parameters for one resource kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// Hard cap on the counter. A cap of 0 disables the kind entirely.
    pub cap: u32,
    /// Count at which the unlock fires. 0 disables unlocking.
    pub threshold: u32,
    /// Post-unlock counter policy.
    pub policy: UnlockPolicy,
}

/// A threshold unlock that fired during an [`ResourceRegistry::add`] call.
///
/// The engine converts these into follow-up ability grants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    /// Combatant whose counter crossed the threshold.
    pub combatant: CombatantId,
    /// The resource kind that unlocked.
    pub kind: ResourceKind,
}

/// Per-combatant counter state for one kind.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Counter {
    count: u32,
}

/// Registry of per-(combatant, kind) resource counters.
///
/// # Example
///
/// ```
/// use brawl_core::resource::{ResourceKind, ResourceRegistry};
/// use brawl_core::combatant::CombatantId;
///
/// let mut res = ResourceRegistry::with_default_catalog();
/// let id = CombatantId::new(1);
///
/// // Shard threshold is 3: two adds stay locked, the third unlocks.
/// assert!(res.add(id, ResourceKind::Shard, 1).is_none());
/// assert!(res.add(id, ResourceKind::Shard, 1).is_none());
/// let unlock = res.add(id, ResourceKind::Shard, 1).unwrap();
/// assert_eq!(unlock.kind, ResourceKind::Shard);
/// // ResetToZero policy: counter is back at zero.
/// assert_eq!(res.count(id, ResourceKind::Shard), 0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceRegistry {
    catalog: BTreeMap<ResourceKind, ResourceSpec>,
    counts: BTreeMap<CombatantId, BTreeMap<ResourceKind, Counter>>,
}

impl ResourceRegistry {
    /// Creates a registry with the given kind catalog.
    #[must_use]
    pub fn new(catalog: BTreeMap<ResourceKind, ResourceSpec>) -> Self {
        Self {
            catalog,
            counts: BTreeMap::new(),
        }
    }

    /// Creates a registry with the class roster's default catalog
    /// (see [`crate::classes::default_resource_catalog`]).
    #[must_use]
    pub fn with_default_catalog() -> Self {
        Self::new(crate::classes::default_resource_catalog())
    }

    /// Returns the spec for a kind, if catalogued.
    #[must_use]
    pub fn spec(&self, kind: ResourceKind) -> Option<&ResourceSpec> {
        self.catalog.get(&kind)
    }

    /// Adds `amount` to a counter, capped at the kind's cap.
    ///
    /// Returns the [`Unlock`] if this add crossed the kind's threshold for
    /// the first time since the last reset. Precondition violations (zero
    /// amount, uncatalogued kind, zero cap) are silent no-ops returning
    /// `None`.
    pub fn add(&mut self, id: CombatantId, kind: ResourceKind, amount: u32) -> Option<Unlock> {
        if amount == 0 {
            return None;
        }
        let spec = *self.catalog.get(&kind)?;
        if spec.cap == 0 {
            return None;
        }

        let counter = self
            .counts
            .entry(id)
            .or_default()
            .entry(kind)
            .or_default();
        counter.count = spec.cap.min(counter.count.saturating_add(amount));

        if spec.threshold == 0 || counter.count < spec.threshold {
            return None;
        }

        // Threshold crossed: fire once, then apply the kind's policy. Both
        // policies start a fresh accumulation cycle, so the next crossing
        // fires again.
        match spec.policy {
            UnlockPolicy::ResetToZero => counter.count = 0,
            UnlockPolicy::DeductThreshold => counter.count -= spec.threshold,
        }
        Some(Unlock {
            combatant: id,
            kind,
        })
    }

    /// Consumes `amount` from a counter.
    ///
    /// All-or-nothing: returns `false` and mutates nothing if the current
    /// count is below `amount`.
    pub fn consume(&mut self, id: CombatantId, kind: ResourceKind, amount: u32) -> bool {
        let Some(counter) = self.counts.get_mut(&id).and_then(|row| row.get_mut(&kind)) else {
            return amount == 0;
        };
        if counter.count < amount {
            return false;
        }
        counter.count -= amount;
        true
    }

    /// Returns the current count for a combatant and kind.
    #[must_use]
    pub fn count(&self, id: CombatantId, kind: ResourceKind) -> u32 {
        self.counts
            .get(&id)
            .and_then(|row| row.get(&kind))
            .map_or(0, |c| c.count)
    }

    /// Clears one counter.
    pub fn clear(&mut self, id: CombatantId, kind: ResourceKind) {
        if let Some(row) = self.counts.get_mut(&id) {
            row.remove(&kind);
            if row.is_empty() {
                self.counts.remove(&id);
            }
        }
    }

    /// Clears every counter for one combatant.
    pub fn clear_all(&mut self, id: CombatantId) {
        self.counts.remove(&id);
    }

    /// Clears every counter in the registry. Used on match end.
    pub fn clear_everything(&mut self) {
        self.counts.clear();
    }

    /// Returns `true` if no counters exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self::with_default_catalog()
    }
}
