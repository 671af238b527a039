//! Per-combatant, per-ability cooldown registry.
//!
//! The registry is a pure mapping from `(combatant, ability)` to an expiry
//! tick. No ability-specific knowledge lives here; classes decide durations
//! and the engine supplies the current tick on every call.
//!
//! # Lazy cleanup
//!
//! Expired entries are deleted as a side effect of reads, so no sweep is
//! required for correctness. [`CooldownRegistry::sweep`] exists only to bound
//! memory for combatants that stop using an ability; the engine runs it on a
//! slow housekeeping timer.
//!
//! # Conflict resolution
//!
//! Concurrent triggers within one tick resolve deterministically: the last
//! `set_cooldown` wins, because a set unconditionally overwrites the entry.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// Stable key identifying one specific action a class can perform.
///
/// Ability ids are dotted strings (`"vanguard.charge"`). They are opaque to
/// the cooldown registry; only classes interpret them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(String);

impl AbilityId {
    /// Creates a new `AbilityId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the ability id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AbilityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry of per-(combatant, ability) cooldown expiries.
///
/// # Invariant
///
/// At most one entry exists per `(combatant, ability)` pair at any time;
/// the map structure enforces this.
///
/// # Example
///
/// ```
/// use brawl_core::cooldown::{AbilityId, CooldownRegistry};
/// use brawl_core::combatant::CombatantId;
///
/// let mut cds = CooldownRegistry::new();
/// let id = CombatantId::new(1);
/// let blink = AbilityId::new("shade.blink");
///
/// cds.set_cooldown(id, &blink, 100, 0);
/// assert!(cds.is_on_cooldown(id, &blink, 0));
/// assert_eq!(cds.remaining(id, &blink, 40), 60);
/// assert!(!cds.is_on_cooldown(id, &blink, 100));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownRegistry {
    entries: BTreeMap<CombatantId, BTreeMap<AbilityId, u64>>,
}

impl CooldownRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns `true` if the ability is on cooldown at `now`.
    ///
    /// An entry whose expiry has passed is deleted as a side effect of the
    /// read.
    pub fn is_on_cooldown(&mut self, id: CombatantId, ability: &AbilityId, now: u64) -> bool {
        self.remaining(id, ability, now) > 0
    }

    /// Returns the remaining cooldown in ticks, 0 if not on cooldown.
    ///
    /// Expired entries are deleted as a side effect of the read.
    pub fn remaining(&mut self, id: CombatantId, ability: &AbilityId, now: u64) -> u64 {
        let Some(row) = self.entries.get_mut(&id) else {
            return 0;
        };
        match row.get(ability) {
            Some(&expiry) if expiry > now => expiry - now,
            Some(_) => {
                row.remove(ability);
                if row.is_empty() {
                    self.entries.remove(&id);
                }
                0
            }
            None => 0,
        }
    }

    /// Starts (or restarts) a cooldown of `duration_ticks` from `now`.
    ///
    /// A duration of 0 is a no-op, not an error: ability triggers happen at
    /// high frequency and must not destabilize the tick loop. Overwrites any
    /// existing entry (last write wins).
    pub fn set_cooldown(
        &mut self,
        id: CombatantId,
        ability: &AbilityId,
        duration_ticks: u64,
        now: u64,
    ) {
        if duration_ticks == 0 {
            return;
        }
        self.entries
            .entry(id)
            .or_default()
            .insert(ability.clone(), now + duration_ticks);
    }

    /// Reduces the remaining cooldown by the given fraction.
    ///
    /// `fraction` is expected in `(0, 1]`; non-positive values are a no-op
    /// and values above 1 are clamped. The entry is removed if the remaining
    /// time after reduction rounds to 0. No-op if no entry exists.
    pub fn reduce_cooldown(
        &mut self,
        id: CombatantId,
        ability: &AbilityId,
        fraction: f64,
        now: u64,
    ) {
        if fraction <= 0.0 {
            return;
        }
        let fraction = fraction.min(1.0);
        let remaining = self.remaining(id, ability, now);
        if remaining == 0 {
            return;
        }

        // Remaining fits in f64 without precision loss for any realistic
        // match length.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let reduced = ((remaining as f64) * (1.0 - fraction)).round() as u64;

        if reduced == 0 {
            self.clear(id, ability);
        } else if let Some(row) = self.entries.get_mut(&id) {
            row.insert(ability.clone(), now + reduced);
        }
    }

    /// Clears the cooldown for one ability.
    pub fn clear(&mut self, id: CombatantId, ability: &AbilityId) {
        if let Some(row) = self.entries.get_mut(&id) {
            row.remove(ability);
            if row.is_empty() {
                self.entries.remove(&id);
            }
        }
    }

    /// Clears every cooldown for one combatant.
    pub fn clear_all(&mut self, id: CombatantId) {
        self.entries.remove(&id);
    }

    /// Clears every cooldown in the registry. Used on match end.
    pub fn clear_everything(&mut self) {
        self.entries.clear();
    }

    /// Deletes all entries whose expiry has passed.
    ///
    /// Not required for correctness (reads clean up lazily); bounds memory
    /// for abilities that are never queried again.
    pub fn sweep(&mut self, now: u64) {
        for row in self.entries.values_mut() {
            row.retain(|_, &mut expiry| expiry > now);
        }
        self.entries.retain(|_, row| !row.is_empty());
    }

    /// Returns the number of live entries (including not-yet-swept expired
    /// ones).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if the registry holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blink() -> AbilityId {
        AbilityId::new("shade.blink")
    }

    mod ability_id_tests {
        use super::*;

        #[test]
        fn construction_and_display() {
            let id = AbilityId::new("vanguard.charge");
            assert_eq!(id.as_str(), "vanguard.charge");
            assert_eq!(format!("{id}"), "vanguard.charge");
        }

        #[test]
        fn conversions() {
            let a: AbilityId = "x".into();
            let b: AbilityId = String::from("x").into();
            assert_eq!(a, b);
        }

        #[test]
        fn serialization_roundtrip() {
            let id = AbilityId::new("brood.lunge");
            let json = serde_json::to_string(&id).unwrap();
            let back: AbilityId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, back);
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn set_then_query_is_on_cooldown() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 100, 0);
            assert!(cds.is_on_cooldown(id, &blink(), 0));
            assert!(cds.is_on_cooldown(id, &blink(), 99));
            assert!(!cds.is_on_cooldown(id, &blink(), 100));
        }

        #[test]
        fn expired_entry_is_lazily_deleted_on_read() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 10, 0);
            assert_eq!(cds.len(), 1);

            assert!(!cds.is_on_cooldown(id, &blink(), 10));
            assert!(cds.is_empty());
        }

        #[test]
        fn zero_duration_is_noop() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 0, 0);
            assert!(cds.is_empty());
            assert!(!cds.is_on_cooldown(id, &blink(), 0));
        }

        #[test]
        fn last_set_wins() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 100, 0);
            cds.set_cooldown(id, &blink(), 20, 0);
            assert_eq!(cds.remaining(id, &blink(), 0), 20);
            assert_eq!(cds.len(), 1);
        }

        #[test]
        fn remaining_reports_ticks_left() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 100, 0);
            assert_eq!(cds.remaining(id, &blink(), 0), 100);
            assert_eq!(cds.remaining(id, &blink(), 60), 40);
            assert_eq!(cds.remaining(id, &blink(), 200), 0);
        }

        #[test]
        fn reduce_halves_remaining() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 200, 0);
            cds.reduce_cooldown(id, &blink(), 0.5, 0);

            let remaining = cds.remaining(id, &blink(), 0);
            assert!((99..=101).contains(&remaining), "remaining = {remaining}");
        }

        #[test]
        fn reduce_full_fraction_removes_entry() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 200, 0);
            cds.reduce_cooldown(id, &blink(), 1.0, 0);
            assert!(!cds.is_on_cooldown(id, &blink(), 0));
            assert!(cds.is_empty());
        }

        #[test]
        fn reduce_nonpositive_fraction_is_noop() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 200, 0);
            cds.reduce_cooldown(id, &blink(), 0.0, 0);
            cds.reduce_cooldown(id, &blink(), -1.0, 0);
            assert_eq!(cds.remaining(id, &blink(), 0), 200);
        }

        #[test]
        fn reduce_missing_entry_is_noop() {
            let mut cds = CooldownRegistry::new();
            cds.reduce_cooldown(CombatantId::new(1), &blink(), 0.5, 0);
            assert!(cds.is_empty());
        }

        #[test]
        fn reduce_overlarge_fraction_is_clamped() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);

            cds.set_cooldown(id, &blink(), 200, 0);
            cds.reduce_cooldown(id, &blink(), 5.0, 0);
            assert!(!cds.is_on_cooldown(id, &blink(), 0));
        }

        #[test]
        fn clear_single_ability() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);
            let other = AbilityId::new("shade.shadowstorm");

            cds.set_cooldown(id, &blink(), 100, 0);
            cds.set_cooldown(id, &other, 100, 0);
            cds.clear(id, &blink());

            assert!(!cds.is_on_cooldown(id, &blink(), 0));
            assert!(cds.is_on_cooldown(id, &other, 0));
        }

        #[test]
        fn clear_all_scopes_to_one_combatant() {
            let mut cds = CooldownRegistry::new();
            let a = CombatantId::new(1);
            let b = CombatantId::new(2);

            cds.set_cooldown(a, &blink(), 100, 0);
            cds.set_cooldown(b, &blink(), 100, 0);
            cds.clear_all(a);

            assert!(!cds.is_on_cooldown(a, &blink(), 0));
            assert!(cds.is_on_cooldown(b, &blink(), 0));
        }

        #[test]
        fn sweep_drops_only_expired_entries() {
            let mut cds = CooldownRegistry::new();
            let id = CombatantId::new(1);
            let other = AbilityId::new("shade.shadowstorm");

            cds.set_cooldown(id, &blink(), 10, 0);
            cds.set_cooldown(id, &other, 100, 0);

            cds.sweep(50);
            assert_eq!(cds.len(), 1);
            assert!(cds.is_on_cooldown(id, &other, 50));
        }

        #[test]
        fn serialization_roundtrip() {
            let mut cds = CooldownRegistry::new();
            cds.set_cooldown(CombatantId::new(1), &blink(), 100, 0);

            let json = serde_json::to_string(&cds).unwrap();
            let mut back: CooldownRegistry = serde_json::from_str(&json).unwrap();
            assert_eq!(back.remaining(CombatantId::new(1), &blink(), 0), 100);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Reduction never increases the remaining time, lands within one
            /// tick of the exact fraction, and remaining decays with time.
            #[test]
            fn reduction_and_decay_bounds(
                duration in 1u64..100_000,
                fraction in 0.0f64..=1.0,
                elapsed in 0u64..200_000,
            ) {
                let mut cds = CooldownRegistry::new();
                let id = CombatantId::new(1);

                cds.set_cooldown(id, &blink(), duration, 0);
                cds.reduce_cooldown(id, &blink(), fraction, 0);

                let reduced = cds.remaining(id, &blink(), 0);
                prop_assert!(reduced <= duration);
                if fraction > 0.0 {
                    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let exact = ((duration as f64) * (1.0 - fraction)).round() as u64;
                    prop_assert!(reduced.abs_diff(exact) <= 1);
                }

                let later = cds.remaining(id, &blink(), elapsed);
                prop_assert!(later <= reduced);
                if elapsed >= duration {
                    prop_assert_eq!(later, 0);
                }
            }
        }
    }
}
