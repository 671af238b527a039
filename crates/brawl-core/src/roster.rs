//! Roster: the entity-indexed combatant registry.
//!
//! The `Roster` is the single owner of all [`Combatant`] records in a match.
//! It provides:
//! - Storage with deterministic iteration order (`BTreeMap`)
//! - Combatant lifecycle (join/leave)
//! - Bulk operations used by match-end cleanup (clear assignments, restore
//!   baselines)
//! - Alive-count queries consumed by win evaluation
//!
//! # Determinism
//!
//! Combatant ids are monotonically increasing and storage is a `BTreeMap`,
//! so iterating the roster always produces the same sequence across runs and
//! platforms. Every registry keyed by [`CombatantId`] inherits this ordering.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combatant::{Combatant, CombatantId, TeamId};

/// Registry of all combatants participating in (or waiting for) a match.
///
/// # Example
///
/// ```
/// use brawl_core::roster::Roster;
/// use brawl_core::combatant::ClassKind;
///
/// let mut roster = Roster::new();
/// let a = roster.join();
/// let b = roster.join();
///
/// roster.get_mut(a).unwrap().set_class(Some(ClassKind::Vanguard));
///
/// assert_eq!(roster.len(), 2);
/// assert!(!roster.all_classed());
/// roster.get_mut(b).unwrap().set_class(Some(ClassKind::Shade));
/// assert!(roster.all_classed());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Monotonically increasing combatant id counter.
    next_id: u64,
    /// Combatant storage with deterministic iteration order.
    combatants: BTreeMap<CombatantId, Combatant>,
}

impl Roster {
    /// Creates a new empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: 0,
            combatants: BTreeMap::new(),
        }
    }

    /// Adds a new combatant and returns its id.
    ///
    /// The combatant starts at baseline: alive, full health, no class, no
    /// team.
    pub fn join(&mut self) -> CombatantId {
        let id = CombatantId::new(self.next_id);
        self.next_id += 1;
        self.combatants.insert(id, Combatant::new(id));
        id
    }

    /// Removes a combatant, returning its final record if it existed.
    ///
    /// The caller (the engine) is responsible for purging the combatant's
    /// rows from the other registries.
    pub fn leave(&mut self, id: CombatantId) -> Option<Combatant> {
        self.combatants.remove(&id)
    }

    /// Returns a reference to a combatant by id.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Returns a mutable reference to a combatant by id.
    #[must_use]
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// Returns an iterator over combatant ids in deterministic (sorted) order.
    pub fn ids(&self) -> impl Iterator<Item = CombatantId> + '_ {
        self.combatants.keys().copied()
    }

    /// Returns an iterator over combatants in deterministic (sorted) order.
    pub fn iter(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.combatants.values()
    }

    /// Returns an iterator over mutable combatants in deterministic order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> + '_ {
        self.combatants.values_mut()
    }

    /// Returns the number of combatants in the roster.
    #[must_use]
    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    /// Returns `true` if the roster has no combatants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    /// Returns the number of alive combatants.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.iter().filter(|c| c.is_alive()).count()
    }

    /// Returns the alive combatants grouped by team assignment.
    ///
    /// Teamless combatants are returned under `None`. The map is ordered, so
    /// win evaluation over it is deterministic.
    #[must_use]
    pub fn alive_by_team(&self) -> BTreeMap<Option<TeamId>, Vec<CombatantId>> {
        let mut by_team: BTreeMap<Option<TeamId>, Vec<CombatantId>> = BTreeMap::new();
        for c in self.iter().filter(|c| c.is_alive()) {
            by_team.entry(c.team()).or_default().push(c.id());
        }
        by_team
    }

    /// Returns `true` if any combatant carries a team assignment.
    #[must_use]
    pub fn has_team_data(&self) -> bool {
        self.iter().any(|c| c.team().is_some())
    }

    /// Returns `true` if the roster is non-empty and every combatant has a
    /// class assigned.
    #[must_use]
    pub fn all_classed(&self) -> bool {
        !self.is_empty() && self.iter().all(|c| c.class().is_some())
    }

    /// Clears every class assignment.
    ///
    /// Part of the fixed match-end cleanup order; runs after all timers and
    /// registries have been cleared so no timer can observe a classless
    /// combatant mid-match.
    pub fn clear_classes(&mut self) {
        for c in self.iter_mut() {
            c.set_class(None);
        }
    }

    /// Clears every team assignment.
    pub fn clear_teams(&mut self) {
        for c in self.iter_mut() {
            c.set_team(None);
        }
    }

    /// Restores every combatant to baseline (health, alive flag, status
    /// flags).
    pub fn restore_all_baselines(&mut self) {
        for c in self.iter_mut() {
            c.restore_baseline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::ClassKind;

    #[test]
    fn new_creates_empty_roster() {
        let roster = Roster::new();
        assert!(roster.is_empty());
        assert_eq!(roster.len(), 0);
        assert_eq!(roster.alive_count(), 0);
    }

    #[test]
    fn join_assigns_sequential_ids() {
        let mut roster = Roster::new();
        let a = roster.join();
        let b = roster.join();
        let c = roster.join();

        assert_eq!(a, CombatantId::new(0));
        assert_eq!(b, CombatantId::new(1));
        assert_eq!(c, CombatantId::new(2));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn ids_are_not_reused_after_leave() {
        let mut roster = Roster::new();
        let a = roster.join();
        roster.leave(a);
        let b = roster.join();
        assert_ne!(a, b);
    }

    #[test]
    fn leave_nonexistent_returns_none() {
        let mut roster = Roster::new();
        assert!(roster.leave(CombatantId::new(99)).is_none());
    }

    #[test]
    fn ids_iterate_in_sorted_order() {
        let mut roster = Roster::new();
        let a = roster.join();
        let b = roster.join();
        let c = roster.join();
        roster.leave(b);

        let ids: Vec<_> = roster.ids().collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn alive_count_tracks_eliminations() {
        let mut roster = Roster::new();
        let a = roster.join();
        let _b = roster.join();

        assert_eq!(roster.alive_count(), 2);
        roster.get_mut(a).unwrap().eliminate();
        assert_eq!(roster.alive_count(), 1);
    }

    #[test]
    fn alive_by_team_groups_correctly() {
        let mut roster = Roster::new();
        let a = roster.join();
        let b = roster.join();
        let c = roster.join();

        roster.get_mut(a).unwrap().set_team(Some(TeamId::new(1)));
        roster.get_mut(b).unwrap().set_team(Some(TeamId::new(1)));
        roster.get_mut(c).unwrap().set_team(Some(TeamId::new(2)));
        roster.get_mut(c).unwrap().eliminate();

        let by_team = roster.alive_by_team();
        assert_eq!(by_team.get(&Some(TeamId::new(1))).map(Vec::len), Some(2));
        assert!(by_team.get(&Some(TeamId::new(2))).is_none());
    }

    #[test]
    fn all_classed_requires_nonempty_roster() {
        let roster = Roster::new();
        assert!(!roster.all_classed());
    }

    #[test]
    fn bulk_cleanup_operations() {
        let mut roster = Roster::new();
        let a = roster.join();
        let b = roster.join();

        roster.get_mut(a).unwrap().set_class(Some(ClassKind::Brood));
        roster.get_mut(b).unwrap().set_class(Some(ClassKind::Warden));
        roster.get_mut(a).unwrap().set_team(Some(TeamId::new(1)));
        roster.get_mut(a).unwrap().apply_damage(999);

        roster.clear_classes();
        roster.clear_teams();
        roster.restore_all_baselines();

        for c in roster.iter() {
            assert_eq!(c.class(), None);
            assert_eq!(c.team(), None);
            assert!(c.is_alive());
            assert_eq!(c.health(), c.max_health());
        }
    }

    #[test]
    fn serialization_roundtrip() {
        let mut roster = Roster::new();
        roster.join();
        roster.join();

        let json = serde_json::to_string(&roster).unwrap();
        let mut back: Roster = serde_json::from_str(&json).unwrap();

        assert_eq!(back.len(), 2);
        // Id sequence continues after deserialization
        let next = back.join();
        assert_eq!(next, CombatantId::new(2));
    }
}
