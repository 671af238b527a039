//! Evolution tracks: monotonic stage progression over match time.
//!
//! Some classes grow through stages as match time elapses. A track holds the
//! combatant's current stage index and the elapsed-tick thresholds that
//! advance it.
//!
//! # Invariants
//!
//! - The stage index only moves forward, never backward.
//! - Re-entrant advancement calls (same or lower elapsed time) are no-ops.
//! - Each boundary crossing is reported exactly once, even if a single
//!   `advance` call crosses several boundaries at once.

use serde::{Deserialize, Serialize};

/// Per-combatant monotonic stage tracker.
///
/// Stage 0 is the base form; stage `n` is reached once elapsed match time
/// crosses `thresholds[n - 1]`.
///
/// # Example
///
/// ```
/// use brawl_core::evolution::EvolutionTrack;
///
/// let mut track = EvolutionTrack::new(vec![100, 300]);
/// assert_eq!(track.stage(), 0);
///
/// // Crossing both boundaries at once reports each stage exactly once.
/// assert_eq!(track.advance(350), vec![1, 2]);
/// assert!(track.is_final());
///
/// // Re-entrant or regressive calls are no-ops.
/// assert!(track.advance(350).is_empty());
/// assert!(track.advance(10).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionTrack {
    /// Current stage index; 0 is the base form.
    stage: usize,
    /// Elapsed-tick boundaries, sorted ascending.
    thresholds: Vec<u64>,
}

impl EvolutionTrack {
    /// Creates a track at stage 0 with the given elapsed-tick boundaries.
    ///
    /// Thresholds are sorted so callers may pass them in any order.
    #[must_use]
    pub fn new(mut thresholds: Vec<u64>) -> Self {
        thresholds.sort_unstable();
        Self {
            stage: 0,
            thresholds,
        }
    }

    /// Returns the current stage index.
    #[must_use]
    pub const fn stage(&self) -> usize {
        self.stage
    }

    /// Returns the final stage index.
    #[must_use]
    pub fn final_stage(&self) -> usize {
        self.thresholds.len()
    }

    /// Returns `true` if the track has reached its final stage.
    #[must_use]
    pub fn is_final(&self) -> bool {
        self.stage >= self.thresholds.len()
    }

    /// Advances the stage for the given elapsed match time.
    ///
    /// Returns the stages newly reached by this call, in ascending order;
    /// empty if no boundary was crossed. The stage never regresses.
    pub fn advance(&mut self, elapsed_ticks: u64) -> Vec<usize> {
        let mut reached = Vec::new();
        while self.stage < self.thresholds.len() && elapsed_ticks >= self.thresholds[self.stage] {
            self.stage += 1;
            reached.push(self.stage);
        }
        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_track_starts_at_stage_zero() {
        let track = EvolutionTrack::new(vec![100, 200]);
        assert_eq!(track.stage(), 0);
        assert_eq!(track.final_stage(), 2);
        assert!(!track.is_final());
    }

    #[test]
    fn advance_crosses_one_boundary() {
        let mut track = EvolutionTrack::new(vec![100, 200]);
        assert_eq!(track.advance(100), vec![1]);
        assert_eq!(track.stage(), 1);
    }

    #[test]
    fn advance_below_boundary_is_noop() {
        let mut track = EvolutionTrack::new(vec![100]);
        assert!(track.advance(99).is_empty());
        assert_eq!(track.stage(), 0);
    }

    #[test]
    fn advance_crosses_multiple_boundaries_at_once() {
        let mut track = EvolutionTrack::new(vec![100, 200, 300]);
        assert_eq!(track.advance(250), vec![1, 2]);
        assert_eq!(track.stage(), 2);
    }

    #[test]
    fn reentrant_advance_is_noop() {
        let mut track = EvolutionTrack::new(vec![100]);
        assert_eq!(track.advance(150), vec![1]);
        assert!(track.advance(150).is_empty());
        assert!(track.advance(50).is_empty());
        assert_eq!(track.stage(), 1);
    }

    #[test]
    fn unsorted_thresholds_are_normalized() {
        let mut track = EvolutionTrack::new(vec![300, 100, 200]);
        assert_eq!(track.advance(150), vec![1]);
    }

    #[test]
    fn empty_thresholds_mean_permanently_final() {
        let mut track = EvolutionTrack::new(vec![]);
        assert!(track.is_final());
        assert!(track.advance(u64::MAX).is_empty());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut track = EvolutionTrack::new(vec![100, 200]);
        track.advance(120);

        let json = serde_json::to_string(&track).unwrap();
        let back: EvolutionTrack = serde_json::from_str(&json).unwrap();
        assert_eq!(track, back);
    }

    proptest! {
        /// For any sequence of elapsed-time samples the stage is
        /// non-decreasing and every boundary fires at most once.
        #[test]
        fn stage_is_monotonic_and_boundaries_fire_once(
            thresholds in proptest::collection::vec(0u64..10_000, 0..6),
            samples in proptest::collection::vec(0u64..20_000, 0..50),
        ) {
            let mut track = EvolutionTrack::new(thresholds);
            let mut last_stage = track.stage();
            let mut seen = std::collections::BTreeSet::new();

            for elapsed in samples {
                let reached = track.advance(elapsed);
                for stage in reached {
                    // each boundary reported at most once
                    prop_assert!(seen.insert(stage));
                }
                prop_assert!(track.stage() >= last_stage);
                last_stage = track.stage();
            }
        }
    }
}
