//! Match phase machine.
//!
//! A match walks a single forward path:
//!
//! ```text
//! Lobby -> ClassSelect -> Countdown -> Freeze -> Active -> Ended -> Lobby
//! ```
//!
//! The only backward edge is the post-match reset from `Ended` to `Lobby`.
//! [`MatchPhase::can_transition_to`] encodes the legal edges; the engine
//! owns when they are taken and what side effects accompany them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The phase a match is currently in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Idle; combatants may join and leave freely.
    Lobby,
    /// Combatants pick classes.
    ClassSelect,
    /// Start countdown is running; retryable if the roster check fails.
    Countdown,
    /// Combatants are placed and rooted; combat has not begun.
    Freeze,
    /// Combat is live.
    Active,
    /// The match concluded; cleanup has run, awaiting reset.
    Ended,
}

impl MatchPhase {
    /// Returns `true` if the machine may move from `self` to `next`.
    ///
    /// `Countdown -> Countdown` is legal: a failed roster re-check restarts
    /// the countdown in place.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Lobby, Self::ClassSelect)
                | (Self::ClassSelect, Self::Countdown)
                | (Self::Countdown, Self::Countdown | Self::Freeze)
                | (Self::Freeze, Self::Active)
                | (Self::Active, Self::Ended)
                | (Self::Ended, Self::Lobby)
        )
    }

    /// Returns `true` if combat effects and ability use are legal.
    #[must_use]
    pub const fn is_combat(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns `true` if combatants may still join the match.
    #[must_use]
    pub const fn accepts_joins(self) -> bool {
        matches!(self, Self::Lobby | Self::ClassSelect)
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lobby => "lobby",
            Self::ClassSelect => "class-select",
            Self::Countdown => "countdown",
            Self::Freeze => "freeze",
            Self::Active => "active",
            Self::Ended => "ended",
        };
        write!(f, "{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [MatchPhase; 6] = [
        MatchPhase::Lobby,
        MatchPhase::ClassSelect,
        MatchPhase::Countdown,
        MatchPhase::Freeze,
        MatchPhase::Active,
        MatchPhase::Ended,
    ];

    #[test]
    fn forward_path_is_legal() {
        for pair in ALL.windows(2) {
            assert!(
                pair[0].can_transition_to(pair[1]),
                "{} -> {}",
                pair[0],
                pair[1]
            );
        }
        assert!(MatchPhase::Ended.can_transition_to(MatchPhase::Lobby));
    }

    #[test]
    fn countdown_may_restart_in_place() {
        assert!(MatchPhase::Countdown.can_transition_to(MatchPhase::Countdown));
    }

    #[test]
    fn no_other_self_loops() {
        for phase in ALL {
            if phase != MatchPhase::Countdown {
                assert!(!phase.can_transition_to(phase), "{phase}");
            }
        }
    }

    #[test]
    fn skipping_phases_is_illegal() {
        assert!(!MatchPhase::Lobby.can_transition_to(MatchPhase::Active));
        assert!(!MatchPhase::ClassSelect.can_transition_to(MatchPhase::Freeze));
        assert!(!MatchPhase::Countdown.can_transition_to(MatchPhase::Active));
        assert!(!MatchPhase::Active.can_transition_to(MatchPhase::Lobby));
    }

    #[test]
    fn backward_edges_are_illegal_except_reset() {
        assert!(!MatchPhase::Active.can_transition_to(MatchPhase::Freeze));
        assert!(!MatchPhase::Freeze.can_transition_to(MatchPhase::Countdown));
        assert!(!MatchPhase::ClassSelect.can_transition_to(MatchPhase::Lobby));
    }

    #[test]
    fn combat_and_join_windows() {
        for phase in ALL {
            assert_eq!(phase.is_combat(), phase == MatchPhase::Active);
        }
        assert!(MatchPhase::Lobby.accepts_joins());
        assert!(MatchPhase::ClassSelect.accepts_joins());
        assert!(!MatchPhase::Countdown.accepts_joins());
        assert!(!MatchPhase::Active.accepts_joins());
    }
}
