//! Outbound directives to presentation and world collaborators.
//!
//! The core exposes no wire protocol. Everything the host must render, play,
//! or perform in the world is emitted as a [`Directive`] value into the
//! engine's outbox, drained once per host frame via
//! [`MatchEngine::drain_directives`](crate::engine::MatchEngine::drain_directives).
//!
//! Directives are fire-and-forget: the core never depends on their completion
//! to proceed, it only assumes they eventually happen.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::combatant::{ClassKind, CombatantId, TeamId};
use crate::config::SiteId;
use crate::cooldown::AbilityId;
use crate::phase::MatchPhase;

/// How a match concluded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// One team outlived every other side.
    TeamWin(TeamId),
    /// One combatant outlived every other side.
    SoloWin(CombatantId),
    /// No side survived, or match time expired with several sides alive.
    Draw,
    /// An administrative end; no winner is announced.
    Forced,
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TeamWin(team) => write!(f, "team {team} wins"),
            Self::SoloWin(id) => write!(f, "combatant {id} wins"),
            Self::Draw => write!(f, "draw"),
            Self::Forced => write!(f, "match ended by operator"),
        }
    }
}

/// Phase-scoped world effects applied to combatants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEffect {
    /// Root applied for the freeze sub-phase.
    FreezeRoot,
    /// Combat-wide aura applied while the match is active.
    CombatAura,
}

/// A fire-and-forget command or notification for the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Directive {
    /// The match moved to a new phase.
    PhaseChanged {
        /// Phase before the transition.
        from: MatchPhase,
        /// Phase after the transition.
        to: MatchPhase,
    },
    /// Plain-text operator/participant notice (configuration aborts).
    Notice {
        /// Human-readable message.
        text: String,
    },
    /// Move a combatant to the lobby site.
    TeleportToLobby {
        /// Combatant to move.
        combatant: CombatantId,
        /// Configured lobby site.
        site: SiteId,
    },
    /// Move a combatant to its assigned spawn site.
    TeleportToSpawn {
        /// Combatant to move.
        combatant: CombatantId,
        /// Configured spawn site.
        site: SiteId,
    },
    /// Apply a phase-scoped world effect.
    ApplyPhaseEffect {
        /// Affected combatant.
        combatant: CombatantId,
        /// Effect to apply.
        effect: PhaseEffect,
    },
    /// Remove a phase-scoped world effect.
    RemovePhaseEffect {
        /// Affected combatant.
        combatant: CombatantId,
        /// Effect to remove.
        effect: PhaseEffect,
    },
    /// A class was assigned to a combatant.
    ClassAssigned {
        /// Combatant whose class changed.
        combatant: CombatantId,
        /// The new class.
        class: ClassKind,
    },
    /// A follow-up ability was granted by a resource unlock.
    AbilityGranted {
        /// Combatant receiving the ability.
        combatant: CombatantId,
        /// Granted ability.
        ability: AbilityId,
    },
    /// A ward item was granted by the Warden's timer.
    ItemGranted {
        /// Combatant receiving the item.
        combatant: CombatantId,
    },
    /// An evolution stage advanced.
    EvolutionAdvanced {
        /// Combatant that evolved.
        combatant: CombatantId,
        /// Stage reached.
        stage: usize,
    },
    /// A combatant was eliminated.
    CombatantEliminated {
        /// The eliminated combatant.
        combatant: CombatantId,
    },
    /// The match ended with the given outcome.
    ///
    /// Not emitted for forced ends; those skip the announcement by design.
    MatchEnded {
        /// The final outcome.
        outcome: MatchOutcome,
    },
}

impl Directive {
    /// Returns the combatant this directive targets, if it targets one.
    #[must_use]
    pub const fn combatant(&self) -> Option<CombatantId> {
        match self {
            Self::TeleportToLobby { combatant, .. }
            | Self::TeleportToSpawn { combatant, .. }
            | Self::ApplyPhaseEffect { combatant, .. }
            | Self::RemovePhaseEffect { combatant, .. }
            | Self::ClassAssigned { combatant, .. }
            | Self::AbilityGranted { combatant, .. }
            | Self::ItemGranted { combatant }
            | Self::EvolutionAdvanced { combatant, .. }
            | Self::CombatantEliminated { combatant } => Some(*combatant),
            Self::PhaseChanged { .. } | Self::Notice { .. } | Self::MatchEnded { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combatant_accessor() {
        let d = Directive::ItemGranted {
            combatant: CombatantId::new(4),
        };
        assert_eq!(d.combatant(), Some(CombatantId::new(4)));

        let d = Directive::Notice {
            text: "no lobby configured".to_string(),
        };
        assert_eq!(d.combatant(), None);
    }

    #[test]
    fn outcome_display() {
        assert_eq!(format!("{}", MatchOutcome::Draw), "draw");
        assert_eq!(
            format!("{}", MatchOutcome::TeamWin(TeamId::new(2))),
            "team 2 wins"
        );
    }

    #[test]
    fn serialization_roundtrip() {
        let d = Directive::MatchEnded {
            outcome: MatchOutcome::SoloWin(CombatantId::new(9)),
        };
        let json = serde_json::to_string(&d).unwrap();
        let back: Directive = serde_json::from_str(&json).unwrap();
        assert_eq!(d, back);
    }
}
