//! Win-condition evaluation.
//!
//! A *side* is the unit of survival: in team mode a side is a team, with
//! every teamless combatant counting as its own side; in solo mode every
//! combatant is a side. Evaluation is a pure function over the roster, run
//! by the engine after every elimination and on match expiry.

use crate::combatant::CombatantId;
use crate::directive::MatchOutcome;
use crate::roster::Roster;

/// Result of one win-condition evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// More than one side remains; the match continues.
    Continue,
    /// The match is decided.
    Decided(MatchOutcome),
}

/// Evaluates the win condition against the current roster.
///
/// Team mode with no team data on any living combatant degrades to solo
/// rules, so a misconfigured team match still decides cleanly.
///
/// - Zero sides alive is a [`MatchOutcome::Draw`] (mutual elimination).
/// - Exactly one side alive wins.
/// - Otherwise the match continues.
#[must_use]
pub fn evaluate(roster: &Roster, team_mode: bool) -> Verdict {
    let by_team = roster.alive_by_team();
    if by_team.is_empty() {
        return Verdict::Decided(MatchOutcome::Draw);
    }

    if team_mode && roster.has_team_data() {
        if by_team.len() > 1 {
            return Verdict::Continue;
        }
        // Exactly one side left. A teamless side wins as a solo combatant.
        if let Some((team, members)) = by_team.iter().next() {
            return match team {
                Some(team) => Verdict::Decided(MatchOutcome::TeamWin(*team)),
                None => solo_verdict(members),
            };
        }
        return Verdict::Decided(MatchOutcome::Draw);
    }

    let alive: Vec<CombatantId> = by_team.into_values().flatten().collect();
    solo_verdict(&alive)
}

fn solo_verdict(alive: &[CombatantId]) -> Verdict {
    match alive {
        [] => Verdict::Decided(MatchOutcome::Draw),
        [winner] => Verdict::Decided(MatchOutcome::SoloWin(*winner)),
        _ => Verdict::Continue,
    }
}
