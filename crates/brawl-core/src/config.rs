//! Match configuration.
//!
//! All durations are expressed in ticks at the host's fixed 20 ticks/second
//! rate. Defaults describe a standard two-sided match: 10s countdown, 5s
//! freeze, 10 minute time limit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;

/// Identifies a world site (lobby pad or spawn pad) owned by the host.
///
/// The core never interprets site values; it only hands them back in
/// teleport directives.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SiteId(u32);

impl SiteId {
    /// Creates a site id from a raw `u32` value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw `u32` value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SiteId({})", self.0)
    }
}

/// Static parameters for one match.
///
/// # Example
///
/// ```
/// use brawl_core::config::{MatchConfig, SiteId};
///
/// let config = MatchConfig {
///     lobby_site: Some(SiteId::new(0)),
///     spawn_sites: vec![SiteId::new(1), SiteId::new(2)],
///     ..MatchConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Whether combatants fight in teams. With no team data on the roster the
    /// win evaluation degrades to solo rules.
    pub team_mode: bool,
    /// Minimum classed combatants required to start.
    pub required_combatants: usize,
    /// Countdown sub-phase length.
    pub countdown_ticks: u64,
    /// Freeze sub-phase length.
    pub freeze_ticks: u64,
    /// Match time limit; expiry with several sides alive is a draw.
    pub match_duration_ticks: u64,
    /// Period of the expired-cooldown sweep while active.
    pub cooldown_sweep_period: u64,
    /// Site combatants return to at match end.
    pub lobby_site: Option<SiteId>,
    /// Sites combatants spawn at, assigned round-robin.
    pub spawn_sites: Vec<SiteId>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            team_mode: false,
            required_combatants: 2,
            countdown_ticks: 200,
            freeze_ticks: 100,
            match_duration_ticks: 12_000,
            cooldown_sweep_period: 600,
            lobby_site: None,
            spawn_sites: Vec::new(),
        }
    }
}

impl MatchConfig {
    /// Checks the configuration for values the runtime cannot operate with.
    ///
    /// Site lists are deliberately *not* checked here: missing sites abort
    /// the specific transition that needs them, so a match can be configured
    /// before the world is fully built.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.required_combatants == 0 {
            return Err(EngineError::InvalidConfig {
                field: "required_combatants",
            });
        }
        if self.countdown_ticks == 0 {
            return Err(EngineError::InvalidConfig {
                field: "countdown_ticks",
            });
        }
        if self.match_duration_ticks == 0 {
            return Err(EngineError::InvalidConfig {
                field: "match_duration_ticks",
            });
        }
        if self.cooldown_sweep_period == 0 {
            return Err(EngineError::InvalidConfig {
                field: "cooldown_sweep_period",
            });
        }
        Ok(())
    }
}
