//! Engine error taxonomy.
//!
//! The core distinguishes misconfiguration, which is reported to the caller
//! as an [`EngineError`], from routine gameplay outcomes (denied ability use,
//! skipped timer firings), which are plain values and never errors.

use thiserror::Error;

/// Failures surfaced to the embedding host.
///
/// Every variant is a configuration problem: the runtime itself has no
/// internal error states. Transitions that hit one of these stay in their
/// current phase and emit a [`Directive::Notice`](crate::directive::Directive)
/// so operators see the abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No lobby site is configured; returning combatants is impossible.
    #[error("no lobby site configured")]
    MissingLobbySite,

    /// No spawn sites are configured; starting combat is impossible.
    #[error("no spawn sites configured")]
    MissingSpawnSites,

    /// A configuration field holds an unusable value.
    #[error("invalid configuration: {field}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_stable() {
        assert_eq!(
            EngineError::MissingLobbySite.to_string(),
            "no lobby site configured"
        );
        assert_eq!(
            EngineError::InvalidConfig {
                field: "countdown_ticks"
            }
            .to_string(),
            "invalid configuration: countdown_ticks"
        );
    }
}
