//! Test setup utilities and factory functions.

use crate::combatant::{ClassKind, CombatantId, TeamId};
use crate::config::{MatchConfig, SiteId};
use crate::directive::Directive;
use crate::engine::MatchEngine;
use crate::phase::MatchPhase;

/// Installs a test-writer subscriber so engine traces land in captured test
/// output. Safe to call repeatedly; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// A short, fully-sited configuration so lifecycle tests stay fast.
pub fn fast_config() -> MatchConfig {
    MatchConfig {
        countdown_ticks: 4,
        freeze_ticks: 2,
        match_duration_ticks: 8_000,
        lobby_site: Some(SiteId::new(0)),
        spawn_sites: vec![SiteId::new(1), SiteId::new(2), SiteId::new(3)],
        ..MatchConfig::default()
    }
}

/// Builds an engine with the given classes joined, classed, and fought
/// through countdown and freeze into live combat.
///
/// Returns the engine (with its directive outbox drained) and the combatant
/// ids in join order.
pub fn live_match(classes: &[ClassKind]) -> (MatchEngine, Vec<CombatantId>) {
    live_match_with(fast_config(), classes, &[])
}

/// Like [`live_match`], but with explicit configuration and team assignments
/// (`teams` is zipped against the join order; missing entries stay teamless).
pub fn live_match_with(
    config: MatchConfig,
    classes: &[ClassKind],
    teams: &[Option<TeamId>],
) -> (MatchEngine, Vec<CombatantId>) {
    init_tracing();
    let countdown = config.countdown_ticks;
    let freeze = config.freeze_ticks;
    let mut engine = MatchEngine::new(config).expect("test config must validate");

    let ids: Vec<CombatantId> = classes.iter().map(|_| engine.join().expect("join")).collect();
    for (id, team) in ids.iter().zip(teams) {
        engine.assign_team(*id, *team);
    }

    assert!(engine.open_selection());
    for (id, class) in ids.iter().zip(classes) {
        engine.select_class(*id, *class);
    }
    assert!(engine.confirm_roster(), "roster must confirm");

    for _ in 0..=(countdown + freeze) {
        engine.tick();
    }
    assert_eq!(engine.phase(), MatchPhase::Active, "match must go live");
    engine.drain_directives();
    (engine, ids)
}

/// Runs the engine for `ticks` ticks, collecting every emitted directive.
pub fn run_ticks(engine: &mut MatchEngine, ticks: u64) -> Vec<Directive> {
    let mut directives = Vec::new();
    for _ in 0..ticks {
        engine.tick();
        directives.append(&mut engine.drain_directives());
    }
    directives
}

/// Counts directives matching a predicate.
pub fn count_matching(directives: &[Directive], pred: impl Fn(&Directive) -> bool) -> usize {
    directives.iter().filter(|d| pred(d)).count()
}
