//! Determinism verification tests.
//!
//! These tests verify that the engine produces identical results when given
//! identical inputs at identical ticks. This is critical for:
//! - Replay systems
//! - Server-side verification
//! - Debug reproducibility

use crate::combatant::ClassKind;
use crate::cooldown::AbilityId;
use crate::directive::Directive;
use crate::effect::CombatEffect;
use crate::engine::MatchEngine;

use super::helpers::{fast_config, live_match};

/// Drives one fully scripted match and returns its complete directive
/// stream plus the final roster snapshot.
fn scripted_run() -> (Vec<Directive>, String) {
    let mut engine = MatchEngine::new(fast_config()).expect("config");
    let mut directives = Vec::new();

    let a = engine.join().expect("join a");
    let b = engine.join().expect("join b");
    let c = engine.join().expect("join c");
    engine.open_selection();
    engine.select_class(a, ClassKind::Brood);
    engine.select_class(b, ClassKind::Vanguard);
    engine.select_class(c, ClassKind::Warden);
    engine.confirm_roster();

    let charge = AbilityId::new("vanguard.charge");
    for tick in 1..=2_000u64 {
        engine.tick();
        match tick {
            40 => engine.apply_effect(a, CombatEffect::Damage { amount: 7 }),
            60 => {
                let _ = engine.request_ability_use(b, &charge);
            }
            80 => engine.award_resource(b, 5),
            120 => engine.mount(a),
            140 => engine.dismount(a),
            900 => engine.apply_effect(c, CombatEffect::Damage { amount: 999 }),
            1_800 => engine.apply_effect(b, CombatEffect::Damage { amount: 999 }),
            _ => {}
        }
        directives.append(&mut engine.drain_directives());
    }

    let roster = serde_json::to_string(engine.roster()).expect("roster serializes");
    (directives, roster)
}

#[test]
fn identical_scripts_produce_identical_runs() {
    let (directives_a, roster_a) = scripted_run();
    let (directives_b, roster_b) = scripted_run();

    assert_eq!(directives_a.len(), directives_b.len());
    assert_eq!(directives_a, directives_b);
    assert_eq!(roster_a, roster_b);
}

#[test]
fn drain_timing_does_not_change_the_stream() {
    // One engine drains every tick, the other once at the end; the streams
    // must be identical because draining has no side effects on state.
    let (mut per_tick, ids_a) = live_match(&[ClassKind::Brood, ClassKind::Vanguard]);
    let (mut at_end, ids_b) = live_match(&[ClassKind::Brood, ClassKind::Vanguard]);
    assert_eq!(ids_a, ids_b);

    let mut drained_per_tick = Vec::new();
    for _ in 0..500 {
        per_tick.tick();
        drained_per_tick.append(&mut per_tick.drain_directives());
    }
    for _ in 0..500 {
        at_end.tick();
    }
    let drained_at_end = at_end.drain_directives();

    assert_eq!(drained_per_tick, drained_at_end);
}

#[test]
fn timer_firing_order_is_stable_across_runs() {
    // Brood carries two repeating timers whose periods collide every 100
    // ticks; the collision order must not vary between runs.
    let collect = || {
        let (mut engine, ids) = live_match(&[ClassKind::Brood, ClassKind::Brood]);
        engine.apply_effect(ids[0], CombatEffect::Damage { amount: 5 });
        engine.apply_effect(ids[1], CombatEffect::Damage { amount: 5 });
        engine.drain_directives();
        let mut directives = Vec::new();
        for _ in 0..1_500 {
            engine.tick();
            directives.append(&mut engine.drain_directives());
        }
        directives
    };

    assert_eq!(collect(), collect());
}
