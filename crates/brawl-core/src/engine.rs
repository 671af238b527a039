//! The match engine: phase orchestration over one fixed tick loop.
//!
//! [`MatchEngine`] owns every piece of per-match state and is driven by the
//! host calling [`MatchEngine::tick`] once per fixed tick. All mutation
//! happens on the tick thread; host-facing calls are plain synchronous
//! methods and outbound work is emitted as [`Directive`] values drained via
//! [`MatchEngine::drain_directives`].
//!
//! # Determinism
//!
//! Given the same configuration and the same sequence of host calls at the
//! same ticks, two engines produce identical state and identical directive
//! streams. Everything entity-indexed lives in `BTreeMap`s and the scheduler
//! fires in (due tick, insertion order) order, so there is no iteration
//! nondeterminism to leak.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::classes::{TimerPurpose, DISMOUNT_HEAL, PASSIVE_REGEN_HEAL, STAGE_ADVANCE_HEAL};
use crate::combatant::{ClassKind, CombatantFlags, CombatantId, TeamId};
use crate::config::{MatchConfig, SiteId};
use crate::cooldown::{AbilityId, CooldownRegistry};
use crate::directive::{Directive, MatchOutcome, PhaseEffect};
use crate::effect::{self, ActionInstance, CombatEffect, EffectGuard, EffectOutcome};
use crate::error::EngineError;
use crate::evolution::EvolutionTrack;
use crate::phase::MatchPhase;
use crate::resource::ResourceRegistry;
use crate::roster::Roster;
use crate::schedule::Scheduler;
use crate::win::{self, Verdict};

// ============================================================================
// Timer tasks
// ============================================================================

/// Work item carried by the scheduler.
///
/// Tasks are plain values: no closures, no captured state. The dispatch
/// re-reads current state at firing time, so stale tasks degrade to no-ops
/// instead of acting on a world that has moved on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum TimerTask {
    /// The start countdown ran out; re-check the roster and place combatants.
    CountdownElapsed,
    /// The freeze hold ran out; combat begins.
    FreezeElapsed,
    /// The match time limit was reached.
    MatchExpired,
    /// Periodic removal of expired cooldown entries.
    CooldownSweep,
    /// A recurring class timer for one combatant.
    Ability {
        combatant: CombatantId,
        purpose: TimerPurpose,
    },
}

// ============================================================================
// Ability gate
// ============================================================================

/// Answer to an ability-use request.
///
/// A denied request is a routine outcome, not an error; `remaining_ticks`
/// lets the host render the cooldown without a second query.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityGate {
    /// Whether the use was admitted. Admission already started the cooldown.
    pub allowed: bool,
    /// Remaining cooldown in ticks at the time of the request.
    pub remaining_ticks: u64,
}

impl AbilityGate {
    const DENIED: Self = Self {
        allowed: false,
        remaining_ticks: 0,
    };
}

// ============================================================================
// Engine
// ============================================================================

/// Owns and orchestrates all state for one match.
pub struct MatchEngine {
    config: MatchConfig,
    phase: MatchPhase,
    roster: Roster,
    scheduler: Scheduler<TimerTask>,
    cooldowns: CooldownRegistry,
    resources: ResourceRegistry,
    guard: EffectGuard,
    evolutions: BTreeMap<CombatantId, EvolutionTrack>,
    /// Follow-up abilities granted by resource unlocks, per combatant.
    unlocked: BTreeMap<CombatantId, Vec<AbilityId>>,
    /// Open mount sessions; the value guards the dismount bonus.
    mount_sessions: BTreeMap<CombatantId, ActionInstance>,
    /// Tick at which combat went live, while in `Active`.
    active_since: Option<u64>,
    outbox: Vec<Directive>,
    next_action: u64,
}

impl MatchEngine {
    /// Creates an engine in the lobby phase.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the configuration holds
    /// values the runtime cannot operate with.
    pub fn new(config: MatchConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            phase: MatchPhase::Lobby,
            roster: Roster::new(),
            scheduler: Scheduler::new(),
            cooldowns: CooldownRegistry::new(),
            resources: ResourceRegistry::with_default_catalog(),
            guard: EffectGuard::new(),
            evolutions: BTreeMap::new(),
            unlocked: BTreeMap::new(),
            mount_sessions: BTreeMap::new(),
            active_since: None,
            outbox: Vec::new(),
            next_action: 0,
        })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        self.phase
    }

    /// Returns the current tick.
    #[must_use]
    pub const fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Returns the match configuration.
    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the roster.
    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Ticks elapsed since combat went live, while active.
    #[must_use]
    pub fn elapsed_active(&self) -> Option<u64> {
        self.active_since.map(|since| self.now() - since)
    }

    /// Returns the evolution stage of a combatant, if it has a track.
    #[must_use]
    pub fn evolution_stage(&self, id: CombatantId) -> Option<usize> {
        self.evolutions.get(&id).map(EvolutionTrack::stage)
    }

    /// Remaining cooldown in ticks for an on-screen timer. 0 when ready.
    #[must_use]
    pub fn cooldown_remaining(&mut self, id: CombatantId, ability: &AbilityId) -> u64 {
        let now = self.now();
        self.cooldowns.remaining(id, ability, now)
    }

    /// Current class-resource count for a progress display. 0 for classes
    /// without a resource.
    #[must_use]
    pub fn resource_count(&self, id: CombatantId) -> u32 {
        self.roster
            .get(id)
            .and_then(crate::combatant::Combatant::class)
            .and_then(ClassKind::resource_kind)
            .map_or(0, |kind| self.resources.count(id, kind))
    }

    /// Drains every directive emitted since the last drain, in emission
    /// order.
    pub fn drain_directives(&mut self) -> Vec<Directive> {
        std::mem::take(&mut self.outbox)
    }

    // ------------------------------------------------------------------
    // Tick loop
    // ------------------------------------------------------------------

    /// Advances the engine by one tick and dispatches every due timer.
    pub fn tick(&mut self) {
        self.scheduler.advance();
        while let Some((_, task)) = self.scheduler.pop_due() {
            self.dispatch(task);
        }
    }

    fn dispatch(&mut self, task: TimerTask) {
        match task {
            TimerTask::CountdownElapsed => self.on_countdown_elapsed(),
            TimerTask::FreezeElapsed => self.on_freeze_elapsed(),
            TimerTask::MatchExpired => self.on_match_expired(),
            TimerTask::CooldownSweep => self.cooldowns.sweep(self.now()),
            TimerTask::Ability { combatant, purpose } => {
                self.on_class_timer(combatant, purpose);
            }
        }
    }

    // ------------------------------------------------------------------
    // Roster management
    // ------------------------------------------------------------------

    /// Admits a new combatant. Joins are only accepted before the countdown.
    pub fn join(&mut self) -> Option<CombatantId> {
        if !self.phase.accepts_joins() {
            return None;
        }
        let id = self.roster.join();
        debug!(combatant = %id, "combatant joined");
        Some(id)
    }

    /// Removes a combatant from the match.
    ///
    /// A leave during live combat counts as an elimination, so the win
    /// condition is re-evaluated immediately.
    pub fn leave(&mut self, id: CombatantId) {
        if self.roster.leave(id).is_none() {
            return;
        }
        debug!(combatant = %id, "combatant left");
        self.discard_combatant_state(id);
        if self.phase.is_combat() {
            self.push(Directive::CombatantEliminated { combatant: id });
            self.check_win();
        }
    }

    /// Assigns or clears a team. Legal until the countdown starts.
    pub fn assign_team(&mut self, id: CombatantId, team: Option<TeamId>) {
        if !self.phase.accepts_joins() {
            return;
        }
        if let Some(combatant) = self.roster.get_mut(id) {
            combatant.set_team(team);
        }
    }

    /// Assigns a class during class selection.
    ///
    /// Re-selection overwrites the previous pick.
    pub fn select_class(&mut self, id: CombatantId, class: ClassKind) {
        if self.phase != MatchPhase::ClassSelect {
            return;
        }
        if let Some(combatant) = self.roster.get_mut(id) {
            combatant.set_class(Some(class));
            self.push(Directive::ClassAssigned {
                combatant: id,
                class,
            });
        }
    }

    /// Updates the world sites. Operators use this to recover a transition
    /// that aborted on a missing lobby or spawn configuration.
    pub fn configure_sites(&mut self, lobby: Option<SiteId>, spawns: Vec<SiteId>) {
        self.config.lobby_site = lobby;
        self.config.spawn_sites = spawns;
    }

    // ------------------------------------------------------------------
    // Phase transitions
    // ------------------------------------------------------------------

    /// Opens class selection from the lobby.
    ///
    /// Returns `false` if the match is not in the lobby.
    pub fn open_selection(&mut self) -> bool {
        self.transition(MatchPhase::ClassSelect)
    }

    /// Confirms the roster and starts the countdown.
    ///
    /// Requires every combatant to have picked a class and the roster to
    /// meet the configured minimum. A failed check emits a notice and stays
    /// in class selection.
    pub fn confirm_roster(&mut self) -> bool {
        if self.phase != MatchPhase::ClassSelect {
            return false;
        }
        if !self.roster_ready() {
            self.push(Directive::Notice {
                text: "cannot start: roster incomplete".to_string(),
            });
            return false;
        }
        if self.transition(MatchPhase::Countdown) {
            self.scheduler
                .schedule_once(self.config.countdown_ticks, TimerTask::CountdownElapsed);
            return true;
        }
        false
    }

    fn roster_ready(&self) -> bool {
        self.roster.len() >= self.config.required_combatants && self.roster.all_classed()
    }

    /// Countdown ran out: re-check the roster (leaves may have invalidated
    /// it), then place and root everyone.
    fn on_countdown_elapsed(&mut self) {
        if self.phase != MatchPhase::Countdown {
            return;
        }
        if !self.roster_ready() {
            // Restart in place rather than ejecting everyone back to
            // selection. The self-transition marks the restart for hosts.
            self.push(Directive::Notice {
                text: "roster changed during countdown, restarting".to_string(),
            });
            self.transition(MatchPhase::Countdown);
            self.scheduler
                .schedule_once(self.config.countdown_ticks, TimerTask::CountdownElapsed);
            return;
        }
        if self.config.spawn_sites.is_empty() {
            // Recoverable by configuration; retry on the next elapse.
            warn!("countdown elapsed with no spawn sites configured");
            self.push(Directive::Notice {
                text: EngineError::MissingSpawnSites.to_string(),
            });
            self.scheduler
                .schedule_once(self.config.countdown_ticks, TimerTask::CountdownElapsed);
            return;
        }
        if !self.transition(MatchPhase::Freeze) {
            return;
        }

        // Round-robin spawn assignment in roster (join) order.
        let ids: Vec<CombatantId> = self.roster.ids().collect();
        for (index, id) in ids.iter().enumerate() {
            let site = self.config.spawn_sites[index % self.config.spawn_sites.len()];
            self.push(Directive::TeleportToSpawn {
                combatant: *id,
                site,
            });
            if let Some(combatant) = self.roster.get_mut(*id) {
                combatant.flags_mut().insert(CombatantFlags::FROZEN);
            }
            self.push(Directive::ApplyPhaseEffect {
                combatant: *id,
                effect: PhaseEffect::FreezeRoot,
            });
        }
        self.scheduler
            .schedule_once(self.config.freeze_ticks, TimerTask::FreezeElapsed);
    }

    /// Freeze ran out: combat goes live.
    ///
    /// Leaves during the freeze bypass the elimination path (combat is not
    /// live yet), so the win condition is re-evaluated here; a side emptied
    /// during the freeze decides the match at combat start.
    fn on_freeze_elapsed(&mut self) {
        if self.phase != MatchPhase::Freeze {
            return;
        }
        if !self.transition(MatchPhase::Active) {
            return;
        }
        self.active_since = Some(self.now());

        let ids: Vec<CombatantId> = self.roster.ids().collect();
        for id in ids {
            if let Some(combatant) = self.roster.get_mut(id) {
                combatant.flags_mut().remove(CombatantFlags::FROZEN);
            }
            self.push(Directive::RemovePhaseEffect {
                combatant: id,
                effect: PhaseEffect::FreezeRoot,
            });
            self.push(Directive::ApplyPhaseEffect {
                combatant: id,
                effect: PhaseEffect::CombatAura,
            });
            self.start_class_timers(id);
        }

        self.scheduler
            .schedule_once(self.config.match_duration_ticks, TimerTask::MatchExpired);
        self.scheduler
            .schedule_repeating(self.config.cooldown_sweep_period, TimerTask::CooldownSweep);
        info!(tick = self.now(), "combat live");
        self.check_win();
    }

    fn start_class_timers(&mut self, id: CombatantId) {
        let Some(class) = self.roster.get(id).and_then(crate::combatant::Combatant::class)
        else {
            return;
        };
        for spec in class.timer_specs() {
            self.scheduler.schedule_repeating(
                spec.period_ticks,
                TimerTask::Ability {
                    combatant: id,
                    purpose: spec.purpose,
                },
            );
        }
        if let Some(thresholds) = class.evolution_thresholds() {
            self.evolutions
                .insert(id, EvolutionTrack::new(thresholds.to_vec()));
        }
    }

    /// Match time limit reached. Several sides still alive means a draw.
    fn on_match_expired(&mut self) {
        if self.phase != MatchPhase::Active {
            return;
        }
        let outcome = match win::evaluate(&self.roster, self.config.team_mode) {
            Verdict::Decided(outcome) => outcome,
            Verdict::Continue => MatchOutcome::Draw,
        };
        self.end_match(outcome, true);
    }

    /// Ends the match administratively. No winner is announced.
    pub fn force_end(&mut self) {
        if self.phase != MatchPhase::Active {
            return;
        }
        self.end_match(MatchOutcome::Forced, false);
    }

    /// Resets an ended match back to the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingLobbySite`] if no lobby site is
    /// configured; the phase stays `Ended` and a notice is emitted.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.phase != MatchPhase::Ended {
            return Ok(());
        }
        if self.config.lobby_site.is_none() {
            self.push(Directive::Notice {
                text: EngineError::MissingLobbySite.to_string(),
            });
            return Err(EngineError::MissingLobbySite);
        }
        self.transition(MatchPhase::Lobby);
        Ok(())
    }

    /// Concludes the match: cleanup runs in a fixed order, then the outcome
    /// is announced (unless administratively ended) and everyone returns to
    /// the lobby.
    fn end_match(&mut self, outcome: MatchOutcome, announce: bool) {
        if !self.transition(MatchPhase::Ended) {
            return;
        }
        info!(%outcome, "match ended");

        // Cleanup order is load-bearing: timers first so nothing fires into
        // a half-cleared world.
        self.scheduler.clear();
        self.cooldowns.clear_everything();
        self.resources.clear_everything();
        self.unlocked.clear();
        self.guard.clear();
        self.evolutions.clear();
        self.mount_sessions.clear();
        self.active_since = None;

        let ids: Vec<CombatantId> = self.roster.ids().collect();
        for id in &ids {
            self.push(Directive::RemovePhaseEffect {
                combatant: *id,
                effect: PhaseEffect::CombatAura,
            });
        }
        self.roster.clear_classes();
        self.roster.restore_all_baselines();

        if announce {
            self.push(Directive::MatchEnded { outcome });
        }
        match self.config.lobby_site {
            Some(site) => {
                for id in ids {
                    self.push(Directive::TeleportToLobby {
                        combatant: id,
                        site,
                    });
                }
            }
            None => {
                self.push(Directive::Notice {
                    text: EngineError::MissingLobbySite.to_string(),
                });
            }
        }
    }

    /// Takes a phase edge if it is legal; emits the change directive.
    fn transition(&mut self, next: MatchPhase) -> bool {
        if !self.phase.can_transition_to(next) {
            debug!(from = %self.phase, to = %next, "illegal transition ignored");
            return false;
        }
        let from = self.phase;
        self.phase = next;
        info!(%from, %next, "phase change");
        self.push(Directive::PhaseChanged { from, to: next });
        true
    }

    // ------------------------------------------------------------------
    // Combat
    // ------------------------------------------------------------------

    /// Applies a combat effect to one combatant.
    ///
    /// Effects outside live combat are dropped; a lethal application runs
    /// the elimination path and re-evaluates the win condition.
    pub fn apply_effect(&mut self, id: CombatantId, combat_effect: CombatEffect) {
        if !self.phase.is_combat() {
            return;
        }
        let Some(combatant) = self.roster.get_mut(id) else {
            return;
        };
        if effect::apply(combatant, combat_effect) == EffectOutcome::Eliminated {
            self.on_eliminated(id);
        }
    }

    /// Eliminations occurring after the phase has already left `Active`
    /// (cleanup damage, stale callbacks) are silently dropped.
    fn on_eliminated(&mut self, id: CombatantId) {
        if !self.phase.is_combat() {
            return;
        }
        debug!(combatant = %id, "eliminated");
        self.discard_combatant_state(id);
        self.push(Directive::CombatantEliminated { combatant: id });
        self.check_win();
    }

    /// Drops all per-combatant transient state when it leaves combat.
    fn discard_combatant_state(&mut self, id: CombatantId) {
        self.scheduler
            .cancel_where(|task| matches!(task, TimerTask::Ability { combatant, .. } if *combatant == id));
        self.cooldowns.clear_all(id);
        self.resources.clear_all(id);
        self.unlocked.remove(&id);
        self.evolutions.remove(&id);
        self.mount_sessions.remove(&id);
    }

    fn check_win(&mut self) {
        if let Verdict::Decided(outcome) = win::evaluate(&self.roster, self.config.team_mode) {
            self.end_match(outcome, true);
        }
    }

    // ------------------------------------------------------------------
    // Abilities
    // ------------------------------------------------------------------

    /// Gates one ability use.
    ///
    /// Admission requires live combat, a living unfrozen combatant whose
    /// class owns the ability, the ability to be base or unlocked, and no
    /// running cooldown. Admission starts the cooldown; the host performs
    /// the ability's world effects.
    pub fn request_ability_use(&mut self, id: CombatantId, ability: &AbilityId) -> AbilityGate {
        if !self.phase.is_combat() {
            return AbilityGate::DENIED;
        }
        let Some(combatant) = self.roster.get(id) else {
            return AbilityGate::DENIED;
        };
        if !combatant.is_alive() || combatant.flags().contains(CombatantFlags::FROZEN) {
            return AbilityGate::DENIED;
        }
        let Some(class) = combatant.class() else {
            return AbilityGate::DENIED;
        };
        let Some(cooldown) = class.cooldown_of(ability) else {
            return AbilityGate::DENIED;
        };
        if !class.is_base_ability(ability) && !self.is_unlocked(id, ability) {
            return AbilityGate::DENIED;
        }

        let now = self.now();
        let remaining = self.cooldowns.remaining(id, ability, now);
        if remaining > 0 {
            return AbilityGate {
                allowed: false,
                remaining_ticks: remaining,
            };
        }
        self.cooldowns.set_cooldown(id, ability, cooldown, now);
        debug!(combatant = %id, ability = %ability, "ability admitted");
        AbilityGate {
            allowed: true,
            remaining_ticks: cooldown,
        }
    }

    fn is_unlocked(&self, id: CombatantId, ability: &AbilityId) -> bool {
        self.unlocked
            .get(&id)
            .is_some_and(|abilities| abilities.contains(ability))
    }

    /// Awards class resource to a combatant (landed hits, objectives).
    ///
    /// A threshold crossing applies the catalog's unlock policy and grants
    /// the class's follow-up ability.
    pub fn award_resource(&mut self, id: CombatantId, amount: u32) {
        if !self.phase.is_combat() {
            return;
        }
        let Some(combatant) = self.roster.get(id) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let Some(class) = combatant.class() else {
            return;
        };
        let Some(kind) = class.resource_kind() else {
            return;
        };
        if let Some(unlock) = self.resources.add(id, kind, amount) {
            let Some((ability, _)) = class.unlock_ability() else {
                return;
            };
            let ability = AbilityId::new(ability);
            let granted = self.unlocked.entry(unlock.combatant).or_default();
            if !granted.contains(&ability) {
                granted.push(ability.clone());
            }
            info!(combatant = %id, ability = %ability, "resource unlock");
            self.push(Directive::AbilityGranted {
                combatant: id,
                ability,
            });
        }
    }

    /// Reduces the remaining cooldown of one ability by a fraction in
    /// `(0, 1]`. Used by haste-style pickups.
    pub fn reduce_cooldown(&mut self, id: CombatantId, ability: &AbilityId, fraction: f64) {
        let now = self.now();
        self.cooldowns.reduce_cooldown(id, ability, fraction, now);
    }

    /// Consumes the combatant's held ward, letting the grant timer issue a
    /// new one on its next firing.
    pub fn use_ward(&mut self, id: CombatantId) {
        if let Some(combatant) = self.roster.get_mut(id) {
            combatant.flags_mut().remove(CombatantFlags::WARD_HELD);
        }
    }

    // ------------------------------------------------------------------
    // Mounts
    // ------------------------------------------------------------------

    /// Starts a mount session. No-op if already mounted.
    pub fn mount(&mut self, id: CombatantId) {
        if !self.phase.is_combat() {
            return;
        }
        let Some(combatant) = self.roster.get_mut(id) else {
            return;
        };
        if !combatant.is_alive() || combatant.flags().contains(CombatantFlags::MOUNTED) {
            return;
        }
        combatant.flags_mut().insert(CombatantFlags::MOUNTED);
        let instance = self.allocate_action();
        self.mount_sessions.insert(id, instance);
    }

    /// Ends a mount session on the combatant's own request.
    pub fn dismount(&mut self, id: CombatantId) {
        self.finish_mount(id);
    }

    /// Host notification that a mount vanished under its rider (despawn,
    /// world removal). Funnels into the same exit path as an explicit
    /// dismount, so the exit bonus is granted exactly once per session no
    /// matter how many notifications race in.
    pub fn notify_mount_exited(&mut self, id: CombatantId) {
        self.finish_mount(id);
    }

    fn finish_mount(&mut self, id: CombatantId) {
        let Some(instance) = self.mount_sessions.remove(&id) else {
            // No open session. A second exit notification for a session
            // already closed lands here.
            return;
        };
        let Some(combatant) = self.roster.get_mut(id) else {
            return;
        };
        combatant.flags_mut().remove(CombatantFlags::MOUNTED);
        effect::apply_guarded(
            &mut self.guard,
            combatant,
            instance,
            CombatEffect::Heal {
                amount: DISMOUNT_HEAL,
            },
        );
    }

    fn allocate_action(&mut self) -> ActionInstance {
        let instance = ActionInstance::new(self.next_action);
        self.next_action += 1;
        instance
    }

    // ------------------------------------------------------------------
    // Class timers
    // ------------------------------------------------------------------

    /// One recurring class timer fired. Conditions are re-checked here, not
    /// at schedule time; a failed check skips the firing without cancelling
    /// the timer.
    fn on_class_timer(&mut self, id: CombatantId, purpose: TimerPurpose) {
        if !self.phase.is_combat() {
            return;
        }
        let Some(combatant) = self.roster.get(id) else {
            return;
        };
        if !combatant.is_alive() {
            return;
        }
        let owns = combatant
            .class()
            .is_some_and(|class| class.timer_specs().iter().any(|s| s.purpose == purpose));
        if !owns {
            return;
        }

        match purpose {
            TimerPurpose::PassiveRegen => {
                self.apply_effect(
                    id,
                    CombatEffect::Heal {
                        amount: PASSIVE_REGEN_HEAL,
                    },
                );
            }
            TimerPurpose::ItemGrant => {
                // At most one outstanding ward.
                if combatant.flags().contains(CombatantFlags::WARD_HELD) {
                    return;
                }
                if let Some(combatant) = self.roster.get_mut(id) {
                    combatant.flags_mut().insert(CombatantFlags::WARD_HELD);
                }
                self.push(Directive::ItemGranted { combatant: id });
            }
            TimerPurpose::Evolution => self.advance_evolution(id),
        }
    }

    fn advance_evolution(&mut self, id: CombatantId) {
        let Some(since) = self.active_since else {
            return;
        };
        let elapsed = self.now() - since;
        let Some(track) = self.evolutions.get_mut(&id) else {
            return;
        };
        let reached = track.advance(elapsed);
        for stage in reached {
            self.push(Directive::EvolutionAdvanced {
                combatant: id,
                stage,
            });
            self.apply_effect(
                id,
                CombatEffect::Heal {
                    amount: STAGE_ADVANCE_HEAL,
                },
            );
        }
    }

    fn push(&mut self, directive: Directive) {
        self.outbox.push(directive);
    }
}
