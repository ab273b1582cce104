use std::collections::BTreeMap;

use super::boss::{BossPhaseMachine, PhaseSpec};
use super::command::{ActionDecider, Decision, ExternalCommand};
use super::errors::{ActionRejection, SessionError};
use super::targeting::default_target;
use super::SessionState;
use crate::ability::{AbilityCatalog, AbilityDefinition, AbilityEffect, EffectKind, EffectSpec};
use crate::combat::damage::{
    mitigate, outgoing_damage, outgoing_healing, periodic_damage, periodic_healing, roll_critical,
};
use crate::combat::{
    ApplyOutcome, ComboOutcome, PeriodicOutcome, StatusApplication, StatusTracker, ThreatChange,
    ThreatKind, ThreatTable, on_ability_used,
};
use crate::config::CombatConfig;
use crate::env::{PcgRng, roll_seed};
use crate::error::{DataIntegrityWarning, ErrorContext};
use crate::events::{CombatEvent, EncounterSummary, EventKind, TickReport};
use crate::state::{AbilityId, ActorId, ActorTemplate, Pool, Roster, Side, Tick};
use crate::stats::{StatBlock, resolve};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CastMode {
    /// Chosen by a decider or command: all gates apply, costs are paid.
    Normal,
    /// Boss phase entry: ignores knowledge, cooldown and cost.
    Forced,
}

/// A single encounter between the party and its hostiles.
///
/// Construction resolves every actor's stats and fills their pools. Call
/// [`start`](Self::start) once, then [`step`](Self::step) until the state is
/// terminal. Within a tick hostiles act first, then the party, each in roster
/// order; status effects advance afterwards.
#[derive(Clone, Debug)]
pub struct CombatSession {
    state: SessionState,
    tick: Tick,
    seed: u64,
    roster: Roster,
    catalog: AbilityCatalog,
    templates: BTreeMap<String, ActorTemplate>,
    config: CombatConfig,
    threat: ThreatTable,
    status: StatusTracker,
    boss: Option<BossPhaseMachine>,
    stats: BTreeMap<ActorId, StatBlock>,
    pending: BTreeMap<ActorId, ExternalCommand>,
    damage_done: BTreeMap<ActorId, f64>,
    healing_done: BTreeMap<ActorId, f64>,
    last_targets: BTreeMap<ActorId, Option<ActorId>>,
    /// Content warnings gathered before the session started.
    warnings: Vec<DataIntegrityWarning>,
    roll_sequence: u32,
}

impl CombatSession {
    pub fn new(roster: Roster, catalog: AbilityCatalog, config: CombatConfig) -> Self {
        let mut session = Self {
            state: SessionState::Idle,
            tick: Tick::ZERO,
            seed: 0,
            threat: ThreatTable::new(config.threat),
            roster,
            catalog,
            templates: BTreeMap::new(),
            config,
            status: StatusTracker::new(),
            boss: None,
            stats: BTreeMap::new(),
            pending: BTreeMap::new(),
            damage_done: BTreeMap::new(),
            healing_done: BTreeMap::new(),
            last_targets: BTreeMap::new(),
            warnings: Vec::new(),
            roll_sequence: 0,
        };
        let ids: Vec<ActorId> = session.roster.iter().map(|actor| actor.id).collect();
        for id in ids {
            let warnings = session.prepare_actor(id);
            session.warnings.extend(warnings);
        }
        for warning in &session.warnings {
            tracing::warn!(code = warning_code(warning), "{warning}");
        }
        session
    }

    /// Seed for critical-strike rolls.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Templates that summon effects may instantiate.
    pub fn with_templates(mut self, templates: BTreeMap<String, ActorTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Attaches a phase machine to the roster's boss.
    pub fn with_boss(mut self, phases: Vec<PhaseSpec>) -> Result<Self, SessionError> {
        let boss = self
            .roster
            .iter()
            .find(|actor| actor.is_boss && actor.side() == Side::Hostile)
            .map(|actor| actor.id)
            .ok_or(SessionError::InvalidBossPhases("roster has no hostile boss"))?;
        self.boss = Some(BossPhaseMachine::new(boss, phases)?);
        Ok(self)
    }

    // ===== queries =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn threat(&self) -> &ThreatTable {
        &self.threat
    }

    pub fn status(&self) -> &StatusTracker {
        &self.status
    }

    pub fn boss(&self) -> Option<&BossPhaseMachine> {
        self.boss.as_ref()
    }

    pub fn stats_of(&self, actor: ActorId) -> Option<&StatBlock> {
        self.stats.get(&actor)
    }

    pub fn pending_commands(&self) -> impl Iterator<Item = &ExternalCommand> {
        self.pending.values()
    }

    /// Who `hostile` attacks right now according to the threat table.
    pub fn current_target(&self, hostile: ActorId) -> Option<ActorId> {
        self.threat.current_target(hostile, &self.roster, self.tick)
    }

    /// Checks the gates a normal cast must pass: caster alive, ability known
    /// and selectable, off cooldown, affordable. Targets are not checked.
    pub fn can_use(&self, actor: ActorId, ability: &AbilityDefinition) -> Result<(), ActionRejection> {
        self.check_gates(actor, ability, CastMode::Normal)
    }

    pub fn summary(&self) -> EncounterSummary {
        EncounterSummary {
            outcome: self.state,
            survivors: self
                .roster
                .iter()
                .filter(|actor| actor.alive)
                .map(|actor| actor.id)
                .collect(),
            damage_by_actor: self.damage_done.clone(),
            healing_by_actor: self.healing_done.clone(),
            duration_ticks: self.tick.0,
        }
    }

    // ===== control =====

    /// Moves `Idle → Active`, engaging every hostile with every party member.
    pub fn start(&mut self) -> Result<TickReport, SessionError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Active => return Err(SessionError::AlreadyStarted),
            ended => return Err(SessionError::AlreadyEnded(ended)),
        }
        let party: Vec<ActorId> = self.roster.alive_on(Side::Party).map(|a| a.id).collect();
        let hostiles: Vec<ActorId> = self.roster.alive_on(Side::Hostile).map(|a| a.id).collect();
        if party.is_empty() {
            return Err(SessionError::EmptySide(Side::Party));
        }
        if hostiles.is_empty() {
            return Err(SessionError::EmptySide(Side::Hostile));
        }

        for hostile in &hostiles {
            for friendly in &party {
                self.threat.engage(*hostile, *friendly);
            }
        }
        self.state = SessionState::Active;

        let mut events: Vec<CombatEvent> = self
            .warnings
            .drain(..)
            .map(|warning| CombatEvent::new(Tick::ZERO, EventKind::DataIntegrity { warning }))
            .collect();
        events.push(CombatEvent::new(
            self.tick,
            EventKind::EncounterStarted {
                party: party.len(),
                hostiles: hostiles.len(),
            },
        ));
        tracing::info!(party = party.len(), hostiles = hostiles.len(), "encounter started");
        self.update_targets(&mut events);

        Ok(TickReport {
            tick: self.tick,
            state: self.state,
            events,
        })
    }

    /// Queues an override consumed at the next tick boundary. A later command
    /// for the same actor replaces an earlier one.
    pub fn queue_command(&mut self, command: ExternalCommand) -> Result<(), SessionError> {
        if self.state.is_terminal() {
            return Err(SessionError::AlreadyEnded(self.state));
        }
        let actor = command.actor();
        if self.roster.get(actor).is_none() {
            return Err(SessionError::UnknownActor(actor));
        }
        self.pending.insert(actor, command);
        Ok(())
    }

    /// Advances the session by one tick.
    pub fn step(
        &mut self,
        decider: &mut (impl ActionDecider + ?Sized),
    ) -> Result<TickReport, SessionError> {
        match self.state {
            SessionState::Idle => return Err(SessionError::NotStarted),
            SessionState::Active => {}
            ended => return Err(SessionError::AlreadyEnded(ended)),
        }
        self.check_invariants()?;

        self.tick = self.tick + 1;
        self.roll_sequence = 0;
        let mut events = Vec::new();

        self.threat.expire_locks(self.tick);
        self.regenerate();

        let order: Vec<ActorId> = self
            .roster
            .ids_on(Side::Hostile)
            .into_iter()
            .chain(self.roster.ids_on(Side::Party))
            .collect();

        for actor in order {
            if self.state.is_terminal() {
                break;
            }
            if !self.roster.is_alive(actor) {
                continue;
            }
            let decision = match self.pending.remove(&actor) {
                Some(command) => command.into_decision(),
                None if self.roster.get(actor).is_some_and(|a| a.ai_controlled) => {
                    decider.decide(self, actor)
                }
                None => None,
            };
            if let Some(decision) = decision {
                self.perform(actor, decision, CastMode::Normal, &mut events);
                self.check_termination(&mut events);
            }
        }

        if self.state == SessionState::Active {
            self.advance_effects(&mut events);
            self.update_targets(&mut events);
            self.check_termination(&mut events);
        }

        Ok(TickReport {
            tick: self.tick,
            state: self.state,
            events,
        })
    }

    /// Starts the session if needed and steps until it ends or `max_ticks`
    /// ticks have elapsed.
    pub fn run_to_end(
        &mut self,
        decider: &mut (impl ActionDecider + ?Sized),
        max_ticks: u64,
    ) -> Result<Vec<TickReport>, SessionError> {
        let mut reports = Vec::new();
        if self.state == SessionState::Idle {
            reports.push(self.start()?);
        }
        while self.state == SessionState::Active && self.tick.0 < max_ticks {
            reports.push(self.step(decider)?);
        }
        Ok(reports)
    }

    // ===== tick phases =====

    fn check_invariants(&self) -> Result<(), SessionError> {
        let party = self.roster.count_alive(Side::Party);
        let hostiles = self.roster.count_alive(Side::Hostile);
        if party == 0 || hostiles == 0 {
            tracing::error!(tick = %self.tick, party, hostiles, "active session with an empty side");
            return Err(SessionError::InvariantViolation {
                context: ErrorContext::new(self.tick)
                    .with_message("session active while one side has no living actors"),
            });
        }
        Ok(())
    }

    fn regenerate(&mut self) {
        for actor in self.roster.iter_mut().filter(|actor| actor.alive) {
            if let Some(stats) = self.stats.get(&actor.id) {
                actor.resource.fill(stats.resource_regen);
            }
        }
    }

    fn advance_effects(&mut self, events: &mut Vec<CombatEvent>) {
        let outcomes = self.status.tick(1, &mut self.roster);
        let mut dirty = Vec::new();

        for outcome in outcomes {
            match outcome {
                PeriodicOutcome::Damage {
                    source,
                    target,
                    ability,
                    amount,
                    ..
                } => self.record_damage(source, target, &ability, amount, false, true, events),
                PeriodicOutcome::Healing {
                    source,
                    target,
                    ability,
                    amount,
                    ..
                } => self.record_healing(source, target, &ability, amount, 0.0, false, true, events),
                PeriodicOutcome::Expired {
                    instance,
                    target,
                    ability,
                    kind,
                } => {
                    events.push(
                        CombatEvent::new(
                            self.tick,
                            EventKind::EffectExpired {
                                instance,
                                ability,
                                effect: kind,
                            },
                        )
                        .on(target),
                    );
                    if !kind.is_periodic() {
                        dirty.push(target);
                    }
                }
            }
        }

        for actor in dirty {
            if self.roster.is_alive(actor) {
                self.refresh_stats(actor);
            }
        }
    }

    fn update_targets(&mut self, events: &mut Vec<CombatEvent>) {
        let hostiles: Vec<ActorId> = self.roster.alive_on(Side::Hostile).map(|a| a.id).collect();
        for hostile in hostiles {
            let current = self.current_target(hostile);
            let previous = self.last_targets.insert(hostile, current);
            if previous != Some(current) {
                events.push(
                    CombatEvent::new(
                        self.tick,
                        EventKind::TargetChanged {
                            previous: previous.flatten(),
                            current,
                        },
                    )
                    .from_actor(hostile),
                );
            }
        }
    }

    fn check_termination(&mut self, events: &mut Vec<CombatEvent>) {
        if self.state != SessionState::Active {
            return;
        }
        let outcome = if self.roster.count_alive(Side::Party) == 0 {
            SessionState::Defeat
        } else if self.roster.count_alive(Side::Hostile) == 0 {
            SessionState::Victory
        } else {
            return;
        };
        self.state = outcome;
        let summary = self.summary();
        tracing::info!(tick = %self.tick, outcome = %outcome, "encounter ended");
        events.push(CombatEvent::new(self.tick, EventKind::EncounterEnded { summary }));
    }

    // ===== action resolution =====

    fn perform(
        &mut self,
        actor: ActorId,
        decision: Decision,
        mode: CastMode,
        events: &mut Vec<CombatEvent>,
    ) {
        let Some(ability) = self.catalog.get(&decision.ability).cloned() else {
            let reason = ActionRejection::UnknownAbility(decision.ability.clone());
            self.reject(actor, decision.ability, reason, events);
            return;
        };
        if let Err(reason) = self.check_gates(actor, &ability, mode) {
            self.reject(actor, ability.id, reason, events);
            return;
        }

        // finishers spend their combo once the gates pass, whatever the target check says
        let mut combo = ComboOutcome::Unchanged;
        if ability.is_finisher() {
            combo = self.update_combo(actor, &ability, events);
        }

        let targets = match self.resolve_targets(actor, &ability, decision.target) {
            Ok(targets) => targets,
            Err(reason) => {
                self.reject(actor, ability.id, reason, events);
                return;
            }
        };
        if !ability.is_finisher() {
            combo = self.update_combo(actor, &ability, events);
        }
        if mode == CastMode::Normal {
            self.pay_costs(actor, &ability);
        }

        tracing::debug!(tick = %self.tick, %actor, ability = %ability.id, targets = targets.len(), "action committed");
        let mut committed = CombatEvent::new(
            self.tick,
            EventKind::ActionCommitted {
                ability: ability.id.clone(),
            },
        )
        .from_actor(actor);
        committed.target = targets.first().copied();
        events.push(committed);

        let multiplier = combo.multiplier();
        for effect in &ability.effects {
            match effect {
                AbilityEffect::Summon { template } => self.summon(actor, template, events),
                _ => {
                    for target in &targets {
                        self.apply_effect(actor, *target, &ability, effect, multiplier, events);
                    }
                }
            }
        }
    }

    fn reject(
        &mut self,
        actor: ActorId,
        ability: AbilityId,
        reason: ActionRejection,
        events: &mut Vec<CombatEvent>,
    ) {
        tracing::debug!(tick = %self.tick, %actor, %ability, %reason, "action rejected");
        events.push(
            CombatEvent::new(self.tick, EventKind::ActionRejected { ability, reason }).from_actor(actor),
        );
    }

    fn check_gates(
        &self,
        actor: ActorId,
        ability: &AbilityDefinition,
        mode: CastMode,
    ) -> Result<(), ActionRejection> {
        let caster = self
            .roster
            .get(actor)
            .ok_or(ActionRejection::UnknownActor(actor))?;
        if !caster.alive {
            return Err(ActionRejection::ActorDead);
        }
        if mode == CastMode::Forced {
            return Ok(());
        }
        if !caster.knows(&ability.id) {
            return Err(ActionRejection::NotKnown(ability.id.clone()));
        }
        if ability.phase_only {
            return Err(ActionRejection::PhaseOnly);
        }
        let remaining = caster.cooldown_remaining(&ability.id, self.tick);
        if remaining > 0 {
            return Err(ActionRejection::OnCooldown { remaining });
        }
        if caster.resource.current < ability.cost {
            return Err(ActionRejection::InsufficientResource {
                needed: ability.cost,
                available: caster.resource.current,
            });
        }
        Ok(())
    }

    fn resolve_targets(
        &self,
        actor: ActorId,
        ability: &AbilityDefinition,
        requested: Option<ActorId>,
    ) -> Result<Vec<ActorId>, ActionRejection> {
        use crate::ability::TargetFilter;

        let caster_side = self
            .roster
            .get(actor)
            .map(|caster| caster.side())
            .ok_or(ActionRejection::UnknownActor(actor))?;

        let validate = |target: ActorId, side: Side| -> Result<ActorId, ActionRejection> {
            let candidate = self
                .roster
                .get(target)
                .ok_or(ActionRejection::InvalidTarget(target))?;
            if candidate.side() != side {
                return Err(ActionRejection::InvalidTarget(target));
            }
            if !candidate.alive {
                return Err(ActionRejection::TargetDead(target));
            }
            Ok(target)
        };

        match ability.target {
            TargetFilter::SelfOnly => Ok(vec![actor]),
            TargetFilter::Ally | TargetFilter::Enemy => {
                let side = if ability.target == TargetFilter::Ally {
                    caster_side
                } else {
                    caster_side.opponent()
                };
                let target = match requested {
                    Some(target) => target,
                    None => default_target(self, actor, ability).ok_or(ActionRejection::NoLegalTarget)?,
                };
                Ok(vec![validate(target, side)?])
            }
            TargetFilter::Area => {
                let side = caster_side.opponent();
                let anchor = match requested {
                    Some(target) => Some(validate(target, side)?),
                    None => default_target(self, actor, ability),
                };
                let mut targets: Vec<ActorId> = self.roster.alive_on(side).map(|a| a.id).collect();
                if targets.is_empty() {
                    return Err(ActionRejection::NoLegalTarget);
                }
                if let Some(position) = anchor.and_then(|a| targets.iter().position(|t| *t == a)) {
                    let first = targets.remove(position);
                    targets.insert(0, first);
                }
                Ok(targets)
            }
        }
    }

    fn update_combo(
        &mut self,
        actor: ActorId,
        ability: &AbilityDefinition,
        events: &mut Vec<CombatEvent>,
    ) -> ComboOutcome {
        let per_point = self.config.combo_per_point_bonus;
        let Some(caster) = self.roster.get_mut(actor) else {
            return ComboOutcome::Unchanged;
        };
        let outcome = on_ability_used(caster.combo.as_mut(), ability, per_point);
        if outcome == ComboOutcome::Unchanged {
            return outcome;
        }
        if let Some(combo) = caster.combo {
            events.push(
                CombatEvent::new(
                    self.tick,
                    EventKind::ComboChanged {
                        count: combo.count(),
                        max: combo.max(),
                    },
                )
                .from_actor(actor),
            );
        }
        outcome
    }

    fn pay_costs(&mut self, actor: ActorId, ability: &AbilityDefinition) {
        let haste = self.stats.get(&actor).map(|s| s.haste).unwrap_or(0.0);
        let tick = self.tick;
        if let Some(caster) = self.roster.get_mut(actor) {
            caster.resource.drain(ability.cost);
            let cooldown = effective_cooldown(ability.cooldown, haste);
            if cooldown > 0 {
                caster.cooldowns.insert(ability.id.clone(), tick + cooldown);
            } else {
                caster.cooldowns.remove(&ability.id);
            }
        }
    }

    fn apply_effect(
        &mut self,
        caster: ActorId,
        target: ActorId,
        ability: &AbilityDefinition,
        effect: &AbilityEffect,
        multiplier: f64,
        events: &mut Vec<CombatEvent>,
    ) {
        if !self.roster.is_alive(caster) || !self.roster.is_alive(target) {
            return;
        }
        match effect {
            AbilityEffect::Damage { amount, school } => {
                let critical = self.roll_crit(caster);
                let (Some(attacker), Some(defender)) = (self.stats.get(&caster), self.stats.get(&target))
                else {
                    return;
                };
                let raw = outgoing_damage(attacker, *amount, *school, multiplier, critical);
                let dealt = mitigate(defender, raw);
                let effective = self
                    .roster
                    .get_mut(target)
                    .map(|victim| victim.health.drain(dealt))
                    .unwrap_or(0.0);
                self.record_damage(caster, target, &ability.id, effective, critical.is_some(), false, events);
            }
            AbilityEffect::Heal { amount } => {
                let critical = self.roll_crit(caster);
                let Some(healer) = self.stats.get(&caster) else {
                    return;
                };
                let healing = outgoing_healing(healer, *amount, multiplier, critical);
                let effective = self
                    .roster
                    .get_mut(target)
                    .map(|patient| patient.health.fill(healing))
                    .unwrap_or(0.0);
                self.record_healing(
                    caster,
                    target,
                    &ability.id,
                    effective,
                    healing - effective,
                    critical.is_some(),
                    false,
                    events,
                );
            }
            AbilityEffect::Taunt { duration } => self.taunt(caster, target, *duration, events),
            AbilityEffect::ApplyStatus(spec) => {
                self.apply_status(caster, target, ability, spec, multiplier, events)
            }
            AbilityEffect::RestoreResource { amount } => {
                let gained = self
                    .roster
                    .get_mut(target)
                    .map(|actor| actor.resource.fill(*amount))
                    .unwrap_or(0.0);
                events.push(
                    CombatEvent::new(
                        self.tick,
                        EventKind::ResourceRestored {
                            ability: ability.id.clone(),
                            amount: gained,
                        },
                    )
                    .from_actor(caster)
                    .on(target),
                );
            }
            AbilityEffect::Summon { .. } => {}
        }
    }

    fn roll_crit(&mut self, caster: ActorId) -> Option<f64> {
        let chance = self.stats.get(&caster).map(|s| s.crit_chance).unwrap_or(0.0);
        let seed = roll_seed(self.seed, self.tick.0, caster.0, self.roll_sequence);
        self.roll_sequence += 1;
        roll_critical(&PcgRng, seed, chance, self.config.crit_multiplier)
    }

    #[allow(clippy::too_many_arguments)]
    fn record_damage(
        &mut self,
        source: ActorId,
        target: ActorId,
        ability: &AbilityId,
        amount: f64,
        critical: bool,
        periodic: bool,
        events: &mut Vec<CombatEvent>,
    ) {
        events.push(
            CombatEvent::new(
                self.tick,
                EventKind::DamageDealt {
                    ability: ability.clone(),
                    amount,
                    critical,
                    periodic,
                },
            )
            .from_actor(source)
            .on(target),
        );
        *self.damage_done.entry(source).or_insert(0.0) += amount;
        let changes = self
            .threat
            .record(source, target, ThreatKind::Damage, amount, &self.roster);
        self.push_threat_events(changes, events);
        self.after_health_loss(target, events);
    }

    #[allow(clippy::too_many_arguments)]
    fn record_healing(
        &mut self,
        source: ActorId,
        target: ActorId,
        ability: &AbilityId,
        amount: f64,
        overheal: f64,
        critical: bool,
        periodic: bool,
        events: &mut Vec<CombatEvent>,
    ) {
        events.push(
            CombatEvent::new(
                self.tick,
                EventKind::HealingApplied {
                    ability: ability.clone(),
                    amount,
                    overheal,
                    critical,
                    periodic,
                },
            )
            .from_actor(source)
            .on(target),
        );
        *self.healing_done.entry(source).or_insert(0.0) += amount;
        let changes = self
            .threat
            .record(source, target, ThreatKind::Healing, amount, &self.roster);
        self.push_threat_events(changes, events);
    }

    fn push_threat_events(&self, changes: Vec<ThreatChange>, events: &mut Vec<CombatEvent>) {
        events.extend(changes.into_iter().map(|change| {
            CombatEvent::new(
                self.tick,
                EventKind::ThreatChanged {
                    delta: change.delta,
                    total: change.total,
                },
            )
            .from_actor(change.friendly)
            .on(change.hostile)
        }));
    }

    fn taunt(&mut self, caster: ActorId, target: ActorId, duration: u32, events: &mut Vec<CombatEvent>) {
        let taunter_is_party = self
            .roster
            .get(caster)
            .is_some_and(|actor| actor.side() == Side::Party);
        let target_is_hostile = self
            .roster
            .get(target)
            .is_some_and(|actor| actor.side() == Side::Hostile);
        if !(taunter_is_party && target_is_hostile) {
            return;
        }
        let threat = self
            .threat
            .force_target(target, caster, duration, self.tick, &self.roster);
        events.push(
            CombatEvent::new(self.tick, EventKind::Taunted { duration, threat })
                .from_actor(caster)
                .on(target),
        );
    }

    fn apply_status(
        &mut self,
        caster: ActorId,
        target: ActorId,
        ability: &AbilityDefinition,
        spec: &EffectSpec,
        multiplier: f64,
        events: &mut Vec<CombatEvent>,
    ) {
        let Some(caster_stats) = self.stats.get(&caster) else {
            return;
        };
        let magnitude = match spec.kind {
            EffectKind::DamageOverTime => {
                periodic_damage(caster_stats, spec.magnitude, spec.school, multiplier)
            }
            EffectKind::HealOverTime => periodic_healing(caster_stats, spec.magnitude, multiplier),
            EffectKind::Buff | EffectKind::Debuff => spec.magnitude,
        };
        let application = StatusApplication {
            target,
            source: caster,
            ability: ability.id.clone(),
            kind: spec.kind,
            duration: spec.duration,
            magnitude,
            modifiers: spec.modifiers.clone(),
        };

        let kind = match self.status.apply(&mut self.roster, application) {
            Ok(ApplyOutcome::Applied(instance)) => EventKind::EffectApplied {
                instance,
                ability: ability.id.clone(),
                effect: spec.kind,
                duration: spec.duration,
                magnitude,
            },
            Ok(ApplyOutcome::Refreshed(instance)) => EventKind::EffectRefreshed {
                instance,
                ability: ability.id.clone(),
                effect: spec.kind,
                duration: spec.duration,
                magnitude,
            },
            Err(error) => EventKind::EffectRejected {
                ability: ability.id.clone(),
                effect: spec.kind,
                error,
            },
        };
        let accepted = !matches!(kind, EventKind::EffectRejected { .. });
        events.push(CombatEvent::new(self.tick, kind).from_actor(caster).on(target));

        if accepted && !spec.modifiers.is_empty() {
            self.refresh_stats(target);
        }
    }

    fn summon(&mut self, caster: ActorId, template_key: &str, events: &mut Vec<CombatEvent>) {
        let Some(template) = self.templates.get(template_key).cloned() else {
            let warning = DataIntegrityWarning::UnknownTemplate {
                template: template_key.to_owned(),
            };
            tracing::warn!(code = warning_code(&warning), "{warning}");
            events.push(
                CombatEvent::new(self.tick, EventKind::DataIntegrity { warning }).from_actor(caster),
            );
            return;
        };

        let id = self.roster.spawn(&template);
        for warning in self.prepare_actor(id) {
            tracing::warn!(code = warning_code(&warning), "{warning}");
            events.push(CombatEvent::new(self.tick, EventKind::DataIntegrity { warning }).on(id));
        }
        match template.role.side() {
            Side::Hostile => {
                let party: Vec<ActorId> = self.roster.alive_on(Side::Party).map(|a| a.id).collect();
                for friendly in party {
                    self.threat.engage(id, friendly);
                }
            }
            Side::Party => {
                let hostiles: Vec<ActorId> =
                    self.roster.alive_on(Side::Hostile).map(|a| a.id).collect();
                for hostile in hostiles {
                    self.threat.engage(hostile, id);
                }
            }
        }
        tracing::debug!(tick = %self.tick, summoner = %caster, summoned = %id, template = template_key, "actor summoned");
        events.push(
            CombatEvent::new(
                self.tick,
                EventKind::ActorSummoned {
                    template: template_key.to_owned(),
                },
            )
            .from_actor(caster)
            .on(id),
        );
    }

    // ===== health bookkeeping =====

    fn after_health_loss(&mut self, target: ActorId, events: &mut Vec<CombatEvent>) {
        let died = self
            .roster
            .get(target)
            .is_some_and(|actor| actor.alive && actor.health.is_empty());
        if died {
            self.handle_death(target, events);
        }
        self.check_boss(target, events);
    }

    fn handle_death(&mut self, actor: ActorId, events: &mut Vec<CombatEvent>) {
        let Some(side) = self.roster.get_mut(actor).map(|dead| {
            dead.alive = false;
            dead.health.current = 0.0;
            dead.side()
        }) else {
            return;
        };
        self.status.purge_target(actor, &mut self.roster);
        match side {
            Side::Party => self.threat.purge(actor),
            Side::Hostile => self.threat.remove_hostile(actor),
        }
        self.pending.remove(&actor);
        self.last_targets.remove(&actor);
        tracing::debug!(tick = %self.tick, %actor, "actor died");
        events.push(CombatEvent::new(self.tick, EventKind::ActorDied).on(actor));
    }

    fn check_boss(&mut self, target: ActorId, events: &mut Vec<CombatEvent>) {
        if self.boss.as_ref().map(BossPhaseMachine::boss) != Some(target) {
            return;
        }
        let Some((ratio, alive)) = self
            .roster
            .get(target)
            .map(|boss| (boss.health_ratio(), boss.alive))
        else {
            return;
        };
        let changes = match self.boss.as_mut() {
            Some(machine) => machine.observe(ratio, alive),
            None => return,
        };
        for change in changes {
            events.push(
                CombatEvent::new(
                    self.tick,
                    EventKind::PhaseTransition {
                        from: change.from,
                        to: change.to,
                        ability: change.fire.clone(),
                    },
                )
                .from_actor(target),
            );
            if let Some(ability) = change.fire {
                self.perform(target, Decision::new(ability, None), CastMode::Forced, events);
            }
        }
    }

    // ===== stats =====

    /// Drops unknown abilities, resolves stats and fills pools.
    fn prepare_actor(&mut self, id: ActorId) -> Vec<DataIntegrityWarning> {
        let mut warnings = Vec::new();
        if let Some(actor) = self.roster.get_mut(id) {
            let (known, unknown): (Vec<_>, Vec<_>) = actor
                .abilities
                .drain(..)
                .partition(|ability| self.catalog.contains(ability));
            actor.abilities = known;
            warnings.extend(
                unknown
                    .into_iter()
                    .map(|ability| DataIntegrityWarning::UnknownAbility { actor: id, ability }),
            );
        }
        warnings.extend(self.refresh_stats(id));
        if let (Some(actor), Some(stats)) = (self.roster.get_mut(id), self.stats.get(&id)) {
            actor.health = Pool::full(stats.max_health);
            actor.resource = Pool::full(stats.max_resource);
        }
        warnings
    }

    fn refresh_stats(&mut self, id: ActorId) -> Vec<DataIntegrityWarning> {
        let modifiers = self.status.modifiers_for(id);
        let Some(actor) = self.roster.get(id) else {
            return Vec::new();
        };
        let resolution = resolve(actor, &modifiers, &self.config);
        if let Some(actor) = self.roster.get_mut(id) {
            actor.health.set_maximum(resolution.stats.max_health);
            actor.resource.set_maximum(resolution.stats.max_resource);
        }
        self.stats.insert(id, resolution.stats);
        resolution.warnings
    }
}

fn effective_cooldown(cooldown: u32, haste: f64) -> u64 {
    if cooldown == 0 {
        return 0;
    }
    (f64::from(cooldown) / (1.0 + haste.max(0.0))).ceil() as u64
}

fn warning_code(warning: &DataIntegrityWarning) -> &'static str {
    use crate::error::CombatError;
    warning.error_code()
}
