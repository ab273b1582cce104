//! Typed combat events.
//!
//! Everything observable that happens during a tick is recorded as a
//! [`CombatEvent`] in the order it occurred and returned in the tick's
//! [`TickReport`]. Consumers (log, UI, tests) read the list; nothing is
//! pushed through callbacks.

use std::collections::BTreeMap;

use crate::ability::EffectKind;
use crate::combat::StatusError;
use crate::engine::{ActionRejection, BossPhase, SessionState};
use crate::error::DataIntegrityWarning;
use crate::state::{AbilityId, ActorId, EffectInstanceId, Tick};

/// One observable occurrence.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatEvent {
    pub tick: Tick,
    pub source: Option<ActorId>,
    pub target: Option<ActorId>,
    pub kind: EventKind,
}

impl CombatEvent {
    pub fn new(tick: Tick, kind: EventKind) -> Self {
        Self {
            tick,
            source: None,
            target: None,
            kind,
        }
    }

    pub fn from_actor(mut self, source: ActorId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn on(mut self, target: ActorId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Event payloads.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", rename_all = "snake_case")
)]
pub enum EventKind {
    EncounterStarted {
        party: usize,
        hostiles: usize,
    },
    /// An ability passed its gates and was committed (source → primary target).
    ActionCommitted {
        ability: AbilityId,
    },
    ActionRejected {
        ability: AbilityId,
        reason: ActionRejection,
    },
    DamageDealt {
        ability: AbilityId,
        amount: f64,
        critical: bool,
        periodic: bool,
    },
    HealingApplied {
        ability: AbilityId,
        amount: f64,
        overheal: f64,
        critical: bool,
        periodic: bool,
    },
    ResourceRestored {
        ability: AbilityId,
        amount: f64,
    },
    EffectApplied {
        instance: EffectInstanceId,
        ability: AbilityId,
        effect: EffectKind,
        duration: u32,
        magnitude: f64,
    },
    EffectRefreshed {
        instance: EffectInstanceId,
        ability: AbilityId,
        effect: EffectKind,
        duration: u32,
        magnitude: f64,
    },
    EffectRejected {
        ability: AbilityId,
        effect: EffectKind,
        error: StatusError,
    },
    EffectExpired {
        instance: EffectInstanceId,
        ability: AbilityId,
        effect: EffectKind,
    },
    ComboChanged {
        count: u32,
        max: u32,
    },
    /// Source is the friendly, target the hostile whose table changed.
    ThreatChanged {
        delta: f64,
        total: f64,
    },
    /// Source is the taunter, target the taunted hostile.
    Taunted {
        duration: u32,
        threat: f64,
    },
    /// Source is the hostile whose target changed.
    TargetChanged {
        previous: Option<ActorId>,
        current: Option<ActorId>,
    },
    ActorDied,
    ActorSummoned {
        template: String,
    },
    PhaseTransition {
        from: BossPhase,
        to: BossPhase,
        ability: Option<AbilityId>,
    },
    DataIntegrity {
        warning: DataIntegrityWarning,
    },
    EncounterEnded {
        summary: EncounterSummary,
    },
}

/// Everything that happened during one [`step`](crate::engine::CombatSession::step).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickReport {
    pub tick: Tick,
    /// Session state after the tick.
    pub state: SessionState,
    pub events: Vec<CombatEvent>,
}

impl TickReport {
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn events_of<'a>(
        &'a self,
        filter: impl Fn(&EventKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a CombatEvent> + 'a {
        self.events.iter().filter(move |event| filter(&event.kind))
    }
}

/// Final tally of an encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSummary {
    pub outcome: SessionState,
    pub survivors: Vec<ActorId>,
    pub damage_by_actor: BTreeMap<ActorId, f64>,
    pub healing_by_actor: BTreeMap<ActorId, f64>,
    pub duration_ticks: u64,
}
