//! Deterministic party combat rules shared by the runtime and offline tools.
//!
//! `combat-core` defines the canonical model (actors, abilities, stats,
//! threat, status effects, boss phases) and exposes pure APIs with no I/O.
//! All combat state mutation flows through [`engine::CombatSession`]; AI
//! deciders plug in through [`engine::ActionDecider`] and observe the session
//! read-only. Supporting crates depend on the types re-exported here.
pub mod ability;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;
pub mod stats;

pub use ability::{
    AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityTags, DamageSchool, EffectKind,
    EffectSpec, TargetFilter,
};
pub use combat::{
    ComboOutcome, ComboState, StatusError, StatusInstance, StatusTracker, ThreatChange,
    ThreatTable,
};
pub use config::{CombatConfig, RatingConfig, RoleWeights, ScalingConfig, SelectorWeights, ThreatConfig};
pub use engine::{
    ActionDecider, ActionRejection, BossPhase, BossPhaseMachine, CombatSession, Decision,
    ExternalCommand, IdleDecider, PhaseSpec, SessionError, SessionState,
};
pub use env::{PcgRng, RngOracle};
pub use error::{CombatError, DataIntegrityWarning, ErrorContext, ErrorSeverity};
pub use events::{CombatEvent, EncounterSummary, EventKind, TickReport};
pub use state::{AbilityId, Actor, ActorId, ActorTemplate, Pool, Role, Roster, Side, Tick};
pub use stats::{Attribute, Bonus, DerivedStat, RawModifier, Stat, StatBlock, StatModifier};
