//! Error types for session control and action resolution.

use super::SessionState;
use crate::error::{CombatError, ErrorContext, ErrorSeverity};
use crate::state::{AbilityId, ActorId, Side};

/// Why a requested ability use became a no-op.
///
/// Rejections never abort the tick; they are reported as
/// [`EventKind::ActionRejected`](crate::events::EventKind::ActionRejected).
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ActionRejection {
    #[error("actor is dead")]
    ActorDead,

    #[error("actor {0} not found")]
    UnknownActor(ActorId),

    #[error("ability `{0}` is not defined")]
    UnknownAbility(AbilityId),

    #[error("actor does not know ability `{0}`")]
    NotKnown(AbilityId),

    #[error("ability is reserved for phase transitions")]
    PhaseOnly,

    #[error("ability on cooldown for {remaining} more ticks")]
    OnCooldown { remaining: u64 },

    #[error("needs {needed} resource, has {available}")]
    InsufficientResource { needed: f64, available: f64 },

    #[error("no legal target")]
    NoLegalTarget,

    #[error("target {0} is not valid for this ability")]
    InvalidTarget(ActorId),

    #[error("target {0} is dead")]
    TargetDead(ActorId),
}

impl CombatError for ActionRejection {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorDead => "ACTION_ACTOR_DEAD",
            Self::UnknownActor(_) => "ACTION_UNKNOWN_ACTOR",
            Self::UnknownAbility(_) => "ACTION_UNKNOWN_ABILITY",
            Self::NotKnown(_) => "ACTION_NOT_KNOWN",
            Self::PhaseOnly => "ACTION_PHASE_ONLY",
            Self::OnCooldown { .. } => "ACTION_ON_COOLDOWN",
            Self::InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            Self::NoLegalTarget => "ACTION_NO_LEGAL_TARGET",
            Self::InvalidTarget(_) => "ACTION_INVALID_TARGET",
            Self::TargetDead(_) => "ACTION_TARGET_DEAD",
        }
    }
}

/// Errors returned by [`CombatSession`](super::CombatSession) control methods.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,

    #[error("session already started")]
    AlreadyStarted,

    #[error("session already ended ({0})")]
    AlreadyEnded(SessionState),

    #[error("cannot start: no {0} actors")]
    EmptySide(Side),

    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    #[error("invalid boss phases: {0}")]
    InvalidBossPhases(&'static str),

    /// The session reached a state the rules never produce. Fatal.
    #[error("session invariant violated at tick {}: {}", .context.tick, .context.message.unwrap_or("unspecified"))]
    InvariantViolation { context: ErrorContext },
}

impl CombatError for SessionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvariantViolation { .. } => ErrorSeverity::Fatal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::InvariantViolation { context } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotStarted => "SESSION_NOT_STARTED",
            Self::AlreadyStarted => "SESSION_ALREADY_STARTED",
            Self::AlreadyEnded(_) => "SESSION_ALREADY_ENDED",
            Self::EmptySide(_) => "SESSION_EMPTY_SIDE",
            Self::UnknownActor(_) => "SESSION_UNKNOWN_ACTOR",
            Self::InvalidBossPhases(_) => "SESSION_INVALID_BOSS_PHASES",
            Self::InvariantViolation { .. } => "SESSION_INVARIANT_VIOLATION",
        }
    }
}
