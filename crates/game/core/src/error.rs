//! Common error infrastructure for combat-core.
//!
//! This module provides shared types and traits used across all error types in combat-core.
//! Domain-specific errors (e.g., `StatusError`, `ActionRejection`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each subsystem has its own error type with specific variants
//! - **Rich Context**: Errors include actor and tick for debugging
//! - **Severity Classification**: Errors are categorized for recovery strategies

use crate::state::{AbilityId, ActorId, Tick};

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: The tick continues; the offending action becomes a no-op
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: The session cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - the session continues unaffected.
    ///
    /// Examples: ability on cooldown, weaker status refresh
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: unknown attribute key in content, stepping a finished session
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - session state is corrupted and must be aborted.
    ///
    /// Examples: session active while one side has no live actors
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Actor that triggered the error (if applicable).
    pub actor: Option<ActorId>,

    /// Session tick at the time of error.
    pub tick: Tick,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    /// Creates a new error context at the given tick.
    #[must_use]
    pub const fn new(tick: Tick) -> Self {
        Self {
            actor: None,
            tick,
            message: None,
        }
    }

    /// Attaches an actor to this context (builder pattern).
    #[must_use]
    pub const fn with_actor(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Attaches a static message to this context (builder pattern).
    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all combat-core errors.
///
/// This trait provides a uniform interface for error classification and context
/// retrieval across all error types in the crate.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Include `ErrorContext` in variants that need debugging info
/// - Classify severity based on recoverability, not impact
pub trait CombatError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Malformed or inconsistent content detected while building or resolving actors.
///
/// Never fatal: the offending entry is ignored (contributes zero / is dropped)
/// and the warning is surfaced as an event and a `tracing` warning.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DataIntegrityWarning {
    #[error("actor {actor}: unknown attribute key `{key}`")]
    UnknownAttribute { actor: ActorId, key: String },

    #[error("actor {actor}: unknown stat key `{key}` in modifier")]
    UnknownStat { actor: ActorId, key: String },

    #[error("actor {actor}: unknown ability `{ability}`")]
    UnknownAbility { actor: ActorId, ability: AbilityId },

    #[error("unknown summon template `{template}`")]
    UnknownTemplate { template: String },
}

impl CombatError for DataIntegrityWarning {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownAttribute { .. } => "DATA_UNKNOWN_ATTRIBUTE",
            Self::UnknownStat { .. } => "DATA_UNKNOWN_STAT",
            Self::UnknownAbility { .. } => "DATA_UNKNOWN_ABILITY",
            Self::UnknownTemplate { .. } => "DATA_UNKNOWN_TEMPLATE",
        }
    }
}
