//! Combat orchestration.
//!
//! [`CombatSession`] owns every piece of mutable combat state and advances it
//! one tick at a time. Each call to [`CombatSession::step`] returns a
//! [`TickReport`](crate::events::TickReport) with the ordered events of that
//! tick; there is no global state and no callback registry.
mod boss;
mod command;
mod errors;
mod session;
mod targeting;

pub use boss::{BossPhase, BossPhaseMachine, PhaseChange, PhaseSpec};
pub use command::{ActionDecider, Decision, ExternalCommand, IdleDecider};
pub use errors::{ActionRejection, SessionError};
pub use session::CombatSession;
pub use targeting::{default_target, hostiles_in_focus_order};

use strum::Display;

/// Lifecycle of a session: `Idle → Active → Victory | Defeat`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SessionState {
    Idle,
    Active,
    /// Every hostile is dead.
    Victory,
    /// Every party member is dead.
    Defeat,
}

impl SessionState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, SessionState::Victory | SessionState::Defeat)
    }
}
