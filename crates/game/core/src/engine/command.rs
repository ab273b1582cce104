//! Decisions, external commands and the decider seam.

use super::CombatSession;
use crate::state::{AbilityId, ActorId};

/// An actor's choice for one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    pub ability: AbilityId,
    /// Primary target; `None` lets the session pick the default target.
    pub target: Option<ActorId>,
}

impl Decision {
    pub fn new(ability: impl Into<AbilityId>, target: Option<ActorId>) -> Self {
        Self {
            ability: ability.into(),
            target,
        }
    }
}

/// Override injected from outside the simulation (player input, scripts).
///
/// Commands are consumed at the next tick boundary and replace whatever the
/// decider would have chosen for that actor on that tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ExternalCommand {
    UseAbility {
        actor: ActorId,
        ability: AbilityId,
        target: Option<ActorId>,
    },
    /// Skip the actor's next action.
    Idle { actor: ActorId },
}

impl ExternalCommand {
    pub fn actor(&self) -> ActorId {
        match self {
            ExternalCommand::UseAbility { actor, .. } | ExternalCommand::Idle { actor } => *actor,
        }
    }

    pub(crate) fn into_decision(self) -> Option<Decision> {
        match self {
            ExternalCommand::UseAbility {
                ability, target, ..
            } => Some(Decision { ability, target }),
            ExternalCommand::Idle { .. } => None,
        }
    }
}

/// Chooses what AI-controlled actors do.
///
/// Called once per acting actor per tick with a read-only view of the session
/// between actions. Returning `None` makes the actor idle for the tick.
pub trait ActionDecider {
    fn decide(&mut self, session: &CombatSession, actor: ActorId) -> Option<Decision>;
}

impl<F> ActionDecider for F
where
    F: FnMut(&CombatSession, ActorId) -> Option<Decision>,
{
    fn decide(&mut self, session: &CombatSession, actor: ActorId) -> Option<Decision> {
        self(session, actor)
    }
}

/// Decider that never acts; only external commands drive the session.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdleDecider;

impl ActionDecider for IdleDecider {
    fn decide(&mut self, _session: &CombatSession, _actor: ActorId) -> Option<Decision> {
        None
    }
}
