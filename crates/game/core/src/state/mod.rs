//! Session state: identifiers, actors and the roster.
//!
//! Runtime layers clone or query this state but mutate it exclusively through
//! [`CombatSession`](crate::engine::CombatSession).
mod actor;
mod ids;
mod roster;

pub use actor::{Actor, ActorTemplate, Pool, Role, Side};
pub use ids::{AbilityId, ActorId, EffectInstanceId, Tick};
pub use roster::Roster;
