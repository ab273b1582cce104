//! AI context for utility-based decision making.
//!
//! The [`AiContext`] is the "blackboard" shared by every scoring term. It
//! borrows the session read-only for the duration of one decision and
//! precomputes the party-wide facts several terms consult.

use combat_core::{
    Actor, ActorId, CombatSession, ComboState, Role, SelectorWeights, Side,
};

/// Context for scoring one actor's options at one tick.
pub struct AiContext<'a> {
    /// The actor making the decision.
    pub actor: &'a Actor,

    /// Read-only access to the session.
    pub session: &'a CombatSession,

    /// Weights of the actor's role.
    pub weights: &'a SelectorWeights,

    /// Lowest health ratio among living allies, the actor included.
    min_ally_ratio: f64,
}

impl<'a> AiContext<'a> {
    /// Builds the context, or `None` when `actor` is unknown or dead.
    pub fn new(
        session: &'a CombatSession,
        actor: ActorId,
        weights: &'a SelectorWeights,
    ) -> Option<Self> {
        let actor = session.roster().get(actor).filter(|actor| actor.alive)?;
        let min_ally_ratio = session
            .roster()
            .alive_on(actor.side())
            .map(Actor::health_ratio)
            .fold(1.0, f64::min);

        Some(Self {
            actor,
            session,
            weights,
            min_ally_ratio,
        })
    }

    pub fn role(&self) -> Role {
        self.actor.role
    }

    pub fn side(&self) -> Side {
        self.actor.side()
    }

    pub fn min_ally_ratio(&self) -> f64 {
        self.min_ally_ratio
    }

    /// True when some living ally sits below the low-health threshold.
    pub fn ally_in_need(&self) -> bool {
        self.min_ally_ratio < self.weights.low_health_threshold
    }

    pub fn combo(&self) -> Option<ComboState> {
        self.actor.combo
    }

    /// The living party tank, if any.
    pub fn tank(&self) -> Option<ActorId> {
        self.session.roster().tank().map(|tank| tank.id)
    }

    /// True when the party tank is alive and the primary hostile is
    /// attacking someone else.
    pub fn tank_lost_aggro(&self) -> bool {
        let Some(tank) = self.tank() else {
            return false;
        };
        let Some(primary) = self.session.roster().primary_hostile() else {
            return false;
        };
        self.session.current_target(primary.id) != Some(tank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AbilityCatalog, ActorTemplate, CombatConfig, Roster};

    #[test]
    fn tracks_most_wounded_ally() {
        let mut roster = Roster::new();
        let healer = roster.spawn(
            &ActorTemplate::new("Healer", Role::Healer).with_attribute("stamina", 10.0),
        );
        let tank = roster.spawn(&ActorTemplate::new("Tank", Role::Tank).with_attribute("stamina", 10.0));
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        let session = CombatSession::new(roster, AbilityCatalog::new(), CombatConfig::default());

        let weights = session.config().weights.healer;
        let ctx = AiContext::new(&session, healer, &weights).unwrap();
        assert_eq!(ctx.min_ally_ratio(), 1.0);
        assert!(!ctx.ally_in_need());
        assert_eq!(ctx.tank(), Some(tank));
        assert!(ctx.tank_lost_aggro());
        assert!(AiContext::new(&session, ActorId(42), &weights).is_none());
    }
}
