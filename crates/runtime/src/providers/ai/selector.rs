//! Utility-based ability selector.
//!
//! Enumerates every ability the actor could legally use this tick, scores
//! each with the four terms in [`scoring::terms`](super::scoring::terms) and
//! returns the best one. Candidates scoring zero or less are discarded, so
//! an actor with nothing worth doing idles.

use combat_core::{
    ActionDecider, ActorId, CombatSession, Decision, RoleWeights, SelectorWeights,
    engine::default_target,
};

use super::AiContext;
use super::scoring::{Candidate, ScoreBreakdown, terms};

/// Stateless scorer shared by every AI-controlled actor.
///
/// Weights come from the session's [`CombatConfig`](combat_core::CombatConfig)
/// unless overridden with [`with_weights`](Self::with_weights).
#[derive(Clone, Debug, Default)]
pub struct AbilitySelector {
    weights: Option<RoleWeights>,
}

impl AbilitySelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(mut self, weights: RoleWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    fn weights_for<'a>(&'a self, session: &'a CombatSession, actor: ActorId) -> Option<&'a SelectorWeights> {
        let role = session.roster().get(actor)?.role;
        let weights = self.weights.as_ref().unwrap_or(&session.config().weights);
        Some(weights.for_role(role))
    }

    /// Scores every legal option for `actor`, best first.
    pub fn evaluate_all(&self, session: &CombatSession, actor: ActorId) -> Vec<Candidate> {
        let Some(weights) = self.weights_for(session, actor) else {
            return Vec::new();
        };
        let Some(ctx) = AiContext::new(session, actor, weights) else {
            return Vec::new();
        };

        let mut candidates: Vec<Candidate> = ctx
            .actor
            .abilities
            .iter()
            .filter_map(|id| session.catalog().get(id))
            .filter(|ability| session.can_use(actor, ability).is_ok())
            .filter_map(|ability| {
                let target = default_target(session, actor, ability)?;
                let score = ScoreBreakdown {
                    offense: terms::offense(ability, &ctx),
                    healing: terms::healing(ability, &ctx),
                    threat: terms::threat(ability, &ctx),
                    combo: terms::combo(ability, &ctx),
                };
                Some(Candidate {
                    ability: ability.id.clone(),
                    target,
                    priority: ability.priority,
                    score,
                })
            })
            .collect();

        candidates.sort_by(Candidate::preference);
        candidates
    }

    /// Best candidate for `actor`, if any scores above zero.
    pub fn select(&self, session: &CombatSession, actor: ActorId) -> Option<Candidate> {
        let best = self
            .evaluate_all(session, actor)
            .into_iter()
            .find(|candidate| candidate.value() > 0.0);

        match &best {
            Some(candidate) => tracing::debug!(
                tick = %session.tick(),
                actor = %actor,
                ability = %candidate.ability,
                target = %candidate.target,
                score = candidate.value(),
                "ability selected"
            ),
            None => tracing::trace!(tick = %session.tick(), actor = %actor, "no viable ability"),
        }
        best
    }
}

impl ActionDecider for AbilitySelector {
    fn decide(&mut self, session: &CombatSession, actor: ActorId) -> Option<Decision> {
        self.select(session, actor)
            .map(|candidate| Decision::new(candidate.ability, Some(candidate.target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityTags, ActorTemplate, CombatConfig,
        DamageSchool, Role, Roster, TargetFilter,
    };

    fn catalog() -> AbilityCatalog {
        [
            AbilityDefinition::new("smite", TargetFilter::Enemy)
                .with_tags(AbilityTags::DAMAGE)
                .with_effect(AbilityEffect::Damage {
                    amount: 20.0,
                    school: DamageSchool::Magic,
                }),
            AbilityDefinition::new("mend", TargetFilter::Ally)
                .with_tags(AbilityTags::HEAL)
                .with_cost(10.0)
                .with_effect(AbilityEffect::Heal { amount: 40.0 }),
            AbilityDefinition::new("nova", TargetFilter::Area)
                .with_tags(AbilityTags::DAMAGE)
                .with_cost(1_000.0)
                .with_effect(AbilityEffect::Damage {
                    amount: 500.0,
                    school: DamageSchool::Magic,
                }),
        ]
        .into_iter()
        .collect()
    }

    fn healer() -> ActorTemplate {
        ActorTemplate::new("Cleric", Role::Healer)
            .with_attribute("stamina", 10.0)
            .with_attribute("intellect", 10.0)
            .with_ability("smite")
            .with_ability("mend")
            .with_ability("nova")
    }

    #[test]
    fn solo_healer_at_full_health_attacks() {
        let mut roster = Roster::new();
        let cleric = roster.spawn(&healer());
        let ogre = roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        let mut session = CombatSession::new(roster, catalog(), CombatConfig::default());
        session.start().unwrap();

        let mut selector = AbilitySelector::new();
        let decision = selector.decide(&session, cleric).unwrap();
        assert_eq!(decision.ability.as_str(), "smite");
        assert_eq!(decision.target, Some(ogre));
    }

    #[test]
    fn unaffordable_abilities_are_not_candidates() {
        let mut roster = Roster::new();
        let cleric = roster.spawn(&healer());
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        let session = CombatSession::new(roster, catalog(), CombatConfig::default());

        let candidates = AbilitySelector::new().evaluate_all(&session, cleric);
        let ids: Vec<_> = candidates.iter().map(|c| c.ability.as_str()).collect();
        assert!(!ids.contains(&"nova"));
        assert_eq!(ids.first(), Some(&"smite"));
    }

    #[test]
    fn nothing_worth_doing_idles() {
        let mut roster = Roster::new();
        let cleric = roster.spawn(
            &ActorTemplate::new("Cleric", Role::Healer)
                .with_attribute("stamina", 10.0)
                .with_ability("mend"),
        );
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        let session = CombatSession::new(roster, catalog(), CombatConfig::default());

        // only a heal is known and nobody is hurt
        assert!(AbilitySelector::new().select(&session, cleric).is_none());
    }

    #[test]
    fn weight_override_replaces_session_weights() {
        let mut roster = Roster::new();
        let cleric = roster.spawn(&healer());
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        let session = CombatSession::new(roster, catalog(), CombatConfig::default());

        let mut weights = RoleWeights::default();
        weights.healer.damage = 0.0;
        let selector = AbilitySelector::new().with_weights(weights);
        assert!(selector.select(&session, cleric).is_none());
    }
}
