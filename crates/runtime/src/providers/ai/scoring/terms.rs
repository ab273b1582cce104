//! The four scoring terms.
//!
//! Each function is pure: it reads the ability and the [`AiContext`] and
//! returns an already-weighted contribution. Abilities without the relevant
//! tag contribute zero.

use combat_core::{AbilityDefinition, AbilityTags, Role, Side};

use crate::providers::ai::AiContext;

/// Offense term for damage and interrupt abilities.
///
/// ```text
/// damage × (0.5 + 0.5 × m / (m + magnitude_scale)) × safety
/// ```
///
/// `safety` is `damage_safety` while an ally needs healing, otherwise 1.
pub fn offense(ability: &AbilityDefinition, ctx: &AiContext) -> f64 {
    if !ability.tags.intersects(AbilityTags::OFFENSIVE) {
        return 0.0;
    }
    let weights = ctx.weights;
    let magnitude = ability.damage_magnitude().max(0.0);
    let scale = weights.magnitude_scale.max(f64::EPSILON);
    let strength = 0.5 + 0.5 * magnitude / (magnitude + scale);
    let safety = if ctx.ally_in_need() {
        weights.damage_safety
    } else {
        1.0
    };
    weights.damage * strength * safety
}

/// Healing term.
///
/// While an ally is below the threshold it grows with how far below:
/// `healing_preference × (1 + (threshold − min_ratio) / threshold)`.
/// Otherwise it is a small top-off value, `heal_idle × (1 − min_ratio)`,
/// which is zero when everyone is at full health.
pub fn healing(ability: &AbilityDefinition, ctx: &AiContext) -> f64 {
    if !ability.tags.contains(AbilityTags::HEAL) {
        return 0.0;
    }
    let weights = ctx.weights;
    let min_ratio = ctx.min_ally_ratio();
    if ctx.ally_in_need() {
        let threshold = weights.low_health_threshold.max(f64::EPSILON);
        weights.healing_preference * (1.0 + (threshold - min_ratio) / threshold)
    } else {
        weights.heal_idle * (1.0 - min_ratio)
    }
}

/// Threat term for taunts: full weight for the tank, half for other party
/// members, and only while the tank has lost the primary hostile.
pub fn threat(ability: &AbilityDefinition, ctx: &AiContext) -> f64 {
    if !ability.tags.contains(AbilityTags::TAUNT) || ctx.side() != Side::Party {
        return 0.0;
    }
    if !ctx.tank_lost_aggro() {
        return 0.0;
    }
    match ctx.role() {
        Role::Tank => ctx.weights.taunt,
        _ => ctx.weights.taunt * 0.5,
    }
}

/// Combo term: finishers pay off once the combo ratio reaches
/// `finisher_ready_ratio`, builders are favored until then.
pub fn combo(ability: &AbilityDefinition, ctx: &AiContext) -> f64 {
    let Some(combo) = ctx.combo() else {
        return 0.0;
    };
    let weights = ctx.weights;
    let ratio = combo.ratio();
    let ready = ratio >= weights.finisher_ready_ratio;

    if ability.is_finisher() {
        if ready {
            weights.finisher * ratio
        } else {
            weights.finisher * weights.finisher_early_factor * ratio
        }
    } else if ability.is_builder() {
        if ready {
            weights.builder * weights.builder_capped_factor
        } else {
            weights.builder
        }
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{
        AbilityCatalog, AbilityEffect, ActorId, ActorTemplate, CombatConfig, CombatSession,
        DamageSchool, Roster, TargetFilter,
    };

    fn bolt(amount: f64) -> AbilityDefinition {
        AbilityDefinition::new("bolt", TargetFilter::Enemy)
            .with_tags(AbilityTags::DAMAGE)
            .with_effect(AbilityEffect::Damage {
                amount,
                school: DamageSchool::Magic,
            })
    }

    fn mend() -> AbilityDefinition {
        AbilityDefinition::new("mend", TargetFilter::Ally)
            .with_tags(AbilityTags::HEAL)
            .with_effect(AbilityEffect::Heal { amount: 30.0 })
    }

    fn session() -> (CombatSession, ActorId) {
        let mut roster = Roster::new();
        let healer = roster.spawn(
            &ActorTemplate::new("Healer", Role::Healer)
                .with_attribute("stamina", 10.0)
                .with_combo(5),
        );
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        (
            CombatSession::new(roster, AbilityCatalog::new(), CombatConfig::default()),
            healer,
        )
    }

    #[test]
    fn offense_grows_with_magnitude() {
        let (session, healer) = session();
        let weights = session.config().weights.damage;
        let ctx = AiContext::new(&session, healer, &weights).unwrap();

        assert_eq!(offense(&bolt(0.0), &ctx), 0.5);
        assert_eq!(offense(&bolt(100.0), &ctx), 0.75);
        assert_eq!(offense(&mend(), &ctx), 0.0);
    }

    #[test]
    fn healing_is_zero_at_full_health() {
        let (session, healer) = session();
        let weights = session.config().weights.healer;
        let ctx = AiContext::new(&session, healer, &weights).unwrap();

        assert_eq!(healing(&mend(), &ctx), 0.0);
        assert!(offense(&bolt(10.0), &ctx) > healing(&mend(), &ctx));
    }

    #[test]
    fn taunt_ignored_for_non_taunts_and_without_tank() {
        let (session, healer) = session();
        let weights = session.config().weights.healer;
        let ctx = AiContext::new(&session, healer, &weights).unwrap();
        let taunt = AbilityDefinition::new("taunt", TargetFilter::Enemy)
            .with_tags(AbilityTags::TAUNT)
            .with_effect(AbilityEffect::Taunt { duration: 2 });

        assert_eq!(threat(&bolt(10.0), &ctx), 0.0);
        // the party has no tank
        assert_eq!(threat(&taunt, &ctx), 0.0);
    }

    #[test]
    fn empty_combo_prefers_builders() {
        let (session, healer) = session();
        let weights = session.config().weights.damage;
        let ctx = AiContext::new(&session, healer, &weights).unwrap();
        let builder = bolt(5.0).with_tags(AbilityTags::DAMAGE | AbilityTags::BUILDER);
        let finisher = bolt(5.0).with_tags(AbilityTags::DAMAGE | AbilityTags::FINISHER);

        assert_eq!(combo(&builder, &ctx), weights.builder);
        assert_eq!(combo(&finisher, &ctx), 0.0);
    }
}
