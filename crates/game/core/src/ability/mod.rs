//! Immutable ability definitions and the catalog that indexes them.
mod effect;
mod tags;

use std::collections::BTreeMap;

pub use effect::{AbilityEffect, DamageSchool, EffectKind, EffectSpec};
pub use tags::AbilityTags;

use crate::state::AbilityId;

/// Which actors an ability may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TargetFilter {
    /// Always the caster.
    SelfOnly,
    /// One living member of the caster's side (the caster included).
    Ally,
    /// One living member of the opposing side.
    Enemy,
    /// Every living member of the opposing side.
    Area,
}

/// Static description of an ability, shared by every actor that knows it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityDefinition {
    pub id: AbilityId,
    pub name: String,
    /// Resource spent on use.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: f64,
    /// Cooldown in ticks before haste.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cooldown: u32,
    pub target: TargetFilter,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tags: AbilityTags,
    /// Tie-break rank; lower values are preferred.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: u32,
    /// Combo points granted when used as a builder.
    #[cfg_attr(feature = "serde", serde(default))]
    pub combo_generation: u32,
    pub effects: Vec<AbilityEffect>,
    /// Fired only by boss phase transitions; never chosen by the selector.
    #[cfg_attr(feature = "serde", serde(default))]
    pub phase_only: bool,
}

impl AbilityDefinition {
    pub fn new(id: impl Into<AbilityId>, target: TargetFilter) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_owned(),
            id,
            cost: 0.0,
            cooldown: 0,
            target,
            tags: AbilityTags::empty(),
            priority: 0,
            combo_generation: 0,
            effects: Vec::new(),
            phase_only: false,
        }
    }

    pub fn with_tags(mut self, tags: AbilityTags) -> Self {
        self.tags |= tags;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_combo_generation(mut self, points: u32) -> Self {
        self.combo_generation = points;
        self
    }

    pub fn with_effect(mut self, effect: AbilityEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn phase_only(mut self) -> Self {
        self.phase_only = true;
        self
    }

    pub fn is_builder(&self) -> bool {
        self.tags.contains(AbilityTags::BUILDER)
    }

    pub fn is_finisher(&self) -> bool {
        self.tags.contains(AbilityTags::FINISHER)
    }

    /// Raw damage the ability deals per target, periodic effects included.
    pub fn damage_magnitude(&self) -> f64 {
        self.effects
            .iter()
            .map(|effect| match effect {
                AbilityEffect::Damage { amount, .. } => *amount,
                AbilityEffect::ApplyStatus(spec) if spec.kind == EffectKind::DamageOverTime => {
                    spec.total_periodic()
                }
                _ => 0.0,
            })
            .sum()
    }

    /// Raw healing the ability provides per target, periodic effects included.
    pub fn heal_magnitude(&self) -> f64 {
        self.effects
            .iter()
            .map(|effect| match effect {
                AbilityEffect::Heal { amount } => *amount,
                AbilityEffect::ApplyStatus(spec) if spec.kind == EffectKind::HealOverTime => {
                    spec.total_periodic()
                }
                _ => 0.0,
            })
            .sum()
    }
}

/// Lookup table of every ability available to a session.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, AbilityDefinition>,
}

impl AbilityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the one it replaced, if any.
    pub fn insert(&mut self, definition: AbilityDefinition) -> Option<AbilityDefinition> {
        self.abilities.insert(definition.id.clone(), definition)
    }

    pub fn get(&self, id: &AbilityId) -> Option<&AbilityDefinition> {
        self.abilities.get(id)
    }

    pub fn contains(&self, id: &AbilityId) -> bool {
        self.abilities.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AbilityDefinition> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl FromIterator<AbilityDefinition> for AbilityCatalog {
    fn from_iter<T: IntoIterator<Item = AbilityDefinition>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for definition in iter {
            catalog.insert(definition);
        }
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitudes_include_periodic_effects() {
        let ability = AbilityDefinition::new("rend", TargetFilter::Enemy)
            .with_tags(AbilityTags::DAMAGE)
            .with_effect(AbilityEffect::Damage {
                amount: 20.0,
                school: DamageSchool::Physical,
            })
            .with_effect(AbilityEffect::ApplyStatus(EffectSpec::periodic(
                EffectKind::DamageOverTime,
                4,
                5.0,
            )));
        assert_eq!(ability.damage_magnitude(), 40.0);
        assert_eq!(ability.heal_magnitude(), 0.0);
    }

    #[test]
    fn catalog_indexes_by_id() {
        let catalog: AbilityCatalog = [
            AbilityDefinition::new("a", TargetFilter::Enemy),
            AbilityDefinition::new("b", TargetFilter::Ally),
        ]
        .into_iter()
        .collect();
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains(&"b".into()));
        assert!(catalog.get(&"c".into()).is_none());
    }
}
