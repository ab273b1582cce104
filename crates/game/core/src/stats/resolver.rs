//! Pure stat resolution: base attributes + modifiers → final stat block.
//!
//! Resolution runs in three layers, each using the [`BonusStack`] ordering:
//!
//! 1. **Attributes**: base attributes from the template plus attribute
//!    modifiers (equipment and active buffs/debuffs).
//! 2. **Derived**: values computed from effective attributes via
//!    [`ScalingConfig`] plus derived-stat modifiers.
//! 3. **Ratings**: crit, haste and armor ratings converted to fractions with
//!    diminishing returns.
//!
//! Unknown attribute or stat keys contribute zero and are reported as
//! [`DataIntegrityWarning`]s; resolution never fails.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use super::bonus::{Bonus, BonusStack};
use super::keys::{Attribute, DerivedStat, Stat, StatModifier};
use super::ratings::rating_to_percent;
use crate::config::{CombatConfig, ScalingConfig};
use crate::error::DataIntegrityWarning;
use crate::state::Actor;

/// Final statistics for one actor at one point in time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBlock {
    pub attributes: BTreeMap<Attribute, f64>,
    pub max_health: f64,
    pub max_resource: f64,
    pub resource_regen: f64,
    pub attack_power: f64,
    pub spell_power: f64,
    pub damage_done: f64,
    pub healing_done: f64,
    /// Chance in `[0, 1)` for abilities to critically hit.
    pub crit_chance: f64,
    /// Fractional cooldown speed-up in `[0, 1)`.
    pub haste: f64,
    /// Fraction of incoming damage prevented, in `[0, 1)`.
    pub damage_reduction: f64,
}

impl StatBlock {
    pub fn attribute(&self, attribute: Attribute) -> f64 {
        self.attributes.get(&attribute).copied().unwrap_or(0.0)
    }

    pub fn derived(&self, stat: DerivedStat) -> f64 {
        match stat {
            DerivedStat::MaxHealth => self.max_health,
            DerivedStat::MaxResource => self.max_resource,
            DerivedStat::ResourceRegen => self.resource_regen,
            DerivedStat::AttackPower => self.attack_power,
            DerivedStat::SpellPower => self.spell_power,
            DerivedStat::DamageDone => self.damage_done,
            DerivedStat::HealingDone => self.healing_done,
        }
    }
}

/// Output of [`resolve`]: the stat block plus any content problems found.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub stats: StatBlock,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Resolves `actor`'s final stats under the given active effect modifiers.
///
/// Pure: the same inputs always yield the same block, and the order in which
/// modifiers appear does not affect the result.
pub fn resolve(actor: &Actor, effect_modifiers: &[StatModifier], config: &CombatConfig) -> Resolution {
    let mut warnings = Vec::new();
    let mut stacks: BTreeMap<StatKey, BonusStack> = BTreeMap::new();

    for raw in &actor.modifiers {
        match Stat::parse(&raw.stat) {
            Some(stat) => push(&mut stacks, stat, raw.bonus),
            None => warnings.push(DataIntegrityWarning::UnknownStat {
                actor: actor.id,
                key: raw.stat.clone(),
            }),
        }
    }
    for modifier in effect_modifiers {
        push(&mut stacks, modifier.stat, modifier.bonus);
    }

    let mut base = BTreeMap::new();
    for (key, value) in &actor.base_attributes {
        match key.parse::<Attribute>() {
            Ok(attribute) => {
                *base.entry(attribute).or_insert(0.0) += value;
            }
            Err(_) => warnings.push(DataIntegrityWarning::UnknownAttribute {
                actor: actor.id,
                key: key.clone(),
            }),
        }
    }

    let attributes: BTreeMap<Attribute, f64> = Attribute::iter()
        .map(|attribute| {
            let value = base.get(&attribute).copied().unwrap_or(0.0);
            let resolved = match stacks.get(&StatKey::Attribute(attribute)) {
                Some(stack) => stack.apply(value, f64::MIN, f64::MAX),
                None => value,
            };
            (attribute, resolved)
        })
        .collect();

    let derived = |stat: DerivedStat, base: f64| match stacks.get(&StatKey::Derived(stat)) {
        Some(stack) => stack.apply_non_negative(base),
        None => base.max(0.0),
    };

    let bases = DerivedBases::compute(&attributes, &config.scaling);
    let ratings = &config.ratings;
    let attribute = |a: Attribute| attributes.get(&a).copied().unwrap_or(0.0);

    let stats = StatBlock {
        max_health: derived(DerivedStat::MaxHealth, bases.max_health),
        max_resource: derived(DerivedStat::MaxResource, bases.max_resource),
        resource_regen: derived(DerivedStat::ResourceRegen, bases.resource_regen),
        attack_power: derived(DerivedStat::AttackPower, bases.attack_power),
        spell_power: derived(DerivedStat::SpellPower, bases.spell_power),
        damage_done: derived(DerivedStat::DamageDone, 1.0),
        healing_done: derived(DerivedStat::HealingDone, 1.0),
        crit_chance: rating_to_percent(attribute(Attribute::CritRating), ratings.crit_k),
        haste: rating_to_percent(attribute(Attribute::HasteRating), ratings.haste_k),
        damage_reduction: rating_to_percent(attribute(Attribute::ArmorRating), ratings.armor_k),
        attributes,
    };

    Resolution { stats, warnings }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum StatKey {
    Attribute(Attribute),
    Derived(DerivedStat),
}

fn push(stacks: &mut BTreeMap<StatKey, BonusStack>, stat: Stat, bonus: Bonus) {
    let key = match stat {
        Stat::Attribute(attribute) => StatKey::Attribute(attribute),
        Stat::Derived(derived) => StatKey::Derived(derived),
    };
    stacks.entry(key).or_default().add(bonus);
}

struct DerivedBases {
    max_health: f64,
    max_resource: f64,
    resource_regen: f64,
    attack_power: f64,
    spell_power: f64,
}

impl DerivedBases {
    fn compute(attributes: &BTreeMap<Attribute, f64>, scaling: &ScalingConfig) -> Self {
        let get = |a: Attribute| attributes.get(&a).copied().unwrap_or(0.0).max(0.0);
        Self {
            max_health: get(Attribute::Stamina) * scaling.health_per_stamina,
            max_resource: scaling.base_resource
                + get(Attribute::Intellect) * scaling.resource_per_intellect,
            resource_regen: get(Attribute::Spirit) * scaling.regen_per_spirit,
            attack_power: get(Attribute::Strength) * scaling.power_per_strength,
            spell_power: get(Attribute::Intellect) * scaling.power_per_intellect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorId, ActorTemplate, Role};
    use crate::stats::RawModifier;

    fn actor(template: ActorTemplate) -> Actor {
        Actor::from_template(ActorId(0), &template)
    }

    #[test]
    fn derives_health_from_stamina() {
        let config = CombatConfig::default();
        let actor = actor(ActorTemplate::new("A", Role::Tank).with_attribute("stamina", 50.0));
        let resolution = resolve(&actor, &[], &config);
        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.stats.max_health, 500.0);
        assert_eq!(resolution.stats.damage_done, 1.0);
    }

    #[test]
    fn additive_before_multiplicative() {
        let config = CombatConfig::default();
        let actor = actor(
            ActorTemplate::new("A", Role::Damage)
                .with_attribute("strength", 10.0)
                .with_modifier(RawModifier::new("strength", Bonus::more(100.0)))
                .with_modifier(RawModifier::new("strength", Bonus::flat(10.0))),
        );
        let resolution = resolve(&actor, &[], &config);
        assert_eq!(resolution.stats.attribute(Attribute::Strength), 40.0);
        assert_eq!(resolution.stats.attack_power, 80.0);
    }

    #[test]
    fn unknown_keys_warn_and_contribute_zero() {
        let config = CombatConfig::default();
        let actor = actor(
            ActorTemplate::new("A", Role::Damage)
                .with_attribute("stamina", 10.0)
                .with_attribute("luck", 99.0)
                .with_modifier(RawModifier::new("charisma", Bonus::flat(5.0))),
        );
        let resolution = resolve(&actor, &[], &config);
        assert_eq!(resolution.warnings.len(), 2);
        assert_eq!(resolution.stats.max_health, 100.0);
    }

    #[test]
    fn effect_modifiers_feed_derived_layer() {
        let config = CombatConfig::default();
        let actor = actor(ActorTemplate::new("A", Role::Healer).with_attribute("intellect", 20.0));
        let buff = StatModifier::new(DerivedStat::HealingDone, Bonus::increased(50.0));
        let resolution = resolve(&actor, &[buff], &config);
        assert!((resolution.stats.healing_done - 1.5).abs() < 1e-12);
        assert_eq!(resolution.stats.spell_power, 40.0);
    }

    #[test]
    fn ratings_use_diminishing_returns() {
        let config = CombatConfig::default();
        let actor = actor(
            ActorTemplate::new("A", Role::Damage)
                .with_attribute("crit_rating", 100.0)
                .with_attribute("armor_rating", -30.0),
        );
        let stats = resolve(&actor, &[], &config).stats;
        assert!((stats.crit_chance - 0.5).abs() < 1e-12);
        assert_eq!(stats.damage_reduction, 0.0);
    }
}
