//! Stat keys shared by content, modifiers and the resolver.
//!
//! Content files name stats with snake_case strings; parsing goes through
//! `strum::EnumString` so unknown keys are detected instead of silently
//! becoming a default.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use super::bonus::Bonus;

/// Primary attributes read from actor templates.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Attribute {
    Stamina,
    Strength,
    Intellect,
    Spirit,
    ArmorRating,
    CritRating,
    HasteRating,
}

/// Stats derived from effective attributes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DerivedStat {
    MaxHealth,
    MaxResource,
    ResourceRegen,
    AttackPower,
    SpellPower,
    /// Outgoing damage multiplier (1.0 = unmodified).
    DamageDone,
    /// Outgoing healing multiplier (1.0 = unmodified).
    HealingDone,
}

/// Target of a modifier: either layer of the resolver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Stat {
    Attribute(Attribute),
    Derived(DerivedStat),
}

impl Stat {
    /// Parses a content key, trying attributes first.
    pub fn parse(key: &str) -> Option<Self> {
        key.parse::<Attribute>()
            .map(Stat::Attribute)
            .or_else(|_| key.parse::<DerivedStat>().map(Stat::Derived))
            .ok()
    }
}

impl From<Attribute> for Stat {
    fn from(value: Attribute) -> Self {
        Stat::Attribute(value)
    }
}

impl From<DerivedStat> for Stat {
    fn from(value: DerivedStat) -> Self {
        Stat::Derived(value)
    }
}

/// Typed modifier used by status effects.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier {
    pub stat: Stat,
    pub bonus: Bonus,
}

impl StatModifier {
    pub fn new(stat: impl Into<Stat>, bonus: Bonus) -> Self {
        Self {
            stat: stat.into(),
            bonus,
        }
    }
}

/// Modifier as written in content, keyed by an unvalidated stat name.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawModifier {
    pub stat: String,
    pub bonus: Bonus,
}

impl RawModifier {
    pub fn new(stat: impl Into<String>, bonus: Bonus) -> Self {
        Self {
            stat: stat.into(),
            bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snake_case_keys() {
        assert_eq!(
            Stat::parse("crit_rating"),
            Some(Stat::Attribute(Attribute::CritRating))
        );
        assert_eq!(
            Stat::parse("healing_done"),
            Some(Stat::Derived(DerivedStat::HealingDone))
        );
        assert_eq!(Stat::parse("luck"), None);
    }

    #[test]
    fn display_round_trips_through_parse() {
        let key = Attribute::HasteRating.to_string();
        assert_eq!(key, "haste_rating");
        assert_eq!(key.parse::<Attribute>().ok(), Some(Attribute::HasteRating));
    }
}
