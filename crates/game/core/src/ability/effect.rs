//! Effect payloads carried by ability definitions.

use strum::Display;

use crate::stats::StatModifier;

/// Damage school, selecting which power stat scales the hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DamageSchool {
    /// Scales with attack power.
    #[default]
    Physical,
    /// Scales with spell power.
    Magic,
}

/// Category of a status effect instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum EffectKind {
    DamageOverTime,
    HealOverTime,
    Buff,
    Debuff,
}

impl EffectKind {
    /// True for kinds that change health every tick.
    pub const fn is_periodic(self) -> bool {
        matches!(self, EffectKind::DamageOverTime | EffectKind::HealOverTime)
    }
}

/// Template for a status effect applied by an ability.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectSpec {
    pub kind: EffectKind,
    /// Duration in ticks.
    pub duration: u32,
    /// Health change per tick for periodic kinds; strength ranking for
    /// buffs and debuffs.
    pub magnitude: f64,
    /// School used to scale periodic damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub school: DamageSchool,
    /// Stat modifiers active while a buff or debuff lasts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier>,
}

impl EffectSpec {
    pub fn periodic(kind: EffectKind, duration: u32, magnitude: f64) -> Self {
        Self {
            kind,
            duration,
            magnitude,
            school: DamageSchool::Magic,
            modifiers: Vec::new(),
        }
    }

    pub fn modifier(kind: EffectKind, duration: u32, magnitude: f64, modifiers: Vec<StatModifier>) -> Self {
        Self {
            kind,
            duration,
            magnitude,
            school: DamageSchool::Magic,
            modifiers,
        }
    }

    /// Total raw health change over the full duration (0 for non-periodic kinds).
    pub fn total_periodic(&self) -> f64 {
        if self.kind.is_periodic() {
            self.magnitude * f64::from(self.duration)
        } else {
            0.0
        }
    }
}

/// One thing an ability does to each of its targets.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AbilityEffect {
    Damage {
        amount: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        school: DamageSchool,
    },
    Heal {
        amount: f64,
    },
    /// Forces each targeted hostile onto the caster for `duration` ticks.
    Taunt {
        duration: u32,
    },
    ApplyStatus(EffectSpec),
    /// Brings a new hostile from the named template into the fight.
    Summon {
        template: String,
    },
    RestoreResource {
        amount: f64,
    },
}
