//! Tunable combat parameters.
//!
//! Every coefficient the rules consult lives here so encounters can be
//! balanced from a TOML file without touching code. All sections implement
//! `Default`, and with the `serde` feature each section is deserialized with
//! `#[serde(default)]` so partial files are accepted.

use crate::state::Role;

/// Root configuration consumed by [`CombatSession`](crate::engine::CombatSession).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct CombatConfig {
    pub threat: ThreatConfig,
    pub ratings: RatingConfig,
    pub scaling: ScalingConfig,
    /// Damage multiplier gained per combo point consumed by a finisher.
    pub combo_per_point_bonus: f64,
    /// Multiplier applied to critical hits and heals.
    pub crit_multiplier: f64,
    pub weights: RoleWeights,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of simultaneous status effects on a single actor.
    pub const MAX_STATUS_EFFECTS: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COMBO_PER_POINT_BONUS: f64 = 0.2;
    pub const DEFAULT_CRIT_MULTIPLIER: f64 = 1.5;

    pub fn new() -> Self {
        Self {
            threat: ThreatConfig::default(),
            ratings: RatingConfig::default(),
            scaling: ScalingConfig::default(),
            combo_per_point_bonus: Self::DEFAULT_COMBO_PER_POINT_BONUS,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            weights: RoleWeights::default(),
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Threat generation coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ThreatConfig {
    /// Threat per point of damage dealt to a hostile.
    pub damage_coefficient: f64,
    /// Threat per point of effective healing, split to every engaged hostile.
    pub heal_coefficient: f64,
    /// Amount by which a taunter's threat exceeds the previous maximum.
    pub taunt_margin: f64,
}

impl Default for ThreatConfig {
    fn default() -> Self {
        Self {
            damage_coefficient: 1.0,
            heal_coefficient: 0.5,
            taunt_margin: 1.0,
        }
    }
}

/// Diminishing-returns constants (`K` in `rating / (rating + K)`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RatingConfig {
    pub crit_k: f64,
    pub haste_k: f64,
    pub armor_k: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            crit_k: 100.0,
            haste_k: 100.0,
            armor_k: 200.0,
        }
    }
}

/// Conversion rates from primary attributes to derived stats.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ScalingConfig {
    pub health_per_stamina: f64,
    pub base_resource: f64,
    pub resource_per_intellect: f64,
    pub regen_per_spirit: f64,
    pub power_per_strength: f64,
    pub power_per_intellect: f64,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            health_per_stamina: 10.0,
            base_resource: 100.0,
            resource_per_intellect: 5.0,
            regen_per_spirit: 0.1,
            power_per_strength: 2.0,
            power_per_intellect: 2.0,
        }
    }
}

/// Per-role weight sets for the ability selector.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct RoleWeights {
    pub tank: SelectorWeights,
    pub healer: SelectorWeights,
    pub damage: SelectorWeights,
    pub hostile: SelectorWeights,
}

impl RoleWeights {
    pub fn for_role(&self, role: Role) -> &SelectorWeights {
        match role {
            Role::Tank => &self.tank,
            Role::Healer => &self.healer,
            Role::Damage => &self.damage,
            Role::Hostile => &self.hostile,
        }
    }
}

impl Default for RoleWeights {
    fn default() -> Self {
        Self {
            tank: SelectorWeights {
                healing_preference: 0.5,
                heal_idle: 0.1,
                taunt: 5.0,
                builder: 1.2,
                finisher: 1.6,
                ..SelectorWeights::default()
            },
            healer: SelectorWeights {
                damage_safety: 0.05,
                healing_preference: 10.0,
                heal_idle: 0.3,
                builder: 0.8,
                finisher: 1.0,
                ..SelectorWeights::default()
            },
            damage: SelectorWeights::default(),
            hostile: SelectorWeights {
                healing_preference: 2.0,
                heal_idle: 0.0,
                ..SelectorWeights::default()
            },
        }
    }
}

/// Weights for the four scoring terms of the ability selector.
///
/// The offense term is scaled by `damage_safety` while an ally sits below
/// `low_health_threshold`; healers use a small value so that healing wins.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SelectorWeights {
    pub damage: f64,
    pub damage_safety: f64,
    pub healing_preference: f64,
    pub heal_idle: f64,
    pub taunt: f64,
    pub builder: f64,
    pub builder_capped_factor: f64,
    pub finisher: f64,
    pub finisher_early_factor: f64,
    pub finisher_ready_ratio: f64,
    /// Health ratio below which an ally counts as needing healing.
    pub low_health_threshold: f64,
    /// Magnitude at which the offense term reaches 75% of its weight.
    pub magnitude_scale: f64,
}

impl Default for SelectorWeights {
    fn default() -> Self {
        Self {
            damage: 1.0,
            damage_safety: 1.0,
            healing_preference: 0.5,
            heal_idle: 0.05,
            taunt: 0.0,
            builder: 1.0,
            builder_capped_factor: 0.1,
            finisher: 1.5,
            finisher_early_factor: 0.1,
            finisher_ready_ratio: 0.6,
            low_health_threshold: 0.4,
            magnitude_scale: 100.0,
        }
    }
}
