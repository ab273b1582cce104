//! Damage and healing formulas.

use crate::ability::DamageSchool;
use crate::env::RngOracle;
use crate::stats::StatBlock;

/// Scaling bonus granted by power: every 100 power doubles base values.
fn power_factor(power: f64) -> f64 {
    1.0 + power.max(0.0) / 100.0
}

fn school_power(stats: &StatBlock, school: DamageSchool) -> f64 {
    match school {
        DamageSchool::Physical => stats.attack_power,
        DamageSchool::Magic => stats.spell_power,
    }
}

/// Outgoing damage before the defender's mitigation.
///
/// # Formula
///
/// ```text
/// raw = amount × (1 + power/100) × combo_multiplier × damage_done × (crit ? crit_multiplier : 1)
/// ```
pub fn outgoing_damage(
    attacker: &StatBlock,
    amount: f64,
    school: DamageSchool,
    combo_multiplier: f64,
    critical: Option<f64>,
) -> f64 {
    let raw = amount.max(0.0)
        * power_factor(school_power(attacker, school))
        * combo_multiplier
        * attacker.damage_done;
    raw * critical.unwrap_or(1.0)
}

/// Damage after the defender's armor-derived reduction.
pub fn mitigate(defender: &StatBlock, raw: f64) -> f64 {
    (raw * (1.0 - defender.damage_reduction)).max(0.0)
}

/// Outgoing healing:
/// `amount × (1 + spell_power/100) × combo_multiplier × healing_done × crit`.
pub fn outgoing_healing(
    healer: &StatBlock,
    amount: f64,
    combo_multiplier: f64,
    critical: Option<f64>,
) -> f64 {
    amount.max(0.0)
        * power_factor(healer.spell_power)
        * combo_multiplier
        * healer.healing_done
        * critical.unwrap_or(1.0)
}

/// Per-tick magnitude of a damage-over-time effect, snapshotted at apply time.
pub fn periodic_damage(
    caster: &StatBlock,
    magnitude: f64,
    school: DamageSchool,
    combo_multiplier: f64,
) -> f64 {
    magnitude.max(0.0)
        * power_factor(school_power(caster, school))
        * combo_multiplier
        * caster.damage_done
}

/// Per-tick magnitude of a heal-over-time effect, snapshotted at apply time.
pub fn periodic_healing(caster: &StatBlock, magnitude: f64, combo_multiplier: f64) -> f64 {
    magnitude.max(0.0) * power_factor(caster.spell_power) * combo_multiplier * caster.healing_done
}

/// Rolls a critical strike; returns the multiplier to apply on success.
pub fn roll_critical(
    rng: &(impl RngOracle + ?Sized),
    seed: u64,
    chance: f64,
    multiplier: f64,
) -> Option<f64> {
    if chance <= 0.0 {
        return None;
    }
    let roll = f64::from(rng.roll_d100(seed));
    (roll <= chance * 100.0).then_some(multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::env::PcgRng;
    use crate::state::{Actor, ActorId, ActorTemplate, Role};
    use crate::stats::resolve;

    fn stats(template: ActorTemplate) -> StatBlock {
        let actor = Actor::from_template(ActorId(0), &template);
        resolve(&actor, &[], &CombatConfig::default()).stats
    }

    #[test]
    fn physical_damage_scales_with_attack_power() {
        let attacker = stats(ActorTemplate::new("A", Role::Damage).with_attribute("strength", 50.0));
        // 100 attack power doubles the base amount
        assert_eq!(outgoing_damage(&attacker, 10.0, DamageSchool::Physical, 1.0, None), 20.0);
        assert_eq!(outgoing_damage(&attacker, 10.0, DamageSchool::Magic, 1.0, None), 10.0);
        assert_eq!(
            outgoing_damage(&attacker, 10.0, DamageSchool::Physical, 1.5, Some(2.0)),
            60.0
        );
    }

    #[test]
    fn combo_multiplier_scales_healing() {
        let healer = stats(ActorTemplate::new("H", Role::Healer));
        assert_eq!(outgoing_healing(&healer, 10.0, 1.0, None), 10.0);
        assert_eq!(outgoing_healing(&healer, 10.0, 2.0, None), 20.0);
        assert_eq!(periodic_healing(&healer, 4.0, 1.5), 6.0);
        assert_eq!(periodic_damage(&healer, 4.0, DamageSchool::Physical, 1.5), 6.0);
    }

    #[test]
    fn armor_mitigates() {
        let defender = stats(ActorTemplate::new("D", Role::Tank).with_attribute("armor_rating", 200.0));
        assert_eq!(mitigate(&defender, 100.0), 50.0);
    }

    #[test]
    fn zero_crit_chance_never_crits() {
        let rng = PcgRng;
        assert!((0..100).all(|seed| roll_critical(&rng, seed, 0.0, 2.0).is_none()));
    }

    #[test]
    fn crit_roll_is_deterministic() {
        let rng = PcgRng;
        for seed in 0..50 {
            assert_eq!(roll_critical(&rng, seed, 0.3, 1.5), roll_critical(&rng, seed, 0.3, 1.5));
        }
    }
}
