//! Combo resource: builders accumulate points, finishers spend all of them.

use crate::ability::AbilityDefinition;

/// Per-actor combo counter bounded by `[0, max]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboState {
    count: u32,
    max: u32,
}

impl ComboState {
    pub fn new(max: u32) -> Self {
        Self { count: 0, max }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    /// Fill level in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            f64::from(self.count) / f64::from(self.max)
        }
    }

    /// Adds points up to the cap, returning how many were actually gained.
    pub fn add(&mut self, points: u32) -> u32 {
        let next = self.count.saturating_add(points).min(self.max);
        let gained = next - self.count;
        self.count = next;
        gained
    }

    /// Returns the current count and resets it to zero.
    pub fn consume(&mut self) -> u32 {
        std::mem::take(&mut self.count)
    }
}

/// What using an ability did to the caster's combo state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComboOutcome {
    /// The ability neither builds nor finishes, or the actor has no combo.
    Unchanged,
    Built { gained: u32, count: u32 },
    /// A finisher consumed `points`; its effects scale by `multiplier`.
    Consumed { points: u32, multiplier: f64 },
}

impl ComboOutcome {
    /// Damage multiplier to apply to the ability's effects.
    pub fn multiplier(&self) -> f64 {
        match self {
            ComboOutcome::Consumed { multiplier, .. } => *multiplier,
            _ => 1.0,
        }
    }
}

/// Updates `combo` for a committed use of `ability`.
///
/// Finishers always reset the count to zero, whatever happens to their
/// effects afterwards; builders add their generation amount, capped at the
/// maximum.
pub fn on_ability_used(
    combo: Option<&mut ComboState>,
    ability: &AbilityDefinition,
    per_point_bonus: f64,
) -> ComboOutcome {
    let Some(combo) = combo else {
        return ComboOutcome::Unchanged;
    };

    if ability.is_finisher() {
        let points = combo.consume();
        ComboOutcome::Consumed {
            points,
            multiplier: 1.0 + f64::from(points) * per_point_bonus,
        }
    } else if ability.is_builder() {
        let gained = combo.add(ability.combo_generation);
        ComboOutcome::Built {
            gained,
            count: combo.count(),
        }
    } else {
        ComboOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityTags, TargetFilter};

    fn builder(points: u32) -> AbilityDefinition {
        AbilityDefinition::new("jab", TargetFilter::Enemy)
            .with_tags(AbilityTags::BUILDER | AbilityTags::DAMAGE)
            .with_combo_generation(points)
    }

    fn finisher() -> AbilityDefinition {
        AbilityDefinition::new("eviscerate", TargetFilter::Enemy)
            .with_tags(AbilityTags::FINISHER | AbilityTags::DAMAGE)
    }

    #[test]
    fn builders_cap_at_max() {
        let mut combo = ComboState::new(5);
        for _ in 0..3 {
            on_ability_used(Some(&mut combo), &builder(2), 0.2);
        }
        assert_eq!(combo.count(), 5);
        let outcome = on_ability_used(Some(&mut combo), &builder(2), 0.2);
        assert_eq!(outcome, ComboOutcome::Built { gained: 0, count: 5 });
    }

    #[test]
    fn finisher_scales_and_resets() {
        let mut combo = ComboState::new(5);
        on_ability_used(Some(&mut combo), &builder(3), 0.2);
        let outcome = on_ability_used(Some(&mut combo), &finisher(), 0.2);
        match outcome {
            ComboOutcome::Consumed { points, multiplier } => {
                assert_eq!(points, 3);
                assert!((multiplier - 1.6).abs() < 1e-12);
            }
            other => panic!("expected consumption, got {other:?}"),
        }
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn finisher_with_zero_points_is_base_damage() {
        let mut combo = ComboState::new(5);
        let outcome = on_ability_used(Some(&mut combo), &finisher(), 0.2);
        assert_eq!(outcome.multiplier(), 1.0);
        assert_eq!(combo.count(), 0);
    }

    #[test]
    fn actors_without_combo_are_unaffected() {
        assert_eq!(on_ability_used(None, &finisher(), 0.2), ComboOutcome::Unchanged);
    }
}
