//! Bonus application system following the layered stack architecture.
//!
//! This module implements the bonus calculation stack:
//! Flat → %Inc → More → Less → Clamp
//!
//! Every layer of the stat resolver uses this same calculation order, which
//! makes the result independent of the order modifiers were equipped or applied.

/// A single bonus that can be applied to a stat value.
///
/// Bonuses are categorized by their application type:
/// - **Flat**: Additive bonuses applied first (e.g., +5 stamina from equipment)
/// - **Increased**: Percentage increases, summed then multiplied (e.g., +20%)
/// - **More**: Sequential multipliers applied individually (e.g., ×1.5)
/// - **Less**: Sequential reductions applied individually (e.g., ×0.9)
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bonus {
    /// Flat additive bonus (applied first)
    Flat(f64),

    /// Percentage increase (summed with other %Inc, then multiplied)
    /// Stored as percentage points (e.g., 20.0 = +20%)
    Increased(f64),

    /// Multiplicative "more" modifier (applied sequentially)
    /// Stored as percentage points (e.g., 50.0 = ×1.5)
    More(f64),

    /// Multiplicative "less" modifier (applied sequentially)
    /// Stored as percentage points (e.g., 10.0 = ×0.9)
    Less(f64),
}

impl Bonus {
    pub fn flat(value: f64) -> Self {
        Bonus::Flat(value)
    }

    pub fn increased(percent: f64) -> Self {
        Bonus::Increased(percent)
    }

    pub fn more(percent: f64) -> Self {
        Bonus::More(percent)
    }

    pub fn less(percent: f64) -> Self {
        Bonus::Less(percent)
    }

    /// True for bonuses applied in the additive phase.
    pub fn is_additive(&self) -> bool {
        matches!(self, Bonus::Flat(_) | Bonus::Increased(_))
    }
}

/// A collection of bonuses that will be applied in the correct order.
///
/// The stack guarantees the following application order:
/// 1. Flat bonuses (summed)
/// 2. Increased bonuses (summed, then multiplied)
/// 3. More multipliers (applied sequentially)
/// 4. Less multipliers (applied sequentially)
/// 5. Clamp to bounds
///
/// # Example
/// ```
/// # use combat_core::stats::bonus::{Bonus, BonusStack};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::flat(5.0));          // +5
/// stack.add(Bonus::increased(20.0));    // +20%
/// stack.add(Bonus::increased(15.0));    // +15% (summed)
/// stack.add(Bonus::more(50.0));         // ×1.5
/// stack.add(Bonus::less(10.0));         // ×0.9
///
/// let result = stack.apply(10.0, 0.0, 100.0);
/// // = (10 + 5) × 1.35 × 1.5 × 0.9
/// assert!((result - 27.3375).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusStack {
    bonuses: Vec<Bonus>,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            bonuses: Vec::new(),
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        self.bonuses.push(bonus);
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        self.bonuses.extend(bonuses);
    }

    /// Apply all bonuses to a base value with clamping.
    ///
    /// # Formula
    /// ```text
    /// result = clamp((base + flat_sum) × (1 + inc_sum/100) × Π(1 + more/100) × Π(1 - less/100), min, max)
    /// ```
    pub fn apply(&self, base: f64, min: f64, max: f64) -> f64 {
        let flat_sum: f64 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Flat(v) => Some(*v),
                _ => None,
            })
            .sum();

        let inc_sum: f64 = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Increased(p) => Some(*p),
                _ => None,
            })
            .sum();

        let after_inc = (base + flat_sum) * (100.0 + inc_sum) / 100.0;

        let after_more = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::More(p) => Some(*p),
                _ => None,
            })
            .fold(after_inc, |acc, more| acc * (100.0 + more) / 100.0);

        let after_less = self
            .bonuses
            .iter()
            .filter_map(|b| match b {
                Bonus::Less(p) => Some(*p),
                _ => None,
            })
            .fold(after_more, |acc, less| acc * (100.0 - less) / 100.0);

        after_less.clamp(min, max)
    }

    /// Apply bonuses with a lower bound of zero and no upper bound.
    pub fn apply_non_negative(&self, base: f64) -> f64 {
        self.apply(base, 0.0, f64::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.bonuses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bonuses.len()
    }
}

impl FromIterator<Bonus> for BonusStack {
    fn from_iter<T: IntoIterator<Item = Bonus>>(iter: T) -> Self {
        Self {
            bonuses: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stack() {
        let stack = BonusStack::new();
        assert_eq!(stack.apply(10.0, 0.0, 100.0), 10.0);
    }

    #[test]
    fn test_additive_applies_before_multiplicative() {
        let stack: BonusStack = [Bonus::more(100.0), Bonus::flat(10.0)].into_iter().collect();
        // (10 + 10) × 2, never 10 × 2 + 10
        assert_eq!(stack.apply_non_negative(10.0), 40.0);
    }

    #[test]
    fn test_order_independent() {
        let a: BonusStack = [
            Bonus::less(10.0),
            Bonus::increased(20.0),
            Bonus::flat(3.0),
            Bonus::more(50.0),
        ]
        .into_iter()
        .collect();
        let b: BonusStack = [
            Bonus::flat(3.0),
            Bonus::more(50.0),
            Bonus::increased(20.0),
            Bonus::less(10.0),
        ]
        .into_iter()
        .collect();
        assert!((a.apply_non_negative(7.0) - b.apply_non_negative(7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_clamp() {
        let stack: BonusStack = [Bonus::flat(-50.0)].into_iter().collect();
        assert_eq!(stack.apply_non_negative(10.0), 0.0);
    }
}
