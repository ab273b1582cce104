//! Rating → percentage conversion with diminishing returns.

/// Converts a raw rating into a fraction in `[0, 1)`.
///
/// Uses `rating / (rating + k)`: every additional point of rating is worth
/// less than the previous one, and the result never reaches 1. Negative
/// ratings (e.g. from debuffs) clamp to zero, as do non-positive `k`.
pub fn rating_to_percent(rating: f64, k: f64) -> f64 {
    if !rating.is_finite() || rating <= 0.0 || k <= 0.0 {
        return 0.0;
    }
    rating / (rating + k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_below_one() {
        for rating in [0.0, 1.0, 50.0, 1_000.0, 1.0e9] {
            let pct = rating_to_percent(rating, 100.0);
            assert!((0.0..1.0).contains(&pct), "{rating} -> {pct}");
        }
    }

    #[test]
    fn doubling_rating_less_than_doubles_percent() {
        for rating in [1.0, 25.0, 100.0, 400.0] {
            let single = rating_to_percent(rating, 100.0);
            let double = rating_to_percent(rating * 2.0, 100.0);
            assert!(double > single);
            assert!(double < single * 2.0);
        }
    }

    #[test]
    fn rating_equal_to_k_is_half() {
        assert!((rating_to_percent(100.0, 100.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn negative_rating_clamps_to_zero() {
        assert_eq!(rating_to_percent(-40.0, 100.0), 0.0);
    }
}
