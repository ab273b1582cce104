//! Utility scoring for ability selection.
//!
//! Every candidate is scored with the same [`ScoreBreakdown`] so decisions
//! stay transparent and debuggable.
//!
//! ## Score Components
//!
//! - **offense**: damage and interrupt abilities, scaled down while an ally
//!   needs healing (heavily so for healers)
//! - **healing**: heal abilities, dominant while an ally is below the
//!   low-health threshold
//! - **threat**: taunts, when the tank has lost the primary hostile
//! - **combo**: finishers near full combo, builders otherwise
//!
//! ## Score Formula
//!
//! ```text
//! total = offense + healing + threat + combo
//! ```
//!
//! Each term already carries its role weight; see [`terms`].

pub mod terms;

use std::cmp::Ordering;

use combat_core::{AbilityId, ActorId};

/// Per-term contributions to a candidate's score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub offense: f64,
    pub healing: f64,
    pub threat: f64,
    pub combo: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.offense + self.healing + self.threat + self.combo
    }
}

/// A legal option together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub ability: AbilityId,
    /// Default target the ability would be aimed at.
    pub target: ActorId,
    /// Tie-break rank from the ability definition; lower wins.
    pub priority: u32,
    pub score: ScoreBreakdown,
}

impl Candidate {
    pub fn value(&self) -> f64 {
        self.score.total()
    }

    /// Ordering where the preferred candidate compares as `Less`: higher
    /// score, then lower priority, then lower ability id.
    pub fn preference(&self, other: &Self) -> Ordering {
        other
            .value()
            .total_cmp(&self.value())
            .then(self.priority.cmp(&other.priority))
            .then_with(|| self.ability.cmp(&other.ability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(ability: &str, priority: u32, offense: f64) -> Candidate {
        Candidate {
            ability: ability.into(),
            target: ActorId(0),
            priority,
            score: ScoreBreakdown {
                offense,
                ..ScoreBreakdown::default()
            },
        }
    }

    #[test]
    fn test_total_sums_terms() {
        let score = ScoreBreakdown {
            offense: 0.5,
            healing: 2.0,
            threat: 0.0,
            combo: 0.25,
        };
        assert_eq!(score.total(), 2.75);
    }

    #[test]
    fn test_preference_breaks_ties() {
        let mut candidates = vec![
            candidate("zap", 1, 1.0),
            candidate("bolt", 1, 1.0),
            candidate("smite", 0, 1.0),
            candidate("weak", 0, 0.5),
        ];
        candidates.sort_by(Candidate::preference);
        let order: Vec<_> = candidates.iter().map(|c| c.ability.as_str()).collect();
        assert_eq!(order, vec!["smite", "bolt", "zap", "weak"]);
    }
}
