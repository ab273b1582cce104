//! Multi-phase boss state machine.
//!
//! A boss starts in phase 1. Each configured threshold (a health ratio) moves
//! it into the next phase once its health falls to or below that ratio. Phases
//! only advance; healing the boss back above a threshold does not revert the
//! phase. Every phase's entry ability fires at most once per session. Reaching
//! zero health moves the machine to the terminal [`BossPhase::Defeated`].

use std::fmt;

use super::SessionError;
use crate::state::{AbilityId, ActorId};

/// Phase the boss is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum BossPhase {
    /// 1-based phase number.
    Phase(u32),
    Defeated,
}

impl fmt::Display for BossPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BossPhase::Phase(n) => write!(f, "phase {n}"),
            BossPhase::Defeated => f.write_str("defeated"),
        }
    }
}

/// Threshold leading into the next phase.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhaseSpec {
    /// Health ratio in `(0, 1)` at or below which the phase begins.
    pub threshold: f64,
    /// Ability force-cast by the boss on entering the phase.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ability: Option<AbilityId>,
}

impl PhaseSpec {
    pub fn new(threshold: f64, ability: Option<AbilityId>) -> Self {
        Self { threshold, ability }
    }
}

/// One phase change produced by [`BossPhaseMachine::observe`].
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseChange {
    pub from: BossPhase,
    pub to: BossPhase,
    /// Entry ability to fire now; `None` if the phase has none, it already
    /// fired, or the boss died before it could act.
    pub fire: Option<AbilityId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossPhaseMachine {
    boss: ActorId,
    phases: Vec<PhaseSpec>,
    current: BossPhase,
    fired: Vec<bool>,
}

impl BossPhaseMachine {
    /// Validates that thresholds lie in `(0, 1)` and strictly descend.
    pub fn new(boss: ActorId, phases: Vec<PhaseSpec>) -> Result<Self, SessionError> {
        if phases
            .iter()
            .any(|phase| !(phase.threshold > 0.0 && phase.threshold < 1.0))
        {
            return Err(SessionError::InvalidBossPhases(
                "thresholds must lie strictly between 0 and 1",
            ));
        }
        if phases
            .windows(2)
            .any(|pair| pair[1].threshold >= pair[0].threshold)
        {
            return Err(SessionError::InvalidBossPhases(
                "thresholds must be strictly descending",
            ));
        }
        Ok(Self {
            boss,
            fired: vec![false; phases.len()],
            phases,
            current: BossPhase::Phase(1),
        })
    }

    pub fn boss(&self) -> ActorId {
        self.boss
    }

    pub fn current(&self) -> BossPhase {
        self.current
    }

    pub fn phases(&self) -> &[PhaseSpec] {
        &self.phases
    }

    /// True once the entry ability of the phase led into by `phases()[index]`
    /// has fired.
    pub fn has_fired(&self, index: usize) -> bool {
        self.fired.get(index).copied().unwrap_or(false)
    }

    /// Feeds the boss's health after a change and returns the resulting
    /// transitions, oldest first.
    ///
    /// Crossing several thresholds at once enters each phase in order. When
    /// the boss is dead, intermediate phases are entered without firing and
    /// the machine finishes in `Defeated`.
    pub fn observe(&mut self, health_ratio: f64, alive: bool) -> Vec<PhaseChange> {
        let mut changes = Vec::new();
        let dead = !alive || health_ratio <= 0.0;

        while let BossPhase::Phase(number) = self.current {
            let index = (number - 1) as usize;
            let Some(next) = self.phases.get(index) else {
                break;
            };
            if health_ratio > next.threshold {
                break;
            }
            let fire = if dead || self.fired[index] {
                None
            } else {
                self.fired[index] = true;
                next.ability.clone()
            };
            let to = BossPhase::Phase(number + 1);
            changes.push(PhaseChange {
                from: self.current,
                to,
                fire,
            });
            self.current = to;
        }

        if dead && self.current != BossPhase::Defeated {
            changes.push(PhaseChange {
                from: self.current,
                to: BossPhase::Defeated,
                fire: None,
            });
            self.current = BossPhase::Defeated;
        }

        for change in &changes {
            tracing::info!(boss = %self.boss, from = %change.from, to = %change.to, "boss phase transition");
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> BossPhaseMachine {
        BossPhaseMachine::new(
            ActorId(9),
            vec![
                PhaseSpec::new(0.5, Some("enrage".into())),
                PhaseSpec::new(0.2, Some("meteor".into())),
            ],
        )
        .unwrap()
    }

    #[test]
    fn enters_phase_once_and_fires_once() {
        let mut boss = machine();
        assert!(boss.observe(0.8, true).is_empty());

        let changes = boss.observe(0.5, true);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].to, BossPhase::Phase(2));
        assert_eq!(changes[0].fire, Some(AbilityId::from("enrage")));

        assert!(boss.observe(0.45, true).is_empty());
        // healing above the threshold does not revert
        assert!(boss.observe(0.9, true).is_empty());
        assert_eq!(boss.current(), BossPhase::Phase(2));
        assert!(boss.observe(0.4, true).is_empty());
    }

    #[test]
    fn multiple_thresholds_enter_in_order() {
        let mut boss = machine();
        let changes = boss.observe(0.1, true);
        let targets: Vec<_> = changes.iter().map(|c| c.to).collect();
        assert_eq!(targets, vec![BossPhase::Phase(2), BossPhase::Phase(3)]);
        assert!(changes.iter().all(|c| c.fire.is_some()));
    }

    #[test]
    fn death_skips_abilities_and_terminates() {
        let mut boss = machine();
        let changes = boss.observe(0.0, false);
        assert_eq!(changes.last().map(|c| c.to), Some(BossPhase::Defeated));
        assert!(changes.iter().all(|c| c.fire.is_none()));
        assert!(boss.observe(0.0, false).is_empty());
    }

    #[test]
    fn rejects_non_descending_thresholds() {
        let result = BossPhaseMachine::new(
            ActorId(1),
            vec![PhaseSpec::new(0.3, None), PhaseSpec::new(0.6, None)],
        );
        assert!(matches!(result, Err(SessionError::InvalidBossPhases(_))));
        assert!(BossPhaseMachine::new(ActorId(1), vec![PhaseSpec::new(1.0, None)]).is_err());
    }
}
