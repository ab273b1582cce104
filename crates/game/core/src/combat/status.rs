//! Status effect tracker.
//!
//! Owns every live [`StatusInstance`] in a session. Instances are keyed by
//! (target, source ability, kind): reapplying the same ability's effect
//! either refreshes the existing instance (new magnitude at least as strong)
//! or is rejected, so a target never carries two instances from one source.
//!
//! Iteration is in instance-id order, which is application order, so
//! periodic ticks resolve deterministically.

use std::collections::BTreeMap;

use crate::ability::EffectKind;
use crate::config::CombatConfig;
use crate::error::{CombatError, ErrorSeverity};
use crate::state::{AbilityId, ActorId, EffectInstanceId, Roster};
use crate::stats::StatModifier;

/// A live status effect on one actor.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusInstance {
    pub id: EffectInstanceId,
    pub target: ActorId,
    pub source: ActorId,
    pub ability: AbilityId,
    pub kind: EffectKind,
    /// Ticks left before expiry.
    pub remaining: u32,
    /// Health change per tick for periodic kinds; strength for the rest.
    pub magnitude: f64,
    pub modifiers: Vec<StatModifier>,
}

/// Request to attach an effect to `target`.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusApplication {
    pub target: ActorId,
    pub source: ActorId,
    pub ability: AbilityId,
    pub kind: EffectKind,
    pub duration: u32,
    pub magnitude: f64,
    pub modifiers: Vec<StatModifier>,
}

/// Successful result of [`StatusTracker::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(EffectInstanceId),
    /// Duration and magnitude replaced; the instance keeps its id.
    Refreshed(EffectInstanceId),
}

impl ApplyOutcome {
    pub fn instance(&self) -> EffectInstanceId {
        match self {
            ApplyOutcome::Applied(id) | ApplyOutcome::Refreshed(id) => *id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusError {
    /// A weaker reapplication; the existing instance is left untouched.
    #[error("refresh of {instance} rejected: offered {offered} is weaker than existing {existing}")]
    RefreshRejected {
        instance: EffectInstanceId,
        existing: f64,
        offered: f64,
    },

    #[error("target {0} is dead")]
    TargetDead(ActorId),

    #[error("target {0} not found")]
    UnknownTarget(ActorId),

    #[error("target {actor} already carries {max} status effects")]
    CapacityExceeded { actor: ActorId, max: usize },
}

impl CombatError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::RefreshRejected { .. } | Self::TargetDead(_) => ErrorSeverity::Recoverable,
            Self::UnknownTarget(_) | Self::CapacityExceeded { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RefreshRejected { .. } => "STATUS_REFRESH_REJECTED",
            Self::TargetDead(_) => "STATUS_TARGET_DEAD",
            Self::UnknownTarget(_) => "STATUS_UNKNOWN_TARGET",
            Self::CapacityExceeded { .. } => "STATUS_CAPACITY_EXCEEDED",
        }
    }
}

/// Result of advancing one instance during [`StatusTracker::tick`].
#[derive(Clone, Debug, PartialEq)]
pub enum PeriodicOutcome {
    Damage {
        instance: EffectInstanceId,
        source: ActorId,
        target: ActorId,
        ability: AbilityId,
        /// Health actually removed.
        amount: f64,
    },
    Healing {
        instance: EffectInstanceId,
        source: ActorId,
        target: ActorId,
        ability: AbilityId,
        /// Health actually restored (overheal excluded).
        amount: f64,
    },
    Expired {
        instance: EffectInstanceId,
        target: ActorId,
        ability: AbilityId,
        kind: EffectKind,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusTracker {
    instances: BTreeMap<EffectInstanceId, StatusInstance>,
    next_id: u32,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: EffectInstanceId) -> Option<&StatusInstance> {
        self.instances.get(&id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Every instance currently attached to `actor`, in application order.
    pub fn instances_on(&self, actor: ActorId) -> impl Iterator<Item = &StatusInstance> {
        self.instances
            .values()
            .filter(move |instance| instance.target == actor)
    }

    /// Stat modifiers contributed by buffs and debuffs on `actor`.
    pub fn modifiers_for(&self, actor: ActorId) -> Vec<StatModifier> {
        self.instances_on(actor)
            .flat_map(|instance| instance.modifiers.iter().copied())
            .collect()
    }

    /// Applies or refreshes an effect.
    pub fn apply(
        &mut self,
        roster: &mut Roster,
        application: StatusApplication,
    ) -> Result<ApplyOutcome, StatusError> {
        let target = roster
            .get_mut(application.target)
            .ok_or(StatusError::UnknownTarget(application.target))?;
        if !target.alive {
            return Err(StatusError::TargetDead(application.target));
        }

        if let Some(existing) = self.instances.values_mut().find(|instance| {
            instance.target == application.target
                && instance.ability == application.ability
                && instance.kind == application.kind
        }) {
            if application.magnitude < existing.magnitude {
                tracing::debug!(
                    instance = %existing.id,
                    existing = existing.magnitude,
                    offered = application.magnitude,
                    "weaker reapplication rejected"
                );
                return Err(StatusError::RefreshRejected {
                    instance: existing.id,
                    existing: existing.magnitude,
                    offered: application.magnitude,
                });
            }
            existing.remaining = application.duration;
            existing.magnitude = application.magnitude;
            existing.modifiers = application.modifiers;
            return Ok(ApplyOutcome::Refreshed(existing.id));
        }

        let id = EffectInstanceId(self.next_id);
        if target.effects.try_push(id).is_err() {
            return Err(StatusError::CapacityExceeded {
                actor: application.target,
                max: CombatConfig::MAX_STATUS_EFFECTS,
            });
        }
        self.next_id += 1;
        self.instances.insert(
            id,
            StatusInstance {
                id,
                target: application.target,
                source: application.source,
                ability: application.ability,
                kind: application.kind,
                remaining: application.duration,
                magnitude: application.magnitude,
                modifiers: application.modifiers,
            },
        );
        Ok(ApplyOutcome::Applied(id))
    }

    /// Advances every instance by `delta` ticks.
    ///
    /// Periodic kinds change their target's health by `magnitude` for each
    /// tick actually elapsed (never more than the remaining duration).
    /// Expired instances are removed. Instances on dead targets are dropped
    /// silently, and targets already at zero health take no further periodic
    /// effects so the caller can resolve their death.
    pub fn tick(&mut self, delta: u32, roster: &mut Roster) -> Vec<PeriodicOutcome> {
        let mut outcomes = Vec::new();
        let mut finished = Vec::new();

        for instance in self.instances.values_mut() {
            let Some(target) = roster.get_mut(instance.target) else {
                finished.push(instance.id);
                continue;
            };
            if !target.alive {
                finished.push(instance.id);
                continue;
            }

            let steps = delta.min(instance.remaining);
            if instance.kind.is_periodic() && steps > 0 && !target.health.is_empty() {
                let amount = instance.magnitude * f64::from(steps);
                match instance.kind {
                    EffectKind::DamageOverTime => outcomes.push(PeriodicOutcome::Damage {
                        instance: instance.id,
                        source: instance.source,
                        target: instance.target,
                        ability: instance.ability.clone(),
                        amount: target.health.drain(amount),
                    }),
                    EffectKind::HealOverTime => outcomes.push(PeriodicOutcome::Healing {
                        instance: instance.id,
                        source: instance.source,
                        target: instance.target,
                        ability: instance.ability.clone(),
                        amount: target.health.fill(amount),
                    }),
                    EffectKind::Buff | EffectKind::Debuff => {}
                }
            }

            instance.remaining -= steps;
            if instance.remaining == 0 {
                outcomes.push(PeriodicOutcome::Expired {
                    instance: instance.id,
                    target: instance.target,
                    ability: instance.ability.clone(),
                    kind: instance.kind,
                });
                finished.push(instance.id);
            }
        }

        for id in finished {
            self.detach(id, roster);
        }
        outcomes
    }

    /// Removes a single instance.
    pub fn remove(&mut self, id: EffectInstanceId, roster: &mut Roster) -> Option<StatusInstance> {
        self.detach(id, roster)
    }

    /// Drops every instance attached to `actor` (used when it dies).
    pub fn purge_target(&mut self, actor: ActorId, roster: &mut Roster) -> usize {
        let ids: Vec<_> = self.instances_on(actor).map(|instance| instance.id).collect();
        let count = ids.len();
        for id in ids {
            self.detach(id, roster);
        }
        count
    }

    fn detach(&mut self, id: EffectInstanceId, roster: &mut Roster) -> Option<StatusInstance> {
        let instance = self.instances.remove(&id)?;
        if let Some(actor) = roster.get_mut(instance.target) {
            actor.effects.retain(|held| *held != id);
        }
        Some(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ActorTemplate, Pool, Role};

    fn setup() -> (Roster, ActorId, ActorId) {
        let mut roster = Roster::new();
        let caster = roster.spawn(&ActorTemplate::new("Warlock", Role::Damage));
        let target = roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile));
        for actor in roster.iter_mut() {
            actor.health = Pool::full(100.0);
        }
        (roster, caster, target)
    }

    fn dot(caster: ActorId, target: ActorId, duration: u32, magnitude: f64) -> StatusApplication {
        StatusApplication {
            target,
            source: caster,
            ability: AbilityId::from("corruption"),
            kind: EffectKind::DamageOverTime,
            duration,
            magnitude,
            modifiers: Vec::new(),
        }
    }

    #[test]
    fn stronger_reapplication_refreshes_in_place() {
        let (mut roster, caster, target) = setup();
        let mut tracker = StatusTracker::new();
        let first = tracker.apply(&mut roster, dot(caster, target, 3, 5.0)).unwrap();
        let second = tracker.apply(&mut roster, dot(caster, target, 6, 5.0)).unwrap();

        assert!(matches!(first, ApplyOutcome::Applied(_)));
        assert_eq!(second, ApplyOutcome::Refreshed(first.instance()));
        assert_eq!(tracker.len(), 1);
        let instance = tracker.get(first.instance()).unwrap();
        assert_eq!(instance.remaining, 6);
    }

    #[test]
    fn weaker_reapplication_is_rejected_and_untouched() {
        let (mut roster, caster, target) = setup();
        let mut tracker = StatusTracker::new();
        let first = tracker.apply(&mut roster, dot(caster, target, 3, 8.0)).unwrap();
        let error = tracker
            .apply(&mut roster, dot(caster, target, 10, 4.0))
            .unwrap_err();

        assert!(matches!(error, StatusError::RefreshRejected { .. }));
        assert_eq!(error.severity(), ErrorSeverity::Recoverable);
        let instance = tracker.get(first.instance()).unwrap();
        assert_eq!(instance.remaining, 3);
        assert_eq!(instance.magnitude, 8.0);
    }

    #[test]
    fn different_kinds_from_same_ability_coexist() {
        let (mut roster, caster, target) = setup();
        let mut tracker = StatusTracker::new();
        tracker.apply(&mut roster, dot(caster, target, 3, 5.0)).unwrap();
        let mut debuff = dot(caster, target, 3, 1.0);
        debuff.kind = EffectKind::Debuff;
        tracker.apply(&mut roster, debuff).unwrap();
        assert_eq!(tracker.instances_on(target).count(), 2);
        assert_eq!(roster.get(target).unwrap().effects.len(), 2);
    }

    #[test]
    fn tick_applies_damage_and_expires() {
        let (mut roster, caster, target) = setup();
        let mut tracker = StatusTracker::new();
        tracker.apply(&mut roster, dot(caster, target, 2, 10.0)).unwrap();

        let outcomes = tracker.tick(1, &mut roster);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(roster.get(target).unwrap().health.current, 90.0);

        let outcomes = tracker.tick(5, &mut roster);
        assert!(matches!(outcomes[0], PeriodicOutcome::Damage { amount, .. } if amount == 10.0));
        assert!(matches!(outcomes[1], PeriodicOutcome::Expired { .. }));
        assert!(tracker.is_empty());
        assert!(roster.get(target).unwrap().effects.is_empty());
    }

    #[test]
    fn heal_over_time_excludes_overheal() {
        let (mut roster, caster, _) = setup();
        roster.get_mut(caster).unwrap().health.current = 95.0;
        let mut tracker = StatusTracker::new();
        let mut hot = dot(caster, caster, 3, 10.0);
        hot.kind = EffectKind::HealOverTime;
        tracker.apply(&mut roster, hot).unwrap();

        let outcomes = tracker.tick(1, &mut roster);
        assert!(matches!(outcomes[0], PeriodicOutcome::Healing { amount, .. } if amount == 5.0));
    }

    #[test]
    fn dead_targets_reject_and_purge() {
        let (mut roster, caster, target) = setup();
        let mut tracker = StatusTracker::new();
        tracker.apply(&mut roster, dot(caster, target, 5, 1.0)).unwrap();
        assert_eq!(tracker.purge_target(target, &mut roster), 1);

        roster.get_mut(target).unwrap().alive = false;
        let error = tracker
            .apply(&mut roster, dot(caster, target, 5, 1.0))
            .unwrap_err();
        assert_eq!(error, StatusError::TargetDead(target));
    }
}
