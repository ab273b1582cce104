use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use strum::{Display, EnumString};

use super::{AbilityId, ActorId, EffectInstanceId, Tick};
use crate::combat::ComboState;
use crate::config::CombatConfig;
use crate::stats::RawModifier;

/// Combat role. Drives selector weights and which side the actor fights on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Role {
    Tank,
    Healer,
    Damage,
    Hostile,
}

impl Role {
    pub const fn side(self) -> Side {
        match self {
            Role::Hostile => Side::Hostile,
            _ => Side::Party,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    Party,
    Hostile,
}

impl Side {
    pub const fn opponent(self) -> Side {
        match self {
            Side::Party => Side::Hostile,
            Side::Hostile => Side::Party,
        }
    }
}

/// Bounded floating-point pool (health or resource).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pool {
    pub current: f64,
    pub maximum: f64,
}

impl Pool {
    pub fn full(maximum: f64) -> Self {
        let maximum = maximum.max(0.0);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Current value as a fraction of the maximum (0 when the maximum is 0).
    pub fn ratio(&self) -> f64 {
        if self.maximum <= 0.0 {
            0.0
        } else {
            (self.current / self.maximum).clamp(0.0, 1.0)
        }
    }

    /// Removes up to `amount`, returning how much was actually removed.
    pub fn drain(&mut self, amount: f64) -> f64 {
        let removed = amount.max(0.0).min(self.current);
        self.current -= removed;
        removed
    }

    /// Adds up to `amount` without exceeding the maximum, returning the
    /// effective gain.
    pub fn fill(&mut self, amount: f64) -> f64 {
        let added = amount.max(0.0).min(self.maximum - self.current).max(0.0);
        self.current += added;
        added
    }

    /// Updates the maximum, clamping the current value to it.
    pub fn set_maximum(&mut self, maximum: f64) {
        self.maximum = maximum.max(0.0);
        self.current = self.current.min(self.maximum);
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }
}

/// Content description of an actor, instantiated into an [`Actor`] when a
/// session is assembled.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorTemplate {
    pub name: String,
    pub role: Role,
    /// Raw attribute keys; unknown keys are reported at resolve time.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attributes: BTreeMap<String, f64>,
    /// Equipped modifiers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<RawModifier>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: Vec<AbilityId>,
    /// Maximum combo points, for actors that use the combo resource.
    #[cfg_attr(feature = "serde", serde(default))]
    pub combo_max: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default = "default_ai_controlled"))]
    pub ai_controlled: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: bool,
}

#[cfg(feature = "serde")]
fn default_ai_controlled() -> bool {
    true
}

impl ActorTemplate {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
            attributes: BTreeMap::new(),
            modifiers: Vec::new(),
            abilities: Vec::new(),
            combo_max: None,
            ai_controlled: true,
            boss: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_modifier(mut self, modifier: RawModifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_ability(mut self, ability: impl Into<AbilityId>) -> Self {
        self.abilities.push(ability.into());
        self
    }

    pub fn with_combo(mut self, max: u32) -> Self {
        self.combo_max = Some(max);
        self
    }

    pub fn as_boss(mut self) -> Self {
        self.boss = true;
        self
    }

    pub fn manual(mut self) -> Self {
        self.ai_controlled = false;
        self
    }
}

/// Live participant in a combat session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
    pub base_attributes: BTreeMap<String, f64>,
    pub modifiers: Vec<RawModifier>,
    pub health: Pool,
    pub resource: Pool,
    /// Status effect instances currently attached to this actor.
    pub effects: ArrayVec<EffectInstanceId, { CombatConfig::MAX_STATUS_EFFECTS }>,
    pub combo: Option<ComboState>,
    pub alive: bool,
    pub ai_controlled: bool,
    pub is_boss: bool,
    pub abilities: Vec<AbilityId>,
    /// Tick at which each ability becomes usable again.
    pub cooldowns: BTreeMap<AbilityId, Tick>,
}

impl Actor {
    /// Instantiates a template. Pools start at zero and are sized by the
    /// session once stats are resolved.
    pub fn from_template(id: ActorId, template: &ActorTemplate) -> Self {
        Self {
            id,
            name: template.name.clone(),
            role: template.role,
            base_attributes: template.attributes.clone(),
            modifiers: template.modifiers.clone(),
            health: Pool::default(),
            resource: Pool::default(),
            effects: ArrayVec::new(),
            combo: template.combo_max.map(ComboState::new),
            alive: true,
            ai_controlled: template.ai_controlled,
            is_boss: template.boss,
            abilities: template.abilities.clone(),
            cooldowns: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.role.side()
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn knows(&self, ability: &AbilityId) -> bool {
        self.abilities.iter().any(|known| known == ability)
    }

    /// Ticks remaining before `ability` is usable at `now` (0 = ready).
    pub fn cooldown_remaining(&self, ability: &AbilityId, now: Tick) -> u64 {
        self.cooldowns
            .get(ability)
            .map(|ready_at| ready_at.since(now))
            .unwrap_or(0)
    }

    pub fn health_ratio(&self) -> f64 {
        self.health.ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_drain_and_fill_report_effective_amounts() {
        let mut pool = Pool::full(100.0);
        assert_eq!(pool.drain(30.0), 30.0);
        assert_eq!(pool.fill(50.0), 30.0);
        assert_eq!(pool.drain(500.0), 100.0);
        assert!(pool.is_empty());
    }

    #[test]
    fn cooldown_remaining_counts_down() {
        let template = ActorTemplate::new("Brakka", Role::Tank).with_ability("taunt");
        let mut actor = Actor::from_template(ActorId(0), &template);
        actor.cooldowns.insert(AbilityId::from("taunt"), Tick(10));
        assert_eq!(actor.cooldown_remaining(&"taunt".into(), Tick(7)), 3);
        assert_eq!(actor.cooldown_remaining(&"taunt".into(), Tick(10)), 0);
    }

    #[test]
    fn role_determines_side() {
        assert_eq!(Role::Healer.side(), Side::Party);
        assert_eq!(Role::Hostile.side(), Side::Hostile);
        assert_eq!(Side::Party.opponent(), Side::Hostile);
    }
}
