//! Human-readable event lines and the JSON summary.

use std::collections::BTreeMap;

use serde::Serialize;

use combat_core::{
    ActorId, CombatEvent, CombatSession, EncounterSummary, EventKind, Role, SessionState,
};

/// Actor display names captured from a session snapshot.
#[derive(Debug, Clone, Default)]
pub struct Names(BTreeMap<ActorId, String>);

impl Names {
    pub fn from_session(session: &CombatSession) -> Self {
        Self(
            session
                .roster()
                .iter()
                .map(|actor| (actor.id, actor.name.clone()))
                .collect(),
        )
    }

    pub fn get(&self, id: ActorId) -> String {
        match self.0.get(&id) {
            Some(name) => format!("{name} {id}"),
            None => id.to_string(),
        }
    }

    fn opt(&self, id: Option<ActorId>) -> String {
        id.map(|id| self.get(id)).unwrap_or_else(|| "-".to_owned())
    }
}

/// One line per event, `None` for bookkeeping events not worth printing.
pub fn describe(event: &CombatEvent, names: &Names) -> Option<String> {
    let source = names.opt(event.source);
    let target = names.opt(event.target);

    let body = match &event.kind {
        EventKind::EncounterStarted { party, hostiles } => {
            format!("encounter started: {party} party vs {hostiles} hostiles")
        }
        EventKind::ActionCommitted { ability } => format!("{source} uses {ability} on {target}"),
        EventKind::ActionRejected { ability, reason } => {
            format!("{source} cannot use {ability}: {reason}")
        }
        EventKind::DamageDealt {
            ability,
            amount,
            critical,
            periodic,
        } => format!(
            "{source} hits {target} with {ability} for {amount:.1}{}{}",
            if *critical { " (critical)" } else { "" },
            if *periodic { " (periodic)" } else { "" },
        ),
        EventKind::HealingApplied {
            ability,
            amount,
            overheal,
            critical,
            ..
        } => format!(
            "{source} heals {target} with {ability} for {amount:.1} ({overheal:.1} over){}",
            if *critical { " (critical)" } else { "" },
        ),
        EventKind::ResourceRestored { ability, amount } => {
            format!("{ability} restores {amount:.1} resource to {target}")
        }
        EventKind::EffectApplied {
            ability,
            effect,
            duration,
            ..
        } => format!("{target} gains {effect} from {ability} for {duration} ticks"),
        EventKind::EffectRefreshed {
            ability, duration, ..
        } => format!("{ability} on {target} refreshed to {duration} ticks"),
        EventKind::EffectRejected { ability, error, .. } => {
            format!("{ability} on {target} rejected: {error}")
        }
        EventKind::EffectExpired { ability, effect, .. } => {
            format!("{effect} from {ability} fades from {target}")
        }
        EventKind::ComboChanged { count, max } => format!("{source} combo {count}/{max}"),
        EventKind::ThreatChanged { .. } => return None,
        EventKind::Taunted { duration, .. } => {
            format!("{source} taunts {target} for {duration} ticks")
        }
        EventKind::TargetChanged { current, .. } => {
            format!("{source} turns to {}", names.opt(*current))
        }
        EventKind::ActorDied => format!("{target} dies"),
        EventKind::ActorSummoned { template } => {
            format!("{source} summons {target} ({template})")
        }
        EventKind::PhaseTransition { from, to, ability } => match ability {
            Some(ability) => format!("{source} moves from {from} to {to} and casts {ability}"),
            None => format!("{source} moves from {from} to {to}"),
        },
        EventKind::DataIntegrity { warning } => format!("content warning: {warning}"),
        EventKind::EncounterEnded { summary } => {
            format!(
                "encounter ended: {} after {} ticks",
                summary.outcome, summary.duration_ticks
            )
        }
    };

    Some(format!("[t{:04}] {body}", event.tick.0))
}

/// Final report printed with `--format json`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub encounter: String,
    pub seed: u64,
    pub outcome: SessionState,
    pub duration_ticks: u64,
    pub actors: Vec<ActorReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActorReport {
    pub id: ActorId,
    pub name: String,
    pub role: Role,
    pub alive: bool,
    pub health: f64,
    pub damage_done: f64,
    pub healing_done: f64,
}

impl SummaryReport {
    pub fn new(encounter: &str, seed: u64, summary: &EncounterSummary, session: &CombatSession) -> Self {
        let actors = session
            .roster()
            .iter()
            .map(|actor| ActorReport {
                id: actor.id,
                name: actor.name.clone(),
                role: actor.role,
                alive: actor.alive,
                health: actor.health.current,
                damage_done: summary.damage_by_actor.get(&actor.id).copied().unwrap_or(0.0),
                healing_done: summary.healing_by_actor.get(&actor.id).copied().unwrap_or(0.0),
            })
            .collect();

        Self {
            encounter: encounter.to_owned(),
            seed,
            outcome: summary.outcome,
            duration_ticks: summary.duration_ticks,
            actors,
        }
    }

    /// Plain-text table for the end of a text run.
    pub fn to_text(&self) -> String {
        let mut lines = vec![format!(
            "{}: {} after {} ticks (seed {})",
            self.encounter, self.outcome, self.duration_ticks, self.seed
        )];
        for actor in &self.actors {
            lines.push(format!(
                "  {:<16} {:<8} {:>7.1} hp  {:>8.1} dmg  {:>8.1} heal{}",
                actor.name,
                actor.role.to_string(),
                actor.health,
                actor.damage_done,
                actor.healing_done,
                if actor.alive { "" } else { "  (dead)" },
            ));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{AbilityCatalog, ActorTemplate, CombatConfig, Roster, Tick};

    fn session() -> CombatSession {
        let mut roster = Roster::new();
        roster.spawn(&ActorTemplate::new("Warden", Role::Tank).with_attribute("stamina", 10.0));
        roster.spawn(&ActorTemplate::new("Ogre", Role::Hostile).with_attribute("stamina", 10.0));
        CombatSession::new(roster, AbilityCatalog::new(), CombatConfig::default())
    }

    #[test]
    fn describes_damage_with_names() {
        let names = Names::from_session(&session());
        let event = CombatEvent::new(
            Tick(3),
            EventKind::DamageDealt {
                ability: "strike".into(),
                amount: 12.5,
                critical: true,
                periodic: false,
            },
        )
        .from_actor(ActorId(0))
        .on(ActorId(1));

        assert_eq!(
            describe(&event, &names).as_deref(),
            Some("[t0003] Warden #0 hits Ogre #1 with strike for 12.5 (critical)")
        );
    }

    #[test]
    fn threat_bookkeeping_is_skipped() {
        let names = Names::default();
        let event = CombatEvent::new(Tick(1), EventKind::ThreatChanged { delta: 1.0, total: 1.0 });
        assert!(describe(&event, &names).is_none());
    }

    #[test]
    fn summary_serializes_to_json() {
        let session = session();
        let report = SummaryReport::new("test", 9, &session.summary(), &session);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "idle");
        assert_eq!(json["actors"][0]["name"], "Warden");
        assert_eq!(json["actors"][1]["role"], "hostile");
    }
}
