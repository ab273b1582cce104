//! Threat (aggro) table driving hostile targeting.
//!
//! One row per hostile, holding a non-negative threat value for every
//! friendly it is engaged with. Entries remember the order in which they were
//! first recorded; when two friendlies hold the same threat the earlier entry
//! wins, which keeps targeting deterministic.

use std::collections::BTreeMap;

use crate::config::ThreatConfig;
use crate::state::{ActorId, Roster, Side, Tick};

/// Kind of threat-generating event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreatKind {
    Damage,
    Healing,
}

/// A change to one threat entry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatChange {
    pub hostile: ActorId,
    pub friendly: ActorId,
    pub delta: f64,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ThreatEntry {
    friendly: ActorId,
    value: f64,
    seq: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct TauntLock {
    taunter: ActorId,
    until: Tick,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct ThreatRow {
    /// Kept in first-recorded order.
    entries: Vec<ThreatEntry>,
    lock: Option<TauntLock>,
}

impl ThreatRow {
    fn entry_mut(&mut self, friendly: ActorId, next_seq: &mut u64) -> &mut ThreatEntry {
        let index = match self.entries.iter().position(|e| e.friendly == friendly) {
            Some(index) => index,
            None => {
                self.entries.push(ThreatEntry {
                    friendly,
                    value: 0.0,
                    seq: *next_seq,
                });
                *next_seq += 1;
                self.entries.len() - 1
            }
        };
        &mut self.entries[index]
    }

    fn highest(&self, roster: &Roster) -> Option<&ThreatEntry> {
        self.entries
            .iter()
            .filter(|entry| roster.is_alive(entry.friendly))
            .fold(None, |best: Option<&ThreatEntry>, entry| match best {
                Some(current) if current.value >= entry.value => Some(current),
                _ => Some(entry),
            })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreatTable {
    rows: BTreeMap<ActorId, ThreatRow>,
    next_seq: u64,
    config: ThreatConfig,
}

impl ThreatTable {
    pub fn new(config: ThreatConfig) -> Self {
        Self {
            rows: BTreeMap::new(),
            next_seq: 0,
            config,
        }
    }

    /// Records a zero-threat entry so `hostile` counts as engaged with `friendly`.
    pub fn engage(&mut self, hostile: ActorId, friendly: ActorId) {
        let row = self.rows.entry(hostile).or_default();
        row.entry_mut(friendly, &mut self.next_seq);
    }

    /// True if any hostile holds an entry for `friendly`.
    pub fn is_tracked(&self, friendly: ActorId) -> bool {
        self.rows
            .values()
            .any(|row| row.entries.iter().any(|entry| entry.friendly == friendly))
    }

    pub fn threat_of(&self, hostile: ActorId, friendly: ActorId) -> f64 {
        self.rows
            .get(&hostile)
            .and_then(|row| row.entries.iter().find(|e| e.friendly == friendly))
            .map(|entry| entry.value)
            .unwrap_or(0.0)
    }

    /// Feeds a damage or healing event into the table.
    ///
    /// Damage dealt by a party actor to a hostile adds
    /// `magnitude × damage_coefficient` to that hostile's entry for the
    /// attacker. Healing by a party actor on a tracked friendly adds
    /// `magnitude × heal_coefficient` for the healer on every hostile engaged
    /// with the healed actor. Anything else generates no threat, including
    /// late periodic ticks from a source that has already died.
    pub fn record(
        &mut self,
        source: ActorId,
        target: ActorId,
        kind: ThreatKind,
        magnitude: f64,
        roster: &Roster,
    ) -> Vec<ThreatChange> {
        let magnitude = magnitude.max(0.0);
        let (Some(source_actor), Some(target_actor)) = (roster.get(source), roster.get(target))
        else {
            return Vec::new();
        };
        if source_actor.side() != Side::Party || !source_actor.alive || magnitude == 0.0 {
            return Vec::new();
        }

        match kind {
            ThreatKind::Damage if target_actor.side() == Side::Hostile => {
                let delta = magnitude * self.config.damage_coefficient;
                let row = self.rows.entry(target).or_default();
                let entry = row.entry_mut(source, &mut self.next_seq);
                entry.value += delta;
                vec![ThreatChange {
                    hostile: target,
                    friendly: source,
                    delta,
                    total: entry.value,
                }]
            }
            ThreatKind::Healing if target_actor.side() == Side::Party => {
                let delta = magnitude * self.config.heal_coefficient;
                let mut changes = Vec::new();
                for (hostile, row) in self.rows.iter_mut() {
                    if !row.entries.iter().any(|entry| entry.friendly == target) {
                        continue;
                    }
                    let entry = row.entry_mut(source, &mut self.next_seq);
                    entry.value += delta;
                    changes.push(ThreatChange {
                        hostile: *hostile,
                        friendly: source,
                        delta,
                        total: entry.value,
                    });
                }
                changes
            }
            _ => Vec::new(),
        }
    }

    /// Who `hostile` attacks at tick `now`.
    ///
    /// An unexpired taunt lock whose taunter is alive wins outright; otherwise
    /// the living friendly with the strictly highest threat, earliest entry on
    /// ties. `None` when no living friendly is tracked.
    pub fn current_target(&self, hostile: ActorId, roster: &Roster, now: Tick) -> Option<ActorId> {
        let row = self.rows.get(&hostile)?;
        let locked = row
            .lock
            .filter(|lock| lock.until > now && roster.is_alive(lock.taunter));
        match locked {
            Some(lock) => Some(lock.taunter),
            None => row.highest(roster).map(|entry| entry.friendly),
        }
    }

    /// Taunt: puts `taunter` strictly above the current maximum on `hostile`
    /// and locks targeting onto it until `now + duration`.
    ///
    /// Returns the taunter's new threat value.
    pub fn force_target(
        &mut self,
        hostile: ActorId,
        taunter: ActorId,
        duration: u32,
        now: Tick,
        roster: &Roster,
    ) -> f64 {
        let margin = self.config.taunt_margin.max(f64::EPSILON);
        let row = self.rows.entry(hostile).or_default();
        let top = row.highest(roster).map(|entry| entry.value).unwrap_or(0.0);
        let entry = row.entry_mut(taunter, &mut self.next_seq);
        entry.value = top + margin;
        let value = entry.value;
        row.lock = Some(TauntLock {
            taunter,
            until: now + u64::from(duration),
        });
        value
    }

    /// Taunt lock holder on `hostile`, if the lock is still active at `now`.
    pub fn locked_target(&self, hostile: ActorId, now: Tick) -> Option<ActorId> {
        self.rows
            .get(&hostile)
            .and_then(|row| row.lock)
            .filter(|lock| lock.until > now)
            .map(|lock| lock.taunter)
    }

    /// Clears locks that have run out by `now`.
    pub fn expire_locks(&mut self, now: Tick) {
        for row in self.rows.values_mut() {
            if row.lock.is_some_and(|lock| lock.until <= now) {
                row.lock = None;
            }
        }
    }

    /// Removes a dead or departed friendly from every row.
    pub fn purge(&mut self, friendly: ActorId) {
        for row in self.rows.values_mut() {
            row.entries.retain(|entry| entry.friendly != friendly);
            if row.lock.is_some_and(|lock| lock.taunter == friendly) {
                row.lock = None;
            }
        }
    }

    pub fn remove_hostile(&mut self, hostile: ActorId) {
        self.rows.remove(&hostile);
    }

    /// Entries for `hostile` ordered by descending threat.
    pub fn snapshot(&self, hostile: ActorId) -> Vec<(ActorId, f64)> {
        let Some(row) = self.rows.get(&hostile) else {
            return Vec::new();
        };
        let mut entries: Vec<_> = row.entries.iter().collect();
        entries.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.seq.cmp(&b.seq)));
        entries
            .into_iter()
            .map(|entry| (entry.friendly, entry.value))
            .collect()
    }
}
