use super::{Actor, ActorId, ActorTemplate, Role, Side};

/// Ordered collection of every actor in a session.
///
/// Roster order is insertion order and is the deterministic order actors act
/// in within their side. Dead actors stay in the roster (flagged `alive =
/// false`) so events and summaries can still refer to them.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Roster {
    actors: Vec<Actor>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an actor built from `template`, returning its freshly allocated id.
    pub fn spawn(&mut self, template: &ActorTemplate) -> ActorId {
        let id = ActorId(self.next_id);
        self.next_id += 1;
        self.actors.push(Actor::from_template(id, template));
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.get(id).is_some_and(Actor::is_alive)
    }

    /// Living actors on `side`, in roster order.
    pub fn alive_on(&self, side: Side) -> impl Iterator<Item = &Actor> {
        self.actors
            .iter()
            .filter(move |actor| actor.alive && actor.side() == side)
    }

    /// Ids of every actor on `side` (alive or not), in roster order.
    pub fn ids_on(&self, side: Side) -> Vec<ActorId> {
        self.actors
            .iter()
            .filter(|actor| actor.side() == side)
            .map(|actor| actor.id)
            .collect()
    }

    pub fn count_alive(&self, side: Side) -> usize {
        self.alive_on(side).count()
    }

    /// First living tank in the party.
    pub fn tank(&self) -> Option<&Actor> {
        self.alive_on(Side::Party)
            .find(|actor| actor.role == Role::Tank)
    }

    /// Default focus target for the party: the living boss if there is one,
    /// otherwise the first living hostile.
    pub fn primary_hostile(&self) -> Option<&Actor> {
        self.alive_on(Side::Hostile)
            .find(|actor| actor.is_boss)
            .or_else(|| self.alive_on(Side::Hostile).next())
    }

    /// Living party member with the lowest health ratio; earliest on ties.
    pub fn most_wounded(&self, side: Side) -> Option<&Actor> {
        self.alive_on(side).fold(None, |best: Option<&Actor>, actor| match best {
            Some(current) if current.health_ratio() <= actor.health_ratio() => Some(current),
            _ => Some(actor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Pool;

    fn roster() -> Roster {
        let mut roster = Roster::new();
        roster.spawn(&ActorTemplate::new("Tank", Role::Tank));
        roster.spawn(&ActorTemplate::new("Healer", Role::Healer));
        roster.spawn(&ActorTemplate::new("Grunt", Role::Hostile));
        roster.spawn(&ActorTemplate::new("Warlord", Role::Hostile).as_boss());
        roster
    }

    #[test]
    fn ids_follow_insertion_order() {
        let roster = roster();
        let ids: Vec<_> = roster.iter().map(|actor| actor.id).collect();
        assert_eq!(ids, vec![ActorId(0), ActorId(1), ActorId(2), ActorId(3)]);
    }

    #[test]
    fn primary_hostile_prefers_boss() {
        let mut roster = roster();
        assert_eq!(roster.primary_hostile().map(|a| a.id), Some(ActorId(3)));
        if let Some(boss) = roster.get_mut(ActorId(3)) {
            boss.alive = false;
        }
        assert_eq!(roster.primary_hostile().map(|a| a.id), Some(ActorId(2)));
    }

    #[test]
    fn most_wounded_breaks_ties_by_roster_order() {
        let mut roster = roster();
        for actor in roster.iter_mut() {
            actor.health = Pool::full(100.0);
        }
        assert_eq!(roster.most_wounded(Side::Party).map(|a| a.id), Some(ActorId(0)));
        if let Some(healer) = roster.get_mut(ActorId(1)) {
            healer.health.current = 20.0;
        }
        assert_eq!(roster.most_wounded(Side::Party).map(|a| a.id), Some(ActorId(1)));
    }
}
