//! Default target selection shared by the session and AI deciders.

use super::CombatSession;
use crate::ability::{AbilityDefinition, AbilityTags, TargetFilter};
use crate::state::{ActorId, Side};

/// Picks the target `actor` would aim `ability` at when none is given.
///
/// - `SelfOnly`: the caster.
/// - `Ally`: the most wounded living ally (caster included) for heals,
///   otherwise the caster.
/// - `Enemy` / `Area` from the party: for taunts, the first living hostile
///   not already attacking the caster; otherwise the primary hostile (boss
///   first).
/// - `Enemy` / `Area` from hostiles: the threat table's current target,
///   falling back to the first living party member.
///
/// Returns `None` when no legal target exists.
pub fn default_target(
    session: &CombatSession,
    actor: ActorId,
    ability: &AbilityDefinition,
) -> Option<ActorId> {
    let roster = session.roster();
    let caster = roster.get(actor).filter(|caster| caster.alive)?;
    let side = caster.side();

    match ability.target {
        TargetFilter::SelfOnly => Some(actor),
        TargetFilter::Ally => {
            if ability.tags.contains(AbilityTags::HEAL) {
                roster.most_wounded(side).map(|ally| ally.id)
            } else {
                Some(actor)
            }
        }
        TargetFilter::Enemy | TargetFilter::Area => match side {
            Side::Party => {
                if ability.tags.contains(AbilityTags::TAUNT) {
                    let loose = hostiles_in_focus_order(session)
                        .into_iter()
                        .find(|hostile| session.current_target(*hostile) != Some(actor));
                    if loose.is_some() {
                        return loose;
                    }
                }
                roster.primary_hostile().map(|hostile| hostile.id)
            }
            Side::Hostile => session
                .current_target(actor)
                .or_else(|| roster.alive_on(Side::Party).next().map(|friendly| friendly.id)),
        },
    }
}

/// Living hostiles with the boss first, then roster order.
pub fn hostiles_in_focus_order(session: &CombatSession) -> Vec<ActorId> {
    let roster = session.roster();
    let mut hostiles: Vec<_> = roster
        .alive_on(Side::Hostile)
        .map(|hostile| (!hostile.is_boss, hostile.id))
        .collect();
    hostiles.sort();
    hostiles.into_iter().map(|(_, id)| id).collect()
}
