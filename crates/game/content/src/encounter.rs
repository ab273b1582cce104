//! Encounter definitions.

use combat_core::PhaseSpec;

/// One fight: which templates make up each side.
///
/// Actors are spawned party first, then the boss, then the remaining
/// hostiles, each in listed order. Listing a template twice spawns two
/// actors.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterSpec {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub party: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hostiles: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub boss: Option<BossSpec>,
    /// Templates that summon effects may bring into this fight.
    #[cfg_attr(feature = "serde", serde(default))]
    pub summons: Vec<String>,
}

impl EncounterSpec {
    /// Every template id the encounter refers to, in spawn order, followed
    /// by summonable templates.
    pub fn template_ids(&self) -> impl Iterator<Item = &str> {
        self.party
            .iter()
            .chain(self.boss.iter().map(|boss| &boss.template))
            .chain(self.hostiles.iter())
            .chain(self.summons.iter())
            .map(String::as_str)
    }
}

/// The encounter's boss and its phase thresholds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BossSpec {
    pub template: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub phases: Vec<PhaseSpec>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_ids_follow_spawn_order() {
        let spec = EncounterSpec {
            id: "crypt".into(),
            description: String::new(),
            party: vec!["tank".into(), "healer".into()],
            hostiles: vec!["ghoul".into()],
            boss: Some(BossSpec {
                template: "lich".into(),
                phases: Vec::new(),
            }),
            summons: vec!["skeleton".into()],
        };
        let ids: Vec<_> = spec.template_ids().collect();
        assert_eq!(ids, vec!["tank", "healer", "lich", "ghoul", "skeleton"]);
    }
}
