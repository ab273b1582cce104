//! Encounter definition loader.

use std::collections::BTreeSet;
use std::path::Path;

use crate::encounter::EncounterSpec;
use crate::loaders::{LoadResult, read_file};

/// Loader for encounter definitions from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load encounters from a RON file.
    ///
    /// RON format: `Vec<EncounterSpec>`. Template ids are resolved later by
    /// [`ContentBundle::build_session`](crate::loaders::ContentBundle::build_session).
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EncounterSpec>> {
        let encounters: Vec<EncounterSpec> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for encounter in &encounters {
            if !seen.insert(encounter.id.as_str()) {
                anyhow::bail!("Duplicate encounter id '{}'", encounter.id);
            }
            if encounter.party.is_empty() {
                anyhow::bail!("Encounter '{}' has no party", encounter.id);
            }
            if encounter.hostiles.is_empty() && encounter.boss.is_none() {
                anyhow::bail!("Encounter '{}' has no hostiles", encounter.id);
            }
        }
        Ok(encounters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_boss_phases() {
        let encounters = EncounterLoader::parse(
            r#"[
                (
                    id: "crypt",
                    party: ["tank", "healer"],
                    boss: Some((
                        template: "lich",
                        phases: [(threshold: 0.5, ability: Some("frost_nova")), (threshold: 0.2)],
                    )),
                ),
            ]"#,
        )
        .unwrap();

        let boss = encounters[0].boss.as_ref().unwrap();
        assert_eq!(boss.phases.len(), 2);
        assert_eq!(boss.phases[0].threshold, 0.5);
        assert!(boss.phases[1].ability.is_none());
        assert!(encounters[0].hostiles.is_empty());
    }

    #[test]
    fn rejects_encounter_without_opponents() {
        let result = EncounterLoader::parse(r#"[(id: "empty", party: ["tank"])]"#);
        assert!(result.is_err());
    }
}
