//! Actor template loader.

use std::collections::BTreeSet;
use std::path::Path;

use combat_core::ActorTemplate;

use crate::loaders::{LoadResult, read_file};

/// Loader for actor templates from RON files.
pub struct ActorLoader;

impl ActorLoader {
    /// Load actor templates from a RON file.
    ///
    /// RON format: `Vec<(String, ActorTemplate)>`, keyed by template id.
    ///
    /// Attribute keys and ability references are not validated here; unknown
    /// ones surface as data-integrity warnings once a session is built.
    pub fn load(path: &Path) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<(String, ActorTemplate)>> {
        let actors: Vec<(String, ActorTemplate)> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for (id, _) in &actors {
            if !seen.insert(id.as_str()) {
                anyhow::bail!("Duplicate actor template id '{}'", id);
            }
        }
        Ok(actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{Bonus, Role};

    #[test]
    fn parses_templates_with_defaults() {
        let actors = ActorLoader::parse(
            r#"[
                ("rogue", (
                    name: "Vex",
                    role: damage,
                    attributes: { "stamina": 30.0, "strength": 25.0 },
                    modifiers: [(stat: "crit_rating", bonus: Flat(20.0))],
                    abilities: ["jab", "rupture"],
                    combo_max: Some(5),
                )),
                ("dummy", (name: "Dummy", role: hostile, ai_controlled: false)),
            ]"#,
        )
        .unwrap();

        let (id, rogue) = &actors[0];
        assert_eq!(id, "rogue");
        assert_eq!(rogue.role, Role::Damage);
        assert_eq!(rogue.attributes.get("strength"), Some(&25.0));
        assert_eq!(rogue.modifiers[0].bonus, Bonus::Flat(20.0));
        assert_eq!(rogue.combo_max, Some(5));
        assert!(rogue.ai_controlled);

        let (_, dummy) = &actors[1];
        assert!(dummy.abilities.is_empty());
        assert!(!dummy.ai_controlled);
        assert!(!dummy.boss);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = ActorLoader::parse(
            r#"[
                ("ogre", (name: "Ogre", role: hostile)),
                ("ogre", (name: "Ogre", role: hostile)),
            ]"#,
        );
        assert!(result.is_err());
    }
}
