//! Ability catalog loader.

use std::collections::BTreeSet;
use std::path::Path;

use combat_core::AbilityDefinition;

use crate::loaders::{LoadResult, read_file};

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load ability definitions from a RON file.
    ///
    /// RON format: `Vec<AbilityDefinition>`. Ability ids must be unique.
    pub fn load(path: &Path) -> LoadResult<Vec<AbilityDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<AbilityDefinition>> {
        let abilities: Vec<AbilityDefinition> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for ability in &abilities {
            if !seen.insert(ability.id.as_str()) {
                anyhow::bail!("Duplicate ability id '{}'", ability.id);
            }
        }
        Ok(abilities)
    }
}
