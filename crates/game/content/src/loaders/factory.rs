//! Content factory for assembling combat sessions from data files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use combat_core::{AbilityCatalog, ActorTemplate, CombatConfig, CombatSession, Roster, Side};

use crate::encounter::EncounterSpec;
use crate::loaders::{AbilityLoader, ActorLoader, ConfigLoader, EncounterLoader, LoadResult};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── abilities.ron
/// ├── actors.ron
/// ├── encounters.ron
/// └── config.toml      (optional)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat configuration from `config.toml`, or defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<AbilityCatalog> {
        let path = self.data_dir.join("abilities.ron");
        Ok(AbilityLoader::load(&path)?.into_iter().collect())
    }

    /// Load actor templates from `actors.ron`.
    pub fn load_actors(&self) -> LoadResult<BTreeMap<String, ActorTemplate>> {
        let path = self.data_dir.join("actors.ron");
        Ok(ActorLoader::load(&path)?.into_iter().collect())
    }

    /// Load encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        let path = self.data_dir.join("encounters.ron");
        Ok(EncounterLoader::load(&path)?
            .into_iter()
            .map(|encounter| (encounter.id.clone(), encounter))
            .collect())
    }

    /// Loads every content file in the directory.
    pub fn load_dir(&self) -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            abilities: self.load_abilities()?,
            actors: self.load_actors()?,
            encounters: self.load_encounters()?,
            config: self.load_config()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Everything loaded from one data directory.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub abilities: AbilityCatalog,
    pub actors: BTreeMap<String, ActorTemplate>,
    pub encounters: BTreeMap<String, EncounterSpec>,
    pub config: CombatConfig,
}

impl ContentBundle {
    pub fn encounter(&self, id: &str) -> Option<&EncounterSpec> {
        self.encounters.get(id)
    }

    pub fn encounter_ids(&self) -> impl Iterator<Item = &str> {
        self.encounters.keys().map(String::as_str)
    }

    /// Builds an idle session for `encounter_id`.
    ///
    /// Unknown template ids and templates on the wrong side are errors.
    /// Unknown ability references are dropped from the actor by the session
    /// and reported as data-integrity warnings when it starts.
    pub fn build_session(&self, encounter_id: &str, seed: u64) -> LoadResult<CombatSession> {
        let encounter = self
            .encounter(encounter_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown encounter '{}'", encounter_id))?;

        let mut roster = Roster::new();
        for id in &encounter.party {
            roster.spawn(self.template_on(encounter, id, Side::Party)?);
        }
        if let Some(boss) = &encounter.boss {
            let template = self
                .template_on(encounter, &boss.template, Side::Hostile)?
                .clone()
                .as_boss();
            roster.spawn(&template);
        }
        for id in &encounter.hostiles {
            roster.spawn(self.template_on(encounter, id, Side::Hostile)?);
        }

        let mut summons = BTreeMap::new();
        for id in &encounter.summons {
            summons.insert(id.clone(), self.template(encounter, id)?.clone());
        }

        let mut session = CombatSession::new(roster, self.abilities.clone(), self.config.clone())
            .with_seed(seed)
            .with_templates(summons);
        if let Some(boss) = &encounter.boss {
            session = session
                .with_boss(boss.phases.clone())
                .map_err(|e| anyhow::anyhow!("Encounter '{}': {}", encounter.id, e))?;
        }
        Ok(session)
    }

    fn template(&self, encounter: &EncounterSpec, id: &str) -> LoadResult<&ActorTemplate> {
        self.actors.get(id).ok_or_else(|| {
            anyhow::anyhow!("Encounter '{}' refers to unknown template '{}'", encounter.id, id)
        })
    }

    fn template_on(
        &self,
        encounter: &EncounterSpec,
        id: &str,
        side: Side,
    ) -> LoadResult<&ActorTemplate> {
        let template = self.template(encounter, id)?;
        if template.role.side() != side {
            anyhow::bail!(
                "Encounter '{}': template '{}' fights for the {} side, expected {}",
                encounter.id,
                id,
                template.role.side(),
                side
            );
        }
        Ok(template)
    }
}
