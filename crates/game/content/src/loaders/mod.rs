//! Content loaders for reading combat data from files.
//!
//! This module provides loaders that convert RON/TOML files into combat-core
//! types, plus [`ContentFactory`] which loads a whole data directory.

pub mod abilities;
pub mod actors;
pub mod config;
pub mod encounters;
pub mod factory;

pub use abilities::AbilityLoader;
pub use actors::ActorLoader;
pub use config::ConfigLoader;
pub use encounters::EncounterLoader;
pub use factory::{ContentBundle, ContentFactory};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
