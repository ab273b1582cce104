//! Data-driven combat content and loaders.
//!
//! This crate describes encounters and provides loaders for RON/TOML data files:
//! - Ability catalogs (data-driven via RON)
//! - Actor templates (data-driven via RON)
//! - Encounter definitions: party, hostiles and an optional boss (RON)
//! - Combat configuration: coefficients and selector weights (TOML)
//!
//! Content is consumed when a session is assembled and never appears in
//! combat state.
//!
//! All loaders use combat-core types directly with serde for RON/TOML deserialization.

pub mod encounter;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use encounter::{BossSpec, EncounterSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ActorLoader, ConfigLoader, ContentBundle, ContentFactory, EncounterLoader,
};
