//! Runtime orchestration for deterministic party combat.
//!
//! This crate wires the utility-scoring ability selector and a simulation
//! worker into a cohesive runtime API. Consumers embed [`Runtime`] to drive
//! an encounter, subscribe to tick reports, and inject external commands
//! through [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`providers`] holds the combat AI
//! - `workers` keeps the background task internal to the crate
pub mod api;
pub mod providers;
pub mod runtime;

mod workers;

pub use api::{Result, RuntimeError, RuntimeHandle};
pub use providers::ai::{AbilitySelector, AiContext, Candidate, ScoreBreakdown};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
