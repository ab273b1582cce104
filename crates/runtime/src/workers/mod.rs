//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker is the single owner of the [`combat_core::CombatSession`];
//! everything else talks to it through channels.

mod simulation;

pub use simulation::{Command, SimulationWorker};
