//! Utility-scoring combat AI.
//!
//! This module decides what AI-controlled actors do each tick:
//!
//! 1. **Candidate Generation**: Every ability the actor knows that passes the
//!    session's gates (off cooldown, affordable, not phase-only) and has a
//!    legal default target.
//!
//! 2. **Evaluation**: Score each candidate as a weighted sum of four terms
//!    (offense, healing, threat, combo) using the actor's role weights.
//!
//! 3. **Selection**: Highest total wins; ties go to the lower ability
//!    priority, then the lower ability id. Candidates scoring zero or less
//!    are dropped, so an actor with nothing useful to do idles.
//!
//! # Core Components
//!
//! - [`AbilitySelector`]: implements [`combat_core::ActionDecider`]
//! - [`AiContext`]: read-only view of the session with scoring helpers
//! - [`scoring`]: the four scoring terms and [`ScoreBreakdown`]

pub mod context;
pub mod scoring;
pub mod selector;

pub use context::AiContext;
pub use scoring::{Candidate, ScoreBreakdown};
pub use selector::AbilitySelector;
