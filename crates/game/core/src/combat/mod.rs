//! Combat subsystems owned by a session.
//!
//! - [`combo`]: builder/finisher combo points
//! - [`damage`]: pure damage, healing and critical-strike formulas
//! - [`status`]: status effect tracker with refresh-if-stronger semantics
//! - [`threat`]: per-hostile threat table and taunt locks

pub mod combo;
pub mod damage;
pub mod status;
pub mod threat;

pub use combo::{ComboOutcome, ComboState, on_ability_used};
pub use status::{
    ApplyOutcome, PeriodicOutcome, StatusApplication, StatusError, StatusInstance, StatusTracker,
};
pub use threat::{ThreatChange, ThreatKind, ThreatTable};
