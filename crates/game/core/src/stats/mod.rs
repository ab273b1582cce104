//! Stat resolution.
//!
//! - [`bonus`]: ordered additive/multiplicative bonus stacks
//! - [`keys`]: attribute and derived stat keys, typed and raw modifiers
//! - [`ratings`]: diminishing-returns rating conversion
//! - [`resolver`]: the pure `resolve` entry point producing a [`StatBlock`]
pub mod bonus;
pub mod keys;
pub mod ratings;
pub mod resolver;

pub use bonus::{Bonus, BonusStack};
pub use keys::{Attribute, DerivedStat, RawModifier, Stat, StatModifier};
pub use ratings::rating_to_percent;
pub use resolver::{Resolution, StatBlock, resolve};
