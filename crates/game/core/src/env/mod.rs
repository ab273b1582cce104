//! Deterministic randomness used by combat resolution.
mod rng;

pub use rng::{PcgRng, RngOracle, roll_seed};
