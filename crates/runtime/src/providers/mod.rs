//! Decision providers for AI-controlled actors.

pub mod ai;
