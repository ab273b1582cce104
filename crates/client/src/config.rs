//! Command-line arguments for the simulator.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Run one party encounter to completion.
#[derive(Debug, Clone, Parser)]
#[command(name = "combat-sim")]
#[command(about = "Deterministic party combat simulator", long_about = None)]
#[command(version)]
pub struct SimArgs {
    /// Directory holding abilities.ron, actors.ron, encounters.ron and an
    /// optional config.toml
    #[arg(short, long, value_name = "DIR", env = "COMBAT_CONTENT_DIR", default_value = "data")]
    pub content: PathBuf,

    /// Encounter id to run (defaults to the first one defined)
    #[arg(short, long, value_name = "ID")]
    pub encounter: Option<String>,

    /// Stop after this many ticks even if nobody has won
    #[arg(long, value_name = "N", env = "COMBAT_MAX_TICKS", default_value_t = 500)]
    pub max_ticks: u64,

    /// Seed for critical strike rolls
    #[arg(long, value_name = "SEED", default_value_t = 0)]
    pub seed: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per combat event, then a summary
    Text,
    /// Summary only, as JSON
    Json,
}
