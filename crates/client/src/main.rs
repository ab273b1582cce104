//! `combat-sim` binary.
//!
//! # Examples
//!
//! ```bash
//! # Run the first sample encounter and print the event log
//! cargo run -p combat-client -- --content crates/client/data
//!
//! # JSON summary of a specific encounter
//! cargo run -p combat-client -- --content crates/client/data --encounter warlord_keep --format json
//! ```

use anyhow::Result;
use clap::Parser;

use combat_client::config::SimArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = SimArgs::parse();
    combat_client::logging::setup_logging()?;

    combat_client::run(args).await
}
