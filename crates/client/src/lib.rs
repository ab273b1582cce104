//! Composition root for the combat simulator.
//!
//! Loads content from disk, assembles a [`CombatSession`](combat_core::CombatSession),
//! hands it to a [`Runtime`] driven by the [`AbilitySelector`], and prints the
//! outcome.
//!
//! ```text
//! content dir ──► ContentBundle ──► CombatSession ──► Runtime ──► stdout
//! ```

pub mod config;
pub mod logging;
pub mod render;

use anyhow::{Context, Result, anyhow};
use tokio::sync::broadcast::error::RecvError;

use combat_content::ContentFactory;
use combat_runtime::{AbilitySelector, Runtime, RuntimeConfig};

use config::{OutputFormat, SimArgs};
use render::{Names, SummaryReport, describe};

/// Runs the encounter selected by `args` and writes the result to stdout.
pub async fn run(args: SimArgs) -> Result<()> {
    let bundle = ContentFactory::new(&args.content)
        .load_dir()
        .with_context(|| format!("loading content from {}", args.content.display()))?;

    let encounter = match &args.encounter {
        Some(id) => id.clone(),
        None => bundle
            .encounter_ids()
            .next()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("no encounters defined in {}", args.content.display()))?,
    };
    let session = bundle.build_session(&encounter, args.seed)?;
    let names = Names::from_session(&session);
    tracing::info!(encounter = %encounter, seed = args.seed, actors = session.roster().len(), "session built");

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            max_ticks: args.max_ticks,
            ..RuntimeConfig::default()
        })
        .session(session)
        .decider(AbilitySelector::new())
        .build()
        .await?;
    let handle = runtime.handle();

    let printer = (args.format == OutputFormat::Text).then(|| {
        let mut reports = handle.subscribe();
        let names = names.clone();
        tokio::spawn(async move {
            loop {
                match reports.recv().await {
                    Ok(report) => {
                        for line in report.events.iter().filter_map(|e| describe(e, &names)) {
                            println!("{line}");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event printer fell behind");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    });

    let summary = runtime.run_to_end().await?;
    let snapshot = handle.snapshot().await?;
    drop(handle);
    runtime.shutdown().await?;
    if let Some(printer) = printer {
        // the sender side closed with the worker, so the printer drains and exits
        printer.await?;
    }

    let report = SummaryReport::new(&encounter, args.seed, &summary, &snapshot);
    match args.format {
        OutputFormat::Text => println!("\n{}", report.to_text()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
