//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive an encounter.

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use combat_core::{ActionDecider, CombatSession, EncounterSummary, TickReport};

use crate::api::{Result, RuntimeError, RuntimeHandle};
use crate::providers::ai::AbilitySelector;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Tick cap used by [`Runtime::run_to_end`].
    pub max_ticks: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: 100,
            command_buffer_size: 32,
            max_ticks: 1_000,
        }
    }
}

/// Main runtime that orchestrates one encounter.
///
/// Design: Runtime owns the worker task; [`RuntimeHandle`] provides a
/// cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Subscribe to tick reports
    pub fn subscribe(&self) -> broadcast::Receiver<TickReport> {
        self.handle.subscribe()
    }

    /// Run the encounter until it ends or the configured tick cap.
    pub async fn run_to_end(&self) -> Result<EncounterSummary> {
        self.handle.run_to_end(self.config.max_ticks).await
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to finish the command it is processing; clones
    /// of the handle held elsewhere keep the worker alive until dropped.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    session: Option<CombatSession>,
    decider: Option<Box<dyn ActionDecider + Send>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            session: None,
            decider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the session the worker will own (required)
    pub fn session(mut self, session: CombatSession) -> Self {
        self.session = Some(session);
        self
    }

    /// Set the decider for AI-controlled actors
    ///
    /// Defaults to [`AbilitySelector`] with the session's weights.
    pub fn decider(mut self, decider: impl ActionDecider + Send + 'static) -> Self {
        self.decider = Some(Box::new(decider));
        self
    }

    /// Build the runtime and spawn the simulation worker
    pub async fn build(self) -> Result<Runtime> {
        let session = self.session.ok_or(RuntimeError::MissingSession)?;
        let decider = self
            .decider
            .unwrap_or_else(|| Box::new(AbilitySelector::new()));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (event_tx, _event_rx) =
            broadcast::channel::<TickReport>(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let sim_worker = SimulationWorker::new(session, decider, command_rx, event_tx);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        Ok(Runtime {
            handle,
            config: self.config,
            sim_worker_handle,
        })
    }
}
