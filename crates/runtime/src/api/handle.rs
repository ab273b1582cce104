//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! stepping the session or streaming tick reports.
use tokio::sync::{broadcast, mpsc, oneshot};

use combat_core::{CombatSession, EncounterSummary, ExternalCommand, TickReport};

use super::errors::{Result, RuntimeError};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<TickReport>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<TickReport>,
    ) -> Self {
        Self {
            command_tx,
            event_tx,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start the encounter.
    pub async fn start(&self) -> Result<TickReport> {
        self.request(|reply| Command::Start { reply }).await?
    }

    /// Advance one tick.
    pub async fn step(&self) -> Result<TickReport> {
        self.request(|reply| Command::Step { reply }).await?
    }

    /// Run until the encounter ends or the session reaches `max_ticks`.
    pub async fn run_to_end(&self, max_ticks: u64) -> Result<EncounterSummary> {
        self.request(|reply| Command::RunToEnd { max_ticks, reply })
            .await?
    }

    /// Queue an external command for the next tick.
    pub async fn queue_command(&self, command: ExternalCommand) -> Result<()> {
        self.request(|reply| Command::QueueCommand { command, reply })
            .await?
    }

    /// Clone of the session as of the last completed tick.
    pub async fn snapshot(&self) -> Result<CombatSession> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Subscribe to tick reports published after this call.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let mut reports = handle.subscribe();
    /// while let Ok(report) = reports.recv().await {
    ///     for event in &report.events {
    ///         println!("{event:?}");
    ///     }
    /// }
    /// ```
    pub fn subscribe(&self) -> broadcast::Receiver<TickReport> {
        self.event_tx.subscribe()
    }
}
