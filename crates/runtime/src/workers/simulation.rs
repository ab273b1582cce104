//! Simulation worker that owns the authoritative [`CombatSession`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), advances
//! the session with the configured decider, and broadcasts every
//! [`TickReport`] once the tick has fully resolved.

use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, error, info};

use combat_core::{
    ActionDecider, CombatError, CombatSession, EncounterSummary, ErrorSeverity, ExternalCommand,
    SessionError, SessionState, TickReport,
};

use crate::api::Result;

/// Commands that can be sent to the simulation worker.
pub enum Command {
    /// Move the session from `Idle` to `Active`.
    Start {
        reply: oneshot::Sender<Result<TickReport>>,
    },
    /// Advance exactly one tick.
    Step {
        reply: oneshot::Sender<Result<TickReport>>,
    },
    /// Start if needed, then step until the encounter ends or the session
    /// reaches `max_ticks`.
    RunToEnd {
        max_ticks: u64,
        reply: oneshot::Sender<Result<EncounterSummary>>,
    },
    /// Queue an override for the next tick boundary.
    QueueCommand {
        command: ExternalCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Clone of the session between ticks.
    Snapshot {
        reply: oneshot::Sender<CombatSession>,
    },
}

/// Background task that processes session commands.
pub struct SimulationWorker {
    session: CombatSession,
    decider: Box<dyn ActionDecider + Send>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<TickReport>,
}

impl SimulationWorker {
    pub fn new(
        session: CombatSession,
        decider: Box<dyn ActionDecider + Send>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<TickReport>,
    ) -> Self {
        Self {
            session,
            decider,
            command_rx,
            event_tx,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        info!(target: "runtime::worker", "simulation worker started");
        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    self.handle_command(cmd);
                }
                else => break,
            }
        }
        info!(
            target: "runtime::worker",
            tick = %self.session.tick(),
            state = %self.session.state(),
            "simulation worker stopped"
        );
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                let result = self.session.start().map_err(|e| self.report_error(e));
                let _ = reply.send(result.map(|report| self.publish(report)));
            }
            Command::Step { reply } => {
                let _ = reply.send(self.step());
            }
            Command::RunToEnd { max_ticks, reply } => {
                let _ = reply.send(self.run_to_end(max_ticks));
            }
            Command::QueueCommand { command, reply } => {
                let result = self
                    .session
                    .queue_command(command)
                    .map_err(|e| self.report_error(e));
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.session.clone());
            }
        }
    }

    fn step(&mut self) -> Result<TickReport> {
        let report = self
            .session
            .step(self.decider.as_mut())
            .map_err(|e| self.report_error(e))?;
        Ok(self.publish(report))
    }

    fn run_to_end(&mut self, max_ticks: u64) -> Result<EncounterSummary> {
        if self.session.state() == SessionState::Idle {
            let report = self.session.start().map_err(|e| self.report_error(e))?;
            self.publish(report);
        }
        while self.session.state() == SessionState::Active && self.session.tick().0 < max_ticks {
            self.step()?;
        }

        let summary = self.session.summary();
        info!(
            target: "runtime::worker",
            outcome = %summary.outcome,
            ticks = summary.duration_ticks,
            survivors = summary.survivors.len(),
            "encounter finished"
        );
        Ok(summary)
    }

    /// Broadcasts `report` and hands it back to the caller.
    fn publish(&self, report: TickReport) -> TickReport {
        // no subscribers is fine
        let _ = self.event_tx.send(report.clone());
        report
    }

    fn report_error(&self, error: SessionError) -> crate::api::RuntimeError {
        if error.severity() == ErrorSeverity::Fatal {
            error!(
                target: "runtime::worker",
                code = error.error_code(),
                error = %error,
                "session failed"
            );
        } else {
            debug!(
                target: "runtime::worker",
                code = error.error_code(),
                error = %error,
                "session command rejected"
            );
        }
        error.into()
    }
}
