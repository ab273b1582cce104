//! Unified error types surfaced by the runtime API.
//!
//! Wraps worker coordination failures and session errors so clients can
//! bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use combat_core::{CombatError, ErrorSeverity, SessionError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a combat session before building")]
    MissingSession,

    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl RuntimeError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Session(error) => error.severity(),
            Self::MissingSession => ErrorSeverity::Validation,
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_errors_keep_their_severity() {
        let error = RuntimeError::from(SessionError::NotStarted);
        assert_eq!(error.severity(), ErrorSeverity::Validation);
        assert_eq!(RuntimeError::CommandChannelClosed.severity(), ErrorSeverity::Internal);
    }
}
