//! Error types for the catalog session.

use thiserror::Error;

use super::form::ValidationError;
use super::SessionMode;
use crate::gateway::RemoteError;

/// Errors surfaced by session transitions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The form input was rejected before any request was made.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The catalog service call failed; the transition was aborted.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The operation is not allowed in the current mode.
    #[error("Cannot {operation} while {mode:?}")]
    InvalidTransition {
        operation: &'static str,
        mode: SessionMode,
    },

    /// The session actor is no longer accepting commands.
    #[error("Session closed")]
    ActorClosed,

    /// The session actor dropped the reply channel.
    #[error("Session dropped response channel")]
    ActorDropped,

    /// The session task panicked or was cancelled.
    #[error("Session task failed: {0}")]
    ActorFailed(String),
}
