//! Error types for session operations.

use mipforge_config::ConfigError;
use thiserror::Error;

use crate::session::SessionState;

/// Error raised by [`SessionManager`](crate::SessionManager) and
/// [`SolverRegistry`](crate::SolverRegistry) operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Null, stale or foreign solver handle.
    #[error("invalid solver handle")]
    InvalidHandle,

    /// Null, unknown or disposed session id.
    #[error("invalid session")]
    InvalidSession,

    /// Another thread is operating on this session.
    #[error("session is busy")]
    SessionBusy,

    /// `reset_to_reference_solver` before any `save_reference_solver`.
    #[error("no reference solver has been saved")]
    NoSnapshot,

    /// The session has never completed a search with a solution.
    #[error("no solution available yet")]
    NoSolutionYet,

    /// `dispose` on a session that was already disposed.
    #[error("session already disposed")]
    AlreadyDisposed,

    /// The operation requires an idle session.
    #[error("session is {state}, not Idle")]
    NotIdle { state: SessionState },

    /// No more handles can be issued.
    #[error("handle capacity exhausted")]
    CapacityExhausted,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
