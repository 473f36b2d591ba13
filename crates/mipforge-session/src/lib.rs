//! Handle-addressed branch-and-bound sessions.
//!
//! - [`SolverRegistry`]: LP solvers owned outside any session, addressed by [`SolverHandle`]
//! - [`SessionManager`]: sessions built from a registered solver, addressed by [`SessionId`]
//! - [`Environment`]: owns both, installs logging, tears everything down
//!
//! Handles are `u64` values so they can cross an FFI boundary unchanged.

mod arena;
pub mod environment;
pub mod error;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod session;
pub mod solution;

#[cfg(test)]
mod tests;

pub use environment::{Environment, ShutdownReport};
pub use error::{Result, SessionError};
pub use handle::{SessionId, SolverHandle};
pub use manager::SessionManager;
pub use registry::SolverRegistry;
pub use session::SessionState;
pub use solution::SolutionVector;
