//! Errors raised by [`BranchAndBoundModel`](crate::BranchAndBoundModel).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ModelError {
    /// `reset_to_reference_solver` called before any `save_reference_solver`.
    #[error("no reference solver has been saved")]
    NoReferenceSolver,
}
