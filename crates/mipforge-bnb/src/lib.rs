//! Branch-and-bound search over an LP relaxation.
//!
//! [`BranchAndBoundModel`] owns a working [`LpSolver`](mipforge_core::LpSolver)
//! plus the copies needed to snapshot and restore it, and runs a tree search
//! that branches on fractional integer columns.

pub mod error;
pub mod model;
pub mod node;
pub mod result;
pub mod search;
pub mod stats;
pub mod termination;


pub use error::ModelError;
pub use model::BranchAndBoundModel;
pub use node::{BoundChange, SearchNode};
pub use result::{SearchStatus, SearchSummary, TerminationReason};
pub use search::Incumbent;
pub use stats::SearchStatistics;
pub use termination::SearchLimits;
