//! mipforge - Branch-and-Bound MIP Sessions in Rust
//!
//! Register an LP solver, open a session over it, search, read the best
//! solution back.
//!
//! # Example
//!
//! ```rust
//! use mipforge::prelude::*;
//!
//! let mut problem = LpProblem::maximize("tiny");
//! let x = problem.add_column(Column::integer("x", 0.0, 10.0, 1.0)).unwrap();
//! problem.add_row(Row::le("cap", vec![(x, 2.0)], 7.0)).unwrap();
//!
//! let outcome = mipforge::solve_with_config(problem, &SessionConfig::new().with_log_level(0)).unwrap();
//! assert_eq!(outcome.summary.status, SearchStatus::Optimal);
//! assert_eq!(outcome.solution.unwrap().values(), &[3.0]);
//! ```

// LP model and relaxation solver
pub use mipforge_core::{
    write_lp, Column, LpError, LpProblem, LpSolver, LpStatus, ObjectiveSense, Row, SimplexSolver,
};

// Configuration
pub use mipforge_config::{
    ConfigError, EnvironmentConfig, NodeSelection, SessionConfig, LOG_LEVEL_MAX, LOG_LEVEL_MIN,
};

// Branch and bound
pub use mipforge_bnb::{
    BranchAndBoundModel, SearchLimits, SearchStatistics, SearchStatus, SearchSummary,
    TerminationReason,
};

// Sessions
pub use mipforge_session::{
    Environment, SessionError, SessionId, SessionManager, SessionState, ShutdownReport,
    SolutionVector, SolverHandle, SolverRegistry,
};

#[cfg(feature = "console")]
pub use mipforge_console as console;

mod solve;
pub use solve::{solve, solve_with_config, SolveOutcome};

pub mod prelude {
    pub use super::{Column, LpProblem, LpSolver, ObjectiveSense, Row, SimplexSolver};
    pub use super::{EnvironmentConfig, NodeSelection, SessionConfig};
    pub use super::{SearchStatus, SearchSummary, TerminationReason};
    pub use super::{
        Environment, SessionError, SessionId, SessionManager, SessionState, SolutionVector,
        SolverHandle, SolverRegistry,
    };
}
