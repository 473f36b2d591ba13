//! LP model, solver interface and the reference simplex.

mod format;
mod problem;
mod simplex;
mod solver;

#[cfg(test)]
mod problem_tests;
#[cfg(test)]
mod simplex_tests;

pub use format::write_lp;
pub use problem::{Column, LpProblem, ObjectiveSense, Row};
pub use simplex::{SimplexSolver, DEFAULT_ITERATION_LIMIT};
pub use solver::{LpSolver, LpStatus};
