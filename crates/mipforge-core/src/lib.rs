//! mipforge Core - LP model types and the relaxation solver interface
//!
//! This crate provides the pieces every other mipforge crate builds on:
//! - [`LpProblem`]: columns, rows and objective of a mixed-integer model
//! - [`LpSolver`]: the interface a branch-and-bound model drives for its relaxations
//! - [`SimplexSolver`]: a dense two-phase simplex implementing [`LpSolver`]
//! - [`write_lp`]: LP-format export for debugging

pub mod error;
pub mod lp;

pub use error::{LpError, Result};
pub use lp::{
    write_lp, Column, LpProblem, LpSolver, LpStatus, ObjectiveSense, Row, SimplexSolver,
};
