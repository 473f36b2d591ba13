//! Relaxation solver interface.

use std::fmt::Debug;

use super::problem::LpProblem;
use crate::error::Result;

/// Outcome of the last relaxation solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LpStatus {
    /// Not solved since the model last changed.
    #[default]
    Unsolved,
    Optimal,
    Infeasible,
    Unbounded,
    /// Gave up before reaching optimality.
    IterationLimit,
}

impl LpStatus {
    #[inline]
    pub fn is_optimal(self) -> bool {
        self == LpStatus::Optimal
    }
}

impl std::fmt::Display for LpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LpStatus::Unsolved => write!(f, "Unsolved"),
            LpStatus::Optimal => write!(f, "Optimal"),
            LpStatus::Infeasible => write!(f, "Infeasible"),
            LpStatus::Unbounded => write!(f, "Unbounded"),
            LpStatus::IterationLimit => write!(f, "IterationLimit"),
        }
    }
}

/// A linear-programming relaxation solver.
///
/// The branch-and-bound model owns one working instance and tightens
/// column bounds on it node by node. Implementations must drop any cached
/// solution whenever [`LpSolver::problem_mut`] hands out the model.
///
/// # Example
///
/// ```
/// use mipforge_core::{Column, LpProblem, LpSolver, LpStatus, Row, SimplexSolver};
///
/// let mut problem = LpProblem::maximize("lp");
/// let x = problem.add_column(Column::continuous("x", 0.0, 4.0, 1.0)).unwrap();
/// let y = problem.add_column(Column::continuous("y", 0.0, 4.0, 1.0)).unwrap();
/// problem.add_row(Row::le("cap", vec![(x, 1.0), (y, 1.0)], 5.0)).unwrap();
///
/// let mut solver = SimplexSolver::new(problem);
/// assert_eq!(solver.solve(), LpStatus::Optimal);
/// assert!((solver.objective_value().unwrap() - 5.0).abs() < 1e-9);
///
/// // Mutating the model drops the cached solution.
/// solver.set_col_upper(x, 1.0).unwrap();
/// assert_eq!(solver.status(), LpStatus::Unsolved);
/// ```
pub trait LpSolver: Send + Debug {
    /// The model this solver works on.
    fn problem(&self) -> &LpProblem;

    /// Mutable access to the model. Invalidates the cached solution.
    fn problem_mut(&mut self) -> &mut LpProblem;

    /// Solves the relaxation (integrality ignored) of the current model.
    fn solve(&mut self) -> LpStatus;

    /// Status of the last solve.
    fn status(&self) -> LpStatus;

    /// Primal values of the last optimal solve; empty otherwise.
    fn col_solution(&self) -> &[f64];

    /// Objective value of the last optimal solve.
    fn objective_value(&self) -> Option<f64>;

    /// Deep copy, including the model and any cached solution.
    fn clone_solver(&self) -> Box<dyn LpSolver>;

    #[inline]
    fn num_cols(&self) -> usize {
        self.problem().num_cols()
    }

    #[inline]
    fn num_rows(&self) -> usize {
        self.problem().num_rows()
    }

    fn col_lower(&self, col: usize) -> Result<f64> {
        Ok(self.problem().column(col)?.lower)
    }

    fn col_upper(&self, col: usize) -> Result<f64> {
        Ok(self.problem().column(col)?.upper)
    }

    fn set_col_lower(&mut self, col: usize, lower: f64) -> Result<()> {
        self.problem_mut().set_col_lower(col, lower)
    }

    fn set_col_upper(&mut self, col: usize, upper: f64) -> Result<()> {
        self.problem_mut().set_col_upper(col, upper)
    }

    fn set_col_bounds(&mut self, col: usize, lower: f64, upper: f64) -> Result<()> {
        self.problem_mut().set_col_bounds(col, lower, upper)
    }

    fn objective_coefficient(&self, col: usize) -> Result<f64> {
        Ok(self.problem().column(col)?.objective)
    }

    fn set_objective_coefficient(&mut self, col: usize, value: f64) -> Result<()> {
        self.problem_mut().set_objective_coefficient(col, value)
    }

    fn is_integer(&self, col: usize) -> bool {
        self.problem()
            .column(col)
            .map(|c| c.integer)
            .unwrap_or(false)
    }
}

impl Clone for Box<dyn LpSolver> {
    fn clone(&self) -> Self {
        self.clone_solver()
    }
}
