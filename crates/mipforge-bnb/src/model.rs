//! Branch-and-bound model over an [`LpSolver`] relaxation.

use mipforge_config::{SessionConfig, DEFAULT_LOG_LEVEL, LOG_LEVEL_MAX};
use mipforge_core::LpSolver;

use crate::error::ModelError;
use crate::result::SearchSummary;
use crate::search::{Incumbent, TreeSearch};
use crate::termination::SearchLimits;

/// A mixed-integer model solved by branch and bound.
///
/// The model owns three solver copies:
/// - the working solver, mutated by callers and by the search,
/// - the continuous baseline captured at construction,
/// - an optional reference snapshot saved on request.
///
/// # Example
///
/// ```
/// use mipforge_bnb::{BranchAndBoundModel, SearchStatus};
/// use mipforge_core::{Column, LpProblem, Row, SimplexSolver};
///
/// let mut problem = LpProblem::maximize("tiny");
/// let x = problem.add_column(Column::integer("x", 0.0, 10.0, 1.0)).unwrap();
/// problem.add_row(Row::le("cap", vec![(x, 2.0)], 7.0)).unwrap();
///
/// let mut model = BranchAndBoundModel::new(&SimplexSolver::new(problem));
/// let summary = model.branch_and_bound();
///
/// assert_eq!(summary.status, SearchStatus::Optimal);
/// assert_eq!(model.best_solution(), Some(&[3.0][..]));
/// ```
#[derive(Debug)]
pub struct BranchAndBoundModel {
    solver: Box<dyn LpSolver>,
    continuous: Box<dyn LpSolver>,
    reference: Option<Box<dyn LpSolver>>,
    best: Option<Incumbent>,
    limits: SearchLimits,
    log_level: u8,
    last_summary: Option<SearchSummary>,
}

impl BranchAndBoundModel {
    /// Builds a model from a copy of `solver`.
    pub fn new(solver: &dyn LpSolver) -> Self {
        Self::from_boxed(solver.clone_solver())
    }

    pub fn from_boxed(solver: Box<dyn LpSolver>) -> Self {
        let continuous = solver.clone_solver();
        Self {
            solver,
            continuous,
            reference: None,
            best: None,
            limits: SearchLimits::default(),
            log_level: DEFAULT_LOG_LEVEL,
            last_summary: None,
        }
    }

    /// Applies limits and log level from `config`.
    pub fn with_config(mut self, config: &SessionConfig) -> Self {
        self.limits = SearchLimits::from(config);
        self.set_log_level(config.log_level);
        self
    }

    /// Runs a full search from the working solver's current bounds.
    ///
    /// A search that finds a solution replaces the best solution; one that
    /// does not leaves the previous best in place.
    pub fn branch_and_bound(&mut self) -> SearchSummary {
        let search = TreeSearch::new(self.solver.as_mut(), &self.limits, self.log_level);
        let (summary, incumbent) = search.run();
        if incumbent.is_some() {
            self.best = incumbent;
        }
        self.last_summary = Some(summary.clone());
        summary
    }

    /// The working solver.
    #[inline]
    pub fn solver(&self) -> &dyn LpSolver {
        self.solver.as_ref()
    }

    #[inline]
    pub fn solver_mut(&mut self) -> &mut dyn LpSolver {
        self.solver.as_mut()
    }

    /// The saved reference, or the continuous baseline if none was saved.
    pub fn reference_solver(&self) -> &dyn LpSolver {
        self.reference
            .as_deref()
            .unwrap_or(self.continuous.as_ref())
    }

    #[inline]
    pub fn has_reference_solver(&self) -> bool {
        self.reference.is_some()
    }

    /// Copies the working solver into the reference slot, replacing any earlier copy.
    pub fn save_reference_solver(&mut self) {
        self.reference = Some(self.solver.clone_solver());
    }

    /// Copies the reference back into the working solver. The reference is kept.
    pub fn reset_to_reference_solver(&mut self) -> Result<(), ModelError> {
        let reference = self
            .reference
            .as_ref()
            .ok_or(ModelError::NoReferenceSolver)?;
        self.solver = reference.clone_solver();
        Ok(())
    }

    pub fn best_solution(&self) -> Option<&[f64]> {
        self.best.as_ref().map(|best| best.values.as_slice())
    }

    pub fn best_objective(&self) -> Option<f64> {
        self.best.as_ref().map(|best| best.objective)
    }

    /// Sets the log level, saturating at the most verbose level.
    pub fn set_log_level(&mut self, level: u8) {
        self.log_level = level.min(LOG_LEVEL_MAX);
    }

    #[inline]
    pub fn log_level(&self) -> u8 {
        self.log_level
    }

    #[inline]
    pub fn limits(&self) -> &SearchLimits {
        &self.limits
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    pub fn last_summary(&self) -> Option<&SearchSummary> {
        self.last_summary.as_ref()
    }
}
