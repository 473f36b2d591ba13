//! One-shot entry point that hides the registry and session wiring.

use std::path::Path;
use std::sync::Arc;

use mipforge_bnb::SearchSummary;
use mipforge_config::SessionConfig;
use mipforge_core::{LpProblem, SimplexSolver};
use mipforge_session::{SessionManager, SolutionVector, SolverRegistry};
use tracing::debug;

const CONFIG_FILE: &str = "mipforge.toml";

/// Result of [`solve`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    pub summary: SearchSummary,
    /// Best solution, if the search found one.
    pub solution: Option<SolutionVector>,
}

/// Solves `problem` with the simplex relaxation, reading `mipforge.toml`
/// from the working directory if present.
pub fn solve(problem: LpProblem) -> mipforge_session::Result<SolveOutcome> {
    let config = if Path::new(CONFIG_FILE).exists() {
        SessionConfig::load(CONFIG_FILE)?
    } else {
        SessionConfig::default()
    };
    solve_with_config(problem, &config)
}

pub fn solve_with_config(
    problem: LpProblem,
    config: &SessionConfig,
) -> mipforge_session::Result<SolveOutcome> {
    #[cfg(feature = "console")]
    mipforge_console::init();

    let registry = Arc::new(SolverRegistry::new());
    let handle = registry.register(SimplexSolver::new(problem))?;
    let manager = SessionManager::with_config(Arc::clone(&registry), config.clone());

    let id = manager.create(handle)?;
    let summary = manager.branch_and_bound(id)?;
    let solution = if summary.has_solution() {
        Some(manager.best_solution(id)?)
    } else {
        None
    };
    manager.dispose(id)?;
    registry.release(handle)?;

    debug!(event = "solve_done", status = summary.status.as_str());
    Ok(SolveOutcome { summary, solution })
}
