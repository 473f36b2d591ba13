//! Feasibility assertions.

use mipforge_core::LpProblem;

/// Slack allowed when checking rows, bounds and integrality.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// Panics unless `solution` has one entry per column and satisfies every
/// bound, row and integrality restriction of `problem`.
#[track_caller]
pub fn assert_feasible(problem: &LpProblem, solution: &[f64]) {
    assert_eq!(
        solution.len(),
        problem.num_cols(),
        "solution length does not match column count of {}",
        problem.name()
    );
    let violation = problem.max_violation(solution);
    assert!(
        violation <= FEASIBILITY_TOLERANCE,
        "solution {:?} violates {} by {}",
        solution,
        problem.name(),
        violation
    );
}

/// Panics unless `actual` is within `1e-6` of `expected`.
#[track_caller]
pub fn assert_objective(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= 1e-6,
        "objective {} differs from expected {}",
        actual,
        expected
    );
}
