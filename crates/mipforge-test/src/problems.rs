//! Small models with hand-checked optima.

use mipforge_core::{Column, LpProblem, Row};

/// `max 5x + 8y` s.t. `x + y <= 6`, `5x + 9y <= 45`, `x, y >= 0` integer.
///
/// Relaxation optimum 41.25 at (2.25, 3.75); integer optimum 40 at (0, 5).
pub fn textbook_mip() -> LpProblem {
    let mut problem = LpProblem::maximize("textbook");
    let x = problem
        .add_column(Column::integer("x", 0.0, f64::INFINITY, 5.0))
        .unwrap();
    let y = problem
        .add_column(Column::integer("y", 0.0, f64::INFINITY, 8.0))
        .unwrap();
    problem
        .add_row(Row::le("total", vec![(x, 1.0), (y, 1.0)], 6.0))
        .unwrap();
    problem
        .add_row(Row::le("budget", vec![(x, 5.0), (y, 9.0)], 45.0))
        .unwrap();
    problem
}

/// `max 3x + 2y` s.t. `2x + y <= 7`, `x + 2y <= 6`, `x` integer, `y` continuous.
///
/// Relaxation optimum 34/3 at (8/3, 5/3); mixed optimum 11 at (3, 1).
pub fn mixed_mip() -> LpProblem {
    let mut problem = LpProblem::maximize("mixed");
    let x = problem
        .add_column(Column::integer("x", 0.0, f64::INFINITY, 3.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, f64::INFINITY, 2.0))
        .unwrap();
    problem
        .add_row(Row::le("first", vec![(x, 2.0), (y, 1.0)], 7.0))
        .unwrap();
    problem
        .add_row(Row::le("second", vec![(x, 1.0), (y, 2.0)], 6.0))
        .unwrap();
    problem
}

/// `2x = 3` with `x` integer in `[0, 10]`: the relaxation is feasible, no integer point is.
pub fn infeasible_mip() -> LpProblem {
    let mut problem = LpProblem::minimize("odd_half");
    let x = problem
        .add_column(Column::integer("x", 0.0, 10.0, 1.0))
        .unwrap();
    problem.add_row(Row::eq("half", vec![(x, 2.0)], 3.0)).unwrap();
    problem
}

/// `x + y >= 5` and `x + y <= 3`: the relaxation itself is infeasible.
pub fn infeasible_lp() -> LpProblem {
    let mut problem = LpProblem::minimize("contradiction");
    let x = problem
        .add_column(Column::continuous("x", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    let y = problem
        .add_column(Column::integer("y", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    problem
        .add_row(Row::ge("at_least", vec![(x, 1.0), (y, 1.0)], 5.0))
        .unwrap();
    problem
        .add_row(Row::le("at_most", vec![(x, 1.0), (y, 1.0)], 3.0))
        .unwrap();
    problem
}

/// `max x + y` s.t. `x - y <= 1` with `y` unbounded above.
pub fn unbounded_lp() -> LpProblem {
    let mut problem = LpProblem::maximize("open");
    let x = problem
        .add_column(Column::integer("x", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    problem
        .add_row(Row::le("gap", vec![(x, 1.0), (y, -1.0)], 1.0))
        .unwrap();
    problem
}
