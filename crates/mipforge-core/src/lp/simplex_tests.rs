//! Tests for the dense simplex.

use super::*;

const TOL: f64 = 1e-7;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOL,
        "expected {}, got {}",
        expected,
        actual
    );
}

#[test]
fn test_maximize_textbook_lp() {
    // max 3x + 5y  s.t.  x <= 4, 2y <= 12, 3x + 2y <= 18
    let mut problem = LpProblem::maximize("wyndor");
    let x = problem
        .add_column(Column::continuous("x", 0.0, f64::INFINITY, 3.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, f64::INFINITY, 5.0))
        .unwrap();
    problem.add_row(Row::le("plant1", vec![(x, 1.0)], 4.0)).unwrap();
    problem.add_row(Row::le("plant2", vec![(y, 2.0)], 12.0)).unwrap();
    problem
        .add_row(Row::le("plant3", vec![(x, 3.0), (y, 2.0)], 18.0))
        .unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.objective_value().unwrap(), 36.0);
    assert_close(solver.col_solution()[x], 2.0);
    assert_close(solver.col_solution()[y], 6.0);
}

#[test]
fn test_minimize_with_ge_and_eq_rows() {
    // min 2x + 3y  s.t.  x + y >= 4, x - y == 1
    let mut problem = LpProblem::minimize("mixed");
    let x = problem
        .add_column(Column::continuous("x", 0.0, f64::INFINITY, 2.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, f64::INFINITY, 3.0))
        .unwrap();
    problem
        .add_row(Row::ge("cover", vec![(x, 1.0), (y, 1.0)], 4.0))
        .unwrap();
    problem
        .add_row(Row::eq("link", vec![(x, 1.0), (y, -1.0)], 1.0))
        .unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.col_solution()[x], 2.5);
    assert_close(solver.col_solution()[y], 1.5);
    assert_close(solver.objective_value().unwrap(), 9.5);
}

#[test]
fn test_bounds_shifted_mirrored_and_free() {
    // min x - y + z  with x in [2, 5], y in (-inf, 3], z free, z >= -1 via row
    let mut problem = LpProblem::minimize("bounds");
    let x = problem
        .add_column(Column::continuous("x", 2.0, 5.0, 1.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", f64::NEG_INFINITY, 3.0, -1.0))
        .unwrap();
    let z = problem
        .add_column(Column::continuous(
            "z",
            f64::NEG_INFINITY,
            f64::INFINITY,
            1.0,
        ))
        .unwrap();
    problem.add_row(Row::ge("z_floor", vec![(z, 1.0)], -1.0)).unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.col_solution()[x], 2.0);
    assert_close(solver.col_solution()[y], 3.0);
    assert_close(solver.col_solution()[z], -1.0);
    assert_close(solver.objective_value().unwrap(), -2.0);
}

#[test]
fn test_infeasible() {
    let mut problem = LpProblem::minimize("infeasible");
    let x = problem
        .add_column(Column::continuous("x", 0.0, 1.0, 1.0))
        .unwrap();
    problem.add_row(Row::ge("too_big", vec![(x, 1.0)], 2.0)).unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Infeasible);
    assert!(solver.col_solution().is_empty());
    assert_eq!(solver.objective_value(), None);
}

#[test]
fn test_unbounded() {
    let mut problem = LpProblem::maximize("unbounded");
    let x = problem
        .add_column(Column::continuous("x", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    problem
        .add_row(Row::le("diff", vec![(x, 1.0), (y, -1.0)], 1.0))
        .unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Unbounded);
}

#[test]
fn test_fixed_column_and_redundant_equalities() {
    let mut problem = LpProblem::minimize("redundant");
    let x = problem
        .add_column(Column::continuous("x", 1.0, 1.0, 1.0))
        .unwrap();
    let y = problem
        .add_column(Column::continuous("y", 0.0, 10.0, 1.0))
        .unwrap();
    problem
        .add_row(Row::eq("sum", vec![(x, 1.0), (y, 1.0)], 4.0))
        .unwrap();
    problem
        .add_row(Row::eq("sum_twice", vec![(x, 2.0), (y, 2.0)], 8.0))
        .unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.col_solution()[x], 1.0);
    assert_close(solver.col_solution()[y], 3.0);
}

#[test]
fn test_iteration_limit() {
    let mut problem = LpProblem::maximize("limited");
    let x = problem
        .add_column(Column::continuous("x", 0.0, f64::INFINITY, 1.0))
        .unwrap();
    problem.add_row(Row::le("cap", vec![(x, 1.0)], 3.0)).unwrap();

    let mut solver = SimplexSolver::new(problem).with_iteration_limit(0);
    assert_eq!(solver.solve(), LpStatus::IterationLimit);
}

#[test]
fn test_mutation_invalidates_and_resolve_follows_bounds() {
    let mut problem = LpProblem::maximize("resolve");
    let x = problem
        .add_column(Column::continuous("x", 0.0, 4.0, 1.0))
        .unwrap();

    let mut solver = SimplexSolver::new(problem);
    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.objective_value().unwrap(), 4.0);

    solver.set_col_upper(x, 2.5).unwrap();
    assert_eq!(solver.status(), LpStatus::Unsolved);
    assert!(solver.col_solution().is_empty());

    assert_eq!(solver.solve(), LpStatus::Optimal);
    assert_close(solver.col_solution()[x], 2.5);
}

#[test]
fn test_clone_solver_is_independent() {
    let mut problem = LpProblem::minimize("clone");
    let x = problem
        .add_column(Column::continuous("x", 1.0, 4.0, 1.0))
        .unwrap();
    let original: Box<dyn LpSolver> = Box::new(SimplexSolver::new(problem));
    let mut copy = original.clone();
    copy.set_col_lower(x, 3.0).unwrap();

    assert_eq!(original.col_lower(x).unwrap(), 1.0);
    assert_eq!(copy.col_lower(x).unwrap(), 3.0);
}
