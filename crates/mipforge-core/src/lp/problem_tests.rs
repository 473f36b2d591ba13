//! Tests for LpProblem construction and mutation.

use super::*;
use crate::error::LpError;

fn two_column_problem() -> LpProblem {
    let mut problem = LpProblem::minimize("two");
    problem
        .add_column(Column::continuous("x", 0.0, 10.0, 1.0))
        .unwrap();
    problem.add_column(Column::integer("y", -5.0, 5.0, 2.0)).unwrap();
    problem
        .add_row(Row::ge("demand", vec![(0, 1.0), (1, 1.0)], 3.0))
        .unwrap();
    problem
}

#[test]
fn test_add_row_rejects_unknown_column() {
    let mut problem = two_column_problem();
    let err = problem
        .add_row(Row::le("bad", vec![(7, 1.0)], 1.0))
        .unwrap_err();
    assert_eq!(err, LpError::ColumnOutOfRange { index: 7, len: 2 });
    assert_eq!(problem.num_rows(), 1);
}

#[test]
fn test_add_row_rejects_inverted_bounds() {
    let mut problem = two_column_problem();
    let err = problem
        .add_row(Row::new("inverted", vec![(0, 1.0)], 4.0, 2.0))
        .unwrap_err();
    assert!(matches!(err, LpError::InvalidBounds { .. }));
}

#[test]
fn test_add_column_rejects_nan_objective() {
    let mut problem = LpProblem::minimize("nan");
    let err = problem
        .add_column(Column::continuous("x", 0.0, 1.0, f64::NAN))
        .unwrap_err();
    assert!(matches!(err, LpError::NonFiniteCoefficient { .. }));
}

#[test]
fn test_set_bounds_validates() {
    let mut problem = two_column_problem();
    problem.set_col_upper(0, 4.0).unwrap();
    assert_eq!(problem.column(0).unwrap().upper, 4.0);

    assert!(problem.set_col_lower(0, 5.0).is_err());
    assert!(problem.set_col_bounds(0, f64::INFINITY, f64::INFINITY).is_err());
    assert!(problem.set_col_bounds(1, 2.0, 2.0).is_ok());
    assert_eq!(problem.col_lower(), vec![0.0, 2.0]);
    assert_eq!(problem.col_upper(), vec![4.0, 2.0]);
}

#[test]
fn test_set_objective_and_integrality() {
    let mut problem = two_column_problem();
    problem.set_objective_coefficient(1, -3.0).unwrap();
    problem.set_integer(0, true).unwrap();
    assert_eq!(problem.objective(), vec![1.0, -3.0]);
    assert!(problem.column(0).unwrap().integer);
    assert!(problem.set_integer(9, true).is_err());
}

#[test]
fn test_max_violation() {
    let problem = two_column_problem();
    assert_eq!(problem.max_violation(&[1.0, 2.0]), 0.0);
    // demand row short by 1
    assert_eq!(problem.max_violation(&[0.0, 2.0]), 1.0);
    // y is integer
    assert!((problem.max_violation(&[2.5, 0.5]) - 0.5).abs() < 1e-12);
    assert_eq!(problem.max_violation(&[1.0]), f64::INFINITY);
}

#[test]
fn test_objective_sense_improves() {
    assert!(ObjectiveSense::Minimize.improves(1.0, 2.0, 1e-9));
    assert!(!ObjectiveSense::Minimize.improves(2.0, 2.0, 1e-9));
    assert!(ObjectiveSense::Maximize.improves(3.0, 2.0, 1e-9));
    assert!(!ObjectiveSense::Maximize.improves(1.0, 2.0, 1e-9));
}

#[test]
fn test_write_lp_sections() {
    let mut problem = two_column_problem();
    problem
        .add_row(Row::new("range", vec![(0, 2.0), (1, -1.0)], 1.0, 6.0))
        .unwrap();
    let text = write_lp(&problem);
    assert!(text.contains("Minimize\n obj: x + 2 y\n"));
    assert!(text.contains(" demand: x + y >= 3\n"));
    assert!(text.contains(" range_lo: 2 x - y >= 1\n"));
    assert!(text.contains(" range_hi: 2 x - y <= 6\n"));
    assert!(text.contains(" 0 <= x <= 10\n"));
    assert!(text.contains(" -5 <= y <= 5\n"));
    assert!(text.contains("General\n y\n"));
}
