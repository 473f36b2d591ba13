//! 0/1 knapsack models.

use mipforge_core::{Column, LpProblem, Row};

/// Builds `max sum(values[i] * x_i)` s.t. `sum(weights[i] * x_i) <= capacity`, `x_i` binary.
pub fn knapsack(values: &[f64], weights: &[f64], capacity: f64) -> LpProblem {
    assert_eq!(values.len(), weights.len(), "values and weights differ in length");
    let mut problem = LpProblem::maximize("knapsack");
    let mut coefficients = Vec::with_capacity(values.len());
    for (i, (&value, &weight)) in values.iter().zip(weights).enumerate() {
        let col = problem
            .add_column(Column::binary(format!("item_{}", i), value))
            .unwrap();
        coefficients.push((col, weight));
    }
    problem
        .add_row(Row::le("capacity", coefficients, capacity))
        .unwrap();
    problem
}

/// Four items, capacity 10. Optimum 23 by taking items 0 and 1.
pub fn small_knapsack() -> LpProblem {
    knapsack(&[10.0, 13.0, 7.0, 8.0], &[4.0, 6.0, 3.0, 5.0], 10.0)
}

/// Twelve items whose tree takes well over ten nodes to close.
pub fn medium_knapsack() -> LpProblem {
    knapsack(
        &[
            23.0, 31.0, 29.0, 44.0, 53.0, 38.0, 63.0, 85.0, 89.0, 82.0, 41.0, 37.0,
        ],
        &[
            92.0, 57.0, 49.0, 68.0, 60.0, 43.0, 67.0, 84.0, 87.0, 72.0, 52.0, 45.0,
        ],
        165.0,
    )
}
