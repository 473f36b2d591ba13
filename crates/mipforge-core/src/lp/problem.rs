//! Mixed-integer linear model.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{LpError, Result};

/// Direction of optimization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

impl ObjectiveSense {
    /// Multiplier that turns this sense into minimization.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        }
    }

    /// Returns true if `candidate` is strictly better than `incumbent` by more than `tolerance`.
    #[inline]
    pub fn improves(self, candidate: f64, incumbent: f64, tolerance: f64) -> bool {
        self.sign() * candidate < self.sign() * incumbent - tolerance
    }
}

impl std::fmt::Display for ObjectiveSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveSense::Minimize => write!(f, "Minimize"),
            ObjectiveSense::Maximize => write!(f, "Maximize"),
        }
    }
}

/// A decision variable.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Column {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub objective: f64,
    pub integer: bool,
}

impl Column {
    /// Continuous variable in `[lower, upper]`.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64, objective: f64) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            objective,
            integer: false,
        }
    }

    /// Integer variable in `[lower, upper]`.
    pub fn integer(name: impl Into<String>, lower: f64, upper: f64, objective: f64) -> Self {
        Self {
            integer: true,
            ..Self::continuous(name, lower, upper, objective)
        }
    }

    /// 0/1 variable.
    pub fn binary(name: impl Into<String>, objective: f64) -> Self {
        Self::integer(name, 0.0, 1.0, objective)
    }
}

/// A linear constraint `lower <= sum(a_j * x_j) <= upper`.
///
/// Either side may be infinite; `lower == upper` is an equality.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Row {
    pub name: String,
    pub coefficients: Vec<(usize, f64)>,
    pub lower: f64,
    pub upper: f64,
}

impl Row {
    pub fn new(
        name: impl Into<String>,
        coefficients: Vec<(usize, f64)>,
        lower: f64,
        upper: f64,
    ) -> Self {
        Self {
            name: name.into(),
            coefficients,
            lower,
            upper,
        }
    }

    /// `sum <= rhs`
    pub fn le(name: impl Into<String>, coefficients: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self::new(name, coefficients, f64::NEG_INFINITY, rhs)
    }

    /// `sum >= rhs`
    pub fn ge(name: impl Into<String>, coefficients: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self::new(name, coefficients, rhs, f64::INFINITY)
    }

    /// `sum == rhs`
    pub fn eq(name: impl Into<String>, coefficients: Vec<(usize, f64)>, rhs: f64) -> Self {
        Self::new(name, coefficients, rhs, rhs)
    }

    /// Row activity at point `x`.
    pub fn activity(&self, x: &[f64]) -> f64 {
        self.coefficients
            .iter()
            .map(|&(col, a)| a * x.get(col).copied().unwrap_or(0.0))
            .sum()
    }
}

/// A mixed-integer linear model: columns, rows and an objective sense.
///
/// # Example
///
/// ```
/// use mipforge_core::{Column, LpProblem, Row};
///
/// let mut problem = LpProblem::maximize("knapsack");
/// let a = problem.add_column(Column::binary("a", 5.0)).unwrap();
/// let b = problem.add_column(Column::binary("b", 4.0)).unwrap();
/// problem.add_row(Row::le("weight", vec![(a, 3.0), (b, 2.0)], 4.0)).unwrap();
///
/// assert_eq!(problem.num_cols(), 2);
/// assert_eq!(problem.objective_value(&[1.0, 0.0]), 5.0);
/// assert!(problem.is_feasible(&[1.0, 0.0], 1e-9));
/// assert!(!problem.is_feasible(&[1.0, 1.0], 1e-9));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LpProblem {
    name: String,
    sense: ObjectiveSense,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl LpProblem {
    pub fn new(name: impl Into<String>, sense: ObjectiveSense) -> Self {
        Self {
            name: name.into(),
            sense,
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn minimize(name: impl Into<String>) -> Self {
        Self::new(name, ObjectiveSense::Minimize)
    }

    pub fn maximize(name: impl Into<String>) -> Self {
        Self::new(name, ObjectiveSense::Maximize)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn set_sense(&mut self, sense: ObjectiveSense) {
        self.sense = sense;
    }

    #[inline]
    pub fn num_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[inline]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Appends a column and returns its index.
    pub fn add_column(&mut self, column: Column) -> Result<usize> {
        check_bounds(&column.name, column.lower, column.upper)?;
        check_finite(&column.name, column.objective)?;
        self.columns.push(column);
        Ok(self.columns.len() - 1)
    }

    /// Appends a row and returns its index.
    ///
    /// Every referenced column must already exist.
    pub fn add_row(&mut self, row: Row) -> Result<usize> {
        if row.lower.is_nan() || row.upper.is_nan() || row.lower > row.upper {
            return Err(LpError::InvalidBounds {
                target: row.name,
                lower: row.lower,
                upper: row.upper,
            });
        }
        for &(col, a) in &row.coefficients {
            self.check_column(col)?;
            check_finite(&row.name, a)?;
        }
        self.rows.push(row);
        Ok(self.rows.len() - 1)
    }

    pub fn column(&self, col: usize) -> Result<&Column> {
        self.check_column(col)?;
        Ok(&self.columns[col])
    }

    pub fn row(&self, row: usize) -> Result<&Row> {
        self.rows.get(row).ok_or(LpError::RowOutOfRange {
            index: row,
            len: self.rows.len(),
        })
    }

    pub fn set_col_lower(&mut self, col: usize, lower: f64) -> Result<()> {
        let upper = self.column(col)?.upper;
        self.set_col_bounds(col, lower, upper)
    }

    pub fn set_col_upper(&mut self, col: usize, upper: f64) -> Result<()> {
        let lower = self.column(col)?.lower;
        self.set_col_bounds(col, lower, upper)
    }

    /// Replaces both bounds of a column at once.
    pub fn set_col_bounds(&mut self, col: usize, lower: f64, upper: f64) -> Result<()> {
        self.check_column(col)?;
        let column = &mut self.columns[col];
        check_bounds(&column.name, lower, upper)?;
        column.lower = lower;
        column.upper = upper;
        Ok(())
    }

    pub fn set_objective_coefficient(&mut self, col: usize, value: f64) -> Result<()> {
        self.check_column(col)?;
        let column = &mut self.columns[col];
        check_finite(&column.name, value)?;
        column.objective = value;
        Ok(())
    }

    pub fn set_integer(&mut self, col: usize, integer: bool) -> Result<()> {
        self.check_column(col)?;
        self.columns[col].integer = integer;
        Ok(())
    }

    /// Lower bounds of all columns, in column order.
    pub fn col_lower(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.lower).collect()
    }

    /// Upper bounds of all columns, in column order.
    pub fn col_upper(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.upper).collect()
    }

    /// Objective coefficients of all columns, in column order.
    pub fn objective(&self) -> Vec<f64> {
        self.columns.iter().map(|c| c.objective).collect()
    }

    pub fn objective_value(&self, x: &[f64]) -> f64 {
        self.columns
            .iter()
            .zip(x)
            .map(|(c, v)| c.objective * v)
            .sum()
    }

    /// Largest violation of any bound, row or integrality requirement at `x`.
    ///
    /// Returns `f64::INFINITY` if `x` has the wrong length.
    pub fn max_violation(&self, x: &[f64]) -> f64 {
        if x.len() != self.columns.len() {
            return f64::INFINITY;
        }
        let mut worst: f64 = 0.0;
        for (column, &v) in self.columns.iter().zip(x) {
            worst = worst.max(column.lower - v).max(v - column.upper);
            if column.integer {
                worst = worst.max((v - v.round()).abs());
            }
        }
        for row in &self.rows {
            let activity = row.activity(x);
            worst = worst.max(row.lower - activity).max(activity - row.upper);
        }
        worst
    }

    pub fn is_feasible(&self, x: &[f64], tolerance: f64) -> bool {
        self.max_violation(x) <= tolerance
    }

    fn check_column(&self, col: usize) -> Result<()> {
        if col < self.columns.len() {
            Ok(())
        } else {
            Err(LpError::ColumnOutOfRange {
                index: col,
                len: self.columns.len(),
            })
        }
    }
}

fn check_bounds(target: &str, lower: f64, upper: f64) -> Result<()> {
    let invalid = lower.is_nan()
        || upper.is_nan()
        || lower == f64::INFINITY
        || upper == f64::NEG_INFINITY
        || lower > upper;
    if invalid {
        return Err(LpError::InvalidBounds {
            target: target.to_string(),
            lower,
            upper,
        });
    }
    Ok(())
}

fn check_finite(target: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LpError::NonFiniteCoefficient {
            target: target.to_string(),
            value,
        })
    }
}
