//! Dense two-phase simplex.
//!
//! Columns are mapped onto non-negative variables (shifted by a finite
//! lower bound, mirrored at a finite upper bound, or split when free),
//! finite upper bounds of shifted columns become explicit rows, and the
//! resulting standard form is solved on a dense tableau. Bland's rule
//! picks entering and leaving variables, so the method cannot cycle.

use super::problem::LpProblem;
use super::solver::{LpSolver, LpStatus};

const PIVOT_TOLERANCE: f64 = 1e-9;
const FEASIBILITY_TOLERANCE: f64 = 1e-7;
const ZERO_TOLERANCE: f64 = 1e-12;

/// Default cap on pivots per solve.
pub const DEFAULT_ITERATION_LIMIT: usize = 100_000;

/// Reference [`LpSolver`] for small and medium models.
#[derive(Debug, Clone)]
pub struct SimplexSolver {
    problem: LpProblem,
    iteration_limit: usize,
    status: LpStatus,
    solution: Vec<f64>,
    objective: Option<f64>,
    iterations: usize,
}

impl SimplexSolver {
    pub fn new(problem: LpProblem) -> Self {
        Self {
            problem,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            status: LpStatus::Unsolved,
            solution: Vec::new(),
            objective: None,
            iterations: 0,
        }
    }

    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Pivots performed by the last solve.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn invalidate(&mut self) {
        self.status = LpStatus::Unsolved;
        self.solution.clear();
        self.objective = None;
    }
}

impl LpSolver for SimplexSolver {
    fn problem(&self) -> &LpProblem {
        &self.problem
    }

    fn problem_mut(&mut self) -> &mut LpProblem {
        self.invalidate();
        &mut self.problem
    }

    fn solve(&mut self) -> LpStatus {
        self.invalidate();
        self.iterations = 0;

        let form = match StandardForm::build(&self.problem) {
            Some(form) => form,
            None => {
                self.status = LpStatus::Infeasible;
                return self.status;
            }
        };

        let mut tableau = Tableau::new(&form);
        match tableau.solve(&form.cost, self.iteration_limit) {
            Ok(()) => {
                let y = tableau.primal(form.num_vars);
                let x = form.recover(&y);
                self.objective = Some(self.problem.objective_value(&x));
                self.solution = x;
                self.status = LpStatus::Optimal;
            }
            Err(status) => self.status = status,
        }
        self.iterations = tableau.iterations;
        self.status
    }

    fn status(&self) -> LpStatus {
        self.status
    }

    fn col_solution(&self) -> &[f64] {
        &self.solution
    }

    fn objective_value(&self) -> Option<f64> {
        self.objective
    }

    fn clone_solver(&self) -> Box<dyn LpSolver> {
        Box::new(self.clone())
    }
}

#[derive(Debug, Clone, Copy)]
enum ColumnMap {
    /// x = offset + y
    Shifted { var: usize, offset: f64 },
    /// x = offset - y
    Mirrored { var: usize, offset: f64 },
    /// x = y+ - y-
    Free { pos: usize, neg: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sense {
    Le,
    Ge,
    Eq,
}

#[derive(Debug)]
struct StandardRow {
    coefficients: Vec<f64>,
    sense: Sense,
    rhs: f64,
}

/// `min cost·y  s.t.  rows, y >= 0`
#[derive(Debug)]
struct StandardForm {
    num_vars: usize,
    cost: Vec<f64>,
    rows: Vec<StandardRow>,
    map: Vec<ColumnMap>,
}

impl StandardForm {
    /// Returns `None` when a column has crossed bounds.
    fn build(problem: &LpProblem) -> Option<Self> {
        let sign = problem.sense().sign();
        let mut map = Vec::with_capacity(problem.num_cols());
        let mut num_vars = 0;
        for column in problem.columns() {
            if column.lower > column.upper + FEASIBILITY_TOLERANCE {
                return None;
            }
            let entry = if column.lower.is_finite() {
                ColumnMap::Shifted {
                    var: num_vars,
                    offset: column.lower,
                }
            } else if column.upper.is_finite() {
                ColumnMap::Mirrored {
                    var: num_vars,
                    offset: column.upper,
                }
            } else {
                num_vars += 1;
                ColumnMap::Free {
                    pos: num_vars - 1,
                    neg: num_vars,
                }
            };
            num_vars += 1;
            map.push(entry);
        }

        let mut cost = vec![0.0; num_vars];
        for (column, entry) in problem.columns().iter().zip(&map) {
            let c = sign * column.objective;
            match *entry {
                ColumnMap::Shifted { var, .. } => cost[var] = c,
                ColumnMap::Mirrored { var, .. } => cost[var] = -c,
                ColumnMap::Free { pos, neg } => {
                    cost[pos] = c;
                    cost[neg] = -c;
                }
            }
        }

        let mut rows = Vec::new();
        for row in problem.rows() {
            let mut coefficients = vec![0.0; num_vars];
            let mut constant = 0.0;
            for &(col, a) in &row.coefficients {
                match map[col] {
                    ColumnMap::Shifted { var, offset } => {
                        coefficients[var] += a;
                        constant += a * offset;
                    }
                    ColumnMap::Mirrored { var, offset } => {
                        coefficients[var] -= a;
                        constant += a * offset;
                    }
                    ColumnMap::Free { pos, neg } => {
                        coefficients[pos] += a;
                        coefficients[neg] -= a;
                    }
                }
            }

            let lower = row.lower - constant;
            let upper = row.upper - constant;
            if row.lower.is_finite()
                && row.upper.is_finite()
                && (upper - lower).abs() <= FEASIBILITY_TOLERANCE
            {
                rows.push(StandardRow::new(coefficients, Sense::Eq, lower));
                continue;
            }
            if row.lower.is_finite() {
                rows.push(StandardRow::new(coefficients.clone(), Sense::Ge, lower));
            }
            if row.upper.is_finite() {
                rows.push(StandardRow::new(coefficients, Sense::Le, upper));
            }
        }

        for (column, entry) in problem.columns().iter().zip(&map) {
            if let ColumnMap::Shifted { var, offset } = *entry {
                if column.upper.is_finite() {
                    let mut coefficients = vec![0.0; num_vars];
                    coefficients[var] = 1.0;
                    rows.push(StandardRow::new(
                        coefficients,
                        Sense::Le,
                        column.upper - offset,
                    ));
                }
            }
        }

        Some(Self {
            num_vars,
            cost,
            rows,
            map,
        })
    }

    fn recover(&self, y: &[f64]) -> Vec<f64> {
        self.map
            .iter()
            .map(|entry| match *entry {
                ColumnMap::Shifted { var, offset } => offset + y[var],
                ColumnMap::Mirrored { var, offset } => offset - y[var],
                ColumnMap::Free { pos, neg } => y[pos] - y[neg],
            })
            .collect()
    }
}

impl StandardRow {
    /// Normalizes to a non-negative right-hand side.
    fn new(mut coefficients: Vec<f64>, sense: Sense, rhs: f64) -> Self {
        if rhs >= 0.0 {
            return Self {
                coefficients,
                sense,
                rhs,
            };
        }
        coefficients.iter_mut().for_each(|a| *a = -*a);
        let sense = match sense {
            Sense::Le => Sense::Ge,
            Sense::Ge => Sense::Le,
            Sense::Eq => Sense::Eq,
        };
        Self {
            coefficients,
            sense,
            rhs: -rhs,
        }
    }
}

/// Dense tableau with structural, slack and artificial columns.
struct Tableau {
    cells: Vec<Vec<f64>>,
    basis: Vec<usize>,
    /// First artificial column; everything at or past it is artificial.
    first_artificial: usize,
    width: usize,
    iterations: usize,
}

impl Tableau {
    fn new(form: &StandardForm) -> Self {
        let m = form.rows.len();
        let slacks = form.rows.iter().filter(|r| r.sense != Sense::Eq).count();
        let artificials = form.rows.iter().filter(|r| r.sense != Sense::Le).count();
        let first_slack = form.num_vars;
        let first_artificial = first_slack + slacks;
        let width = first_artificial + artificials;

        let mut cells = Vec::with_capacity(m);
        let mut basis = Vec::with_capacity(m);
        let mut next_slack = first_slack;
        let mut next_artificial = first_artificial;
        for row in &form.rows {
            let mut line = vec![0.0; width + 1];
            line[..form.num_vars].copy_from_slice(&row.coefficients);
            line[width] = row.rhs;
            match row.sense {
                Sense::Le => {
                    line[next_slack] = 1.0;
                    basis.push(next_slack);
                    next_slack += 1;
                }
                Sense::Ge => {
                    line[next_slack] = -1.0;
                    next_slack += 1;
                    line[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
                Sense::Eq => {
                    line[next_artificial] = 1.0;
                    basis.push(next_artificial);
                    next_artificial += 1;
                }
            }
            cells.push(line);
        }

        Self {
            cells,
            basis,
            first_artificial,
            width,
            iterations: 0,
        }
    }

    fn solve(&mut self, cost: &[f64], iteration_limit: usize) -> Result<(), LpStatus> {
        if self.first_artificial < self.width {
            let mut phase_one = vec![0.0; self.width];
            phase_one[self.first_artificial..].iter_mut().for_each(|c| *c = 1.0);
            self.run(&phase_one, self.width, iteration_limit)?;

            let infeasibility: f64 = self
                .basis
                .iter()
                .zip(&self.cells)
                .filter(|(&b, _)| b >= self.first_artificial)
                .map(|(_, line)| line[self.width])
                .sum();
            if infeasibility > FEASIBILITY_TOLERANCE {
                return Err(LpStatus::Infeasible);
            }
            self.drive_out_artificials();
        }

        let mut phase_two = vec![0.0; self.width];
        phase_two[..cost.len()].copy_from_slice(cost);
        self.run(&phase_two, self.first_artificial, iteration_limit)
    }

    /// Primal simplex on `cost`, only letting columns below `allowed` enter.
    fn run(&mut self, cost: &[f64], allowed: usize, iteration_limit: usize) -> Result<(), LpStatus> {
        let rhs = self.width;
        loop {
            let mut in_basis = vec![false; self.width];
            for &b in &self.basis {
                in_basis[b] = true;
            }

            let entering = (0..allowed).find(|&j| {
                !in_basis[j] && {
                    let reduced = cost[j]
                        - self
                            .basis
                            .iter()
                            .zip(&self.cells)
                            .map(|(&b, line)| cost[b] * line[j])
                            .sum::<f64>();
                    reduced < -PIVOT_TOLERANCE
                }
            });
            let Some(col) = entering else {
                return Ok(());
            };

            if self.iterations >= iteration_limit {
                return Err(LpStatus::IterationLimit);
            }

            let mut leaving: Option<(usize, f64)> = None;
            for (i, line) in self.cells.iter().enumerate() {
                let a = line[col];
                if a <= PIVOT_TOLERANCE {
                    continue;
                }
                let ratio = line[rhs] / a;
                leaving = match leaving {
                    Some((best, best_ratio))
                        if ratio > best_ratio + ZERO_TOLERANCE
                            || ((ratio - best_ratio).abs() <= ZERO_TOLERANCE
                                && self.basis[i] > self.basis[best]) =>
                    {
                        Some((best, best_ratio))
                    }
                    _ => Some((i, ratio)),
                };
            }
            let Some((row, _)) = leaving else {
                return Err(LpStatus::Unbounded);
            };

            self.pivot(row, col);
        }
    }

    fn drive_out_artificials(&mut self) {
        for row in 0..self.basis.len() {
            if self.basis[row] < self.first_artificial {
                continue;
            }
            let replacement = (0..self.first_artificial)
                .find(|&j| self.cells[row][j].abs() > PIVOT_TOLERANCE);
            // A row without replacement is redundant; its artificial stays at zero.
            if let Some(col) = replacement {
                self.pivot(row, col);
            }
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let pivot = self.cells[row][col];
        self.cells[row].iter_mut().for_each(|v| *v /= pivot);
        let pivot_line = self.cells[row].clone();
        for (i, line) in self.cells.iter_mut().enumerate() {
            if i == row {
                continue;
            }
            let factor = line[col];
            if factor == 0.0 {
                continue;
            }
            for (v, p) in line.iter_mut().zip(&pivot_line) {
                *v -= factor * p;
                if v.abs() < ZERO_TOLERANCE {
                    *v = 0.0;
                }
            }
        }
        self.basis[row] = col;
        self.iterations += 1;
    }

    fn primal(&self, num_vars: usize) -> Vec<f64> {
        let mut y = vec![0.0; num_vars];
        for (&b, line) in self.basis.iter().zip(&self.cells) {
            if b < num_vars {
                y[b] = line[self.width].max(0.0);
            }
        }
        y
    }
}
