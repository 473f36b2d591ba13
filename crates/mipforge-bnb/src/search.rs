//! The tree search driven by [`BranchAndBoundModel`](crate::BranchAndBoundModel).
//!
//! Each call restarts from the root bounds of the working solver; nothing
//! carries over from an earlier search. The working solver's bounds are
//! restored to their root values before returning.

use std::time::Instant;

use mipforge_core::{LpSolver, LpStatus, ObjectiveSense};
use tracing::{debug, info, trace, warn};

use crate::node::{OpenNodes, SearchNode};
use crate::result::{SearchStatus, SearchSummary, TerminationReason};
use crate::stats::SearchStatistics;
use crate::termination::SearchLimits;

/// Relative slack when comparing objective values.
const OBJECTIVE_TOLERANCE: f64 = 1e-9;

/// Best integer solution found by a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Incumbent {
    pub values: Vec<f64>,
    pub objective: f64,
}

pub(crate) struct TreeSearch<'a> {
    solver: &'a mut dyn LpSolver,
    limits: &'a SearchLimits,
    log_level: u8,
    sense: ObjectiveSense,
    root_lower: Vec<f64>,
    root_upper: Vec<f64>,
    /// Columns whose bounds currently differ from the root.
    applied: Vec<usize>,
    stats: SearchStatistics,
    incumbent: Option<Incumbent>,
}

impl<'a> TreeSearch<'a> {
    pub(crate) fn new(solver: &'a mut dyn LpSolver, limits: &'a SearchLimits, log_level: u8) -> Self {
        let problem = solver.problem();
        let sense = problem.sense();
        let root_lower = problem.col_lower();
        let root_upper = problem.col_upper();
        Self {
            solver,
            limits,
            log_level,
            sense,
            root_lower,
            root_upper,
            applied: Vec::new(),
            stats: SearchStatistics::default(),
            incumbent: None,
        }
    }

    pub(crate) fn run(mut self) -> (SearchSummary, Option<Incumbent>) {
        let start = Instant::now();
        let integers = self
            .solver
            .problem()
            .columns()
            .iter()
            .filter(|c| c.integer)
            .count();

        if self.log_level >= 1 {
            info!(
                event = "search_start",
                columns = self.solver.num_cols(),
                rows = self.solver.num_rows(),
                integers = integers,
                sense = %self.sense,
            );
        }

        let mut open = OpenNodes::new(self.limits.node_selection);
        open.push(SearchNode::root());

        let mut termination = TerminationReason::Completed;
        let mut unbounded = false;
        // Set when part of the tree was dropped without proof (depth limit, LP failure).
        let mut incomplete = false;

        while let Some(node) = open.pop() {
            if let Some(reason) = self.limits.check(self.stats.nodes_explored, start.elapsed()) {
                termination = reason;
                break;
            }
            if self.is_dominated(node.bound()) {
                self.stats.on_pruning_bound();
                continue;
            }

            self.stats.on_node_explored(node.depth());
            let node_index = self.stats.nodes_explored;
            if self.log_level >= 3 {
                trace!(
                    event = "node",
                    node = node_index,
                    depth = node.depth() as u64,
                    bound = node.bound(),
                    open = open.len() as u64,
                );
            }

            if !self.apply(&node) {
                self.stats.on_pruning_infeasible();
                continue;
            }

            let status = self.solver.solve();
            let objective = self.solver.objective_value();
            if self.log_level >= 4 {
                trace!(
                    event = "node_lp",
                    node = node_index,
                    status = %status,
                    objective = objective.unwrap_or(f64::NAN),
                );
            }

            let objective = match (status, objective) {
                (LpStatus::Optimal, Some(objective)) => objective,
                (LpStatus::Infeasible, _) => {
                    self.stats.on_pruning_infeasible();
                    continue;
                }
                (LpStatus::Unbounded, _) => {
                    unbounded = true;
                    break;
                }
                _ => {
                    self.stats.on_lp_failure();
                    incomplete = true;
                    continue;
                }
            };

            if node.depth() == 0 {
                self.stats.set_root_bound(objective);
            }
            let min_objective = self.sense.sign() * objective;
            if self.is_dominated(min_objective) {
                self.stats.on_pruning_bound();
                continue;
            }

            let values = self.solver.col_solution().to_vec();
            match self.select_branching_column(&values) {
                None => self.install_incumbent(values, node_index, node.depth()),
                Some(_) if self.limits.is_depth_exhausted(node.depth()) => {
                    self.stats.on_pruning_depth();
                    incomplete = true;
                }
                Some((col, value)) => {
                    self.branch(&mut open, &node, min_objective, col, value);
                }
            }
        }

        self.restore_root();
        self.stats.set_total_time(start.elapsed());

        let complete = termination == TerminationReason::Completed && !incomplete;
        let status = if unbounded {
            SearchStatus::Unbounded
        } else {
            match (&self.incumbent, complete) {
                (Some(_), true) => SearchStatus::Optimal,
                (Some(_), false) => SearchStatus::Feasible,
                (None, true) => SearchStatus::Infeasible,
                (None, false) => SearchStatus::NoSolutionFound,
            }
        };
        // An unbounded relaxation invalidates any incumbent as a result.
        let incumbent = if unbounded { None } else { self.incumbent };

        let summary = SearchSummary {
            status,
            termination,
            objective: incumbent.as_ref().map(|i| i.objective),
            statistics: self.stats,
        };

        if self.log_level >= 1 {
            info!(
                event = "search_end",
                status = status.as_str(),
                termination = %termination,
                objective = summary.objective.unwrap_or(f64::NAN),
                nodes = summary.statistics.nodes_explored,
                solutions = summary.statistics.solutions_found,
                duration_ms = summary.statistics.time_total.as_millis() as u64,
            );
        }

        (summary, incumbent)
    }

    /// True if a subtree with minimization bound `bound` cannot beat the incumbent.
    fn is_dominated(&self, bound: f64) -> bool {
        match &self.incumbent {
            Some(incumbent) => {
                let best = self.sense.sign() * incumbent.objective;
                bound >= best - OBJECTIVE_TOLERANCE * (1.0 + best.abs())
            }
            None => false,
        }
    }

    /// Most fractional integer column, if any.
    fn select_branching_column(&self, values: &[f64]) -> Option<(usize, f64)> {
        let tolerance = self.limits.integer_tolerance;
        let mut best: Option<(usize, f64, f64)> = None;
        for (col, &value) in values.iter().enumerate() {
            if !self.solver.is_integer(col) {
                continue;
            }
            let fraction = value - value.floor();
            let distance = fraction.min(1.0 - fraction);
            if distance <= tolerance {
                continue;
            }
            if best.map_or(true, |(_, _, d)| distance > d) {
                best = Some((col, value, distance));
            }
        }
        best.map(|(col, value, _)| (col, value))
    }

    fn install_incumbent(&mut self, mut values: Vec<f64>, node_index: u64, depth: usize) {
        for (col, value) in values.iter_mut().enumerate() {
            if self.solver.is_integer(col) {
                *value = value.round();
            }
        }
        let objective = self.solver.problem().objective_value(&values);
        let improves = self.incumbent.as_ref().map_or(true, |incumbent| {
            self.sense
                .improves(objective, incumbent.objective, OBJECTIVE_TOLERANCE)
        });
        if !improves {
            return;
        }

        self.stats.on_solution_found();
        if self.log_level >= 2 {
            debug!(
                event = "incumbent",
                objective = objective,
                node = node_index,
                depth = depth as u64,
            );
        }
        self.incumbent = Some(Incumbent { values, objective });
    }

    fn branch(&mut self, open: &mut OpenNodes, node: &SearchNode, bound: f64, col: usize, value: f64) {
        let (lower, upper) = node.col_bounds(col, &self.root_lower, &self.root_upper);
        let down = value.floor();
        let up = down + 1.0;

        let down_child = (down >= lower).then(|| node.child(bound, col, lower, down));
        let up_child = (up <= upper).then(|| node.child(bound, col, up, upper));

        // The child on the rounding side is pushed last so depth-first pops it first.
        let (first, second) = if value - down >= 0.5 {
            (down_child, up_child)
        } else {
            (up_child, down_child)
        };
        let mut children = 0;
        for child in [first, second].into_iter().flatten() {
            open.push(child);
            children += 1;
        }
        self.stats.on_branch(children);
    }

    /// Moves the working solver to `node`'s bounds. Returns false if they cross.
    fn apply(&mut self, node: &SearchNode) -> bool {
        self.restore_root();
        for change in node.changes() {
            if self
                .solver
                .set_col_bounds(change.col, change.lower, change.upper)
                .is_err()
            {
                return false;
            }
            self.applied.push(change.col);
        }
        true
    }

    /// Puts every column touched by the current node back to its root bounds.
    fn restore_root(&mut self) {
        for col in std::mem::take(&mut self.applied) {
            let (lower, upper) = (self.root_lower[col], self.root_upper[col]);
            if let Err(error) = self.solver.set_col_bounds(col, lower, upper) {
                warn!(
                    event = "restore_bounds_failed",
                    col = col as u64,
                    lower = lower,
                    upper = upper,
                    error = %error,
                );
            }
        }
    }
}
