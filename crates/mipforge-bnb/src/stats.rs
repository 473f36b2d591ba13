//! Search statistics.

use std::time::Duration;

/// Statistics collected during one branch-and-bound search.
///
/// # Example
///
/// ```
/// use mipforge_bnb::stats::SearchStatistics;
///
/// let mut stats = SearchStatistics::default();
/// stats.on_node_explored(0);
/// stats.on_node_explored(3);
/// stats.on_pruning_bound();
///
/// assert_eq!(stats.nodes_explored, 2);
/// assert_eq!(stats.max_depth, 3);
/// assert_eq!(stats.prunings_bound, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchStatistics {
    /// Nodes whose relaxation was solved.
    pub nodes_explored: u64,
    /// Deepest node reached.
    pub max_depth: u64,
    /// Child nodes created by branching.
    pub branches: u64,
    /// Nodes discarded because their relaxation was infeasible.
    pub prunings_infeasible: u64,
    /// Nodes discarded because their bound could not beat the incumbent.
    pub prunings_bound: u64,
    /// Fractional nodes left unbranched at the depth limit.
    pub prunings_depth: u64,
    /// Nodes whose relaxation hit the LP iteration limit.
    pub lp_failures: u64,
    /// Improving integer solutions found.
    pub solutions_found: u64,
    /// Relaxation objective at the root node.
    pub root_bound: Option<f64>,
    /// Wall time of the search.
    pub time_total: Duration,
}

impl SearchStatistics {
    #[inline]
    pub fn on_node_explored(&mut self, depth: usize) {
        self.nodes_explored = self.nodes_explored.saturating_add(1);
        self.max_depth = self.max_depth.max(depth as u64);
    }

    #[inline]
    pub fn on_branch(&mut self, children: u64) {
        self.branches = self.branches.saturating_add(children);
    }

    #[inline]
    pub fn on_pruning_infeasible(&mut self) {
        self.prunings_infeasible = self.prunings_infeasible.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add(1);
    }

    #[inline]
    pub fn on_pruning_depth(&mut self) {
        self.prunings_depth = self.prunings_depth.saturating_add(1);
    }

    #[inline]
    pub fn on_lp_failure(&mut self) {
        self.lp_failures = self.lp_failures.saturating_add(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add(1);
    }

    #[inline]
    pub fn set_root_bound(&mut self, bound: f64) {
        self.root_bound = Some(bound);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }
}

impl std::fmt::Display for SearchStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Branch-and-bound statistics:")?;
        writeln!(f, "  Nodes explored:        {}", self.nodes_explored)?;
        writeln!(f, "  Max depth reached:     {}", self.max_depth)?;
        writeln!(f, "  Branches:              {}", self.branches)?;
        writeln!(f, "  Prunings (infeasible): {}", self.prunings_infeasible)?;
        writeln!(f, "  Prunings (bound):      {}", self.prunings_bound)?;
        writeln!(f, "  Prunings (depth):      {}", self.prunings_depth)?;
        writeln!(f, "  LP failures:           {}", self.lp_failures)?;
        writeln!(f, "  Solutions found:       {}", self.solutions_found)?;
        match self.root_bound {
            Some(bound) => writeln!(f, "  Root bound:            {}", bound)?,
            None => writeln!(f, "  Root bound:            n/a")?,
        }
        writeln!(f, "  Total time:            {:.2?}", self.time_total)?;
        Ok(())
    }
}
