//! Outcome of a branch-and-bound search.

use crate::stats::SearchStatistics;

/// Quality of the result a search produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Best solution proven optimal.
    Optimal,
    /// A solution was found but the tree was not closed.
    Feasible,
    /// The tree was closed without any integer solution.
    Infeasible,
    /// The relaxation is unbounded.
    Unbounded,
    /// A limit stopped the search before any solution was found.
    NoSolutionFound,
}

impl SearchStatus {
    #[inline]
    pub fn has_solution(self) -> bool {
        matches!(self, SearchStatus::Optimal | SearchStatus::Feasible)
    }

    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchStatus::Optimal => "Optimal",
            SearchStatus::Feasible => "Feasible",
            SearchStatus::Infeasible => "Infeasible",
            SearchStatus::Unbounded => "Unbounded",
            SearchStatus::NoSolutionFound => "NoSolutionFound",
        }
    }
}

impl std::fmt::Display for SearchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Every open node was processed.
    Completed,
    NodeLimit,
    TimeLimit,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Completed => write!(f, "Completed"),
            TerminationReason::NodeLimit => write!(f, "NodeLimit"),
            TerminationReason::TimeLimit => write!(f, "TimeLimit"),
        }
    }
}

/// Summary returned by every search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSummary {
    pub status: SearchStatus,
    pub termination: TerminationReason,
    /// Objective of the best solution this search found.
    pub objective: Option<f64>,
    pub statistics: SearchStatistics,
}

impl SearchSummary {
    #[inline]
    pub fn has_solution(&self) -> bool {
        self.status.has_solution()
    }
}
