//! Search limits.

use std::time::Duration;

use mipforge_config::{NodeSelection, SessionConfig, DEFAULT_INTEGER_TOLERANCE};

use crate::result::TerminationReason;

/// Limits and tolerances applied to one search.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use mipforge_bnb::termination::SearchLimits;
/// use mipforge_bnb::TerminationReason;
///
/// let limits = SearchLimits::default().with_node_limit(10);
/// assert_eq!(limits.check(10, Duration::ZERO), Some(TerminationReason::NodeLimit));
/// assert_eq!(limits.check(9, Duration::from_secs(3600)), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SearchLimits {
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
    pub depth_limit: Option<usize>,
    pub integer_tolerance: f64,
    pub node_selection: NodeSelection,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            time_limit: None,
            node_limit: None,
            depth_limit: None,
            integer_tolerance: DEFAULT_INTEGER_TOLERANCE,
            node_selection: NodeSelection::DepthFirst,
        }
    }
}

impl SearchLimits {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    pub fn with_node_selection(mut self, selection: NodeSelection) -> Self {
        self.node_selection = selection;
        self
    }

    /// Returns the reason to stop before exploring another node, if any.
    pub fn check(&self, nodes_explored: u64, elapsed: Duration) -> Option<TerminationReason> {
        if self.node_limit.is_some_and(|limit| nodes_explored >= limit) {
            return Some(TerminationReason::NodeLimit);
        }
        if self.time_limit.is_some_and(|limit| elapsed >= limit) {
            return Some(TerminationReason::TimeLimit);
        }
        None
    }

    /// Returns true if a node at `depth` may not be branched further.
    #[inline]
    pub fn is_depth_exhausted(&self, depth: usize) -> bool {
        self.depth_limit.is_some_and(|limit| depth >= limit)
    }
}

impl From<&SessionConfig> for SearchLimits {
    fn from(config: &SessionConfig) -> Self {
        Self {
            time_limit: config.time_limit(),
            node_limit: config.termination.node_limit,
            depth_limit: config.search.depth_limit,
            integer_tolerance: config.search.integer_tolerance,
            node_selection: config.search.node_selection,
        }
    }
}
