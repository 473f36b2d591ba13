//! Search tree nodes and the open-node container.
//!
//! A node does not own a model copy. It records the column bounds it
//! tightened relative to the root, and the search applies those to the
//! single working solver before solving the node's relaxation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use mipforge_config::NodeSelection;
use smallvec::SmallVec;

/// Tightened bounds of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundChange {
    pub col: usize,
    pub lower: f64,
    pub upper: f64,
}

/// An open node of the search tree.
#[derive(Debug, Clone)]
pub struct SearchNode {
    depth: usize,
    /// Parent relaxation objective in minimization form; a lower bound for this subtree.
    bound: f64,
    changes: SmallVec<[BoundChange; 8]>,
}

impl SearchNode {
    pub fn root() -> Self {
        Self {
            depth: 0,
            bound: f64::NEG_INFINITY,
            changes: SmallVec::new(),
        }
    }

    /// Child with `col` restricted to `[lower, upper]`.
    pub fn child(&self, bound: f64, col: usize, lower: f64, upper: f64) -> Self {
        let mut changes = self.changes.clone();
        match changes.iter_mut().find(|c| c.col == col) {
            Some(change) => {
                change.lower = lower;
                change.upper = upper;
            }
            None => changes.push(BoundChange { col, lower, upper }),
        }
        Self {
            depth: self.depth + 1,
            bound,
            changes,
        }
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    #[inline]
    pub fn changes(&self) -> &[BoundChange] {
        &self.changes
    }

    /// Bounds of `col` in this node, falling back to the root bounds.
    pub fn col_bounds(&self, col: usize, root_lower: &[f64], root_upper: &[f64]) -> (f64, f64) {
        self.changes
            .iter()
            .find(|c| c.col == col)
            .map(|c| (c.lower, c.upper))
            .unwrap_or((root_lower[col], root_upper[col]))
    }
}

/// Heap entry ordering nodes by best (lowest) bound, deeper first on ties.
pub(crate) struct BestBoundEntry(SearchNode);

impl PartialEq for BestBoundEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for BestBoundEntry {}

impl Ord for BestBoundEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lower bound = higher priority (reversed)
        other
            .0
            .bound
            .total_cmp(&self.0.bound)
            .then_with(|| self.0.depth.cmp(&other.0.depth))
    }
}

impl PartialOrd for BestBoundEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Open nodes, ordered per [`NodeSelection`].
pub(crate) enum OpenNodes {
    Stack(Vec<SearchNode>),
    Heap(BinaryHeap<BestBoundEntry>),
}

impl OpenNodes {
    pub(crate) fn new(selection: NodeSelection) -> Self {
        match selection {
            NodeSelection::DepthFirst => OpenNodes::Stack(Vec::new()),
            NodeSelection::BestBound => OpenNodes::Heap(BinaryHeap::new()),
        }
    }

    pub(crate) fn push(&mut self, node: SearchNode) {
        match self {
            OpenNodes::Stack(stack) => stack.push(node),
            OpenNodes::Heap(heap) => heap.push(BestBoundEntry(node)),
        }
    }

    pub(crate) fn pop(&mut self) -> Option<SearchNode> {
        match self {
            OpenNodes::Stack(stack) => stack.pop(),
            OpenNodes::Heap(heap) => heap.pop().map(|entry| entry.0),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            OpenNodes::Stack(stack) => stack.len(),
            OpenNodes::Heap(heap) => heap.len(),
        }
    }
}
