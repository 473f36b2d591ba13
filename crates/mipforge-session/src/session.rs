//! A single branch-and-bound session.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Mutex;

use mipforge_bnb::{BranchAndBoundModel, SearchSummary};

use crate::handle::SolverHandle;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Fresh, or restored from the reference solver.
    Idle,
    /// A search currently holds the session.
    Solving,
    /// The last search produced a solution.
    Solved,
    /// The last search ended without a solution.
    Failed,
    Disposed,
}

impl SessionState {
    fn to_u8(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Solving => 1,
            SessionState::Solved => 2,
            SessionState::Failed => 3,
            SessionState::Disposed => 4,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => SessionState::Idle,
            1 => SessionState::Solving,
            2 => SessionState::Solved,
            3 => SessionState::Failed,
            _ => SessionState::Disposed,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "Idle"),
            SessionState::Solving => write!(f, "Solving"),
            SessionState::Solved => write!(f, "Solved"),
            SessionState::Failed => write!(f, "Failed"),
            SessionState::Disposed => write!(f, "Disposed"),
        }
    }
}

/// Session data guarded by its cell's mutex.
#[derive(Debug)]
pub(crate) struct Session {
    /// Owned; dropped with the session.
    pub(crate) model: BranchAndBoundModel,
    /// Borrowed; only recorded, never released by the session.
    pub(crate) source: SolverHandle,
    pub(crate) state: SessionState,
    /// True once any search has produced a solution.
    pub(crate) solved_once: bool,
}

impl Session {
    pub(crate) fn new(model: BranchAndBoundModel, source: SolverHandle) -> Self {
        Self {
            model,
            source,
            state: SessionState::Idle,
            solved_once: false,
        }
    }

    /// Records the outcome of a finished search.
    pub(crate) fn finish_search(&mut self, summary: &SearchSummary) {
        if summary.has_solution() {
            self.state = SessionState::Solved;
            self.solved_once = true;
        } else {
            self.state = SessionState::Failed;
        }
    }
}

/// Shared slot for one session.
#[derive(Debug)]
pub(crate) struct SessionCell {
    disposed: AtomicBool,
    /// Mirror of `Session::state`, readable while the mutex is held elsewhere.
    published: AtomicU8,
    pub(crate) inner: Mutex<Session>,
}

impl SessionCell {
    pub(crate) fn new(session: Session) -> Self {
        Self {
            disposed: AtomicBool::new(false),
            published: AtomicU8::new(session.state.to_u8()),
            inner: Mutex::new(session),
        }
    }

    #[inline]
    pub(crate) fn publish(&self, state: SessionState) {
        self.published.store(state.to_u8(), Ordering::SeqCst);
    }

    /// State as of the last [`publish`](Self::publish).
    #[inline]
    pub(crate) fn published_state(&self) -> SessionState {
        SessionState::from_u8(self.published.load(Ordering::SeqCst))
    }

    #[inline]
    pub(crate) fn mark_disposed(&self) {
        self.disposed.store(true, Ordering::SeqCst);
    }

    #[inline]
    pub(crate) fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}
