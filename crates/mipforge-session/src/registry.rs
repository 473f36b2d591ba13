//! Externally owned LP solvers addressed by [`SolverHandle`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use mipforge_core::LpSolver;
use tracing::debug;

use crate::arena::{HandleArena, Lookup};
use crate::error::{Result, SessionError};
use crate::handle::SolverHandle;

/// Table of LP solvers that sessions are created from.
///
/// The registry owns each solver until it is released. Sessions copy the
/// solver at creation, so releasing a handle never affects them.
#[derive(Debug)]
pub struct SolverRegistry {
    solvers: Mutex<HandleArena<Box<dyn LpSolver>>>,
}

impl SolverRegistry {
    pub fn new() -> Self {
        Self {
            solvers: Mutex::new(HandleArena::new()),
        }
    }

    /// Creates a registry that holds at most `max_solvers` solvers at once.
    pub fn with_max_solvers(max_solvers: u32) -> Self {
        Self {
            solvers: Mutex::new(HandleArena::with_max_slots(max_solvers)),
        }
    }

    pub fn register(&self, solver: impl LpSolver + 'static) -> Result<SolverHandle> {
        self.register_boxed(Box::new(solver))
    }

    pub fn register_boxed(&self, solver: Box<dyn LpSolver>) -> Result<SolverHandle> {
        let key = self
            .lock()
            .insert(solver)
            .map_err(|_| SessionError::CapacityExhausted)?;
        let handle = SolverHandle::from_key(key);
        debug!(event = "solver_registered", handle = handle.into_raw());
        Ok(handle)
    }

    /// Removes the solver and returns it. The handle becomes invalid.
    pub fn release(&self, handle: SolverHandle) -> Result<Box<dyn LpSolver>> {
        let key = handle.key().ok_or(SessionError::InvalidHandle)?;
        match self.lock().remove(key) {
            Lookup::Live(solver) => {
                debug!(event = "solver_released", handle = handle.into_raw());
                Ok(solver)
            }
            Lookup::Retired | Lookup::Unknown => Err(SessionError::InvalidHandle),
        }
    }

    /// Runs `f` on the registered solver.
    ///
    /// The registry is locked while `f` runs; `f` must not call back into it.
    pub fn with_solver<R>(
        &self,
        handle: SolverHandle,
        f: impl FnOnce(&mut dyn LpSolver) -> R,
    ) -> Result<R> {
        let key = handle.key().ok_or(SessionError::InvalidHandle)?;
        match self.lock().get_mut(key) {
            Lookup::Live(solver) => Ok(f(solver.as_mut())),
            Lookup::Retired | Lookup::Unknown => Err(SessionError::InvalidHandle),
        }
    }

    pub fn contains(&self, handle: SolverHandle) -> bool {
        handle
            .key()
            .is_some_and(|key| matches!(self.lock().get(key), Lookup::Live(_)))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the solver behind `handle`.
    pub(crate) fn copy(&self, handle: SolverHandle) -> Result<Box<dyn LpSolver>> {
        let key = handle.key().ok_or(SessionError::InvalidHandle)?;
        match self.lock().get(key) {
            Lookup::Live(solver) => Ok(solver.clone_solver()),
            Lookup::Retired | Lookup::Unknown => Err(SessionError::InvalidHandle),
        }
    }

    /// Releases every solver. Returns how many were released.
    pub(crate) fn release_all(&self) -> usize {
        self.lock().drain().len()
    }

    fn lock(&self) -> MutexGuard<'_, HandleArena<Box<dyn LpSolver>>> {
        self.solvers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SolverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
