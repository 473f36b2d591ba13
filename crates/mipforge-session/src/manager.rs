//! Session manager: creates, drives and disposes branch-and-bound sessions.

use std::fs;
use std::sync::{
    Arc, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, TryLockError,
};

use mipforge_bnb::{BranchAndBoundModel, ModelError, SearchSummary};
use mipforge_config::{clamp_log_level, SessionConfig};
use mipforge_core::{write_lp, LpSolver};
use tracing::{info, warn};

use crate::arena::{HandleArena, Lookup};
use crate::error::{Result, SessionError};
use crate::handle::{SessionId, SolverHandle};
use crate::registry::SolverRegistry;
use crate::session::{Session, SessionCell, SessionState};
use crate::solution::SolutionVector;

/// Owns every live session and addresses them by [`SessionId`].
///
/// The manager is `Send + Sync`. Distinct sessions can be searched from
/// different threads at once; a session that is already in use by another
/// thread reports [`SessionError::SessionBusy`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use mipforge_core::{Column, LpProblem, Row, SimplexSolver};
/// use mipforge_session::{SessionManager, SessionState, SolverRegistry};
///
/// let mut problem = LpProblem::maximize("tiny");
/// let x = problem.add_column(Column::integer("x", 0.0, 10.0, 1.0)).unwrap();
/// problem.add_row(Row::le("cap", vec![(x, 2.0)], 7.0)).unwrap();
///
/// let registry = Arc::new(SolverRegistry::new());
/// let handle = registry.register(SimplexSolver::new(problem)).unwrap();
///
/// let manager = SessionManager::new(Arc::clone(&registry));
/// let id = manager.create(handle).unwrap();
/// manager.branch_and_bound(id).unwrap();
///
/// assert_eq!(manager.state(id).unwrap(), SessionState::Solved);
/// assert_eq!(manager.best_solution(id).unwrap().values(), &[3.0]);
/// manager.dispose(id).unwrap();
/// ```
#[derive(Debug)]
pub struct SessionManager {
    registry: Arc<SolverRegistry>,
    sessions: RwLock<HandleArena<Arc<SessionCell>>>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(registry: Arc<SolverRegistry>) -> Self {
        Self::with_config(registry, SessionConfig::default())
    }

    /// Creates a manager whose sessions start from `config`.
    pub fn with_config(registry: Arc<SolverRegistry>, config: SessionConfig) -> Self {
        Self {
            registry,
            sessions: RwLock::new(HandleArena::new()),
            config,
        }
    }

    /// Limits how many sessions may be live at once.
    pub fn with_max_sessions(mut self, max_sessions: u32) -> Self {
        self.sessions = RwLock::new(HandleArena::with_max_slots(max_sessions));
        self
    }

    #[inline]
    pub fn registry(&self) -> &Arc<SolverRegistry> {
        &self.registry
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Creates a session over a copy of the solver behind `solver`.
    pub fn create(&self, solver: SolverHandle) -> Result<SessionId> {
        let copy = self.registry.copy(solver)?;
        let columns = copy.num_cols();
        let rows = copy.num_rows();
        let model = BranchAndBoundModel::from_boxed(copy).with_config(&self.config);
        let log_level = model.log_level();

        let cell = Arc::new(SessionCell::new(Session::new(model, solver)));
        let key = self
            .write()
            .insert(cell)
            .map_err(|_| SessionError::CapacityExhausted)?;
        let id = SessionId::from_key(key);

        if log_level >= 1 {
            info!(
                event = "session_created",
                session = id.into_raw(),
                solver = solver.into_raw(),
                columns = columns as u64,
                rows = rows as u64,
                level = u64::from(log_level),
            );
        }
        Ok(id)
    }

    /// Runs a branch-and-bound search on an idle session.
    ///
    /// Blocks until the search ends. An unsuccessful search is not an
    /// error: it is reported in the summary and leaves the session
    /// [`Failed`](SessionState::Failed).
    pub fn branch_and_bound(&self, id: SessionId) -> Result<SearchSummary> {
        let cell = self.cell(id)?;
        let mut session = Self::lock(&cell)?;
        if session.state != SessionState::Idle {
            return Err(SessionError::NotIdle {
                state: session.state,
            });
        }

        self.dump_lp(id, &session);
        session.state = SessionState::Solving;
        cell.publish(SessionState::Solving);
        let summary = session.model.branch_and_bound();
        session.finish_search(&summary);

        if cell.is_disposed() {
            session.state = SessionState::Disposed;
            cell.publish(SessionState::Disposed);
            warn!(
                event = "search_discarded",
                session = id.into_raw(),
                status = summary.status.as_str(),
            );
            return Err(SessionError::InvalidSession);
        }
        cell.publish(session.state);
        Ok(summary)
    }

    /// Runs `f` on the session's live working solver.
    pub fn with_solver<R>(&self, id: SessionId, f: impl FnOnce(&mut dyn LpSolver) -> R) -> Result<R> {
        self.with_session(id, |session| Ok(f(session.model.solver_mut())))
    }

    /// Runs `f` on the saved reference solver, or on the continuous
    /// baseline captured at creation if none was saved.
    pub fn with_reference_solver<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&dyn LpSolver) -> R,
    ) -> Result<R> {
        self.with_session(id, |session| Ok(f(session.model.reference_solver())))
    }

    /// Copies the live solver into the reference slot, replacing any earlier copy.
    pub fn save_reference_solver(&self, id: SessionId) -> Result<()> {
        self.with_session(id, |session| {
            session.model.save_reference_solver();
            if session.model.log_level() >= 1 {
                info!(event = "reference_saved", session = id.into_raw());
            }
            Ok(())
        })
    }

    /// Restores the live solver from the reference and makes the session idle.
    pub fn reset_to_reference_solver(&self, id: SessionId) -> Result<()> {
        self.with_session(id, |session| {
            session
                .model
                .reset_to_reference_solver()
                .map_err(|ModelError::NoReferenceSolver| SessionError::NoSnapshot)?;
            session.state = SessionState::Idle;
            if session.model.log_level() >= 1 {
                info!(event = "reference_restored", session = id.into_raw());
            }
            Ok(())
        })
    }

    /// Sets the session log level, clamped into `0..=4`. Returns the level applied.
    pub fn set_log_level(&self, id: SessionId, level: i32) -> Result<u8> {
        self.with_session(id, |session| {
            let (effective, clamped) = clamp_log_level(level);
            if clamped {
                warn!(
                    event = "log_level_clamped",
                    session = id.into_raw(),
                    requested = i64::from(level),
                    level = u64::from(effective),
                );
            }
            session.model.set_log_level(effective);
            Ok(effective)
        })
    }

    pub fn log_level(&self, id: SessionId) -> Result<u8> {
        self.with_session(id, |session| Ok(session.model.log_level()))
    }

    /// Retires the session id and drops its model.
    ///
    /// If a search is running on another thread the session is detached:
    /// the search runs to its end, its result is discarded, and the model
    /// is dropped when the search returns.
    pub fn dispose(&self, id: SessionId) -> Result<()> {
        let key = id.key().ok_or(SessionError::InvalidSession)?;
        let cell = match self.write().remove(key) {
            Lookup::Live(cell) => cell,
            Lookup::Retired => return Err(SessionError::AlreadyDisposed),
            Lookup::Unknown => return Err(SessionError::InvalidSession),
        };
        cell.mark_disposed();
        cell.publish(SessionState::Disposed);

        let detached = match cell.inner.try_lock() {
            Ok(mut session) => {
                session.state = SessionState::Disposed;
                false
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().state = SessionState::Disposed;
                false
            }
            Err(TryLockError::WouldBlock) => true,
        };
        info!(
            event = "session_disposed",
            session = id.into_raw(),
            detached = detached,
        );
        Ok(())
    }

    /// Current state. While another thread holds the session this is the
    /// state it last published, so [`Solving`](SessionState::Solving) only
    /// during a search; [`Disposed`](SessionState::Disposed) for a retired id.
    pub fn state(&self, id: SessionId) -> Result<SessionState> {
        let key = id.key().ok_or(SessionError::InvalidSession)?;
        let cell = match self.read().get(key) {
            Lookup::Live(cell) => Arc::clone(cell),
            Lookup::Retired => return Ok(SessionState::Disposed),
            Lookup::Unknown => return Err(SessionError::InvalidSession),
        };
        let state = match cell.inner.try_lock() {
            Ok(session) => session.state,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner().state,
            Err(TryLockError::WouldBlock) => cell.published_state(),
        };
        Ok(state)
    }

    /// Copy of the best solution found by any search of this session.
    pub fn best_solution(&self, id: SessionId) -> Result<SolutionVector> {
        self.with_session(id, |session| {
            if !session.solved_once {
                return Err(SessionError::NoSolutionYet);
            }
            match (session.model.best_solution(), session.model.best_objective()) {
                (Some(values), Some(objective)) => {
                    Ok(SolutionVector::new(values.to_vec(), objective))
                }
                _ => Err(SessionError::NoSolutionYet),
            }
        })
    }

    pub fn best_objective(&self, id: SessionId) -> Result<f64> {
        self.with_session(id, |session| {
            session
                .model
                .best_objective()
                .filter(|_| session.solved_once)
                .ok_or(SessionError::NoSolutionYet)
        })
    }

    /// Summary of the most recent search, if any ran.
    pub fn last_summary(&self, id: SessionId) -> Result<Option<SearchSummary>> {
        self.with_session(id, |session| Ok(session.model.last_summary().cloned()))
    }

    /// The live model in LP format.
    pub fn export_lp(&self, id: SessionId) -> Result<String> {
        self.with_session(id, |session| Ok(write_lp(session.model.solver().problem())))
    }

    /// The solver handle the session was created from.
    pub fn source_handle(&self, id: SessionId) -> Result<SolverHandle> {
        self.with_session(id, |session| Ok(session.source))
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disposes every live session. Returns how many were disposed.
    pub(crate) fn dispose_all(&self) -> usize {
        let cells = self.write().drain();
        for cell in &cells {
            cell.mark_disposed();
            cell.publish(SessionState::Disposed);
        }
        cells.len()
    }

    fn with_session<R>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut Session) -> Result<R>,
    ) -> Result<R> {
        let cell = self.cell(id)?;
        let mut session = Self::lock(&cell)?;
        let result = f(&mut session);
        if !cell.is_disposed() {
            cell.publish(session.state);
        }
        result
    }

    fn cell(&self, id: SessionId) -> Result<Arc<SessionCell>> {
        let key = id.key().ok_or(SessionError::InvalidSession)?;
        match self.read().get(key) {
            Lookup::Live(cell) => Ok(Arc::clone(cell)),
            Lookup::Retired | Lookup::Unknown => Err(SessionError::InvalidSession),
        }
    }

    fn lock(cell: &SessionCell) -> Result<MutexGuard<'_, Session>> {
        let session = match cell.inner.try_lock() {
            Ok(session) => session,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => return Err(SessionError::SessionBusy),
        };
        if cell.is_disposed() {
            return Err(SessionError::InvalidSession);
        }
        Ok(session)
    }

    fn dump_lp(&self, id: SessionId, session: &Session) {
        let Some(dir) = self.config.debug.write_lp_dir.as_ref() else {
            return;
        };
        let problem = session.model.solver().problem();
        let name: String = problem
            .name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        let path = dir.join(format!("{}-{:x}.lp", name, id.into_raw()));
        if let Err(error) = fs::create_dir_all(dir).and_then(|_| fs::write(&path, write_lp(problem))) {
            warn!(
                event = "write_lp_failed",
                path = %path.display(),
                error = %error,
            );
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, HandleArena<Arc<SessionCell>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HandleArena<Arc<SessionCell>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
