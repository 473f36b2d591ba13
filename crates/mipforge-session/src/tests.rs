use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use mipforge_bnb::SearchStatus;
use mipforge_config::{EnvironmentConfig, SessionConfig};
use mipforge_core::{LpProblem, LpSolver, LpStatus, SimplexSolver};
use mipforge_test::{assert_feasible, infeasible_mip, small_knapsack, textbook_mip};

use crate::{
    Environment, SessionError, SessionId, SessionManager, SessionState, SolverHandle,
    SolverRegistry,
};

fn setup() -> (SessionManager, SolverHandle) {
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(SimplexSolver::new(textbook_mip()))
        .unwrap();
    (SessionManager::new(registry), handle)
}

#[test]
fn test_create_rejects_bad_handles() {
    let (manager, handle) = setup();

    assert!(matches!(
        manager.create(SolverHandle::NULL),
        Err(SessionError::InvalidHandle)
    ));
    assert!(matches!(
        manager.create(SolverHandle::from_raw(0xdead_0000_0007)),
        Err(SessionError::InvalidHandle)
    ));

    manager.registry().release(handle).unwrap();
    assert!(matches!(
        manager.create(handle),
        Err(SessionError::InvalidHandle)
    ));
}

#[test]
fn test_fresh_session_is_idle() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();

    assert!(!id.is_null());
    assert_eq!(manager.state(id).unwrap(), SessionState::Idle);
    assert_eq!(manager.log_level(id).unwrap(), 1);
    assert_eq!(manager.source_handle(id).unwrap(), handle);
    assert_eq!(manager.len(), 1);
}

#[test]
fn test_operations_after_dispose() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager.dispose(id).unwrap();

    assert!(matches!(
        manager.best_solution(id),
        Err(SessionError::InvalidSession)
    ));
    assert!(matches!(
        manager.branch_and_bound(id),
        Err(SessionError::InvalidSession)
    ));
    assert!(matches!(
        manager.with_solver(id, |_| ()),
        Err(SessionError::InvalidSession)
    ));
    assert!(matches!(
        manager.dispose(id),
        Err(SessionError::AlreadyDisposed)
    ));
    assert_eq!(manager.state(id).unwrap(), SessionState::Disposed);
    assert!(manager.is_empty());

    // The borrowed solver is untouched.
    assert!(manager.registry().contains(handle));
}

#[test]
fn test_unknown_session_ids() {
    let (manager, _) = setup();

    assert!(matches!(
        manager.state(SessionId::NULL),
        Err(SessionError::InvalidSession)
    ));
    assert!(matches!(
        manager.dispose(SessionId::from_raw(1 << 32)),
        Err(SessionError::InvalidSession)
    ));
}

#[test]
fn test_reused_slot_rejects_old_id() {
    let (manager, handle) = setup();
    let old = manager.create(handle).unwrap();
    manager.dispose(old).unwrap();
    let new = manager.create(handle).unwrap();

    assert_ne!(old, new);
    assert!(matches!(
        manager.best_solution(old),
        Err(SessionError::InvalidSession)
    ));
    assert_eq!(manager.state(new).unwrap(), SessionState::Idle);
}

#[test]
fn test_best_solution_before_search() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();

    assert!(matches!(
        manager.best_solution(id),
        Err(SessionError::NoSolutionYet)
    ));
    assert!(matches!(
        manager.best_objective(id),
        Err(SessionError::NoSolutionYet)
    ));
    assert!(manager.last_summary(id).unwrap().is_none());
}

#[test]
fn test_search_produces_feasible_solution() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    let summary = manager.branch_and_bound(id).unwrap();

    assert_eq!(summary.status, SearchStatus::Optimal);
    assert_eq!(manager.state(id).unwrap(), SessionState::Solved);

    let solution = manager.best_solution(id).unwrap();
    assert_eq!(solution.len(), 2);
    assert_feasible(&textbook_mip(), solution.values());
    assert_eq!(solution.objective(), 40.0);
    assert_eq!(manager.best_objective(id).unwrap(), 40.0);
    assert_eq!(manager.last_summary(id).unwrap(), Some(summary));
}

#[test]
fn test_search_requires_idle() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager.save_reference_solver(id).unwrap();
    manager.branch_and_bound(id).unwrap();

    assert!(matches!(
        manager.branch_and_bound(id),
        Err(SessionError::NotIdle {
            state: SessionState::Solved
        })
    ));

    manager.reset_to_reference_solver(id).unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Idle);
    assert!(manager.branch_and_bound(id).is_ok());
}

#[test]
fn test_infeasible_search_fails() {
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(SimplexSolver::new(infeasible_mip()))
        .unwrap();
    let manager = SessionManager::new(registry);
    let id = manager.create(handle).unwrap();

    let summary = manager.branch_and_bound(id).unwrap();
    assert_eq!(summary.status, SearchStatus::Infeasible);
    assert_eq!(manager.state(id).unwrap(), SessionState::Failed);
    assert!(matches!(
        manager.best_solution(id),
        Err(SessionError::NoSolutionYet)
    ));
}

#[test]
fn test_save_mutate_reset() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager.save_reference_solver(id).unwrap();

    manager
        .with_solver(id, |solver| {
            solver.set_col_bounds(0, 1.0, 2.0).unwrap();
            solver.set_objective_coefficient(1, 1.0).unwrap();
        })
        .unwrap();
    assert_eq!(
        manager.with_solver(id, |solver| solver.col_upper(0).unwrap()).unwrap(),
        2.0
    );

    manager.reset_to_reference_solver(id).unwrap();
    let (lower, upper, objective) = manager
        .with_solver(id, |solver| {
            (
                solver.col_lower(0).unwrap(),
                solver.col_upper(0).unwrap(),
                solver.objective_coefficient(1).unwrap(),
            )
        })
        .unwrap();
    assert_eq!((lower, upper, objective), (0.0, f64::INFINITY, 8.0));
}

#[test]
fn test_reset_before_save() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();

    assert!(matches!(
        manager.reset_to_reference_solver(id),
        Err(SessionError::NoSnapshot)
    ));
}

#[test]
fn test_reference_view_defaults_to_baseline() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager
        .with_solver(id, |solver| solver.set_col_upper(1, 3.0).unwrap())
        .unwrap();

    let upper = manager
        .with_reference_solver(id, |solver| solver.col_upper(1).unwrap())
        .unwrap();
    assert_eq!(upper, f64::INFINITY);

    manager.save_reference_solver(id).unwrap();
    let upper = manager
        .with_reference_solver(id, |solver| solver.col_upper(1).unwrap())
        .unwrap();
    assert_eq!(upper, 3.0);
}

#[test]
fn test_best_solution_survives_reset() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager.save_reference_solver(id).unwrap();
    manager.branch_and_bound(id).unwrap();
    manager.reset_to_reference_solver(id).unwrap();

    assert_eq!(manager.best_solution(id).unwrap().values(), &[0.0, 5.0]);
}

#[test]
fn test_set_log_level_clamps() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();

    assert_eq!(manager.set_log_level(id, 0).unwrap(), 0);
    assert_eq!(manager.set_log_level(id, 4).unwrap(), 4);
    assert_eq!(manager.set_log_level(id, -1).unwrap(), 0);
    assert_eq!(manager.set_log_level(id, 99).unwrap(), 4);
    assert_eq!(manager.log_level(id).unwrap(), 4);
}

#[test]
fn test_session_outlives_released_solver() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager.registry().release(handle).unwrap();

    assert!(manager.branch_and_bound(id).is_ok());
    assert!(manager.best_solution(id).is_ok());
}

#[test]
fn test_session_copies_registered_solver() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    manager
        .registry()
        .with_solver(handle, |solver| solver.set_col_upper(0, 1.0).unwrap())
        .unwrap();

    let upper = manager
        .with_solver(id, |solver| solver.col_upper(0).unwrap())
        .unwrap();
    assert_eq!(upper, f64::INFINITY);
}

#[test]
fn test_capacity_exhausted() {
    let (manager, handle) = setup();
    let manager = manager.with_max_sessions(1);
    let id = manager.create(handle).unwrap();

    assert!(matches!(
        manager.create(handle),
        Err(SessionError::CapacityExhausted)
    ));
    manager.dispose(id).unwrap();
    assert!(manager.create(handle).is_ok());
}

#[test]
fn test_busy_session() {
    let (manager, handle) = setup();
    let manager = Arc::new(manager);
    let id = manager.create(handle).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let worker = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            manager.with_solver(id, |_| {
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        })
    };
    locked_rx.recv().unwrap();

    assert!(matches!(
        manager.branch_and_bound(id),
        Err(SessionError::SessionBusy)
    ));
    assert!(matches!(
        manager.save_reference_solver(id),
        Err(SessionError::SessionBusy)
    ));
    assert_eq!(manager.state(id).unwrap(), SessionState::Idle);

    release_tx.send(()).unwrap();
    worker.join().unwrap().unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Idle);
}

#[test]
fn test_view_keeps_solved_state() {
    let (manager, handle) = setup();
    let manager = Arc::new(manager);
    let id = manager.create(handle).unwrap();
    manager.branch_and_bound(id).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let worker = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            manager.with_reference_solver(id, |_| {
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
            })
        })
    };
    locked_rx.recv().unwrap();

    assert_eq!(manager.state(id).unwrap(), SessionState::Solved);

    release_tx.send(()).unwrap();
    worker.join().unwrap().unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Solved);
}

/// Simplex solver whose first `solve` reports in and waits to be released.
#[derive(Debug, Clone)]
struct GatedSolver {
    inner: SimplexSolver,
    gate: Arc<Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>>,
}

impl GatedSolver {
    fn new(problem: LpProblem, entered: mpsc::Sender<()>, release: mpsc::Receiver<()>) -> Self {
        Self {
            inner: SimplexSolver::new(problem),
            gate: Arc::new(Mutex::new(Some((entered, release)))),
        }
    }
}

impl LpSolver for GatedSolver {
    fn problem(&self) -> &LpProblem {
        self.inner.problem()
    }

    fn problem_mut(&mut self) -> &mut LpProblem {
        self.inner.problem_mut()
    }

    fn solve(&mut self) -> LpStatus {
        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            entered.send(()).unwrap();
            release.recv().unwrap();
        }
        self.inner.solve()
    }

    fn status(&self) -> LpStatus {
        self.inner.status()
    }

    fn col_solution(&self) -> &[f64] {
        self.inner.col_solution()
    }

    fn objective_value(&self) -> Option<f64> {
        self.inner.objective_value()
    }

    fn clone_solver(&self) -> Box<dyn LpSolver> {
        Box::new(self.clone())
    }
}

#[test]
fn test_dispose_during_search_discards_result() {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(GatedSolver::new(textbook_mip(), entered_tx, release_rx))
        .unwrap();
    let manager = Arc::new(SessionManager::new(registry));
    let id = manager.create(handle).unwrap();

    let worker = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || manager.branch_and_bound(id))
    };
    entered_rx.recv().unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Solving);

    manager.dispose(id).unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Disposed);

    release_tx.send(()).unwrap();
    assert!(matches!(
        worker.join().unwrap(),
        Err(SessionError::InvalidSession)
    ));
    assert_eq!(manager.state(id).unwrap(), SessionState::Disposed);
    assert!(matches!(
        manager.dispose(id),
        Err(SessionError::AlreadyDisposed)
    ));
    assert!(manager.is_empty());
}

#[test]
fn test_dispose_busy_session_detaches() {
    let (manager, handle) = setup();
    let manager = Arc::new(manager);
    let id = manager.create(handle).unwrap();

    let (locked_tx, locked_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel::<()>();
    let worker = {
        let manager = Arc::clone(&manager);
        thread::spawn(move || {
            manager.with_solver(id, |solver| {
                locked_tx.send(()).unwrap();
                release_rx.recv().unwrap();
                solver.num_cols()
            })
        })
    };
    locked_rx.recv().unwrap();

    manager.dispose(id).unwrap();
    assert_eq!(manager.state(id).unwrap(), SessionState::Disposed);

    release_tx.send(()).unwrap();
    assert_eq!(worker.join().unwrap().unwrap(), 2);
    assert!(matches!(
        manager.with_solver(id, |_| ()),
        Err(SessionError::InvalidSession)
    ));
}

#[test]
fn test_sessions_search_in_parallel() {
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(SimplexSolver::new(small_knapsack()))
        .unwrap();
    let manager = Arc::new(SessionManager::new(registry));

    let workers: Vec<_> = (0..4)
        .map(|_| {
            let manager = Arc::clone(&manager);
            thread::spawn(move || {
                let id = manager.create(handle).unwrap();
                manager.branch_and_bound(id).unwrap();
                let objective = manager.best_objective(id).unwrap();
                manager.dispose(id).unwrap();
                objective
            })
        })
        .collect();

    for worker in workers {
        assert_eq!(worker.join().unwrap(), 23.0);
    }
    assert!(manager.is_empty());
}

#[test]
fn test_export_lp() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();
    let text = manager.export_lp(id).unwrap();

    assert!(text.starts_with("\\ Problem: textbook"));
    assert!(text.contains("Maximize"));
    assert!(text.contains("General"));
}

#[test]
fn test_write_lp_dir_dump() {
    let dir = std::env::temp_dir().join(format!("mipforge-lp-{}", std::process::id()));
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(SimplexSolver::new(textbook_mip()))
        .unwrap();
    let config = SessionConfig::new().with_write_lp_dir(&dir);
    let manager = SessionManager::with_config(registry, config);
    let id = manager.create(handle).unwrap();
    manager.branch_and_bound(id).unwrap();

    let path = dir.join(format!("textbook-{:x}.lp", id.into_raw()));
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("Maximize"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_session_inherits_config() {
    let registry = Arc::new(SolverRegistry::new());
    let handle = registry
        .register(SimplexSolver::new(textbook_mip()))
        .unwrap();
    let config = SessionConfig::new().with_log_level(0).with_node_limit(1);
    let manager = SessionManager::with_config(registry, config);
    let id = manager.create(handle).unwrap();

    assert_eq!(manager.log_level(id).unwrap(), 0);
    let summary = manager.branch_and_bound(id).unwrap();
    assert_eq!(summary.status, SearchStatus::NoSolutionFound);
    assert_eq!(manager.state(id).unwrap(), SessionState::Failed);
}

#[test]
fn test_environment_shutdown() {
    let env = Environment::initialize(EnvironmentConfig::new().with_console(false)).unwrap();
    assert!(!env.console_installed());

    let handle = env
        .registry()
        .register(SimplexSolver::new(textbook_mip()))
        .unwrap();
    let first = env.sessions().create(handle).unwrap();
    let second = env.sessions().create(handle).unwrap();
    env.sessions().dispose(first).unwrap();
    env.sessions().branch_and_bound(second).unwrap();

    let report = env.shutdown();
    assert_eq!(report.sessions_disposed, 1);
    assert_eq!(report.solvers_released, 1);
}

#[test]
fn test_environment_rejects_invalid_config() {
    let config = EnvironmentConfig::new()
        .with_console(false)
        .with_session(SessionConfig::new().with_integer_tolerance(0.75));

    assert!(matches!(
        Environment::initialize(config),
        Err(SessionError::Config(_))
    ));
}

#[test]
fn test_handle_raw_round_trip() {
    let (manager, handle) = setup();
    let id = manager.create(handle).unwrap();

    assert_eq!(SessionId::from_raw(id.into_raw()), id);
    assert_eq!(SolverHandle::from_raw(handle.into_raw()), handle);
    assert!(SolverHandle::NULL.is_null());
    assert_eq!(format!("{:?}", SessionId::NULL), "SessionId(null)");
    assert_eq!(format!("{:?}", id), "SessionId(0v1)");
}
