//! Process-level setup and teardown.

use std::sync::Arc;

use mipforge_config::EnvironmentConfig;
use tracing::info;

use crate::error::Result;
use crate::manager::SessionManager;
use crate::registry::SolverRegistry;

/// Owns the solver registry and the session manager.
///
/// `initialize` is the only place a global tracing subscriber is installed;
/// creating sessions has no global side effects.
#[derive(Debug)]
pub struct Environment {
    registry: Arc<SolverRegistry>,
    sessions: SessionManager,
    console: bool,
}

/// What [`Environment::shutdown`] tore down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub sessions_disposed: usize,
    pub solvers_released: usize,
}

impl Environment {
    pub fn initialize(config: EnvironmentConfig) -> Result<Self> {
        config.session.validate()?;
        let console = config.console && mipforge_console::init();

        let registry = Arc::new(SolverRegistry::new());
        let sessions = SessionManager::with_config(Arc::clone(&registry), config.session);
        info!(
            event = "environment_initialized",
            console = console,
            level = u64::from(sessions.config().log_level),
        );
        Ok(Self {
            registry,
            sessions,
            console,
        })
    }

    #[inline]
    pub fn registry(&self) -> &Arc<SolverRegistry> {
        &self.registry
    }

    #[inline]
    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// True if this environment installed the console subscriber.
    #[inline]
    pub fn console_installed(&self) -> bool {
        self.console
    }

    /// Disposes every session, then releases every registered solver.
    pub fn shutdown(self) -> ShutdownReport {
        let report = ShutdownReport {
            sessions_disposed: self.sessions.dispose_all(),
            solvers_released: self.registry.release_all(),
        };
        info!(
            event = "environment_shutdown",
            sessions = report.sessions_disposed as u64,
            solvers = report.solvers_released as u64,
        );
        report
    }
}
