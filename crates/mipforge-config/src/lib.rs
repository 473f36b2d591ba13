//! Configuration system for mipforge.
//!
//! Load session configuration from TOML or YAML to control search limits,
//! node selection and diagnostic verbosity without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use mipforge_config::{NodeSelection, SessionConfig};
//! use std::time::Duration;
//!
//! let config = SessionConfig::from_toml_str(r#"
//!     log_level = 2
//!
//!     [termination]
//!     seconds_spent_limit = 30
//!     node_limit = 100000
//!
//!     [search]
//!     node_selection = "best_bound"
//!     depth_limit = 64
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(30)));
//! assert_eq!(config.search.node_selection, NodeSelection::BestBound);
//! assert_eq!(config.log_level, 2);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use mipforge_config::SessionConfig;
//!
//! let config = SessionConfig::load("session.toml").unwrap_or_default();
//! // Proceeds with defaults if file doesn't exist
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Quietest log level: nothing is emitted by the search.
pub const LOG_LEVEL_MIN: u8 = 0;

/// Most verbose log level: every node and its relaxation status.
pub const LOG_LEVEL_MAX: u8 = 4;

/// Start/end summaries only.
pub const DEFAULT_LOG_LEVEL: u8 = 1;

/// Default tolerance for treating a relaxation value as integral.
pub const DEFAULT_INTEGER_TOLERANCE: f64 = 1e-6;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Clamps an arbitrary requested log level into `LOG_LEVEL_MIN..=LOG_LEVEL_MAX`.
///
/// Returns the effective level and whether clamping happened.
///
/// ```
/// use mipforge_config::clamp_log_level;
///
/// assert_eq!(clamp_log_level(3), (3, false));
/// assert_eq!(clamp_log_level(-7), (0, true));
/// assert_eq!(clamp_log_level(99), (4, true));
/// ```
pub fn clamp_log_level(requested: i32) -> (u8, bool) {
    let clamped = requested.clamp(LOG_LEVEL_MIN as i32, LOG_LEVEL_MAX as i32);
    (clamped as u8, clamped != requested)
}

/// Per-session configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionConfig {
    /// Diagnostic verbosity of the search, `0..=4`.
    #[serde(default = "default_log_level")]
    pub log_level: u8,

    /// Search termination limits.
    #[serde(default)]
    pub termination: TerminationConfig,

    /// Tree search settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Debug output settings.
    #[serde(default)]
    pub debug: DebugConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL,
            termination: TerminationConfig::default(),
            search: SearchConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or
    /// fails [`SessionConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_level > LOG_LEVEL_MAX {
            return Err(ConfigError::Invalid(format!(
                "log_level {} exceeds maximum {}",
                self.log_level, LOG_LEVEL_MAX
            )));
        }
        let tol = self.search.integer_tolerance;
        if !(tol > 0.0 && tol < 0.5) {
            return Err(ConfigError::Invalid(format!(
                "integer_tolerance {} must lie in (0, 0.5)",
                tol
            )));
        }
        Ok(())
    }

    /// Sets the log level, clamped into range.
    pub fn with_log_level(mut self, level: u8) -> Self {
        self.log_level = level.min(LOG_LEVEL_MAX);
        self
    }

    /// Sets the termination time limit in seconds.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination.seconds_spent_limit = Some(seconds);
        self
    }

    /// Sets the termination time limit in milliseconds.
    pub fn with_termination_millis(mut self, millis: u64) -> Self {
        self.termination.millis_spent_limit = Some(millis);
        self
    }

    /// Sets the maximum number of explored nodes.
    pub fn with_node_limit(mut self, nodes: u64) -> Self {
        self.termination.node_limit = Some(nodes);
        self
    }

    /// Sets the maximum branching depth.
    pub fn with_depth_limit(mut self, depth: usize) -> Self {
        self.search.depth_limit = Some(depth);
        self
    }

    pub fn with_node_selection(mut self, selection: NodeSelection) -> Self {
        self.search.node_selection = selection;
        self
    }

    pub fn with_integer_tolerance(mut self, tolerance: f64) -> Self {
        self.search.integer_tolerance = tolerance;
        self
    }

    /// Dumps every model in LP format into `dir` before it is searched.
    pub fn with_write_lp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug.write_lp_dir = Some(dir.into());
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.time_limit()
    }
}

fn default_log_level() -> u8 {
    DEFAULT_LOG_LEVEL
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend searching.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend searching, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of nodes to explore.
    pub node_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        if self.seconds_spent_limit.is_none() && self.millis_spent_limit.is_none() {
            return None;
        }
        let seconds = Duration::from_secs(self.seconds_spent_limit.unwrap_or(0));
        let millis = Duration::from_millis(self.millis_spent_limit.unwrap_or(0));
        // Saturates; an oversized limit simply never fires.
        Some(seconds.saturating_add(millis))
    }
}

/// Order in which open nodes are explored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSelection {
    /// Deepest node first; finds incumbents early, little memory.
    #[default]
    DepthFirst,

    /// Node with the best relaxation bound first.
    BestBound,
}

/// Tree search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SearchConfig {
    #[serde(default)]
    pub node_selection: NodeSelection,

    /// Nodes deeper than this are not branched further.
    #[serde(default)]
    pub depth_limit: Option<usize>,

    /// Relaxation values within this distance of an integer count as integral.
    #[serde(default = "default_integer_tolerance")]
    pub integer_tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            node_selection: NodeSelection::DepthFirst,
            depth_limit: None,
            integer_tolerance: DEFAULT_INTEGER_TOLERANCE,
        }
    }
}

fn default_integer_tolerance() -> f64 {
    DEFAULT_INTEGER_TOLERANCE
}

/// Debug output configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DebugConfig {
    /// Directory receiving an LP-format dump of each model before its search.
    pub write_lp_dir: Option<PathBuf>,
}

/// Process-wide configuration handed to environment initialization.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EnvironmentConfig {
    /// Install the colored console subscriber.
    #[serde(default = "default_console")]
    pub console: bool,

    /// Defaults applied to every new session.
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            console: true,
            session: SessionConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.session.validate()?;
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.session.validate()?;
        Ok(config)
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

fn default_console() -> bool {
    true
}
