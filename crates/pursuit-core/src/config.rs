//! Configuration loading and typed config structures for the Pursuit simulation.
//!
//! The canonical configuration lives in `pursuit-config.yaml` at the project
//! root. Every field has a default, so an empty document (or a missing file,
//! handled by the engine) yields the classic game: a 1000-unit board, a chaser
//! on `chase` and a runner on `dodge`.

use std::path::Path;

use pursuit_agents::{AgentError, KinematicsConfig, SpawnConfig};
use pursuit_types::{PolicyKind, PolicySettings, UpdateOrder};
use pursuit_world::{
    Board, BoundaryField, DEFAULT_BOARD_SIZE, DEFAULT_CAPTURE_FRACTION, DEFAULT_RAMP_FRACTION,
    DEFAULT_RAMP_STRENGTH, WorldError,
};
use serde::Deserialize;

use crate::operator::OperatorState;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Board or boundary parameters are unusable.
    #[error("invalid world configuration: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Kinematics or spawn parameters are unusable.
    #[error("invalid agent configuration: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// Any other semantic problem.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Environment variable overriding `observer.port`.
pub const ENV_OBSERVER_PORT: &str = "PURSUIT_OBSERVER_PORT";

/// Environment variable overriding `simulation.seed`.
pub const ENV_SEED: &str = "PURSUIT_SEED";

/// An environment override that could not be parsed and was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOverride {
    /// Variable name.
    pub variable: &'static str,
    /// The raw value found.
    pub value: String,
    /// Parse error message.
    pub reason: String,
}

impl RejectedOverride {
    fn new(variable: &'static str, value: String, error: &impl std::fmt::Display) -> Self {
        Self {
            variable,
            value,
            reason: error.to_string(),
        }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `pursuit-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Board size and capture radius.
    #[serde(default)]
    pub board: BoardConfig,

    /// Soft boundary ramp.
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// Agent kinematics and spawning.
    #[serde(default)]
    pub agents: AgentsConfig,

    /// Initial steering policies and update order.
    #[serde(default)]
    pub policies: PoliciesConfig,

    /// History trail sampling.
    #[serde(default)]
    pub history: HistoryConfig,

    /// Run loop pacing, seed and limits.
    #[serde(default)]
    pub simulation: RunConfig,

    /// HTTP/WebSocket observer.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment overrides are not applied here; see
    /// [`Self::apply_env_overrides`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `PURSUIT_*` environment overrides:
    /// - `PURSUIT_OBSERVER_PORT` overrides `observer.port`
    /// - `PURSUIT_SEED` overrides `simulation.seed`
    ///
    /// Unparseable values are skipped and returned so the caller can log
    /// them once its subscriber is installed.
    pub fn apply_env_overrides(&mut self) -> Vec<RejectedOverride> {
        self.apply_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides read through `lookup` instead of the process
    /// environment.
    pub fn apply_overrides_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Vec<RejectedOverride> {
        let mut rejected = Vec::new();
        if let Some(value) = lookup(ENV_OBSERVER_PORT) {
            match value.parse::<u16>() {
                Ok(port) => self.observer.port = port,
                Err(e) => rejected.push(RejectedOverride::new(ENV_OBSERVER_PORT, value, &e)),
            }
        }
        if let Some(value) = lookup(ENV_SEED) {
            match value.parse::<u64>() {
                Ok(seed) => self.simulation.seed = Some(seed),
                Err(e) => rejected.push(RejectedOverride::new(ENV_SEED, value, &e)),
            }
        }
        rejected
    }

    /// Check every section for values the simulation cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.boundary_field()?;
        self.agents.kinematics.validate()?;
        self.agents.spawn.validate()?;
        if self.history.interval == 0 {
            return Err(ConfigError::Invalid {
                reason: "history.interval must be at least 1".to_owned(),
            });
        }
        if self.simulation.tick_interval_ms < OperatorState::MIN_TICK_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "simulation.tick_interval_ms must be at least {}",
                    OperatorState::MIN_TICK_INTERVAL_MS
                ),
            });
        }
        Ok(())
    }

    /// Build the [`Board`] described by the `board` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::World`] for a non-positive size or a capture
    /// fraction outside `(0, 1)`.
    pub fn board(&self) -> Result<Board, ConfigError> {
        Ok(Board::new(self.board.size, self.board.capture_fraction)?)
    }

    /// Build the [`BoundaryField`] covering the configured board.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::World`] if the board or ramp is invalid.
    pub fn boundary_field(&self) -> Result<BoundaryField, ConfigError> {
        let board = self.board()?;
        Ok(BoundaryField::for_board(
            &board,
            self.boundary.ramp_fraction,
            self.boundary.ramp_strength,
        )?)
    }

    /// Initial policy selection.
    pub const fn policy_settings(&self) -> PolicySettings {
        PolicySettings {
            chaser: self.policies.chaser,
            runner: self.policies.runner,
        }
    }
}

/// Board geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    /// Edge length of the square board (default: 1000).
    #[serde(default = "default_board_size")]
    pub size: f64,

    /// Capture distance as a fraction of the board size (default: 0.02).
    #[serde(default = "default_capture_fraction")]
    pub capture_fraction: f64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            size: default_board_size(),
            capture_fraction: default_capture_fraction(),
        }
    }
}

/// Soft boundary ramp parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoundaryConfig {
    /// Ramp width as a fraction of the board size (default: 0.2).
    #[serde(default = "default_ramp_fraction")]
    pub ramp_fraction: f64,

    /// Ramp steepness (default: 0.05).
    #[serde(default = "default_ramp_strength")]
    pub ramp_strength: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            ramp_fraction: default_ramp_fraction(),
            ramp_strength: default_ramp_strength(),
        }
    }
}

/// Agent motion and spawn parameters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AgentsConfig {
    /// Thrust and drag.
    #[serde(default)]
    pub kinematics: KinematicsConfig,

    /// Spawn region, starting speed and colours.
    #[serde(default)]
    pub spawn: SpawnConfig,
}

/// Initial policies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PoliciesConfig {
    /// Chaser policy (default: `chase`).
    #[serde(default = "default_chaser_policy")]
    pub chaser: PolicyKind,

    /// Runner policy (default: `dodge`).
    #[serde(default = "default_runner_policy")]
    pub runner: PolicyKind,

    /// Whether the runner sees the chaser's update from the same tick
    /// (default: `sequential`).
    #[serde(default)]
    pub update_order: UpdateOrder,
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            chaser: default_chaser_policy(),
            runner: default_runner_policy(),
            update_order: UpdateOrder::default(),
        }
    }
}

/// History trail sampling.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryConfig {
    /// Record a snapshot every N round ticks (default: 15).
    #[serde(default = "default_history_interval")]
    pub interval: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            interval: default_history_interval(),
        }
    }
}

/// Run loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunConfig {
    /// RNG seed for spawning. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Real-time milliseconds between ticks (default: 16, about 60 Hz).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default)]
    pub max_ticks: u64,

    /// Stop after this many captures (0 = unlimited).
    #[serde(default)]
    pub max_captures: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited).
    #[serde(default)]
    pub max_real_time_seconds: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: 0,
            max_captures: 0,
            max_real_time_seconds: 0,
        }
    }
}

/// Observer server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Whether to start the HTTP/WebSocket server (default: true).
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Bind address (default: `0.0.0.0`).
    #[serde(default = "default_observer_host")]
    pub host: String,

    /// Bind port (default: 8080).
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (default: `info`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

const fn default_board_size() -> f64 {
    DEFAULT_BOARD_SIZE
}

const fn default_capture_fraction() -> f64 {
    DEFAULT_CAPTURE_FRACTION
}

const fn default_ramp_fraction() -> f64 {
    DEFAULT_RAMP_FRACTION
}

const fn default_ramp_strength() -> f64 {
    DEFAULT_RAMP_STRENGTH
}

const fn default_chaser_policy() -> PolicyKind {
    PolicyKind::Chase
}

const fn default_runner_policy() -> PolicyKind {
    PolicyKind::Dodge
}

const fn default_history_interval() -> u64 {
    15
}

const fn default_tick_interval_ms() -> u64 {
    16
}

const fn default_true() -> bool {
    true
}

fn default_observer_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}
