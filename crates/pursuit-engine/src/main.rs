//! Engine binary for the pursuit simulation.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `pursuit-config.yaml` (or `$PURSUIT_CONFIG`)
//! 2. Initialize structured logging (tracing), then apply `PURSUIT_*`
//!    environment overrides
//! 3. Build the simulation state and spawn both agents
//! 4. Create operator state from the run limits
//! 5. Start the Observer API server
//! 6. Run the simulation loop until a limit, `Ctrl-C` or an operator stop
//! 7. Log the result

mod error;
mod observer_callback;

use std::path::PathBuf;
use std::sync::Arc;

use pursuit_core::config::{LogFormat, LoggingConfig, SimulationConfig};
use pursuit_core::operator::OperatorState;
use pursuit_core::runner;
use pursuit_core::tick::SimulationState;
use pursuit_observer::{AppState, ServerConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer_callback::ObserverCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "pursuit-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the run loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (mut config, config_source) = load_config()?;

    // 2. Initialize structured logging, then apply environment overrides so
    //    rejected values reach the log.
    init_tracing(&config.logging)?;
    info!(source = %config_source, "pursuit-engine starting");
    for rejected in config.apply_env_overrides() {
        warn!(
            variable = rejected.variable,
            value = %rejected.value,
            error = %rejected.reason,
            "Ignoring invalid environment override"
        );
    }
    info!(
        board_size = config.board.size,
        capture_fraction = config.board.capture_fraction,
        seed = ?config.simulation.seed,
        tick_interval_ms = config.simulation.tick_interval_ms,
        chaser = %config.policies.chaser,
        runner = %config.policies.runner,
        update_order = ?config.policies.update_order,
        "Configuration loaded"
    );

    // 3. Build the simulation state.
    let mut sim_state = SimulationState::from_config(&config).map_err(EngineError::from)?;

    // 4. Create operator state.
    let operator = Arc::new(OperatorState::new(
        &config.simulation,
        config.policy_settings(),
    ));
    info!(
        max_ticks = operator.max_ticks(),
        max_captures = operator.max_captures(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        "Operator state initialized"
    );

    // 5. Start the Observer API server.
    let app_state = Arc::new(AppState::with_operator(
        sim_state.board,
        sim_state.boundary.view(),
        Arc::clone(&operator),
    ));
    let observer = if config.observer.enabled {
        let server_config = ServerConfig::from(&config.observer);
        let handle = pursuit_observer::spawn_observer(&server_config, Arc::clone(&app_state))
            .await
            .map_err(EngineError::from)?;
        info!(addr = %handle.addr, "Observer API server started");
        Some(handle)
    } else {
        info!("Observer disabled, running headless");
        None
    };

    // 6. Stop cleanly on Ctrl-C.
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
            }
        });
    }

    // 7. Run the simulation. No model backend is wired in; `automatic`
    //    leaves an agent coasting.
    let mut callback = ObserverCallback::new(app_state);
    let result = runner::run_simulation(&mut sim_state, None, &operator, &mut callback)
        .await
        .map_err(EngineError::from)?;

    runner::log_simulation_end(&result);

    if let Some(handle) = observer {
        handle.task.abort();
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        captures = result.captures,
        "pursuit-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `$PURSUIT_CONFIG`, then `pursuit-config.yaml`,
/// falling back to defaults when no file exists.
///
/// Returns the config and a description of where it came from. Runs
/// before logging is set up, so nothing is logged here.
fn load_config() -> Result<(SimulationConfig, String), EngineError> {
    let path = std::env::var_os("PURSUIT_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, path.display().to_string()))
    } else {
        Ok((SimulationConfig::default(), String::from("defaults")))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match logging.format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| EngineError::Logging {
        message: e.to_string(),
    })
}
