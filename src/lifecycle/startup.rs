//! Startup orchestration.
//!
//! # Responsibilities
//! - Load configuration and initialize logging
//! - Log validation findings
//! - Bind the listener and serve until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any config load error is fatal
//! - The listener binds last (traffic only when ready)

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{load_config, validate_config, ConfigError, LoggingConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::init_logging;

/// Inputs gathered from the command line.
#[derive(Debug, Clone)]
pub struct StartupOptions {
    pub config_path: PathBuf,
    pub log_level: Option<String>,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration from {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Load config, start logging and serve until SIGINT/SIGTERM.
///
/// Logging is initialized before any error is returned, so callers can
/// report failures through `tracing`.
pub async fn start(options: StartupOptions) -> Result<(), StartupError> {
    let log_level = options.log_level.as_deref();

    let config = match load_config(&options.config_path) {
        Ok(config) => config,
        Err(source) => {
            // The caller reports the error; it still needs a subscriber.
            init_logging(&LoggingConfig::default(), log_level);
            return Err(StartupError::Config {
                path: options.config_path,
                source,
            });
        }
    };

    init_logging(&config.logging, log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        path = %options.config_path.display(),
        "backup-monitor starting"
    );

    for warning in validate_config(&config) {
        tracing::warn!(%warning, "Configuration warning");
    }

    let address = config.server.bind_address();
    tracing::info!(
        bind_address = %address,
        groups = config.directories.len(),
        invalid_duration = ?config.server.invalid_duration,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Arc::new(Shutdown::new());
    let shutdown_rx = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    HttpServer::new(config).run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
