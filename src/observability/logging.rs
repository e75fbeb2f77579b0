//! Structured logging.
//!
//! Filter precedence:
//! 1. `RUST_LOG`
//! 2. `--log-level` on the command line
//! 3. `[logging].level` in the config file
//!
//! A bare level such as `debug` applies to this crate and to `tower_http`;
//! anything else is handed to `EnvFilter` verbatim.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Build the filter directive string from the CLI override and config.
pub fn resolve_filter(config: &LoggingConfig, cli_level: Option<&str>) -> String {
    let level = cli_level.unwrap_or(&config.level).trim();
    let lowered = level.to_lowercase();
    if LEVELS.contains(&lowered.as_str()) {
        format!("backup_monitor={lowered},tower_http={lowered}")
    } else if level.is_empty() {
        "backup_monitor=info,tower_http=info".to_string()
    } else {
        level.to_string()
    }
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &LoggingConfig, cli_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| resolve_filter(config, cli_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
