//! backup-monitor
//!
//! Serves `GET /getUpdated/{id}`: whether the files behind a named group of
//! glob rules have been modified recently enough.
//!
//! ```text
//!   config.toml ──▶ config ──▶ Arc<AppConfig> ──▶ http (axum)
//!                                                   │
//!                                                   ▼
//!                                   freshness: duration + glob + stat
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use backup_monitor::lifecycle::{start, StartupOptions};

#[derive(Parser)]
#[command(name = "backup-monitor")]
#[command(about = "Report whether groups of files were updated recently", long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Log level or filter directive (overrides the config file)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = StartupOptions {
        config_path: cli.config,
        log_level: cli.log_level,
    };

    match start(options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            ExitCode::FAILURE
        }
    }
}
