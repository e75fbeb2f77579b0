//! Startup failures. Kept in its own binary: `start` installs the global
//! tracing subscriber, which can only happen once per process.

use tempfile::tempdir;

use backup_monitor::config::ConfigError;
use backup_monitor::lifecycle::{start, StartupError, StartupOptions};

#[tokio::test]
async fn test_missing_config_fails_with_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = start(StartupOptions {
        config_path: path.clone(),
        log_level: Some("error".to_string()),
    })
    .await
    .unwrap_err();

    match &err {
        StartupError::Config { path: reported, source } => {
            assert_eq!(reported, &path);
            assert!(matches!(source, ConfigError::Io(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.starts_with("failed to load configuration from"));
    assert!(message.contains("absent.toml"));
}
