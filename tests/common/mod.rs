//! Shared fixtures for integration tests.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use backup_monitor::config::{parse_config, AppConfig};

/// Create `dir/name` with its mtime set `age` in the past.
pub fn file_aged(dir: &Path, name: &str, age: Duration) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
    path
}

/// Config with the scenario groups used across the integration tests.
///
/// - `g1`: `*.log` within 1h, condition `any`
/// - `both`: `*.log` and `*.bak` within 1h, condition `all`
/// - `none`: no rules, condition `all`
/// - `odd`: `*.log` within 1h, condition `sometimes`
/// - `broken`: an unterminated character class
pub fn scenario_config(dir: &Path) -> AppConfig {
    let dir = dir.display();
    parse_config(&format!(
        r#"
[server]
host = "127.0.0.1"
port = 0

[[directories]]
id = "g1"
condition = "any"
  [[directories.globs]]
  path = "{dir}"
  glob = "*.log"
  time = "1h"

[[directories]]
id = "both"
condition = "all"
  [[directories.globs]]
  path = "{dir}"
  glob = "*.log"
  time = "1h"
  [[directories.globs]]
  path = "{dir}"
  glob = "*.bak"
  time = "1h"

[[directories]]
id = "none"
condition = "all"

[[directories]]
id = "odd"
condition = "sometimes"
  [[directories.globs]]
  path = "{dir}"
  glob = "*.log"
  time = "1h"

[[directories]]
id = "broken"
condition = "any"
  [[directories.globs]]
  path = "{dir}"
  glob = "[oops"
  time = "1h"
"#
    ))
    .unwrap()
}
