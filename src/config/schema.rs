//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits so the same tree can be decoded from TOML
//! and echoed back as JSON by `GET /config`.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root configuration for the backup monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Named directory groups, in file order.
    pub directories: Vec<DirectoryGroup>,

    /// Log output settings.
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Find a directory group by id. The first group with a matching id wins.
    pub fn group(&self, id: &str) -> Option<&DirectoryGroup> {
        self.directories.iter().find(|group| group.id == id)
    }
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind host (e.g., "0.0.0.0").
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// What to do with a glob rule whose `time` cannot be parsed.
    pub invalid_duration: InvalidDurationPolicy,
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            invalid_duration: InvalidDurationPolicy::default(),
        }
    }
}

/// Handling of a rule whose duration string fails to parse.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvalidDurationPolicy {
    /// The rule is skipped and counts as not satisfied.
    #[default]
    Unsatisfied,
    /// The cutoff falls back to the Unix epoch, so every match is fresh.
    MatchAll,
    /// The evaluation fails with a server error.
    Reject,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// A named set of glob rules evaluated together.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DirectoryGroup {
    /// Group identifier used in `/getUpdated/{id}`.
    pub id: String,

    /// Rules, evaluated in order.
    #[serde(default)]
    pub globs: Vec<GlobRule>,

    /// How per-rule results combine.
    #[serde(default)]
    pub condition: Condition,
}

/// One glob pattern with its freshness window.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct GlobRule {
    /// Base directory the pattern is joined onto.
    pub path: String,

    /// Glob pattern, relative to `path`.
    pub glob: String,

    /// Freshness window, e.g. "24h" or "1h30m".
    pub time: String,
}

/// How the satisfied flags of a group's rules combine.
///
/// Any string decodes successfully. Values other than `any` and `all` are
/// kept as `Unrecognized` and always evaluate to false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Any,
    All,
    Unrecognized(String),
}

impl Condition {
    pub fn as_str(&self) -> &str {
        match self {
            Condition::Any => "any",
            Condition::All => "all",
            Condition::Unrecognized(raw) => raw,
        }
    }

    /// Combine per-rule results.
    pub fn combine(&self, satisfied: &[bool]) -> bool {
        match self {
            Condition::Any => satisfied.iter().any(|s| *s),
            Condition::All => satisfied.iter().all(|s| *s),
            Condition::Unrecognized(_) => false,
        }
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::Unrecognized(String::new())
    }
}

impl From<String> for Condition {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "any" => Condition::Any,
            "all" => Condition::All,
            _ => Condition::Unrecognized(raw),
        }
    }
}

impl From<&str> for Condition {
    fn from(raw: &str) -> Self {
        Condition::from(raw.to_string())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Condition::from)
    }
}
