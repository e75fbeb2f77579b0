//! Freshness evaluation for one directory group.

use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use thiserror::Error;

use crate::config::{AppConfig, DirectoryGroup, GlobRule, InvalidDurationPolicy};
use crate::freshness::duration::{parse_window, DurationError};
use crate::freshness::glob::{expand, GlobError};

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("configSet parameter is required")]
    MissingGroupId,

    #[error("Directory config not found for id: {0}")]
    GroupNotFound(String),

    #[error("invalid time window for glob {glob:?}: {source}")]
    InvalidDuration {
        glob: String,
        #[source]
        source: DurationError,
    },

    #[error(transparent)]
    Glob(#[from] GlobError),

    #[error("stat {path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EvalError {
    /// True when the caller asked for something that does not exist.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EvalError::MissingGroupId | EvalError::GroupNotFound(_))
    }
}

/// Result for a single glob rule.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    /// `None` when the rule's window could not be parsed and was skipped.
    pub cutoff: Option<SystemTime>,
    pub satisfied: bool,
    pub files: Vec<PathBuf>,
}

/// Combined result for a directory group.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: bool,
    /// Included files, in rule order then discovery order.
    pub files: Vec<PathBuf>,
    pub rules: Vec<RuleOutcome>,
}

/// Evaluate the group `id` in `config` as of `now`.
pub fn evaluate(config: &AppConfig, id: &str, now: SystemTime) -> Result<Evaluation, EvalError> {
    if id.is_empty() {
        return Err(EvalError::MissingGroupId);
    }
    let group = config
        .group(id)
        .ok_or_else(|| EvalError::GroupNotFound(id.to_string()))?;

    evaluate_group(group, config.server.invalid_duration, now)
}

/// Evaluate an already resolved group.
pub fn evaluate_group(
    group: &DirectoryGroup,
    policy: InvalidDurationPolicy,
    now: SystemTime,
) -> Result<Evaluation, EvalError> {
    let mut rules = Vec::with_capacity(group.globs.len());
    for rule in &group.globs {
        rules.push(evaluate_rule(rule, policy, now)?);
    }

    let satisfied: Vec<bool> = rules.iter().map(|r| r.satisfied).collect();
    let status = group.condition.combine(&satisfied);
    let files = rules.iter().flat_map(|r| r.files.iter().cloned()).collect();

    tracing::debug!(
        group = %group.id,
        condition = %group.condition,
        status,
        "Group evaluated"
    );

    Ok(Evaluation { status, files, rules })
}

fn evaluate_rule(
    rule: &GlobRule,
    policy: InvalidDurationPolicy,
    now: SystemTime,
) -> Result<RuleOutcome, EvalError> {
    tracing::info!(path = %rule.path, glob = %rule.glob, "Processing glob");

    let cutoff = match parse_window(&rule.time) {
        Ok(window) => {
            tracing::debug!(glob = %rule.glob, window = %window, "Parsed time window");
            window.cutoff_from(now)
        }
        Err(source) => {
            tracing::error!(
                glob = %rule.glob,
                time = %rule.time,
                error = %source,
                "Error parsing time delta"
            );
            match policy {
                InvalidDurationPolicy::Unsatisfied => {
                    return Ok(RuleOutcome {
                        cutoff: None,
                        satisfied: false,
                        files: Vec::new(),
                    })
                }
                InvalidDurationPolicy::MatchAll => SystemTime::UNIX_EPOCH,
                InvalidDurationPolicy::Reject => {
                    return Err(EvalError::InvalidDuration {
                        glob: rule.glob.clone(),
                        source,
                    })
                }
            }
        }
    };
    tracing::info!(cutoff = ?cutoff, "Checking files modified after cutoff");

    let matches = expand(&rule.path, &rule.glob).map_err(|e| {
        tracing::error!(glob = %rule.glob, error = %e, "Error processing glob");
        e
    })?;

    let mut files = Vec::new();
    for path in matches {
        let modified = fs::metadata(&path)
            .and_then(|meta| meta.modified())
            .map_err(|source| {
                tracing::error!(file = %path.display(), error = %source, "Error getting file info");
                EvalError::Stat {
                    path: path.clone(),
                    source,
                }
            })?;

        tracing::debug!(file = %path.display(), modified = ?modified, "Inspecting file");
        if modified > cutoff {
            files.push(path);
        }
    }

    Ok(RuleOutcome {
        cutoff: Some(cutoff),
        satisfied: !files.is_empty(),
        files,
    })
}
