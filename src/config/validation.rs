//! Configuration validation.
//!
//! # Responsibilities
//! - Flag duplicate group ids (only the first is reachable)
//! - Flag conditions other than `any` / `all`
//! - Flag time windows that will not parse
//! - Flag groups without any glob rules
//!
//! # Design Decisions
//! - Returns all findings, not just the first
//! - Findings are warnings: the service still starts and serves
//! - Validation is a pure function: &AppConfig → Vec<ValidationWarning>

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::{AppConfig, Condition};
use crate::freshness::duration::{parse_window, DurationError};

/// A suspicious but non-fatal configuration entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationWarning {
    DuplicateGroupId { id: String, index: usize },
    UnrecognizedCondition { id: String, condition: String },
    InvalidTimeWindow { id: String, glob: String, error: DurationError },
    NoGlobs { id: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::DuplicateGroupId { id, index } => write!(
                f,
                "directory group {:?} at index {} shadows an earlier group with the same id",
                id, index
            ),
            ValidationWarning::UnrecognizedCondition { id, condition } => write!(
                f,
                "directory group {:?} has condition {:?}; expected \"any\" or \"all\", will always report false",
                id, condition
            ),
            ValidationWarning::InvalidTimeWindow { id, glob, error } => {
                write!(f, "directory group {:?}, glob {:?}: {}", id, glob, error)
            }
            ValidationWarning::NoGlobs { id } => {
                write!(f, "directory group {:?} has no globs", id)
            }
        }
    }
}

/// Inspect a loaded configuration and report anything suspicious.
pub fn validate_config(config: &AppConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for (index, group) in config.directories.iter().enumerate() {
        if !seen.insert(group.id.as_str()) {
            warnings.push(ValidationWarning::DuplicateGroupId {
                id: group.id.clone(),
                index,
            });
        }

        if let Condition::Unrecognized(raw) = &group.condition {
            warnings.push(ValidationWarning::UnrecognizedCondition {
                id: group.id.clone(),
                condition: raw.clone(),
            });
        }

        if group.globs.is_empty() {
            warnings.push(ValidationWarning::NoGlobs {
                id: group.id.clone(),
            });
        }

        for rule in &group.globs {
            if let Err(error) = parse_window(&rule.time) {
                warnings.push(ValidationWarning::InvalidTimeWindow {
                    id: group.id.clone(),
                    glob: rule.glob.clone(),
                    error,
                });
            }
        }
    }

    warnings
}
