//! Freshness evaluation subsystem.
//!
//! # Data Flow
//! ```text
//! GET /getUpdated/{id}
//!     → evaluator.rs (look up group, walk its rules in order)
//!         → duration.rs (rule.time → cutoff = now - window)
//!         → glob.rs (rule.path + rule.glob → matching paths)
//!         → stat each match, keep mtime > cutoff
//!     → combine per-rule flags with the group's condition
//! ```
//!
//! Evaluation is synchronous and performs blocking filesystem I/O.

pub mod duration;
pub mod evaluator;
pub mod glob;

pub use duration::{parse_window, DurationError, Window};
pub use evaluator::{evaluate, evaluate_group, EvalError, Evaluation, RuleOutcome};
