//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (warnings only, never fatal)
//!     → AppConfig (immutable)
//!     → shared via Arc with the HTTP handlers
//! ```
//!
//! # Design Decisions
//! - Config is loaded once at startup; there is no reload
//! - Server and logging sections have defaults; groups do not
//! - Unknown condition strings decode successfully and evaluate to false

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AppConfig, Condition, DirectoryGroup, GlobRule, InvalidDurationPolicy, LogFormat,
    LoggingConfig, ServerConfig,
};
pub use validation::{validate_config, ValidationWarning};
