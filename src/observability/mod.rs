//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config evaluation, HTTP requests, startup
//!     → tracing events with structured fields
//!     → logging.rs (EnvFilter + fmt layer)
//!     → stdout
//! ```

pub mod logging;

pub use logging::{init_logging, resolve_filter};
