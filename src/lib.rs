//! Backup freshness monitor library.

pub mod config;
pub mod freshness;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use freshness::{evaluate, Evaluation};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
