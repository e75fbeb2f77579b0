//! HTTP surface.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, trace layer)
//!     → handlers.rs (GET /config, GET /getUpdated/{id})
//!     → freshness::evaluate on the blocking pool
//!     → response.rs (JSON body or {"error": ...})
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use response::{ApiError, ErrorBody, UpdatedResponse};
pub use server::{AppState, HttpServer};
