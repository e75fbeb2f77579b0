//! Response bodies and error mapping.
//!
//! # Design Decisions
//! - Every error body is `{"error": "<message>"}`
//! - Unknown or missing group ids are the caller's fault (400)
//! - Filesystem and pattern failures are ours (500)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::freshness::{EvalError, Evaluation};

/// Body of a successful `GET /getUpdated/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdatedResponse {
    pub status: bool,
    pub files: Vec<String>,
}

impl From<Evaluation> for UpdatedResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            status: evaluation.status,
            files: evaluation
                .files
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Evaluation(#[from] EvalError),

    #[error("evaluation task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Evaluation(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Rejected request");
        }
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
