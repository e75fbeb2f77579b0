//! Request handlers.

use std::time::SystemTime;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::config::AppConfig;
use crate::freshness::{evaluate, EvalError};
use crate::http::response::{ApiError, UpdatedResponse};
use crate::http::server::AppState;

/// `GET /config`
pub async fn get_config(State(state): State<AppState>) -> Json<AppConfig> {
    Json(state.config.as_ref().clone())
}

/// `GET /getUpdated/{config_set}`
pub async fn get_updated(
    State(state): State<AppState>,
    Path(config_set): Path<String>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    tracing::debug!(config_set = %config_set, "Evaluating directory group");

    // Globbing and stat calls block; keep them off the async workers.
    let config = state.config.clone();
    let evaluation =
        tokio::task::spawn_blocking(move || evaluate(&config, &config_set, SystemTime::now()))
            .await??;

    Ok(Json(evaluation.into()))
}

/// `GET /getUpdated` and `GET /getUpdated/`
pub async fn get_updated_missing() -> ApiError {
    EvalError::MissingGroupId.into()
}
