//! Bulk load handler

use crate::error::Result;
use crate::AppState;
use axum::{extract::State, Json};
use startup_types::LoadSummary;
use tracing::info;

/// Load the configured dataset file. Takes no body.
pub async fn load_data(State(state): State<AppState>) -> Result<Json<LoadSummary>> {
    info!("Load requested for {}", state.config.data_file.display());
    let summary = state.loader.load_file(&state.config.data_file).await?;
    Ok(Json(summary))
}
