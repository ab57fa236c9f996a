//! Health and service description endpoints

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "version": env!("CARGO_PKG_VERSION"),
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "version": env!("CARGO_PKG_VERSION"),
                })),
            )
        }
    }
}

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Startup Company Data Manager API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "companies": "/companies",
            "products": "/products",
            "load_data": "/load-data",
            "health": "/health",
        }
    }))
}
