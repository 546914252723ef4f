//! API route handlers
//!
//! - `health`: Health checks, readiness, and metrics
//! - `cluster`: Food item and user-profile cluster prediction
//! - `recommend`: Catalog recommendations for a budget and diet

pub mod cluster;
pub mod health;
pub mod recommend;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service name and available endpoints (GET /).
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": "Foodrec Server",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /predict-food-cluster",
            "POST /get-user-cluster",
            "POST /rekomendasi",
            "GET /health",
            "GET /ready",
            "GET /metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
