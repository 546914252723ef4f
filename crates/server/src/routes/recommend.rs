use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use foodrec::{CatalogItem, Recommendation};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const NO_MATCH_MESSAGE: &str =
    "Tidak ada makanan yang sesuai dengan budget. Berikut saran dari cluster dan diet yang sama.";

/// Body of `POST /rekomendasi`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum RecommendationResponse {
    Matched {
        rekomendasi: Vec<CatalogItem>,
    },
    NoMatch {
        message: String,
        rekomendasi: Vec<CatalogItem>,
        saran: Vec<CatalogItem>,
    },
}

impl From<Recommendation> for RecommendationResponse {
    fn from(rec: Recommendation) -> Self {
        if rec.has_exact_matches() {
            RecommendationResponse::Matched {
                rekomendasi: rec.matches,
            }
        } else {
            RecommendationResponse::NoMatch {
                message: NO_MATCH_MESSAGE.to_string(),
                rekomendasi: Vec::new(),
                saran: rec.alternatives,
            }
        }
    }
}

/// Recommendations for `{budget, preferensi_diet}`.
///
/// Items in the predicted cluster with the same diet and a price within
/// budget, in catalog order. When none fit the budget the response carries
/// an empty `rekomendasi` and the over-budget items under `saran`.
pub async fn recommend(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<RecommendationResponse>> {
    let Json(payload) = payload?;
    let rec = state.engine.recommend(&payload)?;
    tracing::debug!(
        cluster = rec.cluster,
        matches = rec.matches.len(),
        alternatives = rec.alternatives.len(),
        "recommendations served"
    );
    Ok(Json(rec.into()))
}
