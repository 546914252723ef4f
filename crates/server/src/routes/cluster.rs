use crate::error::ServerResult;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use foodrec::ClusterPrediction;
use serde_json::Value;
use std::sync::Arc;

/// Cluster for one food item.
///
/// # Request
///
/// ```json
/// {"kalori": 500, "karbohidrat": 50, "protein": 25, "harga": 25000, "tipe_diet": "Normal"}
/// ```
///
/// # Response
///
/// ```json
/// {"cluster": 1, "level_harga": "Mahal"}
/// ```
pub async fn predict_food_cluster(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<ClusterPrediction>> {
    let Json(payload) = payload?;
    let prediction = state.engine.predict_food_cluster(&payload)?;
    tracing::debug!(cluster = prediction.cluster, tier = %prediction.price_tier, "food item clustered");
    Ok(Json(prediction))
}

/// Cluster for a user profile `{budget, tipe_diet?}`. Nutrition columns the
/// payload omits are filled from the reference means.
pub async fn get_user_cluster(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ServerResult<Json<ClusterPrediction>> {
    let Json(payload) = payload?;
    let prediction = state.engine.user_cluster(&payload)?;
    tracing::debug!(cluster = prediction.cluster, tier = %prediction.price_tier, "user clustered");
    Ok(Json(prediction))
}
