use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::artifacts::ArtifactSet;
use crate::error::PredictError;
use crate::features;
use crate::rank::{rank, soil_status};
use crate::types::{PredictResponse, SoilReading};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    /// None when artifacts failed to load; every request then answers 503.
    pub artifacts: Option<Arc<ArtifactSet>>,
    pub top_k: usize,
    /// Requests whose district fell back to the unknown code. Watch this:
    /// a climbing count usually means upstream category drift, not users.
    pub fallback_hits: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(artifacts: Option<ArtifactSet>, top_k: usize) -> Self {
        Self {
            artifacts: artifacts.map(Arc::new),
            top_k,
            fallback_hits: Arc::new(AtomicU64::new(0)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/predict", post(predict))
        .with_state(state)
}

// ---------- Pipeline ----------

/// Run the full assemble → scale → predict → rank pipeline for one reading.
///
/// Pure with respect to the artifact set, so tests drive it without HTTP.
pub fn run_pipeline(
    artifacts: &ArtifactSet,
    reading: &SoilReading,
    k: usize,
) -> Result<PredictResponse, PredictError> {
    let (features, warning) = features::assemble(reading, artifacts.districts.as_ref())?;
    let scaled = artifacts.scaler.transform(&features)?;
    let probs = artifacts.forest.predict_proba(&scaled)?;
    let recommendations = rank(&artifacts.forest.classes, &probs, k);
    Ok(PredictResponse::new(
        recommendations,
        soil_status(reading.ph),
        warning,
    ))
}

// ---------- Handlers ----------

async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mode = match &state.artifacts {
        Some(set) if set.districts.is_some() => "with-district",
        Some(_) => "without-district",
        None => "unavailable",
    };
    Json(json!({
        "status": if state.artifacts.is_some() {
            "crop predictor running"
        } else {
            "artifacts not loaded"
        },
        "mode": mode,
        "top_k": state.top_k,
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(reading): Json<SoilReading>,
) -> Result<Json<PredictResponse>, PredictError> {
    let artifacts = state.artifacts.as_ref().ok_or_else(|| {
        PredictError::ServiceUnavailable("model artifacts not loaded".to_string())
    })?;

    let response = run_pipeline(artifacts, &reading, state.top_k)?;

    for warning in &response.warnings {
        let hits = state.fallback_hits.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!("{warning} (fallback hits so far: {hits})");
    }

    Ok(Json(response))
}
