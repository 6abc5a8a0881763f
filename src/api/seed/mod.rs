//! Development seed endpoint

use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use tracing::warn;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::seed::SeedReport;

/// Mounted only when the application state carries a seed service
pub fn create_seed_router() -> Router<AppState> {
    Router::new().route("/", get(run_seed))
}

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: SeedReport,
}

/// GET /seed
///
/// Wipes products and users, then loads the fixture set.
pub async fn run_seed(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    let seed = state
        .seed_service
        .as_ref()
        .ok_or_else(|| ApiError::not_found("Seeding is disabled"))?;

    warn!("Running database seed");
    let report = seed.run().await?;

    Ok(Json(SeedResponse {
        message: "SEED EXECUTED",
        report,
    }))
}
