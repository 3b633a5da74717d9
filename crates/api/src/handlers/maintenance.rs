//! Handlers for the `/maintenance` resource.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::engine::sweeper::{self, SweepOutcome};
use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/v1/maintenance/sweep
///
/// Run an expiry sweep now. The same code path runs on the background
/// interval; triggering both concurrently is safe and converges.
pub async fn run_sweep(State(state): State<AppState>) -> AppResult<Json<SweepOutcome>> {
    let outcome = sweeper::sweep(&state.pool, Utc::now()).await?;
    Ok(Json(outcome))
}
