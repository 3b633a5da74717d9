//! Route definitions for the `/maintenance` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::maintenance;
use crate::state::AppState;

/// Routes mounted at `/maintenance`.
///
/// ```text
/// POST   /sweep                  -> run an expiry sweep now
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/sweep", post(maintenance::run_sweep))
}
