//! Route definitions for the `/orders` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/orders`.
///
/// ```text
/// POST   /                       -> create order
/// GET    /{id}                   -> get order
/// POST   /{id}/mark-incomplete   -> mark incomplete, apply penalty ladder
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create_order))
        .route("/{id}", get(orders::get_order))
        .route("/{id}/mark-incomplete", post(orders::mark_incomplete))
}
