//! Route definitions for the `/items` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Routes mounted at `/items`.
///
/// ```text
/// POST   /                       -> create listing
/// GET    /{id}                   -> get item
/// GET    /{id}/availability      -> effective availability
/// POST   /{id}/reserve           -> claim / renew a hold
/// DELETE /{id}/reservation       -> release own hold
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(items::create_item))
        .route("/{id}", get(items::get_item))
        .route("/{id}/availability", get(items::get_availability))
        .route("/{id}/reserve", post(items::reserve))
        .route("/{id}/reservation", delete(items::release))
}
