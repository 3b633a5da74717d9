//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// POST   /                       -> create user
/// GET    /{id}                   -> get user
/// GET    /{id}/penalty-status    -> effective penalty status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(users::create_user))
        .route("/{id}", get(users::get_user))
        .route("/{id}/penalty-status", get(users::get_penalty_status))
}
