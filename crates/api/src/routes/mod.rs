pub mod health;
pub mod items;
pub mod maintenance;
pub mod orders;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                               create listing
/// /items/{id}                          get item
/// /items/{id}/availability             effective availability (GET)
/// /items/{id}/reserve                  claim / renew a hold (POST)
/// /items/{id}/reservation              release own hold (DELETE)
///
/// /orders                              create order
/// /orders/{id}                         get order
/// /orders/{id}/mark-incomplete         mark incomplete, apply penalty (POST)
///
/// /users                               create user
/// /users/{id}                          get user
/// /users/{id}/penalty-status           effective penalty status (GET)
///
/// /maintenance/sweep                   run an expiry sweep now (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", items::router())
        .nest("/orders", orders::router())
        .nest("/users", users::router())
        .nest("/maintenance", maintenance::router())
}
