//! Handlers for the `/items` resource: listing CRUD plus the reservation
//! operations (availability, reserve, release).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use trove_core::availability::EffectiveState;
use trove_core::error::CoreError;
use trove_core::holds::HoldKind;
use trove_core::types::{DbId, Timestamp};
use trove_db::models::item::{CreateItem, Item};
use trove_db::repositories::ItemRepo;

use crate::engine::reservations::{self, ReserveResult};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for reserving an item.
#[derive(Debug, Deserialize)]
pub struct ReserveRequest {
    pub user_id: DbId,
    pub kind: HoldKind,
    /// Overrides the configured hold duration for this kind.
    pub duration_minutes: Option<i64>,
}

/// Response body for a reservation attempt.
///
/// A lost race is a normal response (`reserved: false`), not an HTTP
/// error: the buyer simply sees the item is no longer available.
#[derive(Debug, Serialize)]
pub struct ReserveResponse {
    pub reserved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

/// Request body for releasing a reservation.
#[derive(Debug, Deserialize)]
pub struct ReleaseRequest {
    pub user_id: DbId,
}

/// Response body for a release. `released: false` means the caller did
/// not own a live reservation -- a benign no-op, not an error.
#[derive(Debug, Serialize)]
pub struct ReleaseResponse {
    pub released: bool,
}

/// Query parameters for the availability endpoint.
#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    /// Lets the response say whether the current hold is the caller's own.
    pub user_id: Option<DbId>,
}

/// Response body for an availability check.
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_until: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_by_current_user: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/items
///
/// Create an active listing.
pub async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> AppResult<(StatusCode, Json<Item>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "title must not be empty".to_string(),
        )));
    }
    let item = ItemRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /api/v1/items/{id}
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Item>> {
    let item = ItemRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;
    Ok(Json(item))
}

/// GET /api/v1/items/{id}/availability
///
/// Effective availability at the current time: terminal statuses pass
/// through, a lapsed hold reads as available even before any sweep.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<AvailabilityParams>,
) -> AppResult<Json<AvailabilityResponse>> {
    let view = reservations::availability(&state.pool, id, params.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Item", id }))?;

    let status = match view.state {
        EffectiveState::Available => "available",
        EffectiveState::Held { .. } => "held",
        EffectiveState::Sold => "sold",
        EffectiveState::Inactive => "inactive",
    };

    Ok(Json(AvailabilityResponse {
        status,
        reserved_until: view.reserved_until,
        reserved_by_current_user: view.reserved_by_current_user,
    }))
}

/// POST /api/v1/items/{id}/reserve
///
/// Claim a time-boxed hold on the item. Renewal by the current holder
/// succeeds through the same path.
pub async fn reserve(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReserveRequest>,
) -> AppResult<Json<ReserveResponse>> {
    let duration_minutes = input
        .duration_minutes
        .unwrap_or_else(|| state.config.hold_minutes_for(input.kind));
    if duration_minutes <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "duration_minutes must be positive".to_string(),
        )));
    }

    let result =
        reservations::reserve(&state.pool, id, input.user_id, input.kind, duration_minutes)
            .await?;

    match result {
        ReserveResult::Reserved(reservation) => Ok(Json(ReserveResponse {
            reserved: true,
            until: Some(reservation.expires_at),
            reason: None,
        })),
        ReserveResult::Unavailable => Ok(Json(ReserveResponse {
            reserved: false,
            until: None,
            reason: Some("unavailable"),
        })),
        ReserveResult::NotFound => {
            Err(AppError::Core(CoreError::NotFound { entity: "Item", id }))
        }
    }
}

/// DELETE /api/v1/items/{id}/reservation
///
/// Release the caller's hold. Safe to call when no hold exists.
pub async fn release(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ReleaseRequest>,
) -> AppResult<Json<ReleaseResponse>> {
    let released = reservations::release(&state.pool, id, input.user_id).await?;
    Ok(Json(ReleaseResponse { released }))
}
