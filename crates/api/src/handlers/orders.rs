//! Handlers for the `/orders` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use trove_core::error::CoreError;
use trove_core::penalty::PenaltyOutcome;
use trove_core::types::DbId;
use trove_db::models::order::{CreateOrder, Order};
use trove_db::repositories::OrderRepo;

use crate::engine::order_expiry::{self, MarkIncompleteResult};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Default reason recorded for a manual mark-incomplete.
const DEFAULT_MANUAL_REASON: &str = "buyer failed to complete payment";

/// Request body for marking an order incomplete.
#[derive(Debug, Deserialize)]
pub struct MarkIncompleteRequest {
    /// Must match the order's buyer; guards against marking the wrong order.
    pub buyer_id: DbId,
    pub reason: Option<String>,
}

/// Response body for a mark-incomplete request.
#[derive(Debug, Serialize)]
pub struct MarkIncompleteResponse {
    pub applied: PenaltyOutcome,
}

/// POST /api/v1/orders
///
/// Record a buyer's committed-to-pay intent. Payment capture itself is
/// handled by the external payment flow.
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrder>,
) -> AppResult<(StatusCode, Json<Order>)> {
    if input.amount_cents < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "amount_cents must not be negative".to_string(),
        )));
    }
    let order = OrderRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /api/v1/orders/{id}
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Order>> {
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    Ok(Json(order))
}

/// POST /api/v1/orders/{id}/mark-incomplete
///
/// Mark an unpaid order incomplete and apply the penalty ladder to its
/// buyer. Repeats are benign: the response says `already_marked` and the
/// count does not move again.
pub async fn mark_incomplete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<MarkIncompleteRequest>,
) -> AppResult<Json<MarkIncompleteResponse>> {
    // Verify the buyer matches before mutating anything.
    let order = OrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Order", id }))?;
    if order.buyer_id != input.buyer_id {
        return Err(AppError::Core(CoreError::Validation(format!(
            "order {id} does not belong to buyer {}",
            input.buyer_id
        ))));
    }

    let reason = input.reason.as_deref().unwrap_or(DEFAULT_MANUAL_REASON);
    let result = order_expiry::mark_order_incomplete(&state.pool, id, reason, Utc::now()).await?;

    let applied = match result {
        MarkIncompleteResult::Applied(outcome) => outcome,
        MarkIncompleteResult::AlreadyMarked => PenaltyOutcome::AlreadyMarked,
        MarkIncompleteResult::NotEligible => PenaltyOutcome::None,
        MarkIncompleteResult::NotFound => {
            return Err(AppError::Core(CoreError::NotFound { entity: "Order", id }));
        }
    };

    Ok(Json(MarkIncompleteResponse { applied }))
}
