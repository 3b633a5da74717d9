//! Order-expiry coordinator.
//!
//! Finds orders past their payment deadline, marks each one incomplete
//! exactly once, records the penalty against the buyer, and releases the
//! associated item back onto the market.

use sqlx::PgPool;
use trove_core::penalty::PenaltyOutcome;
use trove_core::types::{DbId, Timestamp};
use trove_db::models::order::Order;
use trove_db::repositories::{ItemRepo, OrderRepo, ReservationRepo};

/// Reason attached to orders expired by the sweep.
const EXPIRY_REASON: &str = "payment deadline passed without payment";

/// Outcome of expiring one order.
#[derive(Debug)]
pub struct OrderExpiryResult {
    pub order_id: DbId,
    pub buyer_id: DbId,
    pub outcome: PenaltyOutcome,
}

/// Result of a manual mark-incomplete request.
#[derive(Debug)]
pub enum MarkIncompleteResult {
    /// The order was claimed and the penalty recorded.
    Applied(PenaltyOutcome),
    /// The order had already been marked incomplete.
    AlreadyMarked,
    /// The order is settled (completed or cancelled); nothing to mark.
    NotEligible,
    /// No such order.
    NotFound,
}

/// Process every order whose payment deadline has passed.
///
/// Each order is handled independently: a failure is logged and the
/// batch continues. Orders claimed by a concurrent run are skipped
/// silently. Returns the results of the orders this run actually
/// processed.
pub async fn process_expired_orders(
    pool: &PgPool,
    now: Timestamp,
) -> Result<Vec<OrderExpiryResult>, sqlx::Error> {
    let candidates = OrderRepo::find_payment_overdue(pool, now).await?;
    let mut results = Vec::new();

    for order in candidates {
        match expire_one(pool, &order, now).await {
            Ok(Some(result)) => results.push(result),
            Ok(None) => {
                // A concurrent run claimed it between the scan and the CAS.
                tracing::debug!(order_id = order.id, "Order already processed, skipping");
            }
            Err(e) => {
                tracing::error!(order_id = order.id, error = %e, "Failed to expire order");
            }
        }
    }

    Ok(results)
}

/// Expire a single order.
///
/// The `marked_incomplete` claim comes first so that overlapping sweeps
/// can never double-penalize: whoever wins the conditional update owns
/// the penalty write and the item release.
async fn expire_one(
    pool: &PgPool,
    order: &Order,
    now: Timestamp,
) -> Result<Option<OrderExpiryResult>, sqlx::Error> {
    let Some(claimed) = OrderRepo::mark_incomplete(pool, order.id, EXPIRY_REASON).await? else {
        return Ok(None);
    };

    let outcome = super::penalty::record_incomplete_transaction(pool, claimed.buyer_id, now)
        .await?
        // The order references the buyer by foreign key, so a missing
        // user row means the store is inconsistent; record the order as
        // processed anyway.
        .unwrap_or(PenaltyOutcome::None);

    release_item(pool, claimed.item_id, claimed.buyer_id, now).await?;

    tracing::info!(
        order_id = claimed.id,
        buyer_id = claimed.buyer_id,
        item_id = claimed.item_id,
        outcome = ?outcome,
        "Order expired for missed payment deadline"
    );

    Ok(Some(OrderExpiryResult {
        order_id: claimed.id,
        buyer_id: claimed.buyer_id,
        outcome,
    }))
}

/// Mark one order incomplete on request (rather than by deadline scan).
///
/// Same exactly-once claim as the sweep path; the distinct outcomes let
/// the caller tell a benign repeat from a settled order.
pub async fn mark_order_incomplete(
    pool: &PgPool,
    order_id: DbId,
    reason: &str,
    now: Timestamp,
) -> Result<MarkIncompleteResult, sqlx::Error> {
    let Some(claimed) = OrderRepo::mark_incomplete(pool, order_id, reason).await? else {
        // The claim failed: work out why from the current row.
        return Ok(match OrderRepo::find_by_id(pool, order_id).await? {
            None => MarkIncompleteResult::NotFound,
            Some(order) if order.marked_incomplete => MarkIncompleteResult::AlreadyMarked,
            Some(_) => MarkIncompleteResult::NotEligible,
        });
    };

    let outcome = super::penalty::record_incomplete_transaction(pool, claimed.buyer_id, now)
        .await?
        .unwrap_or(PenaltyOutcome::None);

    release_item(pool, claimed.item_id, claimed.buyer_id, now).await?;

    Ok(MarkIncompleteResult::Applied(outcome))
}

/// Release an expired order's item back to `active`, clearing the
/// defaulting buyer's reservation row. A live hold another user acquired
/// after the buyer's lapsed is preserved, together with the item's
/// reserved bookkeeping; terminal items (sold through another path) are
/// left alone by the conditional update.
async fn release_item(
    pool: &PgPool,
    item_id: DbId,
    buyer_id: DbId,
    now: Timestamp,
) -> Result<(), sqlx::Error> {
    ReservationRepo::delete_stale_or_owned(pool, item_id, buyer_id, now).await?;
    ItemRepo::release_to_active(pool, item_id, now).await?;
    Ok(())
}
