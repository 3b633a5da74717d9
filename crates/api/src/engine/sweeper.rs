//! Expiry sweeper.
//!
//! Reclaims expired reservation rows and finalizes overdue unpaid
//! orders. Idempotent and safe under concurrent or duplicate invocation:
//! every write it triggers is a conditional statement, so overlapping
//! runs converge to the same end state and a second run over clean state
//! reports zeros. Correctness never depends on sweep timeliness -- the
//! availability evaluator reads `expires_at` itself.

use serde::Serialize;
use sqlx::PgPool;
use trove_core::types::Timestamp;
use trove_db::repositories::{ItemRepo, ReservationRepo};

/// What one sweep accomplished.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SweepOutcome {
    pub reservations_reclaimed: u64,
    pub orders_expired: u64,
}

/// Run one sweep at `now`.
///
/// Two independent passes: reservation compaction, then order expiry via
/// the coordinator. Shared by the background task and the request-time
/// `/maintenance/sweep` trigger.
pub async fn sweep(pool: &PgPool, now: Timestamp) -> Result<SweepOutcome, sqlx::Error> {
    let reservations_reclaimed = ReservationRepo::delete_expired(pool, now).await?;

    // Reset items whose stored status outlived the rows just removed.
    let stale_items = ItemRepo::clear_stale_reservations(pool, now).await?;
    if stale_items > 0 {
        tracing::debug!(stale_items, "Cleared stale reserved item statuses");
    }

    let expired = super::order_expiry::process_expired_orders(pool, now).await?;
    let orders_expired = expired.len() as u64;

    if reservations_reclaimed > 0 || orders_expired > 0 {
        tracing::info!(
            reservations_reclaimed,
            orders_expired,
            "Expiry sweep completed"
        );
    }

    Ok(SweepOutcome {
        reservations_reclaimed,
        orders_expired,
    })
}
