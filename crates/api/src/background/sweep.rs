//! Periodic expiry sweep.
//!
//! Spawns a background task that reclaims expired reservations and
//! finalizes overdue unpaid orders on a fixed interval using
//! `tokio::time::interval`. The same sweep can also be triggered at
//! request time; overlapping runs converge to the same state.

use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::engine::sweeper;

/// Run the expiry sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, interval_secs: u64, cancel: CancellationToken) {
    let interval = Duration::from_secs(interval_secs);
    tracing::info!(interval_secs, "Expiry sweep job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Expiry sweep job stopping");
                break;
            }
            _ = ticker.tick() => {
                match sweeper::sweep(&pool, Utc::now()).await {
                    Ok(outcome) => {
                        if outcome.reservations_reclaimed == 0 && outcome.orders_expired == 0 {
                            tracing::debug!("Expiry sweep: nothing to reclaim");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Expiry sweep failed");
                    }
                }
            }
        }
    }
}
