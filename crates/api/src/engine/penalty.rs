//! Penalty engine: per-user incomplete-transaction state machine.

use sqlx::PgPool;
use trove_core::penalty::{self, Escalation, PenaltyOutcome, PenaltyView};
use trove_core::roles;
use trove_core::types::{DbId, Timestamp};
use trove_db::repositories::UserRepo;

/// Record one incomplete transaction against a user and apply the ladder.
///
/// The count increment is a single atomic statement and always happens --
/// the exactly-once guarantee per order lives upstream in the order's
/// `marked_incomplete` claim. The effect is then decided from the *new*
/// count: staff roles and already-banned users get the count only.
///
/// Returns `None` when the user does not exist.
pub async fn record_incomplete_transaction(
    pool: &PgPool,
    user_id: DbId,
    now: Timestamp,
) -> Result<Option<PenaltyOutcome>, sqlx::Error> {
    let Some(counters) = UserRepo::increment_incomplete_count(pool, user_id).await? else {
        return Ok(None);
    };

    if counters.is_banned {
        tracing::debug!(user_id, "Incomplete transaction recorded for banned user");
        return Ok(Some(PenaltyOutcome::AlreadyBanned));
    }

    if roles::is_staff(&counters.role) {
        tracing::info!(
            user_id,
            role = %counters.role,
            count = counters.incomplete_transaction_count,
            "Incomplete transaction recorded for staff account, no penalty applied"
        );
        return Ok(Some(PenaltyOutcome::None));
    }

    let outcome = match penalty::escalation_for(counters.incomplete_transaction_count, now) {
        Escalation::Suspend { until } => {
            UserRepo::apply_suspension(pool, user_id, until).await?;
            tracing::info!(user_id, until = %until, "User suspended for incomplete transaction");
            PenaltyOutcome::Suspension
        }
        Escalation::Ban { reason } => {
            UserRepo::apply_ban(pool, user_id, reason).await?;
            tracing::warn!(user_id, reason, "User banned for repeated incomplete transactions");
            PenaltyOutcome::Ban
        }
        Escalation::None => PenaltyOutcome::None,
    };

    Ok(Some(outcome))
}

/// Read a user's effective penalty status at `now`.
///
/// The returned view applies the lazy suspension lift and the staff
/// exemption regardless of stored flags. When a lift is due, the stored
/// flag is also cleared eagerly with a conditional update -- an
/// optimization the view never depends on.
///
/// Returns `None` when the user does not exist.
pub async fn check_status(
    pool: &PgPool,
    user_id: DbId,
    now: Timestamp,
) -> Result<Option<PenaltyView>, sqlx::Error> {
    let Some(user) = UserRepo::find_by_id(pool, user_id).await? else {
        return Ok(None);
    };

    let snapshot = user.penalty_snapshot();

    if !roles::is_staff(&snapshot.role) && penalty::suspension_lift_due(&snapshot, now) {
        UserRepo::lift_expired_suspension(pool, user_id, now).await?;
        tracing::debug!(user_id, "Expired suspension lifted on status check");
    }

    Ok(Some(penalty::effective_status(&snapshot, now)))
}
