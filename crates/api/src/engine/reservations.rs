//! Reservation manager: claim, release, and availability reads.

use chrono::Utc;
use sqlx::PgPool;
use trove_core::availability::{self, EffectiveState, ItemSnapshot, ReservationSnapshot};
use trove_core::holds::HoldKind;
use trove_core::types::{DbId, Timestamp};
use trove_db::models::reservation::Reservation;
use trove_db::repositories::{ItemRepo, ReservationRepo};

/// Result of a reservation attempt.
#[derive(Debug)]
pub enum ReserveResult {
    /// The claim won; exactly one reservation row now exists for the item.
    Reserved(Reservation),
    /// The item is terminal or held by someone else. Nothing was written.
    Unavailable,
    /// No such item.
    NotFound,
}

/// Attempt to reserve an item for a user.
///
/// The check ("is it free?") and the act ("claim it") are one statement
/// in [`ReservationRepo::claim`]; this function only interprets the
/// outcome and keeps the item's denormalized status in step. Renewal by
/// the current holder goes through the same path.
pub async fn reserve(
    pool: &PgPool,
    item_id: DbId,
    user_id: DbId,
    kind: HoldKind,
    duration_minutes: i64,
) -> Result<ReserveResult, sqlx::Error> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::minutes(duration_minutes);

    let claimed =
        ReservationRepo::claim(pool, item_id, user_id, kind.as_str(), expires_at, now).await?;

    match claimed {
        Some(reservation) => {
            // Bookkeeping only: the reservation row is the source of truth,
            // so losing this write to a race is harmless.
            ItemRepo::mark_reserved(pool, item_id, reservation.expires_at).await?;
            tracing::debug!(
                item_id,
                user_id,
                kind = kind.as_str(),
                expires_at = %reservation.expires_at,
                "Reservation claimed"
            );
            Ok(ReserveResult::Reserved(reservation))
        }
        None => {
            // Lost the race, or the item is terminal or missing.
            match ItemRepo::find_by_id(pool, item_id).await? {
                Some(_) => Ok(ReserveResult::Unavailable),
                None => Ok(ReserveResult::NotFound),
            }
        }
    }
}

/// Release a reservation iff `user_id` owns it.
///
/// Releasing a hold you don't own (or that already expired away) is a
/// benign no-op returning `false` -- callers release defensively on
/// cleanup and must not be penalized for racing the sweep.
pub async fn release(pool: &PgPool, item_id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
    let released = ReservationRepo::release(pool, item_id, user_id).await?;
    if released {
        ItemRepo::clear_reserved_status(pool, item_id).await?;
        tracing::debug!(item_id, user_id, "Reservation released");
    }
    Ok(released)
}

/// A read-only availability view for one item.
#[derive(Debug)]
pub struct AvailabilityView {
    pub state: EffectiveState,
    pub reserved_until: Option<Timestamp>,
    pub reserved_by_current_user: Option<bool>,
}

/// Derive the effective availability of an item at the current time.
///
/// Never mutates anything; safe at arbitrary read concurrency. Returns
/// `None` for an unknown item.
pub async fn availability(
    pool: &PgPool,
    item_id: DbId,
    current_user: Option<DbId>,
) -> Result<Option<AvailabilityView>, sqlx::Error> {
    let Some(item) = ItemRepo::find_by_id(pool, item_id).await? else {
        return Ok(None);
    };
    let reservation = ReservationRepo::find_by_item(pool, item_id).await?;

    let item_snapshot = ItemSnapshot {
        status: item.status,
        reserved_until: item.reserved_until,
    };
    let res_snapshot = reservation.as_ref().map(|r| ReservationSnapshot {
        user_id: r.user_id,
        expires_at: r.expires_at,
    });

    let state = availability::effective_state(&item_snapshot, res_snapshot.as_ref(), Utc::now());

    let (reserved_until, reserved_by_current_user) = match &state {
        EffectiveState::Held { user_id, until } => (
            Some(*until),
            current_user.map(|current| current == *user_id),
        ),
        _ => (None, None),
    };

    Ok(Some(AvailabilityView {
        state,
        reserved_until,
        reserved_by_current_user,
    }))
}
