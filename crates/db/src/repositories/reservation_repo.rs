//! Repository for the `reservations` table.
//!
//! This table is owned exclusively by this repository: the claim, the
//! ownership-checked release, and the expiry compaction are the only
//! writers. The claim is one `INSERT ... ON CONFLICT ... DO UPDATE ...
//! WHERE` statement, so two requests racing for the same item serialize
//! at the row lock on `item_id` and exactly one of them wins.

use sqlx::PgPool;
use trove_core::types::{DbId, Timestamp};

use crate::models::reservation::Reservation;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "item_id, user_id, kind, expires_at, created_at";

/// Provides the check-and-set operations on reservation rows.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Atomically claim `item_id` for `user_id` until `expires_at`.
    ///
    /// Succeeds when no reservation row exists, when the existing row
    /// already belongs to `user_id` (renewal), or when the existing row
    /// has itself expired (takeover). The item must not be in a terminal
    /// status. Returns `None` when the claim lost the race -- in that
    /// case nothing was written.
    pub async fn claim(
        pool: &PgPool,
        item_id: DbId,
        user_id: DbId,
        kind: &str,
        expires_at: Timestamp,
        now: Timestamp,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!(
            "INSERT INTO reservations (item_id, user_id, kind, expires_at)
             SELECT i.id, $2, $3, $4
               FROM items i
              WHERE i.id = $1
                AND i.status NOT IN ('sold', 'inactive')
             ON CONFLICT (item_id) DO UPDATE
                SET user_id = EXCLUDED.user_id,
                    kind = EXCLUDED.kind,
                    expires_at = EXCLUDED.expires_at,
                    created_at = NOW()
              WHERE reservations.user_id = EXCLUDED.user_id
                 OR reservations.expires_at <= $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Reservation>(&query)
            .bind(item_id)
            .bind(user_id)
            .bind(kind)
            .bind(expires_at)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the reservation row for an item, expired or not.
    ///
    /// Callers derive liveness through the availability evaluator; this
    /// method never filters on `expires_at`.
    pub async fn find_by_item(
        pool: &PgPool,
        item_id: DbId,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reservations WHERE item_id = $1");
        sqlx::query_as::<_, Reservation>(&query)
            .bind(item_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the reservation iff it is owned by `user_id`.
    ///
    /// Returns `false` when no row was removed (no reservation, or held
    /// by someone else). Callers treat that as a benign no-op.
    pub async fn release(
        pool: &PgPool,
        item_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM reservations WHERE item_id = $1 AND user_id = $2")
                .bind(item_id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an item's reservation unless another user holds a live one.
    ///
    /// Used by the order-expiry coordinator: the defaulting buyer's hold
    /// is removed whether or not it lapsed, but a live hold someone else
    /// acquired after the buyer's expired must survive.
    pub async fn delete_stale_or_owned(
        pool: &PgPool,
        item_id: DbId,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM reservations
             WHERE item_id = $1 AND (user_id = $2 OR expires_at <= $3)",
        )
        .bind(item_id)
        .bind(user_id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Compact reservation rows whose `expires_at` has passed.
    ///
    /// Correctness never depends on this running: the evaluator treats
    /// those rows as gone already. Returns the number of rows removed.
    pub async fn delete_expired(pool: &PgPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE expires_at <= $1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
