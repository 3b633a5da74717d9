//! Repository for the `items` table.
//!
//! Item status writes are denormalized bookkeeping: the availability
//! evaluator never trusts a stored `reserved` status without a live
//! reservation row, so every update here is conditional and safe to lose
//! a race against the sweep or another instance.

use sqlx::PgPool;
use trove_core::types::{DbId, Timestamp};

use crate::models::item::{CreateItem, Item};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, seller_id, title, status, reserved_until, created_at, updated_at";

/// Provides CRUD and conditional status updates for items.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new active listing, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (seller_id, title)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(input.seller_id)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find an item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Record that the item is reserved until `until`.
    ///
    /// Skips terminal items; losing this write is harmless because the
    /// reservation row is the source of truth.
    pub async fn mark_reserved(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET status = 'reserved', reserved_until = $2, updated_at = NOW()
             WHERE id = $1 AND status NOT IN ('sold', 'inactive')",
        )
        .bind(id)
        .bind(until)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear the `reserved` bookkeeping after an owner releases their hold.
    ///
    /// Narrower than [`ItemRepo::release_to_active`]: an item already in
    /// `pending_payment` (a committed order exists) keeps that status.
    pub async fn clear_reserved_status(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET status = 'active', reserved_until = NULL, updated_at = NOW()
             WHERE id = $1 AND status = 'reserved'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Put an item back on the market, clearing any reserved bookkeeping.
    ///
    /// Terminal items are left untouched, and so is an item someone else
    /// holds a live reservation on. Returns `true` if a row changed.
    pub async fn release_to_active(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET status = 'active', reserved_until = NULL, updated_at = NOW()
             WHERE id = $1 AND status NOT IN ('sold', 'inactive')
               AND NOT EXISTS (
                   SELECT 1 FROM reservations r
                    WHERE r.item_id = items.id AND r.expires_at > $2
               )",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reset items whose stored `reserved` status outlived its hold.
    ///
    /// Only touches items with no live reservation row, so a freshly
    /// re-claimed item is never flipped back. Returns the number of rows
    /// compacted.
    pub async fn clear_stale_reservations(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE items SET status = 'active', reserved_until = NULL, updated_at = NOW()
             WHERE status = 'reserved'
               AND reserved_until IS NOT NULL
               AND reserved_until <= $1
               AND NOT EXISTS (
                   SELECT 1 FROM reservations r
                    WHERE r.item_id = items.id AND r.expires_at > $1
               )",
        )
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
