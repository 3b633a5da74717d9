//! Repository for the `orders` table.

use sqlx::PgPool;
use trove_core::types::{DbId, Timestamp};

use crate::models::order::{CreateOrder, Order};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, item_id, buyer_id, seller_id, amount_cents, status, \
                       payment_deadline, marked_incomplete, incomplete_reason, \
                       created_at, updated_at";

/// Provides CRUD and the exactly-once incomplete-marking for orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order awaiting payment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (item_id, buyer_id, seller_id, amount_cents, payment_deadline)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(input.item_id)
            .bind(input.buyer_id)
            .bind(input.seller_id)
            .bind(input.amount_cents)
            .bind(input.payment_deadline)
            .fetch_one(pool)
            .await
    }

    /// Find an order by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List unpaid orders whose payment deadline has passed.
    pub async fn find_payment_overdue(
        pool: &PgPool,
        now: Timestamp,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders
             WHERE payment_deadline <= $1
               AND marked_incomplete = FALSE
               AND status IN ('awaiting_payment', 'payment_pending_seller_confirmation')
             ORDER BY payment_deadline ASC"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Claim an order for incomplete-marking: set `marked_incomplete`,
    /// flip the status to `expired`, and attach the reason.
    ///
    /// The `marked_incomplete = FALSE` predicate makes this exactly-once:
    /// a concurrent invocation gets `None` back and must skip the order.
    /// Orders already settled (completed, cancelled) are never claimed.
    pub async fn mark_incomplete(
        pool: &PgPool,
        id: DbId,
        reason: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET
                marked_incomplete = TRUE,
                status = 'expired',
                incomplete_reason = $2,
                updated_at = NOW()
             WHERE id = $1
               AND marked_incomplete = FALSE
               AND status IN ('awaiting_payment', 'payment_pending_seller_confirmation')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(reason)
            .fetch_optional(pool)
            .await
    }
}
