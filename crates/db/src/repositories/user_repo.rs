//! Repository for the `users` table.
//!
//! The penalty-state columns are mutated only through the conditional
//! updates here, driven by the API layer's penalty engine.

use sqlx::PgPool;
use trove_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, PenaltyCounters, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, display_name, role, incomplete_transaction_count, \
                       is_suspended, suspension_end_date, is_banned, ban_reason, \
                       created_at, updated_at";

/// Provides CRUD and penalty-state updates for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (display_name, role)
             VALUES ($1, COALESCE($2, 'user'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.display_name)
            .bind(&input.role)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically increment the incomplete-transaction count by one.
    ///
    /// Returns the new count together with the role and ban flag the
    /// penalty engine needs to decide what effect to apply. `None` means
    /// no such user.
    pub async fn increment_incomplete_count(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PenaltyCounters>, sqlx::Error> {
        sqlx::query_as::<_, PenaltyCounters>(
            "UPDATE users SET
                incomplete_transaction_count = incomplete_transaction_count + 1,
                updated_at = NOW()
             WHERE id = $1
             RETURNING incomplete_transaction_count, role, is_banned",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Suspend a user until the given time.
    pub async fn apply_suspension(
        pool: &PgPool,
        id: DbId,
        until: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                is_suspended = TRUE,
                suspension_end_date = $2,
                updated_at = NOW()
             WHERE id = $1 AND is_banned = FALSE",
        )
        .bind(id)
        .bind(until)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ban a user. The ban supersedes any suspension, so the suspension
    /// fields are cleared in the same statement.
    pub async fn apply_ban(pool: &PgPool, id: DbId, reason: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                is_banned = TRUE,
                ban_reason = $2,
                is_suspended = FALSE,
                suspension_end_date = NULL,
                updated_at = NOW()
             WHERE id = $1 AND is_banned = FALSE",
        )
        .bind(id)
        .bind(reason)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear a suspension whose end date has passed.
    ///
    /// The count is untouched. Idempotent: concurrent callers race
    /// harmlessly on the same predicate. Returns `true` if a row changed.
    pub async fn lift_expired_suspension(
        pool: &PgPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                is_suspended = FALSE,
                suspension_end_date = NULL,
                updated_at = NOW()
             WHERE id = $1
               AND is_suspended = TRUE
               AND (suspension_end_date IS NULL OR suspension_end_date <= $2)",
        )
        .bind(id)
        .bind(now)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
