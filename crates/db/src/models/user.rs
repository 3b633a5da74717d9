//! Models for the `users` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trove_core::types::{DbId, Timestamp};

/// A row from the `users` table, including the penalty-state fields
/// mutated only by the penalty engine.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub display_name: String,
    pub role: String,
    pub incomplete_transaction_count: i32,
    pub is_suspended: bool,
    pub suspension_end_date: Option<Timestamp>,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// The penalty-relevant fields as a core snapshot.
    pub fn penalty_snapshot(&self) -> trove_core::penalty::PenaltySnapshot {
        trove_core::penalty::PenaltySnapshot {
            role: self.role.clone(),
            incomplete_transaction_count: self.incomplete_transaction_count,
            is_suspended: self.is_suspended,
            suspension_end_date: self.suspension_end_date,
            is_banned: self.is_banned,
            ban_reason: self.ban_reason.clone(),
        }
    }
}

/// DTO for creating a user. Role defaults to `user`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub display_name: String,
    pub role: Option<String>,
}

/// Result of the atomic count increment: the fields the penalty engine
/// needs to decide what effect to apply.
#[derive(Debug, Clone, FromRow)]
pub struct PenaltyCounters {
    pub incomplete_transaction_count: i32,
    pub role: String,
    pub is_banned: bool,
}
