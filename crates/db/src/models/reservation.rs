//! Model for the `reservations` table.

use serde::Serialize;
use sqlx::FromRow;
use trove_core::types::{DbId, Timestamp};

/// A row from the `reservations` table: one user's time-boxed exclusive
/// hold on one item. The primary key on `item_id` guarantees at most one
/// row per item; these rows are created and mutated only by
/// `ReservationRepo`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub item_id: DbId,
    pub user_id: DbId,
    pub kind: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
