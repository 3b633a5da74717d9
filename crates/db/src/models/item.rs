//! Models for the `items` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trove_core::types::{DbId, Timestamp};

/// A row from the `items` table.
///
/// `status` holds one of the constants in
/// `trove_core::availability::item_status`. A stored `reserved` status may
/// be stale: availability is always derived through the evaluator, which
/// compares the live reservation row's `expires_at` against the clock.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub seller_id: DbId,
    pub title: String,
    pub status: String,
    pub reserved_until: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an item. Listings start `active`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub seller_id: DbId,
    pub title: String,
}
