//! Models for the `orders` table.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use trove_core::types::{DbId, Timestamp};

/// Order statuses (`orders.status`).
pub mod order_status {
    pub const AWAITING_PAYMENT: &str = "awaiting_payment";
    pub const PAYMENT_PENDING_SELLER_CONFIRMATION: &str = "payment_pending_seller_confirmation";
    pub const COMPLETED: &str = "completed";
    pub const EXPIRED: &str = "expired";
    pub const CANCELLED: &str = "cancelled";
}

/// A row from the `orders` table: a buyer's committed-to-pay intent
/// against an item.
///
/// `marked_incomplete` is set at most once, by a conditional update; once
/// true, no further penalty can be applied for this order.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub item_id: DbId,
    pub buyer_id: DbId,
    pub seller_id: DbId,
    pub amount_cents: i64,
    pub status: String,
    pub payment_deadline: Timestamp,
    pub marked_incomplete: bool,
    pub incomplete_reason: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an order. Orders start `awaiting_payment`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrder {
    pub item_id: DbId,
    pub buyer_id: DbId,
    pub seller_id: DbId,
    pub amount_cents: i64,
    pub payment_deadline: Timestamp,
}
