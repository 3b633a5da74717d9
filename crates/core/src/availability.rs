//! Effective item availability.
//!
//! Derives an item's availability from its stored status plus the live
//! reservation row, comparing `expires_at` against the caller's clock.
//! Expiry is logical: a hold whose `expires_at` has passed counts as gone
//! even if no sweep has deleted the row yet, and a stale stored status of
//! `reserved` never makes an item unavailable on its own. This is pure
//! logic with no database dependencies, safe at arbitrary read concurrency.

use crate::types::{DbId, Timestamp};

/// Stored item statuses (`items.status`).
pub mod item_status {
    pub const ACTIVE: &str = "active";
    pub const RESERVED: &str = "reserved";
    pub const PENDING_PAYMENT: &str = "pending_payment";
    pub const SOLD: &str = "sold";
    pub const INACTIVE: &str = "inactive";
}

/// The fields of an item that availability depends on.
#[derive(Debug, Clone)]
pub struct ItemSnapshot {
    pub status: String,
    pub reserved_until: Option<Timestamp>,
}

/// The fields of a reservation row that availability depends on.
#[derive(Debug, Clone)]
pub struct ReservationSnapshot {
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

/// What a buyer can actually do with an item right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveState {
    /// Free to claim.
    Available,
    /// Someone holds a live reservation.
    Held { user_id: DbId, until: Timestamp },
    /// Terminal: the item was sold.
    Sold,
    /// Terminal: the seller deactivated the listing.
    Inactive,
}

/// Derive the effective state of an item at `now`.
///
/// Terminal stored statuses are returned verbatim. Otherwise a reservation
/// with `expires_at > now` wins, and anything else is `Available` --
/// including an item whose stored status still says `reserved` after its
/// hold lapsed.
pub fn effective_state(
    item: &ItemSnapshot,
    reservation: Option<&ReservationSnapshot>,
    now: Timestamp,
) -> EffectiveState {
    match item.status.as_str() {
        item_status::SOLD => return EffectiveState::Sold,
        item_status::INACTIVE => return EffectiveState::Inactive,
        _ => {}
    }

    if let Some(res) = reservation {
        if res.expires_at > now {
            return EffectiveState::Held {
                user_id: res.user_id,
                until: res.expires_at,
            };
        }
    }

    EffectiveState::Available
}
