//! Hold kinds and default durations.
//!
//! Durations are configuration, not invariants: the API layer reads the
//! effective values from `ServerConfig`, falling back to these defaults.

use serde::{Deserialize, Serialize};

/// Default hold length for a passive "in cart" reservation.
pub const DEFAULT_CART_HOLD_MINUTES: i64 = 5;

/// Default hold length once a buyer enters active checkout.
pub const DEFAULT_BUY_NOW_HOLD_MINUTES: i64 = 10;

/// Why a buyer is holding an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldKind {
    /// Passive interest: the item sits in the buyer's cart.
    Cart,
    /// Active checkout: the buyer committed to buy and is paying.
    BuyNow,
}

impl HoldKind {
    /// Database representation (`reservations.kind`).
    pub fn as_str(self) -> &'static str {
        match self {
            HoldKind::Cart => "cart",
            HoldKind::BuyNow => "buy_now",
        }
    }

    /// Default hold duration in minutes for this kind.
    pub fn default_minutes(self) -> i64 {
        match self {
            HoldKind::Cart => DEFAULT_CART_HOLD_MINUTES,
            HoldKind::BuyNow => DEFAULT_BUY_NOW_HOLD_MINUTES,
        }
    }
}
