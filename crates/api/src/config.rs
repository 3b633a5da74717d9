use trove_core::holds::{HoldKind, DEFAULT_BUY_NOW_HOLD_MINUTES, DEFAULT_CART_HOLD_MINUTES};

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Background sweep interval in seconds (default: `60`).
    pub sweep_interval_secs: u64,
    /// Hold length for `cart` reservations, in minutes (default: `5`).
    pub cart_hold_minutes: i64,
    /// Hold length for `buy_now` reservations, in minutes (default: `10`).
    pub buy_now_hold_minutes: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SWEEP_INTERVAL_SECS`   | `60`                    |
    /// | `CART_HOLD_MINUTES`     | `5`                     |
    /// | `BUY_NOW_HOLD_MINUTES`  | `10`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        let cart_hold_minutes: i64 = std::env::var("CART_HOLD_MINUTES")
            .unwrap_or_else(|_| DEFAULT_CART_HOLD_MINUTES.to_string())
            .parse()
            .expect("CART_HOLD_MINUTES must be a valid i64");

        let buy_now_hold_minutes: i64 = std::env::var("BUY_NOW_HOLD_MINUTES")
            .unwrap_or_else(|_| DEFAULT_BUY_NOW_HOLD_MINUTES.to_string())
            .parse()
            .expect("BUY_NOW_HOLD_MINUTES must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            sweep_interval_secs,
            cart_hold_minutes,
            buy_now_hold_minutes,
        }
    }

    /// Configured hold duration for a reservation kind.
    pub fn hold_minutes_for(&self, kind: HoldKind) -> i64 {
        match kind {
            HoldKind::Cart => self.cart_hold_minutes,
            HoldKind::BuyNow => self.buy_now_hold_minutes,
        }
    }
}
