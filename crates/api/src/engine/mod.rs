//! The reservation and penalty engine.
//!
//! Composes the pure decision logic in `trove_core` with the atomic
//! repository operations in `trove_db`. Invoked both from request
//! handlers (availability, reserve, release, mark-incomplete) and from
//! the background sweep task; no in-process locking anywhere, since
//! multiple server instances may run against the same database.

pub mod order_expiry;
pub mod penalty;
pub mod reservations;
pub mod sweeper;
