//! Trove domain logic.
//!
//! Pure types and decision functions for item availability and the
//! incomplete-transaction penalty ladder. This crate has zero internal
//! dependencies so it can be used by the API/repository layer and any
//! future worker or CLI tooling.

pub mod availability;
pub mod error;
pub mod holds;
pub mod penalty;
pub mod roles;
pub mod types;
