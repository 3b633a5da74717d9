//! Incomplete-transaction penalty ladder.
//!
//! Pure decision functions for the per-user penalty state machine. The
//! database writes happen in the API layer's penalty engine; this module
//! only answers "what does the new count imply" and "what does a stored
//! penalty state look like at read time".
//!
//! The ladder is fixed: the first incomplete transaction suspends the
//! buyer for 24 hours, the second (and any later one) bans them. Staff
//! roles are exempt from every effect, and a ban cannot be escalated
//! further. The count itself is monotonic and never reset.

use serde::{Deserialize, Serialize};

use crate::roles::is_staff;
use crate::types::Timestamp;

/// How long the first-offence suspension lasts.
pub const SUSPENSION_HOURS: i64 = 24;

/// Ban reason attached when the ladder escalates to a ban.
pub const BAN_REASON_REPEAT_INCOMPLETE: &str = "multiple incomplete transactions";

/// Effect the penalty engine must apply after incrementing the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    /// No effect (count stayed at zero; defensive, the engine always
    /// increments by one so this only covers bad stored data).
    None,
    /// First offence: suspend until the given time.
    Suspend { until: Timestamp },
    /// Second or later offence: ban, clearing any suspension.
    Ban { reason: &'static str },
}

/// Decide the ladder effect for the *new* (post-increment) count.
pub fn escalation_for(new_count: i32, now: Timestamp) -> Escalation {
    match new_count {
        i32::MIN..=0 => Escalation::None,
        1 => Escalation::Suspend {
            until: now + chrono::Duration::hours(SUSPENSION_HOURS),
        },
        _ => Escalation::Ban {
            reason: BAN_REASON_REPEAT_INCOMPLETE,
        },
    }
}

/// Outcome vocabulary for marking an order incomplete.
///
/// Benign races (already marked, already banned) are part of this
/// vocabulary rather than errors: callers must not treat them as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyOutcome {
    /// Count incremented, no effect applied (staff exemption).
    None,
    /// The user was suspended.
    Suspension,
    /// The user was banned.
    Ban,
    /// The order had already been marked incomplete; nothing changed.
    AlreadyMarked,
    /// The user was already banned; only the count moved.
    AlreadyBanned,
}

/// Stored penalty fields of a user row, as read from the database.
#[derive(Debug, Clone)]
pub struct PenaltySnapshot {
    pub role: String,
    pub incomplete_transaction_count: i32,
    pub is_suspended: bool,
    pub suspension_end_date: Option<Timestamp>,
    pub is_banned: bool,
    pub ban_reason: Option<String>,
}

/// Read-time view of a user's penalty status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PenaltyView {
    pub is_suspended: bool,
    pub is_banned: bool,
    pub suspension_end_date: Option<Timestamp>,
    pub ban_reason: Option<String>,
    pub incomplete_transaction_count: i32,
}

/// Compute the effective penalty status at `now`.
///
/// A suspension whose `suspension_end_date` has passed is reported as
/// lifted regardless of the stored flag (the engine may persist the lift
/// separately, but the view never depends on that write). Staff roles
/// always report unrestricted; their count stays visible for audit.
pub fn effective_status(snapshot: &PenaltySnapshot, now: Timestamp) -> PenaltyView {
    if is_staff(&snapshot.role) {
        return PenaltyView {
            is_suspended: false,
            is_banned: false,
            suspension_end_date: None,
            ban_reason: None,
            incomplete_transaction_count: snapshot.incomplete_transaction_count,
        };
    }

    let suspension_live = snapshot.is_suspended
        && snapshot
            .suspension_end_date
            .is_some_and(|end| end > now);

    PenaltyView {
        is_suspended: suspension_live,
        is_banned: snapshot.is_banned,
        suspension_end_date: if suspension_live {
            snapshot.suspension_end_date
        } else {
            None
        },
        ban_reason: if snapshot.is_banned {
            snapshot.ban_reason.clone()
        } else {
            None
        },
        incomplete_transaction_count: snapshot.incomplete_transaction_count,
    }
}

/// Whether the stored suspension flag is stale and worth persisting a lift
/// for (used by the engine as an optional eager cleanup).
pub fn suspension_lift_due(snapshot: &PenaltySnapshot, now: Timestamp) -> bool {
    snapshot.is_suspended
        && snapshot
            .suspension_end_date
            .is_none_or(|end| end <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_USER};
    use chrono::{Duration, Utc};

    fn snapshot(role: &str, count: i32) -> PenaltySnapshot {
        PenaltySnapshot {
            role: role.to_string(),
            incomplete_transaction_count: count,
            is_suspended: false,
            suspension_end_date: None,
            is_banned: false,
            ban_reason: None,
        }
    }

    #[test]
    fn first_offence_suspends_for_24_hours() {
        let now = Utc::now();
        match escalation_for(1, now) {
            Escalation::Suspend { until } => {
                assert_eq!(until, now + Duration::hours(24));
            }
            other => panic!("expected suspension, got {other:?}"),
        }
    }

    #[test]
    fn second_and_later_offences_ban() {
        let now = Utc::now();
        for count in [2, 3, 10] {
            assert_eq!(
                escalation_for(count, now),
                Escalation::Ban {
                    reason: BAN_REASON_REPEAT_INCOMPLETE
                }
            );
        }
    }

    #[test]
    fn zero_count_has_no_effect() {
        assert_eq!(escalation_for(0, Utc::now()), Escalation::None);
    }

    #[test]
    fn live_suspension_is_reported() {
        let now = Utc::now();
        let mut snap = snapshot(ROLE_USER, 1);
        snap.is_suspended = true;
        snap.suspension_end_date = Some(now + Duration::hours(3));

        let view = effective_status(&snap, now);
        assert!(view.is_suspended);
        assert_eq!(view.suspension_end_date, snap.suspension_end_date);
        assert!(!view.is_banned);
    }

    #[test]
    fn expired_suspension_lifts_lazily() {
        let now = Utc::now();
        let mut snap = snapshot(ROLE_USER, 1);
        snap.is_suspended = true;
        snap.suspension_end_date = Some(now - Duration::minutes(1));

        let view = effective_status(&snap, now);
        assert!(!view.is_suspended);
        assert_eq!(view.suspension_end_date, None);
        // The count is untouched by the lift.
        assert_eq!(view.incomplete_transaction_count, 1);
        assert!(suspension_lift_due(&snap, now));
    }

    #[test]
    fn ban_is_reported_with_reason() {
        let now = Utc::now();
        let mut snap = snapshot(ROLE_USER, 2);
        snap.is_banned = true;
        snap.ban_reason = Some(BAN_REASON_REPEAT_INCOMPLETE.to_string());

        let view = effective_status(&snap, now);
        assert!(view.is_banned);
        assert!(!view.is_suspended);
        assert_eq!(
            view.ban_reason.as_deref(),
            Some(BAN_REASON_REPEAT_INCOMPLETE)
        );
    }

    #[test]
    fn stale_ban_reason_is_hidden_while_unbanned() {
        let now = Utc::now();
        let mut snap = snapshot(ROLE_USER, 1);
        snap.ban_reason = Some("leftover".to_string());

        let view = effective_status(&snap, now);
        assert!(!view.is_banned);
        assert_eq!(view.ban_reason, None);
    }

    #[test]
    fn staff_report_unrestricted_regardless_of_stored_flags() {
        let now = Utc::now();
        let mut snap = snapshot(ROLE_ADMIN, 2);
        snap.is_suspended = true;
        snap.suspension_end_date = Some(now + Duration::hours(5));
        snap.is_banned = true;
        snap.ban_reason = Some("stale".to_string());

        let view = effective_status(&snap, now);
        assert!(!view.is_suspended);
        assert!(!view.is_banned);
        assert_eq!(view.incomplete_transaction_count, 2);
    }

    #[test]
    fn outcome_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PenaltyOutcome::AlreadyMarked).unwrap(),
            "\"already_marked\""
        );
    }
}
