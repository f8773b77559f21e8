//! Adherence tracker update policy.
//!
//! - no stored record: accept, create at version 1
//! - stored record, no client version: accept (last write wins), bump version
//! - client version older than stored: reject as stale, state untouched
//! - otherwise: accept, bump version
//!
//! Stores call `apply_update` while holding their per-dose serialization
//! and persist the returned record when one is produced.

use crate::models::{SetStatusOutcome, StatusRecord};

/// Decision for one status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateDecision {
    pub outcome: SetStatusOutcome,
    /// Record to persist; `None` for a rejected write.
    pub write: Option<StatusRecord>,
}

pub fn apply_update(
    current: Option<StatusRecord>,
    desired_taken: bool,
    client_version: Option<i64>,
) -> UpdateDecision {
    let next_version = match (current, client_version) {
        (None, _) => 1,
        (Some(stored), Some(client)) if client < stored.version => {
            return UpdateDecision {
                outcome: SetStatusOutcome {
                    accepted: false,
                    stale: true,
                    current_taken: stored.is_taken,
                    current_version: stored.version,
                },
                write: None,
            };
        }
        (Some(stored), _) => stored.version.saturating_add(1),
    };

    let record = StatusRecord {
        is_taken: desired_taken,
        version: next_version,
    };
    UpdateDecision {
        outcome: SetStatusOutcome {
            accepted: true,
            stale: false,
            current_taken: record.is_taken,
            current_version: record.version,
        },
        write: Some(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(is_taken: bool, version: i64) -> Option<StatusRecord> {
        Some(StatusRecord { is_taken, version })
    }

    #[test]
    fn first_write_creates_version_one() {
        let decision = apply_update(None, true, None);
        assert!(decision.outcome.accepted);
        assert_eq!(decision.outcome.current_version, 1);
        assert_eq!(decision.write, stored(true, 1));
    }

    #[test]
    fn first_write_ignores_client_version() {
        let decision = apply_update(None, false, Some(42));
        assert!(decision.outcome.accepted);
        assert_eq!(decision.outcome.current_version, 1);
    }

    #[test]
    fn unconditioned_write_bumps_version() {
        let decision = apply_update(stored(true, 3), false, None);
        assert!(decision.outcome.accepted);
        assert!(!decision.outcome.current_taken);
        assert_eq!(decision.outcome.current_version, 4);
    }

    #[test]
    fn repeated_same_value_is_accepted() {
        let decision = apply_update(stored(true, 1), true, None);
        assert!(decision.outcome.accepted);
        assert!(decision.outcome.current_taken);
        assert_eq!(decision.outcome.current_version, 2);
    }

    #[test]
    fn stale_client_version_is_rejected() {
        let decision = apply_update(stored(true, 5), false, Some(4));
        assert!(!decision.outcome.accepted);
        assert!(decision.outcome.stale);
        assert!(decision.outcome.current_taken);
        assert_eq!(decision.outcome.current_version, 5);
        assert!(decision.write.is_none());
    }

    #[test]
    fn current_client_version_is_accepted() {
        let decision = apply_update(stored(false, 5), true, Some(5));
        assert!(decision.outcome.accepted);
        assert_eq!(decision.outcome.current_version, 6);
    }

    #[test]
    fn newer_client_version_is_accepted() {
        let decision = apply_update(stored(false, 2), true, Some(9));
        assert!(decision.outcome.accepted);
        assert_eq!(decision.outcome.current_version, 3);
    }
}
