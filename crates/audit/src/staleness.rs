//! The staleness rule.
//!
//! A board is stale when its most recent *substantive* action is strictly older
//! than the cutoff, or when it has no substantive action at all. Membership
//! bookkeeping (granting admin rights, adding a member) does not count as use
//! of the board and is skipped.
//!
//! The rule does not trust the order in which the service returns the
//! history: every timestamp is parsed and the newest substantive one wins.

use crate::{AuditError, BoardAction, BoardId, Timestamp};

/// Action type recorded when a member is made a board admin.
pub const GRANT_ADMIN_ACTION: &str = "makeAdminOfBoard";

/// Action type recorded when a member is added to a board.
pub const ADD_MEMBER_ACTION: &str = "addMemberToBoard";

/// Returns `true` for action types that only reflect membership changes.
pub fn is_membership_bookkeeping(action_type: &str) -> bool {
    action_type == GRANT_ADMIN_ACTION || action_type == ADD_MEMBER_ACTION
}

/// Outcome of classifying one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// The board should be reported.
    Stale {
        /// Newest substantive action, or `None` when there was none.
        last_activity: Option<Timestamp>,
    },
    /// The board has seen substantive activity since the cutoff.
    Active {
        /// Newest substantive action.
        last_activity: Timestamp,
    },
}

impl Staleness {
    /// Returns `true` for [`Staleness::Stale`].
    pub fn is_stale(self) -> bool {
        matches!(self, Self::Stale { .. })
    }
}

/// Finds the timestamp of the newest action that is not membership
/// bookkeeping.
///
/// Every action's timestamp is parsed, bookkeeping included, so a malformed
/// history is always reported rather than silently skipped.
pub fn last_substantive_activity(
    board: &BoardId,
    actions: &[BoardAction],
) -> Result<Option<Timestamp>, AuditError> {
    let mut dated = Vec::with_capacity(actions.len());
    for action in actions {
        let at = Timestamp::parse_api(&action.date).ok_or_else(|| AuditError::InvalidTimestamp {
            board: board.clone(),
            value: action.date.clone(),
        })?;
        dated.push((at, action));
    }

    // Newest first; stable so equal timestamps keep the service's order.
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    Ok(dated
        .into_iter()
        .find(|(_, action)| !is_membership_bookkeeping(&action.action_type))
        .map(|(at, _)| at))
}

/// Classifies a board's history against `cutoff`.
pub fn classify(
    board: &BoardId,
    actions: &[BoardAction],
    cutoff: Timestamp,
) -> Result<Staleness, AuditError> {
    Ok(match last_substantive_activity(board, actions)? {
        None => Staleness::Stale {
            last_activity: None,
        },
        Some(at) if at < cutoff => Staleness::Stale {
            last_activity: Some(at),
        },
        Some(at) => Staleness::Active { last_activity: at },
    })
}
