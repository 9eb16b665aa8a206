//! Shared value types for the board audit domain.
//!
//! These are the records the [`crate::BoardService`] port hands back to the
//! pipeline, plus the derived [`StaleBoardReport`]. All of them are immutable
//! once fetched and live for the duration of one audit run.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::BoardId;

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// Layout of action timestamps as produced by the remote API, e.g.
/// `2024-03-01T17:45:12.345Z`. The fractional part is optional.
const API_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses a timestamp in the remote API's action date layout.
    ///
    /// Returns `None` when `value` does not match the layout exactly.
    pub fn parse_api(value: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(value, API_TIMESTAMP_FORMAT)
            .ok()
            .map(|dt| Self(dt.and_utc()))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

// ---------------------------------------------------------------------------

/// How long a board may go without substantive activity before it counts as
/// stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StalenessWindow {
    hours: u32,
}

impl StalenessWindow {
    /// Ninety days, expressed the way the audit has always measured it.
    pub const DEFAULT_HOURS: u32 = 2160;

    /// Creates a window of `hours`, returning `None` for a zero-length window.
    pub fn from_hours(hours: u32) -> Option<Self> {
        if hours == 0 {
            None
        } else {
            Some(Self { hours })
        }
    }

    /// Returns the window length in hours.
    pub fn hours(self) -> u32 {
        self.hours
    }

    /// Returns the cutoff instant: `now` minus this window.
    ///
    /// Saturates at the earliest representable instant.
    pub fn cutoff_from(self, now: Timestamp) -> Timestamp {
        let window = TimeDelta::hours(i64::from(self.hours));
        Timestamp(
            now.0
                .checked_sub_signed(window)
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }
}

impl Default for StalenessWindow {
    fn default() -> Self {
        Self {
            hours: Self::DEFAULT_HOURS,
        }
    }
}

// ---------------------------------------------------------------------------
// Boards
// ---------------------------------------------------------------------------

/// Who can see a board.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PermissionLevel {
    /// Only the board's members.
    Private,
    /// Every member of the owning organization.
    Org,
    /// Anyone with the link.
    Public,
    /// Any level this client does not know about (e.g. enterprise-wide).
    Other(String),
}

impl PermissionLevel {
    /// Returns the wire name of this level.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Private => "private",
            Self::Org => "org",
            Self::Public => "public",
            Self::Other(level) => level,
        }
    }
}

impl From<&str> for PermissionLevel {
    fn from(value: &str) -> Self {
        match value {
            "private" => Self::Private,
            "org" => Self::Org,
            "public" => Self::Public,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PermissionLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------

/// A board owned by the audited organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Remote identifier, used to address the board's sub-resources.
    pub id: BoardId,
    /// Display name.
    pub name: String,
    /// Canonical link to the board; this is what the report prints.
    pub url: String,
    /// `true` once the board has been archived.
    pub closed: bool,
    /// Visibility of the board.
    pub permission_level: PermissionLevel,
}

impl Board {
    /// Returns `true` if the board is in audit scope: still open and visible
    /// to the whole organization.
    pub fn is_auditable(&self) -> bool {
        !self.closed && self.permission_level == PermissionLevel::Org
    }
}

// ---------------------------------------------------------------------------

/// One event from a board's activity history.
///
/// The timestamp is kept exactly as received; it is parsed by the staleness
/// classifier so that a malformed value surfaces as an audit error naming the
/// board it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAction {
    /// Event type tag, e.g. `updateCard` or `addMemberToBoard`.
    pub action_type: String,
    /// Raw timestamp string.
    pub date: String,
}

/// A member of a board.
///
/// The username is kept exactly as reported, empty or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardMember {
    pub username: String,
    /// Full display name, when the service reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A board that failed the staleness test, together with the people who can
/// tidy it up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleBoardReport {
    pub board: Board,
    /// Members in the order the membership endpoint returned them.
    pub members: Vec<BoardMember>,
    /// Time of the most recent substantive action, `None` if there was none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<Timestamp>,
}

impl std::fmt::Display for StaleBoardReport {
    /// Renders the report line: `<url>  (<user>, <user>, ...)`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}  (", self.board.url)?;
        for (i, member) in self.members.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&member.username)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(closed: bool, level: &str) -> Board {
        Board {
            id: BoardId::new("b1").unwrap(),
            name: "Roadmap".to_owned(),
            url: "https://trello.com/b/b1/roadmap".to_owned(),
            closed,
            permission_level: PermissionLevel::from(level),
        }
    }

    fn member(username: &str, full_name: Option<&str>) -> BoardMember {
        BoardMember {
            username: username.to_owned(),
            full_name: full_name.map(str::to_owned),
        }
    }

    #[test]
    fn parses_api_timestamps_with_milliseconds() {
        let ts = Timestamp::parse_api("2024-03-01T17:45:12.345Z").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01T17:45:12.345+00:00");
    }

    #[test]
    fn rejects_malformed_timestamps() {
        assert!(Timestamp::parse_api("not-a-date").is_none());
        assert!(Timestamp::parse_api("2024-03-01 17:45:12").is_none());
        assert!(Timestamp::parse_api("").is_none());
    }

    #[test]
    fn default_window_is_ninety_days() {
        let now = Timestamp::parse_api("2024-06-30T00:00:00.000Z").unwrap();
        let cutoff = StalenessWindow::default().cutoff_from(now);
        assert_eq!(cutoff, Timestamp::parse_api("2024-04-01T00:00:00.000Z").unwrap());
    }

    #[test]
    fn zero_length_window_is_rejected() {
        assert!(StalenessWindow::from_hours(0).is_none());
        assert_eq!(StalenessWindow::from_hours(24).map(StalenessWindow::hours), Some(24));
    }

    #[test]
    fn only_open_org_boards_are_auditable() {
        assert!(board(false, "org").is_auditable());
        assert!(!board(true, "org").is_auditable());
        assert!(!board(false, "private").is_auditable());
        assert!(!board(false, "public").is_auditable());
        assert!(!board(false, "enterprise").is_auditable());
    }

    #[test]
    fn unknown_permission_levels_round_trip_their_name() {
        assert_eq!(
            PermissionLevel::from("enterprise"),
            PermissionLevel::Other("enterprise".to_owned())
        );
        assert_eq!(PermissionLevel::from("org").as_str(), "org");
    }

    #[test]
    fn report_line_joins_members_with_comma_space() {
        let report = StaleBoardReport {
            board: board(false, "org"),
            members: vec![member("alice", Some("Alice A")), member("bob", None)],
            last_activity: None,
        };
        assert_eq!(report.to_string(), "https://trello.com/b/b1/roadmap  (alice, bob)");
    }

    #[test]
    fn report_line_for_board_without_members() {
        let report = StaleBoardReport {
            board: board(false, "org"),
            members: Vec::new(),
            last_activity: None,
        };
        assert_eq!(report.to_string(), "https://trello.com/b/b1/roadmap  ()");
    }

    #[test]
    fn report_line_keeps_empty_usernames() {
        let report = StaleBoardReport {
            board: board(false, "org"),
            members: vec![member("", None), member("bob", None)],
            last_activity: None,
        };
        assert_eq!(report.to_string(), "https://trello.com/b/b1/roadmap  (, bob)");
    }
}
