//! JSON shapes returned by the Trello REST API.
//!
//! Only the fields the audit reads are declared; everything else in the
//! payload is ignored. Each wire record converts into its domain counterpart;
//! only a board without an id is rejected, since its sub-resources could not
//! be addressed. Missing `closed` / `prefs` decode as open with an empty
//! permission level, which the visibility filter then drops.

use audit::{Board, BoardAction, BoardId, BoardMember, PermissionLevel};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BoardPrefsRecord {
    #[serde(rename = "permissionLevel", default)]
    pub permission_level: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoardRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub prefs: BoardPrefsRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionRecord {
    #[serde(rename = "type")]
    pub action_type: String,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberRecord {
    pub username: String,
    #[serde(rename = "fullName", default)]
    pub full_name: Option<String>,
}

impl TryFrom<BoardRecord> for Board {
    type Error = String;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let id = BoardId::new(record.id).ok_or("board with an empty id")?;
        Ok(Board {
            id,
            name: record.name,
            url: record.url,
            closed: record.closed,
            permission_level: PermissionLevel::from(record.prefs.permission_level.as_str()),
        })
    }
}

impl From<ActionRecord> for BoardAction {
    fn from(record: ActionRecord) -> Self {
        BoardAction {
            action_type: record.action_type,
            date: record.date,
        }
    }
}

impl From<MemberRecord> for BoardMember {
    fn from(record: MemberRecord) -> Self {
        BoardMember {
            username: record.username,
            full_name: record.full_name.filter(|name| !name.is_empty()),
        }
    }
}
