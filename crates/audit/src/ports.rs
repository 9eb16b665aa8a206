//! Port traits implemented by infrastructure crates.
//!
//! The audit pipeline only ever talks to the outside world through these
//! traits. The `trello` crate supplies the HTTP implementation of
//! [`BoardService`]; the CLI supplies the [`ProgressObserver`].

use async_trait::async_trait;

use crate::{Board, BoardAction, BoardId, BoardMember, BoardServiceError, OrganizationId};

/// Read-only access to the collaboration service's board data.
///
/// Each method performs exactly one remote request. Implementations must not
/// paginate, batch, or retry; any failure is returned to the caller, which
/// aborts the run.
#[async_trait]
pub trait BoardService: Send + Sync {
    /// Lists every board owned by `organization`, in the order the service
    /// returns them.
    async fn list_boards(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<Board>, BoardServiceError>;

    /// Lists the activity history of `board`.
    ///
    /// No ordering is assumed by callers.
    async fn list_actions(&self, board: &BoardId) -> Result<Vec<BoardAction>, BoardServiceError>;

    /// Lists the current members of `board`, in the order the service
    /// returns them.
    async fn list_members(&self, board: &BoardId) -> Result<Vec<BoardMember>, BoardServiceError>;
}

// ---------------------------------------------------------------------------

/// Receives a notification immediately before every remote call.
///
/// Used by the CLI to print one progress marker per request.
pub trait ProgressObserver: Send + Sync {
    /// Called once per remote request, before it is sent.
    fn request_started(&self);
}

/// A [`ProgressObserver`] that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn request_started(&self) {}
}
