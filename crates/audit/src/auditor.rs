//! The three-stage audit pipeline.
//!
//! 1. **List** the organization's boards and keep only open, org-visible ones.
//! 2. **Classify** each kept board by fetching its history.
//! 3. **Enrich** each stale board with its members.
//!
//! Stages run strictly in sequence and every remote call is awaited before the
//! next one is issued. The first error aborts the run; no partial report is
//! returned.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::staleness::{self, Staleness};
use crate::{
    AuditError, Board, BoardService, OrganizationId, ProgressObserver, StaleBoardReport, Timestamp,
};

/// A board that failed the staleness test but has not been enriched yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleBoard {
    pub board: Board,
    pub last_activity: Option<Timestamp>,
}

/// Drives one audit run against a [`BoardService`].
pub struct Auditor {
    service: Arc<dyn BoardService>,
    progress: Arc<dyn ProgressObserver>,
    cutoff: Timestamp,
}

impl Auditor {
    /// Creates an auditor that treats activity older than `cutoff` as stale.
    ///
    /// The cutoff is fixed for the whole run.
    pub fn new(
        service: Arc<dyn BoardService>,
        progress: Arc<dyn ProgressObserver>,
        cutoff: Timestamp,
    ) -> Self {
        Self {
            service,
            progress,
            cutoff,
        }
    }

    /// Returns the cutoff this auditor classifies against.
    pub fn cutoff(&self) -> Timestamp {
        self.cutoff
    }

    /// Runs all three stages and returns one report per stale board, in the
    /// order the boards were listed.
    #[instrument(skip_all, fields(%organization, cutoff = %self.cutoff))]
    pub async fn run(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<StaleBoardReport>, AuditError> {
        let boards = self.list_auditable_boards(organization).await?;
        let stale = self.find_stale_boards(boards).await?;
        let reports = self.collect_members(stale).await?;
        info!(stale_boards = reports.len(), "Audit complete");
        Ok(reports)
    }

    /// Stage 1: lists the organization's boards and drops closed or
    /// non-org-visible ones.
    pub async fn list_auditable_boards(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<Board>, AuditError> {
        self.progress.request_started();
        let boards = self.service.list_boards(organization).await?;
        let total = boards.len();

        let auditable: Vec<Board> = boards
            .into_iter()
            .filter(|board| {
                let keep = board.is_auditable();
                if !keep {
                    debug!(
                        board_id = %board.id,
                        board_name = %board.name,
                        closed = board.closed,
                        permission_level = %board.permission_level,
                        "Skipping board outside audit scope"
                    );
                }
                keep
            })
            .collect();

        info!(total, auditable = auditable.len(), "Listed boards");
        Ok(auditable)
    }

    /// Stage 2: keeps the boards whose history shows no substantive activity
    /// since the cutoff.
    pub async fn find_stale_boards(&self, boards: Vec<Board>) -> Result<Vec<StaleBoard>, AuditError> {
        let mut stale = Vec::new();
        for board in boards {
            self.progress.request_started();
            let actions = self.service.list_actions(&board.id).await?;

            match staleness::classify(&board.id, &actions, self.cutoff)? {
                Staleness::Stale { last_activity } => {
                    debug!(
                        board_id = %board.id,
                        board_name = %board.name,
                        actions = actions.len(),
                        ?last_activity,
                        "Board is stale"
                    );
                    stale.push(StaleBoard {
                        board,
                        last_activity,
                    });
                }
                Staleness::Active { last_activity } => {
                    debug!(board_id = %board.id, board_name = %board.name, %last_activity, "Board is active");
                }
            }
        }
        Ok(stale)
    }

    /// Stage 3: attaches the member list to each stale board, exactly as the
    /// service returned it.
    pub async fn collect_members(
        &self,
        stale: Vec<StaleBoard>,
    ) -> Result<Vec<StaleBoardReport>, AuditError> {
        let mut reports = Vec::with_capacity(stale.len());
        for StaleBoard {
            board,
            last_activity,
        } in stale
        {
            self.progress.request_started();
            let members = self.service.list_members(&board.id).await?;
            debug!(board_id = %board.id, board_name = %board.name, members = members.len(), "Collected members");

            reports.push(StaleBoardReport {
                board,
                members,
                last_activity,
            });
        }
        Ok(reports)
    }
}
