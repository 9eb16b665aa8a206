//! Progress markers and report rendering.

use std::io::Write;
use std::sync::Mutex;

use anyhow::Context;
use audit::{AuditError, ProgressObserver, StaleBoardReport};

use crate::config::ReportFormat;

/// Writes one `.` per remote request, flushing after each so the user sees
/// the run advance.
pub struct DotProgress<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> DotProgress<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Ends the progress line.
    pub fn finish(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out);
            let _ = out.flush();
        }
    }
}

impl<W: Write + Send> ProgressObserver for DotProgress<W> {
    fn request_started(&self) {
        // Progress is cosmetic; a closed stdout must not abort the audit.
        if let Ok(mut out) = self.out.lock() {
            let _ = out.write_all(b".");
            let _ = out.flush();
        }
    }
}

/// Closes the progress line, then prints the report if the audit succeeded.
///
/// A failed audit prints no report lines; its error is returned to the caller.
pub fn finish_run<P: Write + Send, W: Write>(
    dots: Option<&DotProgress<P>>,
    outcome: Result<Vec<StaleBoardReport>, AuditError>,
    out: W,
    format: ReportFormat,
) -> anyhow::Result<()> {
    if let Some(dots) = dots {
        dots.finish();
    }
    let reports = outcome?;
    write_report(out, &reports, format).context("Could not write the report")
}

/// Writes the final report.
pub fn write_report<W: Write>(
    mut out: W,
    reports: &[StaleBoardReport],
    format: ReportFormat,
) -> anyhow::Result<()> {
    match format {
        ReportFormat::Text => {
            for report in reports {
                writeln!(out, "{report}")?;
            }
        }
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, reports)?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use async_trait::async_trait;
    use audit::{
        Auditor, Board, BoardAction, BoardId, BoardMember, BoardService, BoardServiceError,
        OrganizationId, PermissionLevel, Timestamp,
    };

    use super::*;

    fn board(id: &str) -> Board {
        Board {
            id: BoardId::new(id).unwrap(),
            name: format!("Board {id}"),
            url: format!("https://trello.com/b/{id}"),
            closed: false,
            permission_level: PermissionLevel::Org,
        }
    }

    fn member(username: &str, full_name: Option<&str>) -> BoardMember {
        BoardMember {
            username: username.to_owned(),
            full_name: full_name.map(str::to_owned),
        }
    }

    fn report(id: &str, members: &[&str], last_activity: Option<&str>) -> StaleBoardReport {
        StaleBoardReport {
            board: board(id),
            members: members.iter().map(|m| member(m, None)).collect(),
            last_activity: last_activity.and_then(Timestamp::parse_api),
        }
    }

    /// A writer whose clones all append to one buffer, so progress and report
    /// output can be checked in the order they were written.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// One stale board `a` with members alice and bob; `members_status` makes
    /// the member request fail with that HTTP status.
    struct SingleBoardService {
        actions_date: &'static str,
        members_status: Option<u16>,
    }

    #[async_trait]
    impl BoardService for SingleBoardService {
        async fn list_boards(&self, _: &OrganizationId) -> Result<Vec<Board>, BoardServiceError> {
            Ok(vec![board("a")])
        }

        async fn list_actions(&self, _: &BoardId) -> Result<Vec<BoardAction>, BoardServiceError> {
            Ok(vec![BoardAction {
                action_type: "updateCard".to_owned(),
                date: self.actions_date.to_owned(),
            }])
        }

        async fn list_members(&self, _: &BoardId) -> Result<Vec<BoardMember>, BoardServiceError> {
            match self.members_status {
                Some(status) => Err(BoardServiceError::Status {
                    endpoint: "boards/a/members".to_owned(),
                    status,
                }),
                None => Ok(vec![member("alice", Some("Alice A")), member("bob", None)]),
            }
        }
    }

    async fn audit_into(buf: &SharedBuf, service: SingleBoardService) -> anyhow::Result<()> {
        let dots = Arc::new(DotProgress::new(buf.clone()));
        let auditor = Auditor::new(
            Arc::new(service),
            dots.clone(),
            Timestamp::parse_api("2024-04-01T00:00:00.000Z").unwrap(),
        );
        let outcome = auditor.run(&OrganizationId::new("acme").unwrap()).await;
        finish_run(Some(dots.as_ref()), outcome, buf.clone(), ReportFormat::Text)
    }

    #[tokio::test]
    async fn progress_line_is_closed_before_the_report() {
        let buf = SharedBuf::default();
        let service = SingleBoardService {
            actions_date: "2024-01-01T10:00:00.000Z",
            members_status: None,
        };

        audit_into(&buf, service).await.unwrap();

        assert_eq!(buf.contents(), "...\nhttps://trello.com/b/a  (alice, bob)\n");
    }

    #[tokio::test]
    async fn failed_service_call_leaves_progress_but_no_report() {
        let buf = SharedBuf::default();
        let service = SingleBoardService {
            actions_date: "2024-01-01T10:00:00.000Z",
            members_status: Some(503),
        };

        let err = audit_into(&buf, service).await.unwrap_err();

        assert_eq!(buf.contents(), "...\n");
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn malformed_timestamp_leaves_progress_but_no_report() {
        let buf = SharedBuf::default();
        let service = SingleBoardService {
            actions_date: "01/01/2024",
            members_status: None,
        };

        let err = audit_into(&buf, service).await.unwrap_err();

        assert_eq!(buf.contents(), "..\n");
        assert!(matches!(
            err.downcast_ref::<AuditError>(),
            Some(AuditError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn progress_writes_one_dot_per_request_then_a_newline() {
        let progress = DotProgress::new(Vec::new());
        progress.request_started();
        progress.request_started();
        progress.request_started();
        progress.finish();

        let written = progress.out.into_inner().unwrap();
        assert_eq!(written, b"...\n");
    }

    #[test]
    fn text_report_prints_one_line_per_board() {
        let mut out = Vec::new();
        let reports = [report("a", &["carol", "dave"], None), report("b", &[], None)];

        write_report(&mut out, &reports, ReportFormat::Text).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "https://trello.com/b/a  (carol, dave)\nhttps://trello.com/b/b  ()\n"
        );
    }

    #[test]
    fn empty_text_report_prints_nothing() {
        let mut out = Vec::new();
        write_report(&mut out, &[], ReportFormat::Text).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn json_report_carries_board_members_and_last_activity() {
        let mut out = Vec::new();
        let mut stale = report("a", &[], Some("2024-01-01T10:00:00.000Z"));
        stale.members = vec![member("carol", Some("Carol Jones")), member("dave", None)];

        write_report(&mut out, &[stale], ReportFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["board"]["url"], "https://trello.com/b/a");
        assert_eq!(value[0]["board"]["name"], "Board a");
        assert_eq!(value[0]["board"]["permission_level"], "org");
        assert_eq!(value[0]["members"][0]["username"], "carol");
        assert_eq!(value[0]["members"][0]["full_name"], "Carol Jones");
        assert!(value[0]["members"][1].get("full_name").is_none());
        assert_eq!(value[0]["last_activity"], "2024-01-01T10:00:00Z");
    }
}
