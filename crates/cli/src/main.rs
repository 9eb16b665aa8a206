//! Stale board audit CLI entry point.
//!
//! This binary is the composition root for the whole workspace. Responsibilities:
//!
//! 1. **Parse configuration** — flags with `KEY` / `TOKEN` / `ORG` environment
//!    fallbacks (a `.env` file is loaded first), validated into an
//!    [`config::AuditConfig`] before any network activity.
//! 2. **Wire observability** — `tracing-subscriber` with a text or JSON layer on
//!    stderr.
//! 3. **Construct infrastructure** — a [`trello::TrelloClient`] and the progress
//!    observer, injected into [`audit::Auditor`].
//! 4. **Report** — progress markers, a line break, then the stale boards.
//!
//! Any error ends the run with a diagnostic on stderr and exit status 1; no
//! report lines are printed in that case.
//!
//! ## Usage
//!
//! ```bash
//! export KEY=... TOKEN=... ORG=...
//! stale-boards
//! stale-boards --json --quiet
//! ```

mod config;
mod observability;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use audit::{AuditRunId, Auditor, NoProgress, ProgressObserver, Timestamp};
use clap::Parser;
use tracing::{error, info, info_span, Instrument};
use trello::TrelloClient;

use crate::config::{AuditConfig, Cli};
use crate::output::DotProgress;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    observability::init_tracing(cli.log_format);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Audit failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AuditConfig::from_cli(cli)?;

    // Fixed once so every board is measured against the same instant.
    let cutoff = config.window.cutoff_from(Timestamp::now());

    let client = TrelloClient::new(&config.api_url, config.credentials.clone(), config.timeout)
        .context("Could not set up the Trello client")?;

    let dots = config
        .show_progress
        .then(|| Arc::new(DotProgress::new(std::io::stdout())));
    let progress: Arc<dyn ProgressObserver> = match &dots {
        Some(dots) => dots.clone(),
        None => Arc::new(NoProgress),
    };

    let run_id = AuditRunId::new_random();
    let span = info_span!("audit_run", %run_id, organization = %config.organization);

    let auditor = Auditor::new(Arc::new(client), progress, cutoff);
    let outcome = async {
        info!(
            api_url = %config.api_url,
            stale_after_hours = config.window.hours(),
            cutoff = %auditor.cutoff(),
            "Starting audit"
        );
        auditor.run(&config.organization).await
    }
    .instrument(span)
    .await;

    output::finish_run(
        dots.as_deref(),
        outcome,
        std::io::stdout().lock(),
        config.report_format,
    )
}
