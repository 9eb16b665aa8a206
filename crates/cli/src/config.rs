//! Command line and environment configuration.
//!
//! [`Cli`] is what the user typed (flags, with environment fallbacks);
//! [`AuditConfig`] is the validated, immutable configuration built from it
//! once at startup and handed to every component that needs it.

use std::time::Duration;

use audit::{OrganizationId, StalenessWindow};
use clap::{Parser, ValueEnum};
use thiserror::Error;
use trello::ApiCredentials;

// ---------------------------------------------------------------------------
// Raw arguments
// ---------------------------------------------------------------------------

/// Lists the open, organization-visible Trello boards that have seen no real
/// activity recently, together with their members.
#[derive(Parser, Debug)]
#[command(name = "stale-boards")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Trello API key
    #[arg(long, env = "KEY", hide_env_values = true)]
    pub key: Option<String>,

    /// Trello API token
    #[arg(long, env = "TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Organization id or short name whose boards are audited
    #[arg(long, env = "ORG")]
    pub org: Option<String>,

    /// Base URL of the Trello REST API
    #[arg(long, env = "TRELLO_API_URL", default_value = trello::DEFAULT_API_URL)]
    pub api_url: String,

    /// Boards without substantive activity for this many hours are stale
    #[arg(long, default_value_t = StalenessWindow::DEFAULT_HOURS)]
    pub stale_after_hours: u32,

    /// Per-request timeout in seconds (no timeout when omitted)
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Print the report as JSON instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Do not print a progress marker per API request
    #[arg(short, long)]
    pub quiet: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "STALE_BOARDS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Format of diagnostic log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Format of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One `<url>  (<members>)` line per stale board.
    Text,
    /// A JSON array of report records.
    Json,
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Errors detected while validating configuration. Raised before any network
/// activity.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing {name}: set the {name} environment variable or pass --{flag}")]
    Missing {
        name: &'static str,
        flag: &'static str,
    },

    #[error("--stale-after-hours must be greater than zero")]
    EmptyStalenessWindow,
}

/// Everything one audit run needs, validated.
#[derive(Debug, Clone)]
pub struct AuditConfig {
    pub credentials: ApiCredentials,
    pub organization: OrganizationId,
    pub api_url: String,
    pub window: StalenessWindow,
    pub timeout: Option<Duration>,
    pub report_format: ReportFormat,
    pub show_progress: bool,
}

impl AuditConfig {
    /// Validates raw arguments. Blank values count as missing.
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let key = required(cli.key, "KEY", "key")?;
        let token = required(cli.token, "TOKEN", "token")?;
        let organization = OrganizationId::new(required(cli.org, "ORG", "org")?)
            .ok_or(ConfigError::Missing {
                name: "ORG",
                flag: "org",
            })?;
        let window =
            StalenessWindow::from_hours(cli.stale_after_hours).ok_or(ConfigError::EmptyStalenessWindow)?;

        Ok(Self {
            credentials: ApiCredentials::new(key, token),
            organization,
            api_url: cli.api_url,
            window,
            timeout: cli.timeout_secs.map(Duration::from_secs),
            report_format: if cli.json {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            },
            show_progress: !cli.quiet,
        })
    }
}

fn required(
    value: Option<String>,
    name: &'static str,
    flag: &'static str,
) -> Result<String, ConfigError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing { name, flag })
}
