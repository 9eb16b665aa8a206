//! Error types for the board audit domain.
//!
//! [`BoardServiceError`] is what a [`crate::BoardService`] implementation
//! reports when a remote call cannot produce the expected records.
//! [`AuditError`] covers every condition that aborts an audit run. There is no
//! recovery tier: any error ends the run and no partial report is produced.

use thiserror::Error;

use crate::BoardId;

// ---------------------------------------------------------------------------
// Port errors
// ---------------------------------------------------------------------------

/// Failure of a single remote call.
///
/// `endpoint` is the request path relative to the API base (for example
/// `boards/5f1c/actions`). Implementations must never place credentials in any
/// of these fields.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BoardServiceError {
    /// The request did not complete (connection refused, DNS failure, timeout).
    #[error("Request to '{endpoint}' failed: {message}")]
    Transport {
        /// Request path that failed.
        endpoint: String,
        /// Transport-level description of the failure.
        message: String,
    },

    /// The service answered with a non-success HTTP status.
    #[error("Request to '{endpoint}' returned HTTP {status}")]
    Status {
        /// Request path that failed.
        endpoint: String,
        /// HTTP status code received.
        status: u16,
    },

    /// The response body could not be decoded into the expected records.
    #[error("Response from '{endpoint}' could not be decoded: {message}")]
    Decode {
        /// Request path whose body was rejected.
        endpoint: String,
        /// Decoder's description of the problem.
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Audit errors
// ---------------------------------------------------------------------------

/// Errors that abort an audit run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    /// A remote call failed.
    #[error(transparent)]
    Service(#[from] BoardServiceError),

    /// A board action carried a timestamp that is not in the API's layout.
    #[error("Board '{board}' has an action with an unparseable timestamp: '{value}'")]
    InvalidTimestamp {
        /// Board whose history contained the bad value.
        board: BoardId,
        /// The timestamp string as received.
        value: String,
    },
}
