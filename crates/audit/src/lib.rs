//! Core domain for the stale board audit.
//!
//! This crate contains every domain concept, newtype identifier, the staleness
//! rule, and the audit pipeline itself. Infrastructure crates implement the
//! traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`BoardId`, `OrganizationId`, `AuditRunId`) |
//! | [`types`] | Boards, actions, members, timestamps, the report record |
//! | [`errors`] | Port and audit error types |
//! | [`ports`] | `BoardService` and `ProgressObserver` traits |
//! | [`staleness`] | The rule deciding whether a board is stale |
//! | [`auditor`] | The list → classify → enrich pipeline |

pub mod auditor;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod staleness;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use auditor::{Auditor, StaleBoard};
pub use errors::{AuditError, BoardServiceError};
pub use identifiers::{AuditRunId, BoardId, OrganizationId};
pub use ports::{BoardService, NoProgress, ProgressObserver};
pub use staleness::Staleness;
pub use types::{
    Board, BoardAction, BoardMember, PermissionLevel, StaleBoardReport, StalenessWindow, Timestamp,
};
