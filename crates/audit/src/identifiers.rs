//! Newtype domain identifiers.
//!
//! Every remote entity with an identity is represented as a distinct newtype
//! wrapping a `String`. This prevents accidentally interchanging a [`BoardId`]
//! with an [`OrganizationId`] even though both are plain strings on the wire.

use serde::Serialize;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — assigned by the remote service
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies the organization (workspace) whose boards are audited.
    ///
    /// Either the organization's opaque id or its short name is accepted by the
    /// remote API.
    OrganizationId
}

string_id! {
    /// Identifies a single board.
    BoardId
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single audit run.
///
/// Generated fresh for every invocation and recorded on the root tracing span
/// so all log events from one run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditRunId(Uuid);

impl AuditRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AuditRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
