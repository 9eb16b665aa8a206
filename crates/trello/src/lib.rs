//! Trello infrastructure adapter.
//!
//! Implements the [`audit::BoardService`] trait over the Trello REST API using
//! `reqwest`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. URL
//! construction, authentication, HTTP status handling, and JSON decoding live
//! here; the [`audit`] crate never sees them.
//!
//! ## Endpoints
//!
//! | Port method | Request |
//! |-------------|---------|
//! | `list_boards` | `GET organizations/{org}/boards` |
//! | `list_actions` | `GET boards/{id}/actions` |
//! | `list_members` | `GET boards/{id}/members` |
//!
//! Credentials are sent in the `Authorization` header so they never appear in
//! request URLs or transport error messages.

mod client;
mod wire;

pub use client::{ApiCredentials, TrelloClient, TrelloClientError, DEFAULT_API_URL};
