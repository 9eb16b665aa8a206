//! HTTP implementation of [`audit::BoardService`].

use std::time::Duration;

use async_trait::async_trait;
use audit::{Board, BoardAction, BoardId, BoardMember, BoardService, BoardServiceError, OrganizationId};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::wire::{ActionRecord, BoardRecord, MemberRecord};

/// Public Trello REST API, version 1.
pub const DEFAULT_API_URL: &str = "https://api.trello.com/1/";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The API key / token pair sent with every request.
///
/// `Debug` output never contains either secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiCredentials {
    key: String,
    token: String,
}

impl ApiCredentials {
    pub fn new(key: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header Trello accepts in place of the
    /// `key` and `token` query parameters.
    fn authorization_header(&self) -> String {
        format!(
            "OAuth oauth_consumer_key=\"{}\", oauth_token=\"{}\"",
            self.key, self.token
        )
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("key", &"<redacted>")
            .field("token", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Construction errors
// ---------------------------------------------------------------------------

/// Errors raised while constructing a [`TrelloClient`].
#[derive(Debug, Error)]
pub enum TrelloClientError {
    /// The configured base URL cannot have request paths appended to it.
    #[error("Invalid API base URL '{url}': {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// The underlying HTTP client could not be initialised.
    #[error("Failed to build HTTP client: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Reads boards, actions, and members from the Trello REST API.
///
/// One call on the [`BoardService`] trait maps to exactly one `GET`. Nothing
/// is paginated, cached, or retried.
#[derive(Debug, Clone)]
pub struct TrelloClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: ApiCredentials,
}

impl TrelloClient {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// `timeout` bounds each request end to end; `None` waits indefinitely.
    pub fn new(
        base_url: &str,
        credentials: ApiCredentials,
        timeout: Option<Duration>,
    ) -> Result<Self, TrelloClientError> {
        let parsed = Url::parse(base_url).map_err(|error| TrelloClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            message: error.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(TrelloClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                message: "URL cannot be used as a base".to_owned(),
            });
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|error| TrelloClientError::Build(error.to_string()))?;

        Ok(Self {
            http,
            base_url: parsed,
            credentials,
        })
    }

    /// Appends percent-encoded `segments` to the base URL.
    fn endpoint_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues one authenticated `GET` and decodes the JSON body as `T`.
    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, BoardServiceError> {
        let endpoint = segments.join("/");
        let url = self.endpoint_url(segments);

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.credentials.authorization_header())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| BoardServiceError::Transport {
                endpoint: endpoint.clone(),
                message: error.without_url().to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardServiceError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|error| BoardServiceError::Transport {
                endpoint: endpoint.clone(),
                message: error.without_url().to_string(),
            })?;
        debug!(%endpoint, bytes = body.len(), "Received response");

        serde_json::from_slice(&body).map_err(|error| BoardServiceError::Decode {
            endpoint,
            message: error.to_string(),
        })
    }
}

/// Converts every board record, failing the whole listing on the first bad one.
fn convert_boards(endpoint: String, records: Vec<BoardRecord>) -> Result<Vec<Board>, BoardServiceError> {
    records
        .into_iter()
        .map(Board::try_from)
        .collect::<Result<_, _>>()
        .map_err(|message| BoardServiceError::Decode { endpoint, message })
}

#[async_trait]
impl BoardService for TrelloClient {
    #[instrument(skip(self), fields(%organization))]
    async fn list_boards(
        &self,
        organization: &OrganizationId,
    ) -> Result<Vec<Board>, BoardServiceError> {
        let segments = ["organizations", organization.as_str(), "boards"];
        let records: Vec<BoardRecord> = self.get_json(&segments).await?;
        convert_boards(segments.join("/"), records)
    }

    #[instrument(skip(self), fields(%board))]
    async fn list_actions(&self, board: &BoardId) -> Result<Vec<BoardAction>, BoardServiceError> {
        let records: Vec<ActionRecord> = self.get_json(&["boards", board.as_str(), "actions"]).await?;
        Ok(records.into_iter().map(BoardAction::from).collect())
    }

    #[instrument(skip(self), fields(%board))]
    async fn list_members(&self, board: &BoardId) -> Result<Vec<BoardMember>, BoardServiceError> {
        let records: Vec<MemberRecord> = self.get_json(&["boards", board.as_str(), "members"]).await?;
        Ok(records.into_iter().map(BoardMember::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> TrelloClient {
        TrelloClient::new(base, ApiCredentials::new("k", "t"), None).unwrap()
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let credentials = ApiCredentials::new("my-key", "my-token");
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("my-key"));
        assert!(!rendered.contains("my-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn authorization_header_carries_both_credentials() {
        let credentials = ApiCredentials::new("abc", "xyz");
        assert_eq!(
            credentials.authorization_header(),
            "OAuth oauth_consumer_key=\"abc\", oauth_token=\"xyz\""
        );
    }

    #[test]
    fn endpoint_urls_append_to_base_path_with_or_without_trailing_slash() {
        let with_slash = client("https://api.trello.com/1/");
        let without_slash = client("https://api.trello.com/1");
        let expected = "https://api.trello.com/1/boards/b1/actions";

        assert_eq!(with_slash.endpoint_url(&["boards", "b1", "actions"]).as_str(), expected);
        assert_eq!(without_slash.endpoint_url(&["boards", "b1", "actions"]).as_str(), expected);
    }

    #[test]
    fn endpoint_segments_are_percent_encoded() {
        let url = client(DEFAULT_API_URL).endpoint_url(&["organizations", "acme/evil?x", "boards"]);
        assert_eq!(url.as_str(), "https://api.trello.com/1/organizations/acme%2Fevil%3Fx/boards");
    }

    #[test]
    fn rejects_unusable_base_urls() {
        let credentials = ApiCredentials::new("k", "t");
        assert!(matches!(
            TrelloClient::new("not a url", credentials.clone(), None),
            Err(TrelloClientError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            TrelloClient::new("mailto:someone@example.com", credentials, None),
            Err(TrelloClientError::InvalidBaseUrl { .. })
        ));
    }
}
