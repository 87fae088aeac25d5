use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;

/// Errors that can happen either during client configuration or while communicating over the network.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The request was rejected as unauthenticated and the session could not be renewed.
    #[error("unauthorized: {0}")]
    Unauthorized(StatusError),

    /// The backend answered with a non-success status other than 401.
    #[error("{0}")]
    Status(StatusError),

    /// A network problem.
    #[error("network error: {0}")]
    Network(anyhow::Error),

    /// A JSON encoding or decoding problem.
    #[error("encoding error: {0}")]
    Codec(anyhow::Error),

    /// The configured base URL is unusable.
    #[error("invalid url: {0}")]
    InvalidUrl(&'static str),

    /// The outbound request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(anyhow::Error),

    /// The session store failed to persist a change.
    #[error("session storage error: {0}")]
    Storage(anyhow::Error),

    /// A company-scoped operation was called without a selected company.
    #[error("no company selected")]
    NoCompanySelected,

    /// Other type of unclassified error.
    #[error("unclassified error: {0}")]
    Unclassified(anyhow::Error),
}

impl Error {
    /// The HTTP status the backend answered with, if this error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized(err) | Self::Status(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A non-success response, with the body exactly as the backend sent it.
#[derive(Clone, Debug)]
pub struct StatusError {
    /// Response status.
    pub status: StatusCode,

    /// Raw response body.
    pub body: Bytes,
}

impl StatusError {
    pub(crate) fn new(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    /// The body decoded as JSON, if it is JSON.
    pub fn json(&self) -> Option<serde_json::Value> {
        serde_json::from_slice(&self.body).ok()
    }

    /// The human readable message of the backend's error payload.
    ///
    /// Looks for the `error`, `detail` and `message` fields the backend uses.
    pub fn message(&self) -> Option<String> {
        let json = self.json()?;
        ["error", "detail", "message"]
            .into_iter()
            .find_map(|key| json.get(key)?.as_str().map(str::to_string))
    }
}

impl std::fmt::Display for StatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.message() {
            Some(message) => write!(f, "status {}: {message}", self.status),
            None => write!(f, "status {}", self.status),
        }
    }
}

/// Reasons an access token refresh did not produce a new token.
///
/// Cloneable so a single refresh outcome can be shared by every request waiting on it.
#[derive(thiserror::Error, Clone, Debug)]
pub enum RefreshError {
    /// The session holds no refresh token.
    #[error("no refresh token in session")]
    MissingRefreshToken,

    /// The refresh endpoint rejected the refresh token.
    #[error("refresh rejected with status {0}")]
    Rejected(StatusCode),

    /// The refresh call did not complete.
    #[error("refresh request failed: {0}")]
    Transport(Arc<Error>),

    /// The refresh endpoint answered with an unexpected body.
    #[error("malformed refresh response: {0}")]
    Malformed(Arc<anyhow::Error>),
}

pub(crate) fn unclassified(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Unclassified(anyhow::Error::from(err))
}

pub(crate) fn network(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Network(anyhow::Error::from(err))
}

pub(crate) fn codec(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Codec(anyhow::Error::from(err))
}

pub(crate) fn invalid_request(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::InvalidRequest(anyhow::Error::from(err))
}

pub(crate) fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Error {
    Error::Storage(anyhow::Error::from(err))
}
