//! Backend error taxonomy.

use atelier_board::RepoKind;
use thiserror::Error;

/// Result type for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the studio backend or the transport underneath it.
///
/// There is no retry policy anywhere: a failed call is reported once and
/// left for the caller to redo.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Join the {repo} repository to work on this task")]
    RepoAccessRequired { repo: RepoKind },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Subscription required: {0}")]
    SubscriptionRequired(String),

    #[error("Backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// Authorization gating failures get a repo-specific toast in the UI.
    pub fn gating_repo(&self) -> Option<RepoKind> {
        match self {
            ApiError::RepoAccessRequired { repo } => Some(*repo),
            _ => None,
        }
    }

    pub fn is_network_error(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
