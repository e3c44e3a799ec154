use serde_json::Value;
use thiserror::Error;

use crate::failure::RequestFailure;

/// Coarse classification used by callers that only care about the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, unexpected status, or an unreadable body.
    Transport,
    /// The server answered 404 for the addressed product.
    NotFound,
    /// The server rejected the submitted fields with a field-error payload.
    Validation,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("product not found: {url}")]
    NotFound { url: String, body: Option<Value> },

    #[error("validation failed with status {status} for {url}")]
    Validation {
        status: u16,
        url: String,
        body: Value,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: Option<Value>,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl CatalogError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Validation { .. } => ErrorKind::Validation,
            CatalogError::Http(_)
            | CatalogError::UnexpectedStatus { .. }
            | CatalogError::Deserialize { .. }
            | CatalogError::InvalidBaseUrl { .. } => ErrorKind::Transport,
        }
    }

    /// HTTP status attached to the failure, when the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Http(e) => e.status().map(|s| s.as_u16()),
            CatalogError::NotFound { .. } => Some(404),
            CatalogError::Validation { status, .. }
            | CatalogError::UnexpectedStatus { status, .. } => Some(*status),
            CatalogError::Deserialize { .. } | CatalogError::InvalidBaseUrl { .. } => None,
        }
    }

    /// Extracts the status, body and fallback text for [`crate::to_message`].
    #[must_use]
    pub fn failure(&self) -> RequestFailure {
        let payload = match self {
            CatalogError::NotFound { body, .. } | CatalogError::UnexpectedStatus { body, .. } => {
                body.clone()
            }
            CatalogError::Validation { body, .. } => Some(body.clone()),
            CatalogError::Http(_)
            | CatalogError::Deserialize { .. }
            | CatalogError::InvalidBaseUrl { .. } => None,
        };
        RequestFailure {
            status: self.status(),
            payload,
            message: Some(self.to_string()),
        }
    }
}
