//! Error types for catalog service calls.

use thiserror::Error;

/// Coarse classification shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    Network,
    Client,
    Server,
}

/// A failed round trip to the catalog service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// The request never produced an HTTP response (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The service rejected the request (4xx).
    #[error("Request rejected ({status}): {body}")]
    Client { status: u16, body: String },

    /// The service failed to handle the request (5xx or any other non-success status).
    #[error("Service error ({status}): {body}")]
    Server { status: u16, body: String },

    /// The response body does not match the wire contract.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl RemoteError {
    /// Builds the error for a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if (400..500).contains(&status) {
            RemoteError::Client { status, body }
        } else {
            RemoteError::Server { status, body }
        }
    }

    pub fn kind(&self) -> RemoteErrorKind {
        match self {
            RemoteError::Network(_) => RemoteErrorKind::Network,
            RemoteError::Client { .. } => RemoteErrorKind::Client,
            RemoteError::Server { .. } | RemoteError::InvalidResponse(_) => RemoteErrorKind::Server,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Client { status, .. } | RemoteError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            return RemoteError::InvalidResponse(e.to_string());
        }
        match e.status() {
            Some(status) => RemoteError::from_status(status.as_u16(), e.to_string()),
            None => RemoteError::Network(e.to_string()),
        }
    }
}
