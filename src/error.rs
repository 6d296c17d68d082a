// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error type shared by every connector layer.
//!
//! Payloads are plain strings so the error is `Clone`: a failed login is
//! memoized inside the session handle and handed to every waiter.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Request to {url} failed with status {status}: {message}")]
    Status {
        status: u16,
        url: String,
        message: String,
    },
    #[error("Login failed: {0}")]
    Login(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Operation requires an authoring endpoint")]
    AuthoringRequired,
    #[error("Unresolved parent taxonomy '{0}'")]
    UnresolvedParent(String),
}

impl ConnectorError {
    /// Whether the remote service rejected the session itself.
    #[must_use]
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, Self::Status { status: 401, .. })
    }

    /// Status code reported by the remote service, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        ConnectorError::Json(e.to_string())
    }
}

impl From<std::io::Error> for ConnectorError {
    fn from(e: std::io::Error) -> Self {
        ConnectorError::Io(e.to_string())
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(e: reqwest::Error) -> Self {
        ConnectorError::Transport(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
