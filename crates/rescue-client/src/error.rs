//! Client error types.

use thiserror::Error;

use crate::rebuild::RebuildError;

/// Errors that end a fetch/rebuild cycle. None of them are retried.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request failed, timed out or returned a non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body is not a snapshot.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// The snapshot decoded but contains unplaceable data.
    #[error("parse error: {0}")]
    Parse(#[from] RebuildError),
}

/// Coarse classification of a [`ClientError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Parse,
}

impl ClientError {
    /// Returns the error's kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Transport(_) => ErrorKind::Transport,
            ClientError::Decode(_) => ErrorKind::Decode,
            ClientError::Parse(_) => ErrorKind::Parse,
        }
    }

    /// Builds a transport error from a reqwest failure.
    pub(crate) fn from_request(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Transport(format!("request to {} timed out", endpoint))
        } else if let Some(status) = err.status() {
            ClientError::Transport(format!("{} returned {}", endpoint, status))
        } else {
            ClientError::Transport(format!("request to {} failed: {}", endpoint, err))
        }
    }
}
