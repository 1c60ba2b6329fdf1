//! Errors produced by calls to the dashboard backend.

use http::{Method, StatusCode};

/// The two ways a backend call can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request never produced a usable answer: the connection failed, the server
    /// answered with a non-2xx status, or the body was not the JSON we expected.
    Transport,
    /// The server answered, but reported `success: false`.
    Application,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{method} {path} failed: {source}")]
    Transport {
        method: Method,
        path: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(
        "{method} {path} returned {status}: {}",
        .message.as_deref().unwrap_or("no error details")
    )]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        /// The `error` text from the response body, if it carried one.
        message: Option<String>,
    },

    #[error("{}", .message.as_deref().unwrap_or("request was not successful"))]
    Application { message: Option<String> },
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } | ApiError::Status { .. } => ErrorKind::Transport,
            ApiError::Application { .. } => ErrorKind::Application,
        }
    }

    /// The HTTP status the server answered with, if it answered with a failure status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
