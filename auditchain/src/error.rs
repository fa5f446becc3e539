//! Error types for the auditchain library.
//!
//! A broken chain is not an error: the verifier reports it through its return
//! value. `ChainError` covers structurally malformed input, configuration and
//! I/O problems; `ApiError` covers the remote compliance API.

use thiserror::Error;

pub type ChainResult<T> = Result<T, ChainError>;
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ChainError {
    /// Input is not shaped like a sequence of records at all.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} missing")]
    MissingCredential(&'static str),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// 2xx response carrying `success: false`.
    #[error("request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("invalid JSON response (HTTP {status})")]
    InvalidResponse { status: u16 },
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error("transport error: {0}")]
    Transport(String),
    /// History paging did not reach an end within the configured page budget.
    #[error("stopped after {pages} pages ({entries} entries) without reaching the end of the history")]
    PageLimit { pages: u32, entries: usize },
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<ApiError> },
}

impl ApiError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport(_) => true,
            ApiError::Status { status, .. } | ApiError::InvalidResponse { status } => {
                *status == 429 || *status >= 500
            }
            _ => false,
        }
    }

    /// HTTP status attached to this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. }
            | ApiError::Rejected { status, .. }
            | ApiError::InvalidResponse { status } => Some(*status),
            ApiError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}
