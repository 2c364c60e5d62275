use thiserror::Error;

/// Failures below the HTTP layer. Payloads are plain strings so the error is
/// `Clone` — a failed read may be replayed to several coalesced callers.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("error reading response body: {0}")]
    Body(String),
}

pub type TransportResult<T> = Result<T, TransportError>;
