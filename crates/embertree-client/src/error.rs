use embertree_transport::TransportError;
use embertree_types::EventType;
use thiserror::Error;

/// Client-facing failures.
///
/// `Clone` is load-bearing: a failed fetch stays in the request cache for the
/// TTL window and the same error is handed to every coalesced caller.
#[derive(Debug, Clone, Error)]
pub enum DbError {
    /// Required base location missing. Raised on first actual use of the
    /// database, never at construction.
    #[error("database not configured: {0}")]
    Configuration(String),

    /// Response status ≥ 400.
    #[error("response was not OK ({status})")]
    Http { status: u16 },

    /// Event kind the one-shot emulation cannot serve.
    #[error("unsupported database {operation} event: {event}")]
    UnsupportedEvent {
        operation: &'static str,
        event: EventType,
    },

    #[error("transport error: {0}")]
    Transport(String),

    /// Payload that does not serialize to JSON.
    #[error("unserializable payload: {0}")]
    Serialization(String),

    /// Response body that does not parse as expected.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<TransportError> for DbError {
    fn from(err: TransportError) -> Self {
        Self::Transport(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
