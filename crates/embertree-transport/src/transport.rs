use std::fmt;

use async_trait::async_trait;

use crate::error::TransportResult;

/// HTTP method of a tree operation. The method selects the write semantics:
/// `PUT` replaces, `POST` appends under a generated key, `PATCH` merges,
/// `DELETE` removes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fully resolved request: the URL already carries every query parameter
/// (ordering, pagination, auth). Bodies are JSON text.
#[derive(Clone, Debug)]
pub struct RestRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<String>,
}

impl RestRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            body: None,
        }
    }

    pub fn with_body(method: Method, url: impl Into<String>, body: String) -> Self {
        Self {
            method,
            url: url.into(),
            body: Some(body),
        }
    }
}

/// Raw response: status code plus the body as text. Status interpretation
/// (≥ 400 is an error) is the caller's policy, not the transport's.
#[derive(Clone, Debug)]
pub struct RestResponse {
    pub status: u16,
    pub body: String,
}

impl RestResponse {
    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

/// Interface the client core uses to reach the remote store.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RestRequest) -> TransportResult<RestResponse>;
}
