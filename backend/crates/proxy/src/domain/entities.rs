//! Domain Entities
//!
//! A request on its way to the backend and the backend's answer.

use std::fmt;

use axum::body::{Body, Bytes, HttpBody};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};

use crate::domain::value_objects::BackendPath;

/// Outbound request body
pub enum ForwardBody {
    /// Small bodies the proxy had to inspect
    Buffered(Bytes),
    /// Inbound body relayed chunk by chunk, already wrapped in the size limit
    Stream(Body),
}

impl ForwardBody {
    pub fn empty() -> Self {
        ForwardBody::Buffered(Bytes::new())
    }

    /// True when the body is known to carry no bytes
    pub fn is_empty(&self) -> bool {
        match self {
            ForwardBody::Buffered(bytes) => bytes.is_empty(),
            ForwardBody::Stream(body) => HttpBody::is_end_stream(body),
        }
    }
}

impl fmt::Debug for ForwardBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            ForwardBody::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<Bytes> for ForwardBody {
    fn from(bytes: Bytes) -> Self {
        ForwardBody::Buffered(bytes)
    }
}

/// Request to forward. Headers are already filtered through the allow-list.
#[derive(Debug)]
pub struct ForwardRequest {
    pub method: Method,
    pub path: BackendPath,
    /// Encoded query string without the leading `?`
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: ForwardBody,
}

impl ForwardRequest {
    pub fn new(method: Method, path: BackendPath) -> Self {
        Self {
            method,
            path,
            query: None,
            headers: HeaderMap::new(),
            body: ForwardBody::empty(),
        }
    }

    pub fn with_query(mut self, query: Option<String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_body(mut self, body: impl Into<ForwardBody>) -> Self {
        self.body = body.into();
        self
    }
}

/// Backend answer, buffered
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}
