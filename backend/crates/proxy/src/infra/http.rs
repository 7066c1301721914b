//! reqwest-backed Backend

use crate::application::config::ProxyConfig;
use crate::domain::backend::Backend;
use crate::domain::entities::{BackendResponse, ForwardBody, ForwardRequest};
use crate::error::{ProxyError, ProxyResult};
use axum::http::HeaderValue;
use axum::http::header::CONTENT_TYPE;
use http_body_util::LengthLimitError;
use std::error::Error as StdError;
use url::Url;

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    max_body_bytes: usize,
}

impl HttpBackend {
    pub fn new(config: &ProxyConfig) -> ProxyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProxyError::Unreachable(e.to_string()))?;

        Ok(Self {
            client,
            base: config.backend_url.clone(),
            max_body_bytes: config.max_body_bytes,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `base` + path segments (percent-encoded) + raw query
    pub fn target_url(&self, request: &ForwardRequest) -> ProxyResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ProxyError::InvalidUrl(self.base.to_string()))?;
            segments.pop_if_empty();
            segments.extend(request.path.segments());
        }
        url.set_query(request.query.as_deref());
        Ok(url)
    }
}

impl Backend for HttpBackend {
    async fn send(&self, request: ForwardRequest) -> ProxyResult<BackendResponse> {
        let url = self.target_url(&request)?;

        let mut headers = request.headers;
        if !request.body.is_empty() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let body = match request.body {
            ForwardBody::Buffered(bytes) => reqwest::Body::from(bytes),
            ForwardBody::Stream(body) => reqwest::Body::wrap_stream(body.into_data_stream()),
        };

        let response = self
            .client
            .request(request.method, url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProxyError::Unreachable(e.to_string()))?;

        Ok(BackendResponse {
            status,
            content_type,
            body,
        })
    }
}

impl HttpBackend {
    fn send_error(&self, err: reqwest::Error) -> ProxyError {
        body_failure(&err, self.max_body_bytes)
            .unwrap_or_else(|| ProxyError::Unreachable(err.to_string()))
    }
}

/// Find an inbound body failure in an error chain.
///
/// A streamed body surfaces its own errors through the client's source
/// chain: `LengthLimitError` when the caller sent too much, `axum::Error`
/// when the inbound connection broke. `None` means a transport failure.
pub(crate) fn body_failure(err: &(dyn StdError + 'static), limit: usize) -> Option<ProxyError> {
    let mut source = Some(err);
    let mut broken = None;
    while let Some(cause) = source {
        if cause.is::<LengthLimitError>() {
            return Some(ProxyError::BodyTooLarge(limit));
        }
        if broken.is_none() && cause.is::<axum::Error>() {
            broken = Some(cause.to_string());
        }
        source = cause.source();
    }
    broken.map(ProxyError::BodyRead)
}
