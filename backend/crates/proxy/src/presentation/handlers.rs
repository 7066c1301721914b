//! HTTP Handlers

use crate::application::config::ProxyConfig;
use crate::application::forward::ForwardUseCase;
use crate::domain::backend::Backend;
use crate::domain::entities::{BackendResponse, ForwardBody, ForwardRequest};
use crate::domain::value_objects::{
    BackendPath, FailurePolicy, WALLET_ADDRESS, select_forwarded_headers, strip_internal_params,
};
use crate::error::{ProxyError, ProxyResult};
use crate::presentation::dto::{AdminAppRequest, VerifyBackendResponse, VerifyResponse};
use axum::Json;
use axum::body::{Body, Bytes, HttpBody};
use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, Method, header};
use axum::response::{IntoResponse, Response};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use std::sync::Arc;

const CONFIG_FAILURE: &str = "Failed to fetch configuration";
const APPS_FAILURE: &str = "Failed to fetch apps data";
const VERIFY_FAILURE: &str = "Failed to verify admin status";

/// Shared state for proxy handlers
#[derive(Clone)]
pub struct ProxyAppState<B>
where
    B: Backend + Send + Sync + 'static,
{
    pub backend: Arc<B>,
    pub config: Arc<ProxyConfig>,
}

impl<B> ProxyAppState<B>
where
    B: Backend + Send + Sync + 'static,
{
    pub fn new(backend: B, config: ProxyConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
        }
    }

    async fn forward(
        &self,
        request: ForwardRequest,
        policy: FailurePolicy,
    ) -> ProxyResult<BackendResponse> {
        ForwardUseCase::new(self.backend.clone())
            .execute(request, policy)
            .await
    }
}

/// GET /api/config
pub async fn get_config<B>(
    State(state): State<ProxyAppState<B>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let request = ForwardRequest::new(Method::GET, BackendPath::fixed("config"))
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers));

    let response = state
        .forward(request, FailurePolicy::Collapse(CONFIG_FAILURE))
        .await?;
    Ok(relay(response))
}

/// GET /api/apps
pub async fn list_apps<B>(
    State(state): State<ProxyAppState<B>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let request = ForwardRequest::new(Method::GET, BackendPath::fixed("apps"))
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers));

    let response = state
        .forward(request, FailurePolicy::Collapse(APPS_FAILURE))
        .await?;
    Ok(relay(response))
}

/// POST /api/apps
///
/// Multipart submissions are streamed through unparsed with the inbound
/// boundary-bearing content type.
pub async fn create_app<B>(
    State(state): State<ProxyAppState<B>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let body = stream_body(&headers, body, state.config.max_body_bytes)?;
    let request = ForwardRequest::new(Method::POST, BackendPath::fixed("apps"))
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers))
        .with_body(body);

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

/// GET /api/apps/{id}
pub async fn get_app<B>(
    State(state): State<ProxyAppState<B>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    forward_by_id(&state, Method::GET, "apps", &id, query, headers, ForwardBody::empty()).await
}

/// PUT /api/apps/{id}
pub async fn update_app<B>(
    State(state): State<ProxyAppState<B>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    // Validate before touching a possibly large body
    BackendPath::with_id("apps", &id)?;
    let body = stream_body(&headers, body, state.config.max_body_bytes)?;
    forward_by_id(&state, Method::PUT, "apps", &id, query, headers, body).await
}

/// GET /api/reviews/{id}
pub async fn get_reviews<B>(
    State(state): State<ProxyAppState<B>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    forward_by_id(
        &state,
        Method::GET,
        "reviews",
        &id,
        query,
        headers,
        ForwardBody::empty(),
    )
    .await
}

/// GET /api/contributions/{id}
pub async fn get_contributions<B>(
    State(state): State<ProxyAppState<B>>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    forward_by_id(
        &state,
        Method::GET,
        "contributions",
        &id,
        query,
        headers,
        ForwardBody::empty(),
    )
    .await
}

/// POST /api/boost
pub async fn create_boost<B>(
    State(state): State<ProxyAppState<B>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let body = stream_body(&headers, body, state.config.max_body_bytes)?;
    let request = ForwardRequest::new(Method::POST, BackendPath::fixed("boost"))
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers))
        .with_body(body);

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

/// GET /api/boosted
pub async fn list_boosted<B>(
    State(state): State<ProxyAppState<B>>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let request = ForwardRequest::new(Method::GET, BackendPath::fixed("boosted"))
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers));

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

/// POST /api/admin/feature
pub async fn admin_feature<B>(
    State(state): State<ProxyAppState<B>>,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    forward_admin_action(&state, "admin/feature", headers, body).await
}

/// POST /api/admin/hide
pub async fn admin_hide<B>(
    State(state): State<ProxyAppState<B>>,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    forward_admin_action(&state, "admin/hide", headers, body).await
}

/// GET /api/admin/verify
pub async fn admin_verify<B>(
    State(state): State<ProxyAppState<B>>,
    headers: HeaderMap,
) -> ProxyResult<Json<VerifyResponse>>
where
    B: Backend + Send + Sync + 'static,
{
    if !has_wallet_address(&headers) {
        return Err(ProxyError::NoWalletAddress);
    }

    let request = ForwardRequest::new(Method::GET, BackendPath::fixed("admin/verify"))
        .with_headers(select_forwarded_headers(&headers));

    let response = state
        .forward(request, FailurePolicy::Collapse(VERIFY_FAILURE))
        .await?;

    let data: VerifyBackendResponse = serde_json::from_slice(&response.body).map_err(|e| {
        tracing::warn!(error = %e, "Admin verify answer is not JSON");
        ProxyError::Collapsed(VERIFY_FAILURE)
    })?;

    Ok(Json(VerifyResponse {
        is_admin: data.is_admin,
    }))
}

/// ANY /api/{*path}
pub async fn passthrough<B>(
    State(state): State<ProxyAppState<B>>,
    method: Method,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let path = BackendPath::parse(&path)?;
    let body = stream_body(&headers, body, state.config.max_body_bytes)?;

    let request = ForwardRequest::new(method, path)
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers))
        .with_body(body);

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

/// Fallback for fixed routes hit with an unsupported method
pub async fn method_not_allowed() -> ProxyError {
    ProxyError::MethodNotAllowed
}

async fn forward_by_id<B>(
    state: &ProxyAppState<B>,
    method: Method,
    route: &str,
    id: &str,
    query: Option<String>,
    headers: HeaderMap,
    body: ForwardBody,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let path = BackendPath::with_id(route, id)?;
    let request = ForwardRequest::new(method, path)
        .with_query(strip_internal_params(query.as_deref()))
        .with_headers(select_forwarded_headers(&headers))
        .with_body(body);

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

async fn forward_admin_action<B>(
    state: &ProxyAppState<B>,
    path: &str,
    headers: HeaderMap,
    body: Body,
) -> ProxyResult<Response>
where
    B: Backend + Send + Sync + 'static,
{
    let body = read_body(body, state.config.max_body_bytes).await?;

    let has_app_id = serde_json::from_slice::<AdminAppRequest>(&body)
        .map(|req| req.has_app_id())
        .unwrap_or(false);
    if !has_wallet_address(&headers) || !has_app_id {
        return Err(ProxyError::MissingParameters);
    }

    let mut forwarded = select_forwarded_headers(&headers);
    forwarded.insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );

    let request = ForwardRequest::new(Method::POST, BackendPath::fixed(path))
        .with_headers(forwarded)
        .with_body(body);

    let response = state.forward(request, FailurePolicy::Passthrough).await?;
    Ok(relay(response))
}

fn has_wallet_address(headers: &HeaderMap) -> bool {
    headers
        .get(&WALLET_ADDRESS)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.trim().is_empty())
}

/// Wrap the inbound body for streaming to the backend.
///
/// A declared length over `limit` is refused up front. Bodies without a
/// declared length are cut off by `Limited` once they pass `limit`.
fn stream_body(headers: &HeaderMap, body: Body, limit: usize) -> ProxyResult<ForwardBody> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let hinted = body.size_hint().lower();
    if declared.unwrap_or(0).max(hinted) > limit as u64 {
        tracing::debug!(?declared, hinted, limit, "Inbound body over limit");
        return Err(ProxyError::BodyTooLarge(limit));
    }
    if body.is_end_stream() {
        return Ok(ForwardBody::empty());
    }
    Ok(ForwardBody::Stream(Body::new(Limited::new(body, limit))))
}

/// Buffer an inbound body the proxy has to inspect, up to `limit` bytes
async fn read_body(body: Body, limit: usize) -> ProxyResult<Bytes> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            tracing::debug!(limit, "Inbound body over limit");
            Err(ProxyError::BodyTooLarge(limit))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read inbound body");
            Err(ProxyError::BodyRead(e.to_string()))
        }
    }
}

/// Relay a successful backend answer: status, content type, bytes
fn relay(response: BackendResponse) -> Response {
    let BackendResponse {
        status,
        content_type,
        body,
    } = response;

    let mut relayed = (status, body).into_response();
    match content_type {
        Some(value) => {
            relayed.headers_mut().insert(header::CONTENT_TYPE, value);
        }
        None => {
            relayed.headers_mut().remove(header::CONTENT_TYPE);
        }
    }
    relayed
}
