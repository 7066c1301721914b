//! Cross-layer tests for the proxy crate
//!
//! Routers are driven with `tower::ServiceExt::oneshot`. Forwarding tests run
//! against a fake backend bound to 127.0.0.1:0.

#[cfg(test)]
mod support {
    use crate::application::config::ProxyConfig;
    use crate::domain::backend::Backend;
    use crate::domain::entities::{BackendResponse, ForwardRequest};
    use crate::error::ProxyResult;
    use crate::infra::http::HttpBackend;
    use crate::presentation::handlers::ProxyAppState;
    use axum::Router;
    use axum::body::{Body, Bytes};
    use axum::extract::Request;
    use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
    use axum::response::{IntoResponse, Response};
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Backend double that records what reached it
    #[derive(Clone, Default)]
    pub struct RecordingBackend {
        pub seen: Arc<Mutex<Vec<ForwardRequest>>>,
    }

    impl RecordingBackend {
        pub fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl Backend for RecordingBackend {
        async fn send(&self, request: ForwardRequest) -> ProxyResult<BackendResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(BackendResponse {
                status: StatusCode::OK,
                content_type: Some(HeaderValue::from_static("application/json")),
                body: Bytes::from_static(b"{}"),
            })
        }
    }

    pub fn recording_state(config: ProxyConfig) -> (RecordingBackend, ProxyAppState<RecordingBackend>) {
        let backend = RecordingBackend::default();
        let state = ProxyAppState {
            backend: Arc::new(backend.clone()),
            config: Arc::new(config),
        };
        (backend, state)
    }

    /// What the fake backend received
    #[derive(Debug, Clone)]
    pub struct Seen {
        pub method: Method,
        pub path: String,
        pub query: Option<String>,
        pub headers: HeaderMap,
        pub body: Bytes,
    }

    pub type SeenLog = Arc<Mutex<Vec<Seen>>>;

    fn canned_response(method: &Method, path: &str) -> Response {
        match (method.as_str(), path) {
            ("GET", "/apps") => axum::Json(serde_json::json!({
                "apps": [
                    { "id": 1, "name": "Swapper", "tags": ["DeFi"], "featured": true },
                    { "id": 2, "name": "Pixels", "tags": ["NFT"], "featured": true },
                    { "id": 3, "name": "Lend", "tags": ["DeFi", "Lending"], "featured": true }
                ],
                "total": 3,
                "page": 1,
                "pageSize": 12,
                "pages": 1
            }))
            .into_response(),
            ("GET", "/config") => (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(serde_json::json!({ "message": "Service unavailable" })),
            )
                .into_response(),
            ("POST", "/review") => (
                StatusCode::BAD_REQUEST,
                axum::Json(serde_json::json!({ "error": "Invalid signature" })),
            )
                .into_response(),
            ("GET", "/admin/verify") => {
                axum::Json(serde_json::json!({ "isAdmin": true })).into_response()
            }
            ("GET", "/leaderboard") => (
                [(header::CONTENT_TYPE, "text/plain")],
                "plain leaderboard",
            )
                .into_response(),
            _ => (
                StatusCode::CREATED,
                axum::Json(serde_json::json!({ "ok": true })),
            )
                .into_response(),
        }
    }

    /// Start a fake backend and return its base URL and request log
    pub async fn spawn_fake_backend() -> (Url, SeenLog) {
        let log: SeenLog = Arc::default();
        let recorder = log.clone();

        let app = Router::new().fallback(move |req: Request| {
            let recorder = recorder.clone();
            async move {
                let (parts, body) = req.into_parts();
                let body = axum::body::to_bytes(body, usize::MAX)
                    .await
                    .unwrap_or_default();
                let path = parts.uri.path().to_string();
                let response = canned_response(&parts.method, &path);
                recorder.lock().unwrap().push(Seen {
                    method: parts.method,
                    path,
                    query: parts.uri.query().map(str::to_string),
                    headers: parts.headers,
                    body,
                });
                response
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (Url::parse(&format!("http://{addr}")).unwrap(), log)
    }

    /// Base URL nothing listens on
    pub async fn unreachable_url() -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        Url::parse(&format!("http://{addr}")).unwrap()
    }

    pub fn http_state(url: Url) -> ProxyAppState<HttpBackend> {
        let config = ProxyConfig::new(url).with_timeout(std::time::Duration::from_secs(5));
        let backend = HttpBackend::new(&config).unwrap();
        ProxyAppState::new(backend, config)
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Body chunks of ten bytes each, with no length known up front
    pub fn chunks(
        count: usize,
    ) -> impl futures_util::Stream<Item = Result<Bytes, std::io::Error>> + Send + 'static {
        futures_util::stream::iter((0..count).map(|_| Ok(Bytes::from_static(b"0123456789"))))
    }

    pub fn get(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }
}

#[cfg(test)]
mod validation_tests {
    use super::support::*;
    use crate::application::config::ProxyConfig;
    use crate::domain::entities::ForwardBody;
    use crate::infra::http::body_failure;
    use crate::presentation::router::{admin_routes, proxy_router};
    use axum::body::{Body, Bytes};
    use axum::extract::Request;
    use axum::http::{Method, StatusCode, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_invalid_app_id_never_reaches_backend() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        for uri in ["/apps/abc", "/apps/-1", "/reviews/1x", "/contributions/%201"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                body_json(response).await,
                serde_json::json!({ "message": "Invalid app ID" })
            );
        }

        let response = app.clone().oneshot(get("/reviews")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_app_id_is_forwarded() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        let response = app.oneshot(get("/apps/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].path.to_string(), "/apps/42");
        assert_eq!(seen[0].method, Method::GET);
    }

    #[tokio::test]
    async fn test_unsupported_method_on_fixed_route() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        let request = Request::builder()
            .method(Method::DELETE)
            .uri("/config")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Method not allowed" })
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri("/reviews/3")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_catch_all_refuses_admin_paths() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/admin/hide")
            .body(Body::from(r#"{"appId":1}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_body_over_limit_is_rejected() {
        let (backend, state) = recording_state(ProxyConfig::default().with_max_body_bytes(8));
        let app = proxy_router(state);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/boost")
            .body(Body::from(vec![b'x'; 64]))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_declared_length_over_limit_is_rejected() {
        let (backend, state) = recording_state(ProxyConfig::default().with_max_body_bytes(8));
        let app = proxy_router(state);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/apps")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
            .header(header::CONTENT_LENGTH, "1048576")
            .body(Body::from_stream(chunks(1)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_is_streamed_and_cut_off_at_limit() {
        let (backend, state) = recording_state(ProxyConfig::default().with_max_body_bytes(16));
        let app = proxy_router(state);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/apps")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
            .body(Body::from_stream(chunks(4)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The handler hands the body over unread
        let forwarded = backend.seen.lock().unwrap().pop().unwrap();
        let body = match forwarded.body {
            ForwardBody::Stream(body) => body,
            other => panic!("expected a streamed body, got {other:?}"),
        };
        let err = body.collect().await.unwrap_err();
        let failure = body_failure(&err, 16).unwrap();
        assert_eq!(failure.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_broken_upload_is_bad_request() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        let broken = futures_util::stream::iter(vec![
            Ok(Bytes::from_static(b"--x\r\n")),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/apps/7")
            .body(Body::from_stream(broken))
            .unwrap();
        app.oneshot(request).await.unwrap();

        let forwarded = backend.seen.lock().unwrap().pop().unwrap();
        let body = match forwarded.body {
            ForwardBody::Stream(body) => body,
            other => panic!("expected a streamed body, got {other:?}"),
        };
        let err = body.collect().await.unwrap_err();
        let failure = body_failure(&err, ProxyConfig::default().max_body_bytes).unwrap();
        assert_eq!(failure.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_boost_routes_are_fixed() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = proxy_router(state);

        let response = app.clone().oneshot(get("/boost")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/boosted")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(backend.calls(), 0);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/boost")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"appId":1,"amount":"5"}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(get("/boosted?page=1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].path.to_string(), "/boost");
        assert_eq!(seen[1].method, Method::GET);
        assert_eq!(seen[1].path.to_string(), "/boosted");
        assert_eq!(seen[1].query.as_deref(), Some("page=1"));
    }

    #[tokio::test]
    async fn test_admin_action_requires_parameters() {
        let (backend, state) = recording_state(ProxyConfig::default());
        let app = admin_routes(state);

        // Wallet present, appId missing
        let request = Request::builder()
            .method(Method::POST)
            .uri("/admin/feature")
            .header("wallet-address", "0xabc")
            .body(Body::from(r#"{"featured":true}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Missing required parameters" })
        );

        // appId present, wallet missing
        let request = Request::builder()
            .method(Method::POST)
            .uri("/admin/hide")
            .body(Body::from(r#"{"appId":3}"#))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.clone().oneshot(get("/admin/verify")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "No wallet address provided" })
        );

        assert_eq!(backend.calls(), 0);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/admin/hide")
            .header("wallet-address", "0xabc")
            .body(Body::from(r#"{"appId":3}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].path.to_string(), "/admin/hide");
        assert_eq!(seen[0].headers.get("content-type").unwrap(), "application/json");
    }
}

#[cfg(test)]
mod forwarding_tests {
    use super::support::*;
    use crate::presentation::router::{admin_routes, proxy_router};
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::{Method, StatusCode, header};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_featured_listing_relayed() {
        let (url, log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let response = app
            .oneshot(get("/apps?featured=true&pageSize=12"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = body_json(response).await;
        assert_eq!(body["apps"].as_array().unwrap().len(), 3);
        assert_eq!(body["pages"], 1);

        let seen = log.lock().unwrap();
        assert_eq!(seen[0].path, "/apps");
        assert_eq!(seen[0].query.as_deref(), Some("featured=true&pageSize=12"));
    }

    #[tokio::test]
    async fn test_routing_key_is_stripped_from_query() {
        let (url, log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let response = app
            .oneshot(get("/leaderboard?path=leaderboard&limit=10&category=De%20Fi"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );

        let seen = log.lock().unwrap();
        assert_eq!(seen[0].path, "/leaderboard");
        assert_eq!(seen[0].query.as_deref(), Some("limit=10&category=De%20Fi"));
    }

    #[tokio::test]
    async fn test_config_failure_collapses_to_500() {
        let (url, _log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let response = app.oneshot(get("/config")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Failed to fetch configuration" })
        );
    }

    #[tokio::test]
    async fn test_backend_error_status_and_message_pass_through() {
        let (url, log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/review")
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Signature", "0xdeadbeef")
            .header(header::COOKIE, "session=secret")
            .body(Body::from(r#"{"appId":1,"rating":5}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Invalid signature" })
        );

        let seen = log.lock().unwrap();
        assert_eq!(seen[0].method, Method::POST);
        assert_eq!(seen[0].headers.get("x-signature").unwrap(), "0xdeadbeef");
        assert!(seen[0].headers.get(header::COOKIE).is_none());
        assert_eq!(&seen[0].body[..], br#"{"appId":1,"rating":5}"#);
    }

    #[tokio::test]
    async fn test_multipart_body_forwarded_verbatim() {
        let (url, log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let content_type = "multipart/form-data; boundary=hubboundary";
        let body = concat!(
            "--hubboundary\r\n",
            "Content-Disposition: form-data; name=\"appData\"\r\n\r\n",
            "{\"name\":\"Swapper\"}\r\n",
            "--hubboundary\r\n",
            "Content-Disposition: form-data; name=\"logo\"; filename=\"logo.png\"\r\n",
            "Content-Type: image/png\r\n\r\n",
            "\u{1}\u{2}PNG\r\n",
            "--hubboundary--\r\n"
        );

        let request = Request::builder()
            .method(Method::POST)
            .uri("/apps")
            .header(header::CONTENT_TYPE, content_type)
            .body(Body::from(body))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let seen = log.lock().unwrap();
        assert_eq!(seen[0].headers.get(header::CONTENT_TYPE).unwrap(), content_type);
        assert_eq!(&seen[0].body[..], body.as_bytes());
    }

    #[tokio::test]
    async fn test_streamed_upload_reaches_backend_whole() {
        let (url, log) = spawn_fake_backend().await;
        let app = proxy_router(http_state(url));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/apps")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
            .body(Body::from_stream(chunks(3)))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let seen = log.lock().unwrap();
        assert_eq!(&seen[0].body[..], "0123456789".repeat(3).as_bytes());
        assert_eq!(
            seen[0].headers.get(header::CONTENT_TYPE).unwrap(),
            "multipart/form-data; boundary=x"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_yields_generic_message() {
        let app = proxy_router(http_state(unreachable_url().await));

        let response = app.clone().oneshot(get("/boosted")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "An error occurred" })
        );

        let response = app.oneshot(get("/apps")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Failed to fetch apps data" })
        );
    }

    #[tokio::test]
    async fn test_admin_verify_relays_flag() {
        let (url, log) = spawn_fake_backend().await;
        let app = admin_routes(http_state(url));

        let request = Request::builder()
            .uri("/admin/verify")
            .header("wallet-address", "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "isAdmin": true })
        );

        let seen = log.lock().unwrap();
        assert_eq!(
            seen[0].headers.get("wallet-address").unwrap(),
            "0x7e5f4552091a69125d5dfcb7b8c2659029395bdf"
        );
    }

    #[tokio::test]
    async fn test_admin_verify_failure_is_fixed_message() {
        let app = admin_routes(http_state(unreachable_url().await));

        let request = Request::builder()
            .uri("/admin/verify")
            .header("wallet-address", "0xabc")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "message": "Failed to verify admin status" })
        );
    }
}
