//! API Server Entry Point
//!
//! Serves the hub's proxy routes under `/api`, the admin challenge endpoint
//! and gate, and the static runtime config at `/config.json`.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod settings;

use admin::{AdminAppState, AdminConfig, InMemoryChallengeRepository, admin_router, protect};
use axum::{
    Router, http,
    http::{HeaderName, Method, header},
};
use platform::rate_limit::InMemoryRateLimitStore;
use proxy::{HttpBackend, ProxyAppState, ProxyConfig, admin_routes, proxy_router};
use settings::Settings;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,proxy=info,admin=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Proxy
    let proxy_config = ProxyConfig::new(settings.backend_url.clone())
        .with_timeout(settings.proxy_timeout)
        .with_max_body_bytes(settings.proxy_max_body_bytes);
    let backend = HttpBackend::new(&proxy_config)?;
    let proxy_state = ProxyAppState::new(backend, proxy_config);

    tracing::info!(backend_url = %settings.backend_url, "Proxying to backend");

    // Admin gate
    let admin_config = AdminConfig::default()
        .with_challenge_ttl(settings.admin_challenge_ttl)
        .with_trusted_proxies(settings.trusted_proxies.iter().copied());
    let rate_limit_store = InMemoryRateLimitStore::new();
    spawn_rate_limit_pruning(rate_limit_store.clone(), admin_config.rate_limit.window);
    let admin_state = AdminAppState::new(
        InMemoryChallengeRepository::new(),
        rate_limit_store,
        admin_config,
    );

    if !settings.static_config.exists() {
        tracing::warn!(
            path = %settings.static_config.display(),
            "Static config file not found, /config.json will return 404"
        );
    }

    // CORS configuration
    let allowed_origins: Vec<http::HeaderValue> = settings
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-signature"),
            HeaderName::from_static("wallet-address"),
            HeaderName::from_static("x-admin-challenge"),
            HeaderName::from_static("x-admin-signature"),
        ]))
        .allow_credentials(true);

    // Admin routes are gated; the catch-all proxy refuses admin paths
    let api = proxy_router(proxy_state.clone())
        .merge(protect(admin_routes(proxy_state), admin_state.clone()))
        .merge(admin_router(admin_state));

    // Build router
    let app = Router::new()
        .nest("/api", api)
        .route_service("/config.json", ServeFile::new(&settings.static_config))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Drop finished rate-limit windows so idle clients do not accumulate
fn spawn_rate_limit_pruning(store: InMemoryRateLimitStore, window: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(window);
        loop {
            interval.tick().await;
            let pruned = store.prune(window).await;
            if pruned > 0 {
                tracing::debug!(pruned, "Pruned rate limit windows");
            }
        }
    });
}
