//! Proxy Router

use crate::domain::backend::Backend;
use crate::presentation::handlers::{self, ProxyAppState};
use axum::{
    Router,
    routing::{any, get, post},
};

/// Public proxied API: fixed routes plus the catch-all passthrough.
///
/// Admin routes are not included; mount [`admin_routes`] behind the admin
/// signature gate. The catch-all refuses `admin/...` paths.
pub fn proxy_router<B>(state: ProxyAppState<B>) -> Router
where
    B: Backend + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/config",
            get(handlers::get_config::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/apps",
            get(handlers::list_apps::<B>)
                .post(handlers::create_app::<B>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/apps/{id}",
            get(handlers::get_app::<B>)
                .put(handlers::update_app::<B>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/reviews/{id}",
            get(handlers::get_reviews::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/contributions/{id}",
            get(handlers::get_contributions::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/boost",
            post(handlers::create_boost::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/boosted",
            get(handlers::list_boosted::<B>).fallback(handlers::method_not_allowed),
        )
        .route("/{*path}", any(handlers::passthrough::<B>))
        .with_state(state)
}

/// Admin routes, relative to the API root
pub fn admin_routes<B>(state: ProxyAppState<B>) -> Router
where
    B: Backend + Clone + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/admin/feature",
            post(handlers::admin_feature::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/admin/hide",
            post(handlers::admin_hide::<B>).fallback(handlers::method_not_allowed),
        )
        .route(
            "/admin/verify",
            get(handlers::admin_verify::<B>).fallback(handlers::method_not_allowed),
        )
        .with_state(state)
}
