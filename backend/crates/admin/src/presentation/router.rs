//! Admin Router

use crate::domain::repository::ChallengeRepository;
use crate::presentation::handlers::{self, AdminAppState};
use crate::presentation::middleware::require_admin_signature;
use axum::{Router, middleware, routing::get};
use platform::rate_limit::RateLimitStore;

/// Challenge issuance endpoint, relative to the API root
pub fn admin_router<C, L>(state: AdminAppState<C, L>) -> Router
where
    C: ChallengeRepository + Clone + Send + Sync + 'static,
    L: RateLimitStore + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/admin/challenge", get(handlers::issue_challenge::<C, L>))
        .with_state(state)
}

/// Put every route of `routes` behind the admin signature gate
pub fn protect<C, L>(routes: Router, state: AdminAppState<C, L>) -> Router
where
    C: ChallengeRepository + Clone + Send + Sync + 'static,
    L: RateLimitStore + Clone + Send + Sync + 'static,
{
    routes.route_layer(middleware::from_fn_with_state(
        state,
        require_admin_signature::<C, L>,
    ))
}
