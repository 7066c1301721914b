//! HTTP Handlers

use crate::application::config::AdminConfig;
use crate::application::issue_challenge::IssueChallengeUseCase;
use crate::domain::repository::ChallengeRepository;
use crate::error::{AdminError, AdminResult};
use crate::presentation::dto::{ChallengeQuery, ChallengeResponse};
use axum::Json;
use axum::extract::{ConnectInfo, Query, Request, State};
use platform::client::{client_key, extract_client_ip};
use platform::rate_limit::RateLimitStore;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for the challenge endpoint and the gate
#[derive(Clone)]
pub struct AdminAppState<C, L>
where
    C: ChallengeRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    pub repo: Arc<C>,
    pub rate_limit: Arc<L>,
    pub config: Arc<AdminConfig>,
}

impl<C, L> AdminAppState<C, L>
where
    C: ChallengeRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    pub fn new(repo: C, rate_limit: L, config: AdminConfig) -> Self {
        Self {
            repo: Arc::new(repo),
            rate_limit: Arc::new(rate_limit),
            config: Arc::new(config),
        }
    }
}

/// GET /api/admin/challenge?address=0x...
pub async fn issue_challenge<C, L>(
    State(state): State<AdminAppState<C, L>>,
    req: Request,
) -> AdminResult<Json<ChallengeResponse>>
where
    C: ChallengeRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let direct_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip());
    let client = client_key(extract_client_ip(
        req.headers(),
        direct_ip,
        &state.config.trusted_proxies,
    ));

    let address = Query::<ChallengeQuery>::try_from_uri(req.uri())
        .ok()
        .and_then(|Query(query)| query.address)
        .filter(|address| !address.trim().is_empty())
        .ok_or(AdminError::NoWalletAddress)?;

    let use_case = IssueChallengeUseCase::new(
        state.repo.clone(),
        state.rate_limit.clone(),
        state.config.clone(),
    );
    let output = use_case.execute(&address, &client).await?;

    Ok(Json(ChallengeResponse {
        challenge_id: output.challenge_id,
        message: output.message,
        expires_at_ms: output.expires_at_ms,
    }))
}
