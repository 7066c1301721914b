//! Admin Gate Middleware

use crate::application::verify_signature::{VerifySignatureInput, VerifySignatureUseCase};
use crate::domain::repository::ChallengeRepository;
use crate::domain::value_objects::{WALLET_ADDRESS, X_ADMIN_CHALLENGE, X_ADMIN_SIGNATURE};
use crate::error::{AdminError, AdminResult};
use crate::presentation::handlers::AdminAppState;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use platform::rate_limit::RateLimitStore;

/// Middleware that requires a fresh signed admin challenge.
///
/// On success the request continues with `wallet-address` set to the
/// verified (lowercased) address and the challenge headers removed.
pub async fn require_admin_signature<C, L>(
    State(state): State<AdminAppState<C, L>>,
    mut req: Request,
    next: Next,
) -> AdminResult<Response>
where
    C: ChallengeRepository + Send + Sync + 'static,
    L: RateLimitStore + Send + Sync + 'static,
{
    let headers = req.headers();
    let address = header_str(headers, &WALLET_ADDRESS).ok_or(AdminError::NoWalletAddress)?;
    let challenge_id = header_str(headers, &X_ADMIN_CHALLENGE).ok_or(AdminError::ChallengeRequired)?;
    let signature = header_str(headers, &X_ADMIN_SIGNATURE).ok_or(AdminError::ChallengeRequired)?;

    let input = VerifySignatureInput {
        address,
        challenge_id,
        signature,
    };
    let verified = VerifySignatureUseCase::new(state.repo.clone())
        .execute(input)
        .await?;

    let verified = HeaderValue::from_str(verified.as_str())
        .map_err(|e| AdminError::Internal(e.to_string()))?;

    let headers = req.headers_mut();
    headers.insert(WALLET_ADDRESS, verified);
    headers.remove(X_ADMIN_CHALLENGE);
    headers.remove(X_ADMIN_SIGNATURE);

    Ok(next.run(req).await)
}

fn header_str(headers: &HeaderMap, name: &HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
