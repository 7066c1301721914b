//! Issue Challenge Use Case

use crate::application::config::AdminConfig;
use crate::domain::entities::AdminChallenge;
use crate::domain::repository::ChallengeRepository;
use crate::domain::value_objects::AdminAddress;
use crate::error::{AdminError, AdminResult};
use platform::crypto::random_bytes;
use platform::rate_limit::RateLimitStore;
use std::sync::Arc;

/// Output DTO for issue challenge
#[derive(Debug, Clone)]
pub struct IssueChallengeOutput {
    pub challenge_id: uuid::Uuid,
    pub message: String,
    pub expires_at_ms: i64,
}

pub struct IssueChallengeUseCase<C, L>
where
    C: ChallengeRepository,
    L: RateLimitStore,
{
    challenge_repo: Arc<C>,
    rate_limit: Arc<L>,
    config: Arc<AdminConfig>,
}

impl<C, L> IssueChallengeUseCase<C, L>
where
    C: ChallengeRepository,
    L: RateLimitStore,
{
    pub fn new(challenge_repo: Arc<C>, rate_limit: Arc<L>, config: Arc<AdminConfig>) -> Self {
        Self {
            challenge_repo,
            rate_limit,
            config,
        }
    }

    /// `client_key` identifies the caller for rate limiting (usually its IP)
    pub async fn execute(&self, address: &str, client_key: &str) -> AdminResult<IssueChallengeOutput> {
        let verdict = self
            .rate_limit
            .check_and_increment(client_key, &self.config.rate_limit)
            .await;
        if !verdict.allowed {
            return Err(AdminError::RateLimitExceeded);
        }

        let address = AdminAddress::parse(address)?;
        let nonce = hex::encode(random_bytes(self.config.nonce_len));
        let challenge = AdminChallenge::new(address, &nonce, self.config.challenge_ttl_ms());

        self.challenge_repo.create(&challenge).await?;

        tracing::info!(
            challenge_id = %challenge.id,
            address = %challenge.address,
            "Issued admin challenge"
        );

        Ok(IssueChallengeOutput {
            challenge_id: challenge.id,
            message: challenge.message,
            expires_at_ms: challenge.expires_at_ms,
        })
    }
}
