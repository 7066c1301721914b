//! Verify Admin Signature Use Case

use crate::domain::repository::ChallengeRepository;
use crate::domain::services::verify_challenge;
use crate::domain::value_objects::AdminAddress;
use crate::error::{AdminError, AdminResult};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Input DTO, straight from the request headers
#[derive(Debug, Clone)]
pub struct VerifySignatureInput {
    pub address: String,
    pub challenge_id: String,
    pub signature: String,
}

pub struct VerifySignatureUseCase<C>
where
    C: ChallengeRepository,
{
    challenge_repo: Arc<C>,
}

impl<C> VerifySignatureUseCase<C>
where
    C: ChallengeRepository,
{
    pub fn new(challenge_repo: Arc<C>) -> Self {
        Self { challenge_repo }
    }

    /// Consume the challenge and return the verified address.
    ///
    /// The challenge is gone afterwards whether or not verification passes.
    pub async fn execute(&self, input: VerifySignatureInput) -> AdminResult<AdminAddress> {
        let claimed = AdminAddress::parse(&input.address)?;
        let challenge_id =
            Uuid::parse_str(input.challenge_id.trim()).map_err(|_| AdminError::ChallengeNotFound)?;

        let challenge = self
            .challenge_repo
            .consume(challenge_id)
            .await?
            .ok_or(AdminError::ChallengeNotFound)?;

        verify_challenge(
            &challenge,
            &claimed,
            input.signature.trim(),
            Utc::now().timestamp_millis(),
        )?;

        tracing::info!(challenge_id = %challenge_id, address = %claimed, "Admin signature verified");
        Ok(claimed)
    }
}
