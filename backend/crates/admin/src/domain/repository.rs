//! Repository Traits

use crate::domain::entities::AdminChallenge;
use crate::error::AdminResult;
use uuid::Uuid;

/// Challenge repository trait
#[trait_variant::make(ChallengeRepository: Send)]
pub trait LocalChallengeRepository {
    /// Store a freshly issued challenge
    async fn create(&self, challenge: &AdminChallenge) -> AdminResult<()>;

    /// Remove and return a challenge; a second call for the same id yields `None`
    async fn consume(&self, challenge_id: Uuid) -> AdminResult<Option<AdminChallenge>>;
}
