//! In-memory Challenge Store
//!
//! Challenges live for minutes and are consumed once, so a mutex-guarded map
//! is enough. Expired entries are swept on every insert.

use crate::domain::entities::AdminChallenge;
use crate::domain::repository::ChallengeRepository;
use crate::error::AdminResult;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct InMemoryChallengeRepository {
    challenges: Arc<Mutex<HashMap<Uuid, AdminChallenge>>>,
}

impl InMemoryChallengeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.challenges.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.challenges.lock().await.is_empty()
    }
}

impl ChallengeRepository for InMemoryChallengeRepository {
    async fn create(&self, challenge: &AdminChallenge) -> AdminResult<()> {
        let now_ms = Utc::now().timestamp_millis();
        let mut challenges = self.challenges.lock().await;
        challenges.retain(|_, c| !c.is_expired_at(now_ms));
        challenges.insert(challenge.id, challenge.clone());
        Ok(())
    }

    async fn consume(&self, challenge_id: Uuid) -> AdminResult<Option<AdminChallenge>> {
        Ok(self.challenges.lock().await.remove(&challenge_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::AdminAddress;

    fn address() -> AdminAddress {
        AdminAddress::parse("0x7e5f4552091a69125d5dfcb7b8c2659029395bdf").unwrap()
    }

    #[tokio::test]
    async fn test_consume_is_single_use() {
        let repo = InMemoryChallengeRepository::new();
        let challenge = AdminChallenge::new(address(), "aa", 60_000);
        repo.create(&challenge).await.unwrap();

        let first = repo.consume(challenge.id).await.unwrap();
        assert_eq!(first.map(|c| c.id), Some(challenge.id));
        assert!(repo.consume(challenge.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_sweeps_expired() {
        let repo = InMemoryChallengeRepository::new();
        let mut stale = AdminChallenge::new(address(), "aa", 60_000);
        stale.expires_at_ms = 0;
        repo.create(&stale).await.unwrap();
        assert_eq!(repo.len().await, 1);

        let fresh = AdminChallenge::new(address(), "bb", 60_000);
        repo.create(&fresh).await.unwrap();
        assert_eq!(repo.len().await, 1);
        assert!(repo.consume(stale.id).await.unwrap().is_none());
    }
}
