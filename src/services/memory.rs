use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::models::{Actor, LikeEdge, MatchRecord, MatchStatus, PairKey};
use crate::services::directory::{ProfileProvider, ProviderError};
use crate::services::store::{
    EngagementStore, InsertOutcome, MatchWrite, RevokeOutcome, StoreError,
};

#[derive(Default)]
struct EngagementState {
    likes: HashMap<(String, String), LikeEdge>,
    matches: HashMap<PairKey, MatchRecord>,
}

/// In-process engagement store for tests and local development.
///
/// All state lives behind a single mutex, so create-or-fetch of a match
/// record happens under one lock acquisition and is atomic with respect to
/// concurrent likes from both sides.
#[derive(Default)]
pub struct MemoryEngagementStore {
    state: Mutex<EngagementState>,
}

impl MemoryEngagementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EngagementStore for MemoryEngagementStore {
    async fn insert_like(&self, from: &str, to: &str) -> Result<InsertOutcome, StoreError> {
        let mut state = self.state.lock().await;
        let key = (from.to_string(), to.to_string());
        if state.likes.contains_key(&key) {
            return Ok(InsertOutcome::Exists);
        }
        state.likes.insert(
            key,
            LikeEdge {
                from_actor: from.to_string(),
                to_actor: to.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(InsertOutcome::Inserted)
    }

    async fn remove_like(&self, from: &str, to: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        Ok(state.likes.remove(&(from.to_string(), to.to_string())).is_some())
    }

    async fn like_exists(&self, from: &str, to: &str) -> Result<bool, StoreError> {
        let state = self.state.lock().await;
        Ok(state.likes.contains_key(&(from.to_string(), to.to_string())))
    }

    async fn edges_between(&self, a: &str, b: &str) -> Result<(bool, bool), StoreError> {
        let state = self.state.lock().await;
        let forward = state.likes.contains_key(&(a.to_string(), b.to_string()));
        let reverse = state.likes.contains_key(&(b.to_string(), a.to_string()));
        Ok((forward, reverse))
    }

    async fn create_match_if_absent(&self, record: &MatchRecord) -> Result<MatchWrite, StoreError> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.matches.get(&record.pair_key) {
            return Ok(MatchWrite::Existing(existing.clone()));
        }
        state.matches.insert(record.pair_key.clone(), record.clone());
        Ok(MatchWrite::Created(record.clone()))
    }

    async fn get_match(&self, pair: &PairKey) -> Result<Option<MatchRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.matches.get(pair).cloned())
    }

    async fn revoke_match(&self, pair: &PairKey) -> Result<RevokeOutcome, StoreError> {
        let mut state = self.state.lock().await;
        match state.matches.get_mut(pair) {
            Some(record) if record.status == MatchStatus::Mutual => {
                record.status = MatchStatus::Revoked;
                Ok(RevokeOutcome::Revoked(record.clone()))
            }
            Some(record) => Ok(RevokeOutcome::AlreadyRevoked(record.clone())),
            None => Ok(RevokeOutcome::NotFound),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// In-memory profile provider for tests and local development
#[derive(Default)]
pub struct MemoryDirectory {
    actors: HashMap<String, Actor>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actors(actors: impl IntoIterator<Item = Actor>) -> Self {
        Self {
            actors: actors
                .into_iter()
                .map(|a| (a.actor_id.clone(), a))
                .collect(),
        }
    }

    pub fn insert(&mut self, actor: Actor) {
        self.actors.insert(actor.actor_id.clone(), actor);
    }
}

#[async_trait]
impl ProfileProvider for MemoryDirectory {
    async fn get_actor(&self, actor_id: &str) -> Result<Actor, ProviderError> {
        self.actors
            .get(actor_id)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(actor_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_like_is_idempotent() {
        let store = MemoryEngagementStore::new();

        assert_eq!(store.insert_like("a", "b").await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert_like("a", "b").await.unwrap(), InsertOutcome::Exists);
        assert!(store.like_exists("a", "b").await.unwrap());
        assert!(!store.like_exists("b", "a").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_match_if_absent_single_winner() {
        let store = MemoryEngagementStore::new();
        let record = MatchRecord::mutual("a", "b");

        let first = store.create_match_if_absent(&record).await.unwrap();
        assert!(matches!(first, MatchWrite::Created(_)));

        let second = store.create_match_if_absent(&record).await.unwrap();
        assert!(matches!(second, MatchWrite::Existing(_)));
    }

    #[tokio::test]
    async fn test_revoke_match_transitions_once() {
        let store = MemoryEngagementStore::new();
        let record = MatchRecord::mutual("a", "b");
        store.create_match_if_absent(&record).await.unwrap();

        let first = store.revoke_match(&record.pair_key).await.unwrap();
        assert!(matches!(first, RevokeOutcome::Revoked(_)));

        let second = store.revoke_match(&record.pair_key).await.unwrap();
        assert!(matches!(second, RevokeOutcome::AlreadyRevoked(_)));

        let missing = store.revoke_match(&PairKey::for_pair("x", "y")).await.unwrap();
        assert!(matches!(missing, RevokeOutcome::NotFound));
    }
}
