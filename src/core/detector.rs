use std::sync::Arc;

use crate::error::EngineError;
use crate::models::{EngineEvent, MatchRecord, MatchStatus, PairKey};
use crate::services::events::EventSink;
use crate::services::store::{with_retries, EngagementStore, MatchWrite, StoreError};

/// Result of a reciprocity check after a like has been durably recorded
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    NoMatch,
    MatchCreated(MatchRecord),
    AlreadyMatched(MatchRecord),
}

/// Detects reciprocal likes and creates exactly one match record per pair.
///
/// Creation is serialized per pair key by the store's atomic
/// create-or-fetch; the detector's only job on a lost race is to return
/// the winner's record, so concurrent likes from both sides always yield
/// one MatchRecord and one MatchCreated event.
pub struct MatchDetector {
    store: Arc<dyn EngagementStore>,
    events: Arc<dyn EventSink>,
}

impl MatchDetector {
    pub fn new(store: Arc<dyn EngagementStore>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    /// Check whether `LikeEdge(to, from)` already exists and, if so, create
    /// the pair's match record unless one exists. Idempotent: an existing
    /// record is returned without side effects.
    pub async fn check_reciprocity(
        &self,
        from: &str,
        to: &str,
    ) -> Result<MatchOutcome, EngineError> {
        let reverse = with_retries(|| self.store.like_exists(to, from))
            .await
            .map_err(EngineError::from_store)?;

        if !reverse {
            return Ok(MatchOutcome::NoMatch);
        }

        let pair = PairKey::for_pair(from, to);

        if let Some(existing) = with_retries(|| self.store.get_match(&pair))
            .await
            .map_err(EngineError::from_store)?
        {
            // At most one record per pair, whatever its status.
            return Ok(MatchOutcome::AlreadyMatched(existing));
        }

        let record = MatchRecord::mutual(from, to);
        let write = self.create_or_fetch(&record).await?;

        match write {
            MatchWrite::Created(created) => {
                tracing::info!(
                    "Mutual match created for pair {} ({} <-> {})",
                    created.pair_key,
                    created.actor_a,
                    created.actor_b
                );
                self.events.notify(EngineEvent::MatchCreated {
                    pair_key: created.pair_key.clone(),
                    actor_a: created.actor_a.clone(),
                    actor_b: created.actor_b.clone(),
                });
                Ok(MatchOutcome::MatchCreated(created))
            }
            MatchWrite::Existing(existing) => Ok(MatchOutcome::AlreadyMatched(existing)),
        }
    }

    /// Atomic create-or-fetch with a single local retry for the window where
    /// a concurrent winner's row is not yet visible. Conflicts never reach
    /// the caller; they observe `AlreadyMatched` instead.
    async fn create_or_fetch(&self, record: &MatchRecord) -> Result<MatchWrite, EngineError> {
        match with_retries(|| self.store.create_match_if_absent(record)).await {
            Ok(write) => Ok(write),
            Err(StoreError::Conflict) => with_retries(|| self.store.create_match_if_absent(record))
                .await
                .map_err(EngineError::from_store),
            Err(other) => Err(EngineError::from_store(other)),
        }
    }
}

/// Convenience for callers inspecting an outcome
impl MatchOutcome {
    pub fn record(&self) -> Option<&MatchRecord> {
        match self {
            MatchOutcome::NoMatch => None,
            MatchOutcome::MatchCreated(r) | MatchOutcome::AlreadyMatched(r) => Some(r),
        }
    }

    pub fn is_mutual(&self) -> bool {
        self.record()
            .map(|r| r.status == MatchStatus::Mutual)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::events::RecordingSink;
    use crate::services::memory::MemoryEngagementStore;
    use crate::services::store::InsertOutcome;

    fn detector() -> (MatchDetector, Arc<MemoryEngagementStore>, Arc<RecordingSink>) {
        let store = Arc::new(MemoryEngagementStore::new());
        let sink = Arc::new(RecordingSink::new());
        let detector = MatchDetector::new(store.clone(), sink.clone());
        (detector, store, sink)
    }

    #[tokio::test]
    async fn test_no_match_without_reverse_edge() {
        let (detector, store, sink) = detector();
        store.insert_like("a", "b").await.unwrap();

        let outcome = detector.check_reciprocity("a", "b").await.unwrap();
        assert!(matches!(outcome, MatchOutcome::NoMatch));
        assert_eq!(sink.count_matches_created(), 0);
    }

    #[tokio::test]
    async fn test_reciprocal_edges_create_one_match() {
        let (detector, store, sink) = detector();
        store.insert_like("a", "b").await.unwrap();
        store.insert_like("b", "a").await.unwrap();

        let outcome = detector.check_reciprocity("b", "a").await.unwrap();
        assert!(matches!(outcome, MatchOutcome::MatchCreated(_)));

        // Second check is idempotent: same record, no second event
        let again = detector.check_reciprocity("a", "b").await.unwrap();
        match again {
            MatchOutcome::AlreadyMatched(record) => {
                assert_eq!(record.pair_key, PairKey::for_pair("a", "b"));
            }
            other => panic!("expected AlreadyMatched, got {:?}", other),
        }
        assert_eq!(sink.count_matches_created(), 1);
    }

    #[tokio::test]
    async fn test_insert_then_detect_flow() {
        let (detector, store, sink) = detector();

        assert_eq!(store.insert_like("cand-1", "emp-1").await.unwrap(), InsertOutcome::Inserted);
        let first = detector.check_reciprocity("cand-1", "emp-1").await.unwrap();
        assert!(matches!(first, MatchOutcome::NoMatch));

        assert_eq!(store.insert_like("emp-1", "cand-1").await.unwrap(), InsertOutcome::Inserted);
        let second = detector.check_reciprocity("emp-1", "cand-1").await.unwrap();
        assert!(second.is_mutual());
        assert_eq!(sink.count_matches_created(), 1);
    }
}
