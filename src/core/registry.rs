use std::sync::Arc;

use crate::core::detector::{MatchDetector, MatchOutcome};
use crate::error::EngineError;
use crate::models::{EngineEvent, MatchStatus, PairKey};
use crate::services::directory::ProfileProvider;
use crate::services::events::EventSink;
use crate::services::store::{with_retries, EngagementStore, InsertOutcome};

/// Outcome of a like call, surfaced to the caller in the same response
#[derive(Debug)]
pub struct LikeResult {
    pub already_liked: bool,
    pub match_outcome: MatchOutcome,
}

/// Records directional likes and withdraws them prior to a match.
///
/// The registry is the single entry point for engagement writes: it
/// validates input, resolves both actors through the profile provider,
/// writes the edge idempotently, and synchronously asks the match detector
/// about reciprocity so the caller observes the resulting match state.
pub struct LikeRegistry {
    store: Arc<dyn EngagementStore>,
    provider: Arc<dyn ProfileProvider>,
    events: Arc<dyn EventSink>,
    detector: MatchDetector,
}

impl LikeRegistry {
    pub fn new(
        store: Arc<dyn EngagementStore>,
        provider: Arc<dyn ProfileProvider>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let detector = MatchDetector::new(store.clone(), events.clone());
        Self {
            store,
            provider,
            events,
            detector,
        }
    }

    /// Record a like from one actor toward another.
    ///
    /// Idempotent: a repeated like performs no writes and fires no events,
    /// but still reports the pair's current match state. A like on a
    /// revoked pair is forbidden; revocation is terminal.
    pub async fn like(&self, from: &str, to: &str) -> Result<LikeResult, EngineError> {
        validate_actor_id(from)?;
        validate_actor_id(to)?;
        if from == to {
            return Err(EngineError::Validation(
                "an actor cannot like itself".to_string(),
            ));
        }

        // Both actors must resolve before any side effect.
        self.provider
            .get_actor(from)
            .await
            .map_err(EngineError::from_provider)?;
        self.provider
            .get_actor(to)
            .await
            .map_err(EngineError::from_provider)?;

        let pair = PairKey::for_pair(from, to);
        if let Some(record) = with_retries(|| self.store.get_match(&pair))
            .await
            .map_err(EngineError::from_store)?
        {
            if record.status == MatchStatus::Revoked {
                return Err(EngineError::Forbidden(format!(
                    "pair {} was unmatched and cannot re-match",
                    pair
                )));
            }
        }

        let inserted = with_retries(|| self.store.insert_like(from, to))
            .await
            .map_err(EngineError::from_store)?;

        match inserted {
            InsertOutcome::Inserted => {
                tracing::info!(from = %from, to = %to, "like recorded");
                self.events.notify(EngineEvent::LikeRecorded {
                    from: from.to_string(),
                    to: to.to_string(),
                });

                let match_outcome = self.detector.check_reciprocity(from, to).await?;
                Ok(LikeResult {
                    already_liked: false,
                    match_outcome,
                })
            }
            InsertOutcome::Exists => {
                // No new edge, no events; report current pair state only.
                let match_outcome = match with_retries(|| self.store.get_match(&pair))
                    .await
                    .map_err(EngineError::from_store)?
                {
                    Some(record) if record.status == MatchStatus::Mutual => {
                        MatchOutcome::AlreadyMatched(record)
                    }
                    _ => MatchOutcome::NoMatch,
                };
                Ok(LikeResult {
                    already_liked: true,
                    match_outcome,
                })
            }
        }
    }

    /// Withdraw a like before a match exists.
    ///
    /// Forbidden once the pair is mutual: withdrawal must go through an
    /// explicit unmatch so disclosure never reverts without an auditable
    /// transition.
    pub async fn unlike(&self, from: &str, to: &str) -> Result<(), EngineError> {
        validate_actor_id(from)?;
        validate_actor_id(to)?;
        if from == to {
            return Err(EngineError::Validation(
                "an actor cannot unlike itself".to_string(),
            ));
        }

        let pair = PairKey::for_pair(from, to);
        if let Some(record) = with_retries(|| self.store.get_match(&pair))
            .await
            .map_err(EngineError::from_store)?
        {
            if record.status == MatchStatus::Mutual {
                return Err(EngineError::Forbidden(format!(
                    "pair {} is matched; use unmatch to withdraw",
                    pair
                )));
            }
        }

        let removed = with_retries(|| self.store.remove_like(from, to))
            .await
            .map_err(EngineError::from_store)?;

        if !removed {
            return Err(EngineError::NotFound(format!(
                "no like from {} to {}",
                from, to
            )));
        }

        tracing::info!(from = %from, to = %to, "like withdrawn");
        Ok(())
    }
}

fn validate_actor_id(id: &str) -> Result<(), EngineError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation("actor id must not be empty".to_string()));
    }
    if trimmed.contains(':') {
        // ':' is reserved as the pair-key separator
        return Err(EngineError::Validation(format!(
            "actor id '{}' contains a reserved character",
            id
        )));
    }
    Ok(())
}
