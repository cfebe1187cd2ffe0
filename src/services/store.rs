use async_trait::async_trait;
use std::future::Future;
use thiserror::Error;

use crate::models::{MatchRecord, PairKey};

/// Errors surfaced by an engagement store backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// Retryable failure (I/O, pool timeout, connection reset)
    #[error("transient store failure: {0}")]
    Transient(String),

    /// Non-retryable failure
    #[error("store failure: {0}")]
    Permanent(String),

    /// Lost a create race and the winning row was not yet visible.
    /// Recovered internally by the match detector; never surfaced.
    #[error("concurrent write conflict")]
    Conflict,
}

impl StoreError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Transient(_))
    }
}

/// Outcome of an idempotent like-edge insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Exists,
}

/// Outcome of the atomic create-or-fetch on a pair key
#[derive(Debug, Clone)]
pub enum MatchWrite {
    Created(MatchRecord),
    Existing(MatchRecord),
}

/// Outcome of revoking a match record
#[derive(Debug, Clone)]
pub enum RevokeOutcome {
    Revoked(MatchRecord),
    AlreadyRevoked(MatchRecord),
    NotFound,
}

/// The engine's only mutable shared resource: like edges and match records.
///
/// Injected into LikeRegistry / MatchDetector / DisclosurePolicy, which are
/// the sole mutators. Every write is a single atomic operation so a timed-out
/// request leaves no partial state.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    /// Insert a directed like edge; a duplicate insert is a no-op
    async fn insert_like(&self, from: &str, to: &str) -> Result<InsertOutcome, StoreError>;

    /// Remove a directed like edge, returning whether it existed
    async fn remove_like(&self, from: &str, to: &str) -> Result<bool, StoreError>;

    /// Whether the directed edge from → to exists
    async fn like_exists(&self, from: &str, to: &str) -> Result<bool, StoreError>;

    /// Existence of the two directed edges between a and b, as (a→b, b→a)
    async fn edges_between(&self, a: &str, b: &str) -> Result<(bool, bool), StoreError>;

    /// Atomically create the match record unless one already exists for the
    /// pair key; exactly one concurrent caller observes `Created`
    async fn create_match_if_absent(&self, record: &MatchRecord) -> Result<MatchWrite, StoreError>;

    /// Fetch the match record for a pair, if any
    async fn get_match(&self, pair: &PairKey) -> Result<Option<MatchRecord>, StoreError>;

    /// Flip a mutual match to revoked; already-revoked records are untouched
    async fn revoke_match(&self, pair: &PairKey) -> Result<RevokeOutcome, StoreError>;

    /// Backend liveness probe
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Attempt budget for transient store failures
pub const STORE_ATTEMPTS: u32 = 3;

/// Bounded retry of transient store failures at the registry boundary.
///
/// Each attempt is a single atomic store call, so retrying cannot commit
/// partial state. Exhausting the budget surfaces the last transient error,
/// which callers map onto `Unavailable`.
pub async fn with_retries<T, F, Fut>(mut op: F) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(e) if e.is_transient() && attempt < STORE_ATTEMPTS => {
                tracing::warn!("transient store failure (attempt {}/{}): {}", attempt, STORE_ATTEMPTS, e);
                attempt += 1;
            }
            other => return other,
        }
    }
}
