use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

use crate::models::{MatchRecord, MatchStatus, PairKey};
use crate::services::store::{
    EngagementStore, InsertOutcome, MatchWrite, RevokeOutcome, StoreError,
};

/// PostgreSQL-backed engagement store.
///
/// Idempotence and single-writer-wins semantics come from unique
/// constraints: `(from_actor, to_actor)` on like edges and `pair_key` on
/// match records, with `INSERT ... ON CONFLICT DO NOTHING` as the
/// compare-and-swap primitive.
pub struct PgEngagementStore {
    pool: PgPool,
}

impl PgEngagementStore {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .map_err(map_sqlx)?;

        // Run migrations on startup
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Permanent(format!("migration failed: {}", e)))?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");
        Self::new(url, max_connections.unwrap_or(10), min_connections.unwrap_or(1)).await
    }

    fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<MatchRecord, StoreError> {
        let pair_key: String = row.get("pair_key");
        let status: String = row.get("status");
        let created_at: DateTime<Utc> = row.get("created_at");

        let status = match status.as_str() {
            "mutual" => MatchStatus::Mutual,
            "revoked" => MatchStatus::Revoked,
            other => {
                return Err(StoreError::Permanent(format!(
                    "unknown match status '{}' for pair {}",
                    other, pair_key
                )))
            }
        };

        let pair_key = PairKey::parse(&pair_key)
            .ok_or_else(|| StoreError::Permanent(format!("malformed pair key '{}'", pair_key)))?;

        Ok(MatchRecord {
            pair_key,
            actor_a: row.get("actor_a"),
            actor_b: row.get("actor_b"),
            created_at,
            status,
        })
    }
}

fn map_sqlx(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreError::Transient(e.to_string()),
        other => StoreError::Permanent(other.to_string()),
    }
}

#[async_trait]
impl EngagementStore for PgEngagementStore {
    async fn insert_like(&self, from: &str, to: &str) -> Result<InsertOutcome, StoreError> {
        let query = r#"
            INSERT INTO like_edges (from_actor, to_actor, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (from_actor, to_actor) DO NOTHING
        "#;

        let result = sqlx::query(query)
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() > 0 {
            tracing::debug!("Recorded like edge: {} -> {}", from, to);
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::Exists)
        }
    }

    async fn remove_like(&self, from: &str, to: &str) -> Result<bool, StoreError> {
        let query = r#"
            DELETE FROM like_edges
            WHERE from_actor = $1 AND to_actor = $2
        "#;

        let result = sqlx::query(query)
            .bind(from)
            .bind(to)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    async fn like_exists(&self, from: &str, to: &str) -> Result<bool, StoreError> {
        let query = r#"
            SELECT 1 AS present FROM like_edges
            WHERE from_actor = $1 AND to_actor = $2
        "#;

        let row = sqlx::query(query)
            .bind(from)
            .bind(to)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        Ok(row.is_some())
    }

    async fn edges_between(&self, a: &str, b: &str) -> Result<(bool, bool), StoreError> {
        let query = r#"
            SELECT from_actor FROM like_edges
            WHERE (from_actor = $1 AND to_actor = $2)
               OR (from_actor = $2 AND to_actor = $1)
        "#;

        let rows = sqlx::query(query)
            .bind(a)
            .bind(b)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;

        let mut forward = false;
        let mut reverse = false;
        for row in &rows {
            let from: String = row.get("from_actor");
            if from == a {
                forward = true;
            } else {
                reverse = true;
            }
        }

        Ok((forward, reverse))
    }

    async fn create_match_if_absent(&self, record: &MatchRecord) -> Result<MatchWrite, StoreError> {
        let insert = r#"
            INSERT INTO match_records (pair_key, actor_a, actor_b, status, created_at)
            VALUES ($1, $2, $3, 'mutual', $4)
            ON CONFLICT (pair_key) DO NOTHING
        "#;

        let result = sqlx::query(insert)
            .bind(record.pair_key.as_str())
            .bind(&record.actor_a)
            .bind(&record.actor_b)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if result.rows_affected() > 0 {
            tracing::debug!("Created match record for pair {}", record.pair_key);
            return Ok(MatchWrite::Created(record.clone()));
        }

        // Lost the race: the winner's row must exist, fetch it.
        match self.get_match(&record.pair_key).await? {
            Some(existing) => Ok(MatchWrite::Existing(existing)),
            None => Err(StoreError::Conflict),
        }
    }

    async fn get_match(&self, pair: &PairKey) -> Result<Option<MatchRecord>, StoreError> {
        let query = r#"
            SELECT pair_key, actor_a, actor_b, status, created_at
            FROM match_records
            WHERE pair_key = $1
        "#;

        let row = sqlx::query(query)
            .bind(pair.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        row.as_ref().map(Self::record_from_row).transpose()
    }

    async fn revoke_match(&self, pair: &PairKey) -> Result<RevokeOutcome, StoreError> {
        let update = r#"
            UPDATE match_records
            SET status = 'revoked'
            WHERE pair_key = $1 AND status = 'mutual'
            RETURNING pair_key, actor_a, actor_b, status, created_at
        "#;

        let row = sqlx::query(update)
            .bind(pair.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx)?;

        if let Some(row) = row {
            return Ok(RevokeOutcome::Revoked(Self::record_from_row(&row)?));
        }

        // Nothing flipped: either absent or already revoked.
        match self.get_match(pair).await? {
            Some(existing) => Ok(RevokeOutcome::AlreadyRevoked(existing)),
            None => Ok(RevokeOutcome::NotFound),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_sqlx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_classification() {
        assert!(map_sqlx(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!map_sqlx(sqlx::Error::RowNotFound).is_transient());
    }
}
