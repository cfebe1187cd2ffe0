use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::core::disclosure::project_profile;
use crate::core::{DisclosurePolicy, LikeRegistry, MatchOutcome, Scorer};
use crate::error::EngineError;
use crate::models::{
    Actor, HealthResponse, LikeRequest, LikeResponse, LikeStatus, MatchStatusView, PairKey,
    ProfileViewParams, RankedParams, RankedResponse, ScoreParams, ScoreResponse, UnlikeRequest,
    UnlikeResponse, UnmatchRequest, UnmatchResponse,
};
use crate::services::{EngagementStore, ProfileProvider, ProviderError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn ProfileProvider>,
    pub store: Arc<dyn EngagementStore>,
    pub registry: Arc<LikeRegistry>,
    pub policy: Arc<DisclosurePolicy>,
    pub scorer: Scorer,
}

/// Configure all engine routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/score", web::get().to(score))
        .route("/ranked", web::get().to(ranked))
        .route("/like", web::post().to(like))
        .route("/unlike", web::post().to(unlike))
        .route("/unmatch", web::post().to(unmatch))
        .route("/profile-view", web::get().to(profile_view));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let store_healthy = state.store.ping().await.is_ok();
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn resolve(state: &AppState, id: &str) -> Result<Actor, EngineError> {
    state
        .provider
        .get_actor(id)
        .await
        .map_err(EngineError::from_provider)
}

/// Compatibility score between two actors
///
/// GET /api/v1/score?viewer={id}&candidate={id}
async fn score(
    state: web::Data<AppState>,
    params: web::Query<ScoreParams>,
) -> Result<HttpResponse, EngineError> {
    params
        .validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    let viewer = resolve(&state, &params.viewer).await?;
    let candidate = resolve(&state, &params.candidate).await?;

    let score = state.scorer.score(&viewer, &candidate);
    Ok(HttpResponse::Ok().json(ScoreResponse { score }))
}

/// Resolve a comma-separated candidate list. Ids the directory does not
/// know are collected into the second element so the caller can tell a
/// dropped candidate from a low-scoring one; other provider failures abort.
async fn resolve_candidates(
    provider: &dyn ProfileProvider,
    raw: &str,
) -> Result<(Vec<Actor>, Vec<String>), EngineError> {
    let mut actors = Vec::new();
    let mut unresolved = Vec::new();

    for id in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match provider.get_actor(id).await {
            Ok(actor) => actors.push(actor),
            Err(ProviderError::NotFound(_)) => {
                tracing::warn!(candidate = %id, "candidate did not resolve");
                unresolved.push(id.to_string());
            }
            Err(other) => return Err(EngineError::from_provider(other)),
        }
    }

    Ok((actors, unresolved))
}

/// Ranked candidate list for a viewer
///
/// GET /api/v1/ranked?viewer={id}&candidates=a,b,c
///
/// Candidates the directory cannot resolve are omitted from `results` and
/// reported back in `unresolved`.
async fn ranked(
    state: web::Data<AppState>,
    params: web::Query<RankedParams>,
) -> Result<HttpResponse, EngineError> {
    params
        .validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    let viewer = resolve(&state, &params.viewer).await?;

    let (candidates, unresolved) =
        resolve_candidates(state.provider.as_ref(), &params.candidates).await?;

    let results = state.scorer.rank(&viewer, &candidates);

    tracing::debug!(
        viewer = %params.viewer,
        "ranked {} of {} requested candidates",
        results.len(),
        candidates.len() + unresolved.len()
    );

    Ok(HttpResponse::Ok().json(RankedResponse {
        viewer: params.viewer.clone(),
        results,
        unresolved,
    }))
}

/// Record a directional like
///
/// POST /api/v1/like  { "from": "...", "to": "..." }
async fn like(
    state: web::Data<AppState>,
    req: web::Json<LikeRequest>,
) -> Result<HttpResponse, EngineError> {
    req.validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    let result = state.registry.like(&req.from, &req.to).await?;

    let status = if result.already_liked {
        LikeStatus::AlreadyLiked
    } else {
        LikeStatus::Recorded
    };

    let (match_status, pair_key) = match &result.match_outcome {
        MatchOutcome::NoMatch => (MatchStatusView::NoMatch, None),
        MatchOutcome::MatchCreated(record) => {
            (MatchStatusView::MatchCreated, Some(record.pair_key.clone()))
        }
        MatchOutcome::AlreadyMatched(record) => (
            MatchStatusView::AlreadyMatched,
            Some(record.pair_key.clone()),
        ),
    };

    Ok(HttpResponse::Ok().json(LikeResponse {
        status,
        match_status,
        pair_key,
    }))
}

/// Withdraw a like prior to a match
///
/// POST /api/v1/unlike  { "from": "...", "to": "..." }
async fn unlike(
    state: web::Data<AppState>,
    req: web::Json<UnlikeRequest>,
) -> Result<HttpResponse, EngineError> {
    req.validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    state.registry.unlike(&req.from, &req.to).await?;

    Ok(HttpResponse::Ok().json(UnlikeResponse {
        status: "removed".to_string(),
    }))
}

/// Revoke a mutual match (terminal)
///
/// POST /api/v1/unmatch  { "pairKey": "a:b" }
async fn unmatch(
    state: web::Data<AppState>,
    req: web::Json<UnmatchRequest>,
) -> Result<HttpResponse, EngineError> {
    req.validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    let pair = PairKey::parse(&req.pair_key)
        .ok_or_else(|| EngineError::Validation(format!("malformed pair key '{}'", req.pair_key)))?;

    let record = state.policy.unmatch(&pair).await?;

    Ok(HttpResponse::Ok().json(UnmatchResponse {
        status: "revoked".to_string(),
        pair_key: record.pair_key,
    }))
}

/// Disclosure-filtered view of a target profile
///
/// GET /api/v1/profile-view?viewer={id}&target={id}
async fn profile_view(
    state: web::Data<AppState>,
    params: web::Query<ProfileViewParams>,
) -> Result<HttpResponse, EngineError> {
    params
        .validate()
        .map_err(|e| EngineError::Validation(e.to_string()))?;

    // Viewer must resolve too; a ghost viewer gets nothing.
    resolve(&state, &params.viewer).await?;
    let target = resolve(&state, &params.target).await?;

    let tier = if params.viewer == params.target {
        crate::models::DisclosureTier::Full
    } else {
        state.policy.tier(&params.viewer, &params.target).await?
    };
    let fields = crate::core::fields_for(tier);

    Ok(HttpResponse::Ok().json(project_profile(&target, tier, &fields)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorRole, Region};
    use crate::services::MemoryDirectory;
    use chrono::Utc;

    fn actor(id: &str) -> Actor {
        Actor {
            actor_id: id.to_string(),
            role: ActorRole::Candidate,
            display_name: id.to_string(),
            headline: None,
            skills: Default::default(),
            industries: Default::default(),
            location: Region::new("QLD"),
            available_from: None,
            visa_tag: None,
            updated_at: Utc::now(),
            contact: None,
        }
    }

    #[test]
    fn test_health_check_response() {
        let response = HealthResponse {
            status: "healthy".to_string(),
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
        };

        assert_eq!(response.status, "healthy");
    }

    #[tokio::test]
    async fn test_resolve_candidates_reports_unknown_ids() {
        let provider = MemoryDirectory::with_actors([actor("cand-1"), actor("cand-2")]);

        let (actors, unresolved) =
            resolve_candidates(&provider, "cand-1, ghost ,cand-2,").await.unwrap();

        let resolved: Vec<&str> = actors.iter().map(|a| a.actor_id.as_str()).collect();
        assert_eq!(resolved, vec!["cand-1", "cand-2"]);
        assert_eq!(unresolved, vec!["ghost".to_string()]);
    }

    #[tokio::test]
    async fn test_resolve_candidates_all_known_leaves_unresolved_empty() {
        let provider = MemoryDirectory::with_actors([actor("cand-1")]);

        let (actors, unresolved) = resolve_candidates(&provider, "cand-1").await.unwrap();

        assert_eq!(actors.len(), 1);
        assert!(unresolved.is_empty());
    }
}
