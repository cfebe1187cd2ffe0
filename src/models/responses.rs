use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::domain::{ActorRole, DisclosureTier, PairKey, ScoredCandidate};

/// Response for the score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: u8,
}

/// Response for the ranked-list endpoint
///
/// `unresolved` lists requested candidate ids the directory did not know,
/// so an absent entry is distinguishable from a low-scoring one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResponse {
    pub viewer: String,
    pub results: Vec<ScoredCandidate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// Outcome of a like request, surfaced to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeStatus {
    Recorded,
    AlreadyLiked,
}

/// Match state observed by the caller in the same like response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatusView {
    NoMatch,
    MatchCreated,
    AlreadyMatched,
}

/// Response for the like endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub status: LikeStatus,
    #[serde(rename = "matchStatus")]
    pub match_status: MatchStatusView,
    #[serde(rename = "pairKey", skip_serializing_if = "Option::is_none")]
    pub pair_key: Option<PairKey>,
}

/// Response for the unlike endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlikeResponse {
    pub status: String,
}

/// Response for the unmatch endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmatchResponse {
    pub status: String,
    #[serde(rename = "pairKey")]
    pub pair_key: PairKey,
}

/// Disclosure-filtered profile projection
///
/// Fields absent from the pair's visible set are omitted from the JSON
/// entirely rather than serialized as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    pub tier: DisclosureTier,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ActorRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(rename = "skillTags", skip_serializing_if = "Option::is_none")]
    pub skill_tags: Option<Vec<String>>,
    #[serde(rename = "industryTags", skip_serializing_if = "Option::is_none")]
    pub industry_tags: Option<Vec<String>>,
    #[serde(rename = "availableFrom", skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,
    #[serde(rename = "visaTag", skip_serializing_if = "Option::is_none")]
    pub visa_tag: Option<String>,
    #[serde(rename = "exactAddress", skip_serializing_if = "Option::is_none")]
    pub exact_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "referenceContacts", skip_serializing_if = "Option::is_none")]
    pub reference_contacts: Option<Vec<String>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
