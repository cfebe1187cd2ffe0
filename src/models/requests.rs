use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to record a directional like
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "from_actor", rename = "from")]
    pub from: String,
    #[validate(length(min = 1))]
    #[serde(alias = "to_actor", rename = "to")]
    pub to: String,
}

/// Request to withdraw a like prior to a match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnlikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "from_actor", rename = "from")]
    pub from: String,
    #[validate(length(min = 1))]
    #[serde(alias = "to_actor", rename = "to")]
    pub to: String,
}

/// Request to revoke an existing mutual match
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UnmatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "pair_key", rename = "pairKey")]
    pub pair_key: String,
}

/// Query parameters for the score endpoint
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ScoreParams {
    #[validate(length(min = 1))]
    pub viewer: String,
    #[validate(length(min = 1))]
    pub candidate: String,
}

/// Query parameters for the ranked-list endpoint
///
/// `candidates` is a comma-separated id list.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RankedParams {
    #[validate(length(min = 1))]
    pub viewer: String,
    #[validate(length(min = 1))]
    pub candidates: String,
}

/// Query parameters for the disclosure-filtered profile view
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileViewParams {
    #[validate(length(min = 1))]
    pub viewer: String,
    #[validate(length(min = 1))]
    pub target: String,
}
