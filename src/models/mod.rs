// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Actor, ActorRole, ContactDetails, DisclosureTier, EngineEvent, LikeEdge, MatchRecord,
    MatchStatus, PairKey, PairState, ProfileField, Region, ScoredCandidate, ScoringWeights,
};
pub use requests::{
    LikeRequest, ProfileViewParams, RankedParams, ScoreParams, UnlikeRequest, UnmatchRequest,
};
pub use responses::{
    ErrorResponse, HealthResponse, LikeResponse, LikeStatus, MatchStatusView, ProfileView,
    RankedResponse, ScoreResponse, UnlikeResponse, UnmatchResponse,
};
