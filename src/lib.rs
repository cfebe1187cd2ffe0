//! Yonder Match - like/match engine for the Yonder working-holiday app
//!
//! This library implements the matching engine between working-holiday
//! candidates and employers: compatibility scoring, reciprocal-like
//! tracking, mutual-match detection, and field-level disclosure gating.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    calculate_match_score, DisclosurePolicy, LikeRegistry, MatchDetector, MatchOutcome, Scorer,
};
pub use crate::error::EngineError;
pub use crate::models::{
    Actor, ActorRole, DisclosureTier, MatchRecord, PairKey, PairState, ScoringWeights,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let key = PairKey::for_pair("emp-1", "cand-1");
        assert_eq!(key.as_str(), "cand-1:emp-1");
    }
}
