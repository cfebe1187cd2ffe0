// Core engine exports
pub mod detector;
pub mod disclosure;
pub mod ranking;
pub mod registry;
pub mod scoring;

pub use detector::{MatchDetector, MatchOutcome};
pub use disclosure::{fields_for, project_profile, DisclosurePolicy};
pub use ranking::Scorer;
pub use registry::{LikeRegistry, LikeResult};
pub use scoring::calculate_match_score;
