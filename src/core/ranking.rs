use crate::core::scoring::calculate_match_score;
use crate::models::{Actor, ScoredCandidate, ScoringWeights};

/// Scores candidates against a viewer and produces reproducible rankings
#[derive(Debug, Clone)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    pub fn score(&self, viewer: &Actor, candidate: &Actor) -> u8 {
        calculate_match_score(viewer, candidate, &self.weights)
    }

    /// Rank candidates against the viewer.
    ///
    /// Ordering: score descending, then `updated_at` descending, then id
    /// ascending. No randomness; repeated calls with the same inputs yield
    /// the same list. The viewer is excluded if present among candidates.
    pub fn rank(&self, viewer: &Actor, candidates: &[Actor]) -> Vec<ScoredCandidate> {
        let mut scored: Vec<(u8, chrono::DateTime<chrono::Utc>, &str)> = candidates
            .iter()
            .filter(|c| c.actor_id != viewer.actor_id)
            .map(|c| (self.score(viewer, c), c.updated_at, c.actor_id.as_str()))
            .collect();

        scored.sort_by(|a, b| {
            b.0.cmp(&a.0)
                .then_with(|| b.1.cmp(&a.1))
                .then_with(|| a.2.cmp(b.2))
        });

        scored
            .into_iter()
            .map(|(score, _, id)| ScoredCandidate {
                candidate_id: id.to_string(),
                score,
            })
            .collect()
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::with_default_weights()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActorRole, Region};
    use chrono::{TimeZone, Utc};

    fn candidate(id: &str, skills: &[&str], region: &str, updated_day: u32) -> Actor {
        Actor {
            actor_id: id.to_string(),
            role: ActorRole::Candidate,
            display_name: format!("Candidate {}", id),
            headline: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            industries: Default::default(),
            location: Region::new(region),
            available_from: Some("2025-08-01".parse().unwrap()),
            visa_tag: None,
            updated_at: Utc.with_ymd_and_hms(2025, 7, updated_day, 0, 0, 0).unwrap(),
            contact: None,
        }
    }

    fn viewer() -> Actor {
        let mut v = candidate("emp-1", &["Agriculture"], "QLD", 1);
        v.role = ActorRole::Employer;
        v.available_from = Some("2025-09-01".parse().unwrap());
        v
    }

    #[test]
    fn test_rank_orders_by_score() {
        let viewer = viewer();
        let candidates = vec![
            candidate("cand-low", &[], "NSW", 1),
            candidate("cand-high", &["Agriculture"], "QLD", 1),
        ];

        let ranked = Scorer::with_default_weights().rank(&viewer, &candidates);
        assert_eq!(ranked[0].candidate_id, "cand-high");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn test_tie_break_recent_update_first_then_id() {
        let viewer = viewer();
        // Identical profiles -> identical scores
        let candidates = vec![
            candidate("cand-b", &["Agriculture"], "QLD", 5),
            candidate("cand-a", &["Agriculture"], "QLD", 5),
            candidate("cand-c", &["Agriculture"], "QLD", 10),
        ];

        let ranked = Scorer::with_default_weights().rank(&viewer, &candidates);
        // cand-c updated most recently; cand-a before cand-b by id
        assert_eq!(ranked[0].candidate_id, "cand-c");
        assert_eq!(ranked[1].candidate_id, "cand-a");
        assert_eq!(ranked[2].candidate_id, "cand-b");
    }

    #[test]
    fn test_rank_excludes_viewer() {
        let viewer = viewer();
        let candidates = vec![viewer.clone(), candidate("cand-1", &["Agriculture"], "QLD", 1)];

        let ranked = Scorer::with_default_weights().rank(&viewer, &candidates);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate_id, "cand-1");
    }

    #[test]
    fn test_rank_is_reproducible() {
        let viewer = viewer();
        let candidates = vec![
            candidate("cand-a", &["Agriculture"], "QLD", 5),
            candidate("cand-b", &["Agriculture"], "QLD", 5),
            candidate("cand-c", &[], "NSW", 5),
        ];

        let scorer = Scorer::with_default_weights();
        let first = scorer.rank(&viewer, &candidates);
        for _ in 0..5 {
            let again = scorer.rank(&viewer, &candidates);
            let ids: Vec<_> = again.iter().map(|r| r.candidate_id.clone()).collect();
            let first_ids: Vec<_> = first.iter().map(|r| r.candidate_id.clone()).collect();
            assert_eq!(ids, first_ids);
        }
    }
}
