use crate::models::{Actor, ScoringWeights};

/// Calculate a compatibility score (0-100) between a viewer and a candidate
///
/// Scoring formula (points):
///     tag overlap        * 50     # shared skills/industries over viewer's tags
///     availability       * 25     # candidate ready on or before viewer's date
///     location           * 25     # same top-level region code
///
/// Pure and deterministic: identical inputs always yield identical scores.
pub fn calculate_match_score(viewer: &Actor, candidate: &Actor, weights: &ScoringWeights) -> u8 {
    let total = overlap_score(viewer, candidate) * weights.skills
        + availability_score(viewer, candidate) * weights.availability
        + location_score(viewer, candidate) * weights.location;

    total.round().clamp(0.0, 100.0) as u8
}

/// Fraction (0-1) of the viewer's skill/industry tags the candidate shares.
/// An empty viewer tag pool scores 0, never a divide-by-zero fault.
#[inline]
fn overlap_score(viewer: &Actor, candidate: &Actor) -> f64 {
    let viewer_tags = viewer.tag_pool();
    if viewer_tags.is_empty() {
        return 0.0;
    }

    let candidate_tags = candidate.tag_pool();
    let shared = viewer_tags
        .iter()
        .filter(|tag| candidate_tags.contains(**tag))
        .count();

    shared as f64 / viewer_tags.len() as f64
}

/// 1.0 iff the candidate is available on or before the viewer's date.
///
/// Asymmetric: a candidate is compatible when ready by the time the viewer
/// needs them. A missing date on either side is "not compatible", not an
/// error.
#[inline]
fn availability_score(viewer: &Actor, candidate: &Actor) -> f64 {
    match (candidate.available_from, viewer.available_from) {
        (Some(candidate_from), Some(viewer_from)) if candidate_from <= viewer_from => 1.0,
        _ => 0.0,
    }
}

/// 1.0 iff both actors share the same top-level region code
#[inline]
fn location_score(viewer: &Actor, candidate: &Actor) -> f64 {
    if viewer.location.same_region(&candidate.location) {
        1.0
    } else {
        0.0
    }
}
