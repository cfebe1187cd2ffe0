// End-to-end engine flow tests: like -> match -> disclosure -> unmatch

use chrono::Utc;
use std::sync::Arc;
use yonder_match::core::{DisclosurePolicy, LikeRegistry, MatchOutcome};
use yonder_match::models::{
    Actor, ActorRole, ContactDetails, DisclosureTier, EngineEvent, PairKey, PairState,
    ProfileField, Region,
};
use yonder_match::services::{
    EngagementStore, MemoryDirectory, MemoryEngagementStore, RecordingSink,
};
use yonder_match::EngineError;

fn actor(id: &str, role: ActorRole) -> Actor {
    Actor {
        actor_id: id.to_string(),
        role,
        display_name: format!("Actor {}", id),
        headline: Some("Seasonal work".to_string()),
        skills: ["Agriculture".to_string()].into_iter().collect(),
        industries: Default::default(),
        location: Region::new("QLD"),
        available_from: Some("2025-08-01".parse().unwrap()),
        visa_tag: Some("WHV-417".to_string()),
        updated_at: Utc::now(),
        contact: Some(ContactDetails {
            exact_address: format!("1 Main St, {}", id),
            phone: "+61 400 111 222".to_string(),
            email: format!("{}@example.com", id),
            reference_contacts: vec!["ref@example.com".to_string()],
        }),
    }
}

struct Harness {
    registry: LikeRegistry,
    policy: DisclosurePolicy,
    store: Arc<MemoryEngagementStore>,
    sink: Arc<RecordingSink>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryEngagementStore::new());
    let provider = Arc::new(MemoryDirectory::with_actors([
        actor("cand-1", ActorRole::Candidate),
        actor("cand-2", ActorRole::Candidate),
        actor("emp-1", ActorRole::Employer),
    ]));
    let sink = Arc::new(RecordingSink::new());

    Harness {
        registry: LikeRegistry::new(store.clone(), provider.clone(), sink.clone()),
        policy: DisclosurePolicy::new(store.clone(), sink.clone()),
        store,
        sink,
    }
}

#[tokio::test]
async fn test_mutual_like_creates_exactly_one_match() {
    let h = harness();

    let first = h.registry.like("cand-1", "emp-1").await.unwrap();
    assert!(matches!(first.match_outcome, MatchOutcome::NoMatch));

    let second = h.registry.like("emp-1", "cand-1").await.unwrap();
    let pair_key = match &second.match_outcome {
        MatchOutcome::MatchCreated(record) => record.pair_key.clone(),
        other => panic!("expected MatchCreated, got {:?}", other),
    };
    assert_eq!(pair_key, PairKey::for_pair("cand-1", "emp-1"));

    // A further like reports AlreadyMatched with the same pair key
    let third = h.registry.like("emp-1", "cand-1").await.unwrap();
    assert!(third.already_liked);
    match &third.match_outcome {
        MatchOutcome::AlreadyMatched(record) => assert_eq!(record.pair_key, pair_key),
        other => panic!("expected AlreadyMatched, got {:?}", other),
    }

    assert_eq!(h.sink.count_matches_created(), 1);
}

#[tokio::test]
async fn test_one_sided_like_keeps_teaser_disclosure() {
    let h = harness();
    h.registry.like("cand-1", "emp-1").await.unwrap();

    assert_eq!(
        h.policy.pair_state("cand-1", "emp-1").await.unwrap(),
        PairState::OneSidedLike
    );

    // The liked party still only sees the teaser of the liker
    let fields = h.policy.visible_fields("emp-1", "cand-1").await.unwrap();
    assert!(fields.contains(&ProfileField::DisplayName));
    assert!(!fields.contains(&ProfileField::Phone));
    assert!(!fields.contains(&ProfileField::Email));
    assert!(!fields.contains(&ProfileField::ExactAddress));
}

#[tokio::test]
async fn test_disclosure_unlocks_symmetrically_on_match() {
    let h = harness();
    h.registry.like("cand-1", "emp-1").await.unwrap();
    h.registry.like("emp-1", "cand-1").await.unwrap();

    let forward = h.policy.visible_fields("cand-1", "emp-1").await.unwrap();
    let reverse = h.policy.visible_fields("emp-1", "cand-1").await.unwrap();

    assert_eq!(forward, reverse);
    assert!(forward.contains(&ProfileField::Phone));
    assert!(forward.contains(&ProfileField::Email));
    assert!(forward.contains(&ProfileField::ReferenceContacts));

    assert_eq!(
        h.policy.tier("cand-1", "emp-1").await.unwrap(),
        DisclosureTier::Full
    );
}

#[tokio::test]
async fn test_unlike_after_match_is_forbidden_and_keeps_full_disclosure() {
    let h = harness();
    h.registry.like("cand-1", "emp-1").await.unwrap();
    h.registry.like("emp-1", "cand-1").await.unwrap();

    let err = h.registry.unlike("cand-1", "emp-1").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Disclosure is monotonic: still Full until an explicit unmatch
    assert_eq!(
        h.policy.tier("cand-1", "emp-1").await.unwrap(),
        DisclosureTier::Full
    );
}

#[tokio::test]
async fn test_unmatch_revokes_terminally() {
    let h = harness();
    h.registry.like("cand-1", "emp-1").await.unwrap();
    h.registry.like("emp-1", "cand-1").await.unwrap();

    let pair = PairKey::for_pair("cand-1", "emp-1");
    h.policy.unmatch(&pair).await.unwrap();

    assert_eq!(
        h.policy.pair_state("cand-1", "emp-1").await.unwrap(),
        PairState::Revoked
    );
    assert_eq!(
        h.policy.tier("cand-1", "emp-1").await.unwrap(),
        DisclosureTier::Teaser
    );

    // A revoked pair cannot re-engage
    let err = h.registry.like("cand-1", "emp-1").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    // Exactly one Unmatched event fired
    let unmatched = h
        .sink
        .events()
        .iter()
        .filter(|e| matches!(e, EngineEvent::Unmatched { .. }))
        .count();
    assert_eq!(unmatched, 1);
}

#[tokio::test]
async fn test_unlike_resets_pair_to_stranger() {
    let h = harness();
    h.registry.like("cand-1", "emp-1").await.unwrap();
    h.registry.unlike("cand-1", "emp-1").await.unwrap();

    assert_eq!(
        h.policy.pair_state("cand-1", "emp-1").await.unwrap(),
        PairState::Stranger
    );

    // The pair can engage again afterwards
    let again = h.registry.like("cand-1", "emp-1").await.unwrap();
    assert!(!again.already_liked);
}

#[tokio::test]
async fn test_concurrent_reciprocal_likes_create_one_match() {
    // Both sides like each other at the same time, repeatedly; every round
    // must end with exactly one match record and one MatchCreated event.
    for _ in 0..50 {
        let h = harness();
        let registry = Arc::new(h.registry);

        let r1 = registry.clone();
        let t1 = tokio::spawn(async move { r1.like("cand-1", "emp-1").await });
        let r2 = registry.clone();
        let t2 = tokio::spawn(async move { r2.like("emp-1", "cand-1").await });

        let first = t1.await.unwrap().unwrap();
        let second = t2.await.unwrap().unwrap();

        let created = [&first.match_outcome, &second.match_outcome]
            .iter()
            .filter(|o| matches!(o, MatchOutcome::MatchCreated(_)))
            .count();
        // Depending on interleaving one side creates the match; the other
        // sees NoMatch (its reciprocity check ran before the second edge)
        // or AlreadyMatched. Never two creations.
        assert!(created <= 1);

        assert_eq!(h.sink.count_matches_created(), 1, "expected exactly one match event");

        let record = h
            .store
            .get_match(&PairKey::for_pair("cand-1", "emp-1"))
            .await
            .unwrap();
        assert!(record.is_some(), "expected a match record for the pair");
    }
}

#[tokio::test]
async fn test_events_fire_once_per_transition() {
    let h = harness();

    h.registry.like("cand-1", "emp-1").await.unwrap();
    h.registry.like("cand-1", "emp-1").await.unwrap(); // duplicate, no event
    h.registry.like("emp-1", "cand-1").await.unwrap();

    let events = h.sink.events();
    let likes = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::LikeRecorded { .. }))
        .count();
    let matches_created = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::MatchCreated { .. }))
        .count();

    assert_eq!(likes, 2);
    assert_eq!(matches_created, 1);
}
