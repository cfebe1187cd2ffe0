use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::EngineError;
use crate::models::responses::ProfileView;
use crate::models::{
    Actor, DisclosureTier, EngineEvent, MatchRecord, MatchStatus, PairKey, PairState, ProfileField,
};
use crate::services::events::EventSink;
use crate::services::store::{with_retries, EngagementStore, RevokeOutcome};

/// Field-level disclosure gating per unordered actor pair.
///
/// State machine: Stranger -> OneSidedLike -> Mutual -> Revoked (terminal).
/// The tier is derived from the store on every call; nothing is cached
/// across transitions, and both sides of a pair always see the same tier.
/// This component also owns the explicit unmatch transition.
pub struct DisclosurePolicy {
    store: Arc<dyn EngagementStore>,
    events: Arc<dyn EventSink>,
}

impl DisclosurePolicy {
    pub fn new(store: Arc<dyn EngagementStore>, events: Arc<dyn EventSink>) -> Self {
        Self { store, events }
    }

    /// Current relationship state of the pair, recomputed from the store.
    /// A match record dominates edge state: once a pair has one, its status
    /// decides, so revocation can never silently fall back to edge counting.
    pub async fn pair_state(&self, a: &str, b: &str) -> Result<PairState, EngineError> {
        let pair = PairKey::for_pair(a, b);

        if let Some(record) = with_retries(|| self.store.get_match(&pair))
            .await
            .map_err(EngineError::from_store)?
        {
            return Ok(match record.status {
                MatchStatus::Mutual => PairState::Mutual,
                MatchStatus::Revoked => PairState::Revoked,
            });
        }

        let (forward, reverse) = with_retries(|| self.store.edges_between(a, b))
            .await
            .map_err(EngineError::from_store)?;

        // Without a match record the pair is never Mutual, even if both
        // edges exist (the detector has not committed the record yet).
        Ok(if forward || reverse {
            PairState::OneSidedLike
        } else {
            PairState::Stranger
        })
    }

    /// Disclosure tier for the pair; symmetric by construction
    pub async fn tier(&self, a: &str, b: &str) -> Result<DisclosureTier, EngineError> {
        Ok(match self.pair_state(a, b).await? {
            PairState::Mutual => DisclosureTier::Full,
            _ => DisclosureTier::Teaser,
        })
    }

    /// Fields of `target` visible to `viewer`, recomputed on every call
    pub async fn visible_fields(
        &self,
        viewer: &str,
        target: &str,
    ) -> Result<BTreeSet<ProfileField>, EngineError> {
        // An actor always sees their own profile in full.
        if viewer == target {
            return Ok(fields_for(DisclosureTier::Full));
        }
        let tier = self.tier(viewer, target).await?;
        Ok(fields_for(tier))
    }

    /// Explicitly revoke a mutual match. Terminal: a revoked pair cannot
    /// re-match through this engine. Emits one Unmatched event per actual
    /// transition; revoking twice is a no-op the second time.
    pub async fn unmatch(&self, pair: &PairKey) -> Result<MatchRecord, EngineError> {
        match with_retries(|| self.store.revoke_match(pair))
            .await
            .map_err(EngineError::from_store)?
        {
            RevokeOutcome::Revoked(record) => {
                tracing::info!(pair_key = %record.pair_key, "match revoked");
                self.events.notify(EngineEvent::Unmatched {
                    pair_key: record.pair_key.clone(),
                });
                Ok(record)
            }
            RevokeOutcome::AlreadyRevoked(record) => Ok(record),
            RevokeOutcome::NotFound => {
                Err(EngineError::NotFound(format!("no match for pair {}", pair)))
            }
        }
    }
}

/// Field set for a disclosure tier.
///
/// Teaser exposes only coarse, non-contact attributes. Full additionally
/// unlocks exact address, phone, email and reference contacts.
pub fn fields_for(tier: DisclosureTier) -> BTreeSet<ProfileField> {
    let mut fields: BTreeSet<ProfileField> = [
        ProfileField::DisplayName,
        ProfileField::Role,
        ProfileField::Headline,
        ProfileField::CoarseLocation,
        ProfileField::SkillTags,
        ProfileField::IndustryTags,
        ProfileField::AvailabilityWindow,
        ProfileField::VisaTag,
    ]
    .into_iter()
    .collect();

    if tier == DisclosureTier::Full {
        fields.insert(ProfileField::ExactAddress);
        fields.insert(ProfileField::Phone);
        fields.insert(ProfileField::Email);
        fields.insert(ProfileField::ReferenceContacts);
    }

    fields
}

/// Project an actor snapshot down to the visible field set
pub fn project_profile(
    actor: &Actor,
    tier: DisclosureTier,
    fields: &BTreeSet<ProfileField>,
) -> ProfileView {
    let contact = actor.contact.as_ref();

    ProfileView {
        actor_id: actor.actor_id.clone(),
        tier,
        display_name: fields
            .contains(&ProfileField::DisplayName)
            .then(|| actor.display_name.clone()),
        role: fields.contains(&ProfileField::Role).then_some(actor.role),
        headline: fields
            .contains(&ProfileField::Headline)
            .then(|| actor.headline.clone())
            .flatten(),
        location: fields
            .contains(&ProfileField::CoarseLocation)
            .then(|| actor.location.code().to_string()),
        skill_tags: fields
            .contains(&ProfileField::SkillTags)
            .then(|| actor.skills.iter().cloned().collect()),
        industry_tags: fields
            .contains(&ProfileField::IndustryTags)
            .then(|| actor.industries.iter().cloned().collect()),
        available_from: fields
            .contains(&ProfileField::AvailabilityWindow)
            .then_some(actor.available_from)
            .flatten(),
        visa_tag: fields
            .contains(&ProfileField::VisaTag)
            .then(|| actor.visa_tag.clone())
            .flatten(),
        exact_address: fields
            .contains(&ProfileField::ExactAddress)
            .then(|| contact.map(|c| c.exact_address.clone()))
            .flatten(),
        phone: fields
            .contains(&ProfileField::Phone)
            .then(|| contact.map(|c| c.phone.clone()))
            .flatten(),
        email: fields
            .contains(&ProfileField::Email)
            .then(|| contact.map(|c| c.email.clone()))
            .flatten(),
        reference_contacts: fields
            .contains(&ProfileField::ReferenceContacts)
            .then(|| contact.map(|c| c.reference_contacts.clone()))
            .flatten(),
    }
}
