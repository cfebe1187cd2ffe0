use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Role of an actor in the marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Candidate,
    Employer,
}

/// Top-level region code, e.g. "QLD" or "NSW"
///
/// Comparison is exact code equality (ASCII case-insensitive). Substring
/// matching is deliberately not supported: overlapping place names must
/// not produce false positives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(code: impl Into<String>) -> Self {
        let code: String = code.into();
        Self(code.trim().to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn same_region(&self, other: &Region) -> bool {
        self.0.trim().eq_ignore_ascii_case(other.0.trim())
    }
}

/// Contact details unlocked only at the Full disclosure tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(rename = "exactAddress")]
    pub exact_address: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "referenceContacts", default)]
    pub reference_contacts: Vec<String>,
}

/// Immutable actor snapshot supplied by the profile directory
///
/// The engine never mutates this data; it only reads it for scoring and
/// disclosure projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    #[serde(rename = "actorId")]
    pub actor_id: String,
    pub role: ActorRole,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub industries: BTreeSet<String>,
    pub location: Region,
    #[serde(rename = "availableFrom", default)]
    pub available_from: Option<NaiveDate>,
    #[serde(rename = "visaTag", default)]
    pub visa_tag: Option<String>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub contact: Option<ContactDetails>,
}

impl Actor {
    /// Combined skill + industry tag pool used by the overlap component
    pub fn tag_pool(&self) -> BTreeSet<&str> {
        self.skills
            .iter()
            .chain(self.industries.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Canonical, order-independent key for an unordered actor pair
///
/// Guarantees at most one MatchRecord per pair regardless of which side
/// liked first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairKey(String);

impl PairKey {
    pub fn for_pair(a: &str, b: &str) -> Self {
        if a <= b {
            Self(format!("{}:{}", a, b))
        } else {
            Self(format!("{}:{}", b, a))
        }
    }

    /// Re-hydrate a key received over the wire
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let (a, b) = trimmed.split_once(':')?;
        if a.is_empty() || b.is_empty() {
            return None;
        }
        Some(Self::for_pair(a, b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Directional expression of interest between two actors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeEdge {
    #[serde(rename = "fromActor")]
    pub from_actor: String,
    #[serde(rename = "toActor")]
    pub to_actor: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a match record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Mutual,
    Revoked,
}

/// Durable record of a reciprocal like between two actors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    #[serde(rename = "pairKey")]
    pub pair_key: PairKey,
    #[serde(rename = "actorA")]
    pub actor_a: String,
    #[serde(rename = "actorB")]
    pub actor_b: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub status: MatchStatus,
}

impl MatchRecord {
    /// A fresh mutual record for a pair; actors are stored in canonical order
    pub fn mutual(a: &str, b: &str) -> Self {
        let (actor_a, actor_b) = if a <= b { (a, b) } else { (b, a) };
        Self {
            pair_key: PairKey::for_pair(a, b),
            actor_a: actor_a.to_string(),
            actor_b: actor_b.to_string(),
            created_at: Utc::now(),
            status: MatchStatus::Mutual,
        }
    }
}

/// Relationship state of an unordered actor pair, derived from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairState {
    Stranger,
    OneSidedLike,
    Mutual,
    Revoked,
}

/// Profile visibility tier, derived (never stored) from pair state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisclosureTier {
    Teaser,
    Full,
}

/// Named profile fields subject to disclosure gating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    DisplayName,
    Role,
    Headline,
    CoarseLocation,
    SkillTags,
    IndustryTags,
    AvailabilityWindow,
    VisaTag,
    ExactAddress,
    Phone,
    Email,
    ReferenceContacts,
}

/// Candidate entry in a ranked list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub score: u8,
}

/// Engine state-transition notifications, one per transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    LikeRecorded {
        from: String,
        to: String,
    },
    MatchCreated {
        #[serde(rename = "pairKey")]
        pair_key: PairKey,
        #[serde(rename = "actorA")]
        actor_a: String,
        #[serde(rename = "actorB")]
        actor_b: String,
    },
    Unmatched {
        #[serde(rename = "pairKey")]
        pair_key: PairKey,
    },
}

/// Scoring weights (points per component)
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub skills: f64,
    pub availability: f64,
    pub location: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 50.0,
            availability: 25.0,
            location: 25.0,
        }
    }
}
